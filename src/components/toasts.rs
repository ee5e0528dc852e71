use leptos::prelude::*;
use log::{debug, info, warn};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, ErrorEvent, MessageEvent, WebSocket};

use crate::config::ClientConfig;

/// Severity of a server notification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
	Success,
	Warning,
	Error,
	#[default]
	#[serde(other)]
	Info,
}

impl Level {
	pub fn as_str(self) -> &'static str {
		match self {
			Level::Info => "info",
			Level::Success => "success",
			Level::Warning => "warning",
			Level::Error => "error",
		}
	}

	pub fn css_class(self) -> String {
		format!("toast toast-{}", self.as_str())
	}
}

/// Message pushed by the server over the notification socket.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Notification {
	pub title: String,
	pub message: String,
	#[serde(default)]
	pub level: Level,
	#[serde(default)]
	pub timestamp: Option<f64>,
}

impl Notification {
	pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}

#[derive(Clone, Debug, PartialEq)]
struct Toast {
	id: u64,
	notification: Notification,
}

/// Fixed top-right stack of toasts fed by the notification socket. Each
/// toast disappears after the configured timeout.
#[component]
pub fn ToastHost() -> impl IntoView {
	let config = use_context::<ClientConfig>().unwrap_or_default();
	let toasts = RwSignal::new(Vec::<Toast>::new());
	let next_id = StoredValue::new(0u64);
	let timeout = config.toast_timeout;

	let show = move |notification: Notification| {
		let id = next_id.get_value();
		next_id.set_value(id + 1);
		toasts.update(|t| t.push(Toast { id, notification }));
		set_timeout(
			move || toasts.update(|t| t.retain(|toast| toast.id != id)),
			timeout,
		);
	};

	match web_sys::window().map(|w| w.location().origin()) {
		Some(Ok(origin)) => {
			let url = config.notifications_url(&origin);
			if let Err(e) = connect(&url, show) {
				warn!("notification socket {} unavailable: {:?}", url, e);
			}
		}
		_ => warn!("page origin unknown, notifications disabled"),
	}

	view! {
		<div id="toast-c" style="position:fixed;top:1rem;right:1rem;z-index:9999;">
			<For
				each=move || toasts.get()
				key=|toast| toast.id
				children=move |toast: Toast| {
					let Notification { title, message, level, .. } = toast.notification;
					view! {
						<div class=level.css_class()>
							<strong>{title}</strong>
							<p>{message}</p>
						</div>
					}
				}
			/>
		</div>
	}
}

/// Open the socket and hand every decodable message to `on_notification`.
/// The callbacks live as long as the page.
fn connect(
	url: &str,
	on_notification: impl Fn(Notification) + 'static,
) -> Result<WebSocket, JsValue> {
	let ws = WebSocket::new(url)?;

	let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
		let Some(text) = ev.data().as_string() else {
			debug!("ignoring non-text notification frame");
			return;
		};
		match Notification::parse(&text) {
			Ok(notification) => on_notification(notification),
			Err(e) => warn!("malformed notification {:?}: {}", text, e),
		}
	});
	ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
	on_message.forget();

	let on_error = Closure::<dyn FnMut(ErrorEvent)>::new(move |ev: ErrorEvent| {
		warn!("notification socket error: {}", ev.message());
	});
	ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));
	on_error.forget();

	let on_close = Closure::<dyn FnMut(CloseEvent)>::new(move |ev: CloseEvent| {
		info!("notification socket closed ({})", ev.code());
	});
	ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));
	on_close.forget();

	info!("listening for notifications on {}", url);
	Ok(ws)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_server_notification() {
		let n = Notification::parse(
			r#"{"title": "Build", "message": "numpy built", "level": "success", "timestamp": 12.5}"#,
		)
		.unwrap();
		assert_eq!(n.title, "Build");
		assert_eq!(n.message, "numpy built");
		assert_eq!(n.level, Level::Success);
		assert_eq!(n.timestamp, Some(12.5));
		assert_eq!(n.level.css_class(), "toast toast-success");
	}

	#[test]
	fn level_defaults_to_info() {
		let n = Notification::parse(r#"{"title": "t", "message": "m"}"#).unwrap();
		assert_eq!(n.level, Level::Info);

		let n = Notification::parse(r#"{"title": "t", "message": "m", "level": "debug"}"#).unwrap();
		assert_eq!(n.level, Level::Info);
	}

	#[test]
	fn rejects_missing_fields() {
		assert!(Notification::parse(r#"{"title": "t"}"#).is_err());
		assert!(Notification::parse("not json").is_err());
	}
}
