//! Client configuration, provided to the component tree as context.

use std::time::Duration;

/// How long a toast stays on screen.
pub const TOAST_TIMEOUT: Duration = Duration::from_millis(5000);

/// Endpoints and tunables of the browser client.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
	/// Prefix prepended to every request path; empty for same-origin.
	pub api_base: String,
	pub envs_path: String,
	pub packages_path: String,
	pub graph_path: String,
	/// Prefix of the token-protected preview endpoints.
	pub preview_base: String,
	/// Environment whose dependency graph the preview panel shows.
	pub preview_env: String,
	pub notifications_path: String,
	pub toast_timeout: Duration,
	/// Local storage key holding the preview API token.
	pub token_storage_key: String,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			api_base: String::new(),
			envs_path: "/api/envs/".into(),
			packages_path: "/api/packages/".into(),
			graph_path: "/api/graph/".into(),
			preview_base: "/preview".into(),
			preview_env: "dev".into(),
			notifications_path: "/notifications/ws".into(),
			toast_timeout: TOAST_TIMEOUT,
			token_storage_key: "preview_token".into(),
		}
	}
}

impl ClientConfig {
	/// Path of a preview resource such as `envs` or `graph?env=dev`.
	pub fn preview_path(&self, resource: &str) -> String {
		format!("{}/{}", self.preview_base.trim_end_matches('/'), resource)
	}

	pub fn preview_graph_path(&self) -> String {
		self.preview_path(&format!("graph?env={}", self.preview_env))
	}

	/// WebSocket URL of the notification stream for a page served from
	/// `origin`.
	pub fn notifications_url(&self, origin: &str) -> String {
		format!("{}{}", websocket_origin(origin), self.notifications_path)
	}
}

/// `http://` becomes `ws://` and `https://` becomes `wss://`.
pub fn websocket_origin(origin: &str) -> String {
	match origin.strip_prefix("http") {
		Some(rest) => format!("ws{rest}"),
		None => origin.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn websocket_scheme_follows_page_scheme() {
		assert_eq!(websocket_origin("http://localhost:8000"), "ws://localhost:8000");
		assert_eq!(websocket_origin("https://nexon.dev"), "wss://nexon.dev");
		assert_eq!(websocket_origin("file://"), "file://");
	}

	#[test]
	fn notification_url() {
		let config = ClientConfig::default();
		assert_eq!(
			config.notifications_url("https://nexon.dev"),
			"wss://nexon.dev/notifications/ws"
		);
	}

	#[test]
	fn preview_paths() {
		let config = ClientConfig {
			preview_base: "/preview/".into(),
			preview_env: "staging".into(),
			..ClientConfig::default()
		};
		assert_eq!(config.preview_path("envs"), "/preview/envs");
		assert_eq!(config.preview_graph_path(), "/preview/graph?env=staging");
	}
}
