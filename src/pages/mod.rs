//! Routed pages and the helpers they share.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::error;

use crate::error::ClientError;

pub mod home;
pub mod not_found;
pub mod preview;

/// Tell the user a request failed with a blocking alert.
pub(crate) fn report_error(err: &ClientError) {
	error!("{}", err);
	if let Some(window) = web_sys::window() {
		let _ = window.alert_with_message(&err.to_string());
	}
}

/// Run `fetch` once and store its result in `target`, alerting on failure.
pub(crate) fn load_into<T, F>(target: RwSignal<T>, fetch: F)
where
	T: Send + Sync + 'static,
	F: Future<Output = Result<T, ClientError>> + 'static,
{
	spawn_local(async move {
		match fetch.await {
			Ok(value) => target.set(value),
			Err(e) => report_error(&e),
		}
	});
}
