//! Bearer token sources for the token-protected endpoints.

use log::{info, warn};

/// Supplies the API token sent as `Authorization: Bearer <token>`.
pub trait CredentialProvider {
	/// The token, or `None` when the user has none to give.
	fn token(&self) -> Option<String>;
}

/// Fixed token, e.g. one already resolved for the current page.
#[derive(Clone, Debug)]
pub struct StaticCredentials(String);

impl StaticCredentials {
	pub fn new(token: impl Into<String>) -> Self {
		Self(token.into())
	}
}

impl CredentialProvider for StaticCredentials {
	fn token(&self) -> Option<String> {
		normalize_token(&self.0)
	}
}

/// Reads the token from local storage, prompting for it (and remembering
/// the answer) when none is stored.
#[derive(Clone, Debug)]
pub struct BrowserCredentials {
	storage_key: String,
}

impl BrowserCredentials {
	pub fn new(storage_key: impl Into<String>) -> Self {
		Self {
			storage_key: storage_key.into(),
		}
	}
}

impl CredentialProvider for BrowserCredentials {
	fn token(&self) -> Option<String> {
		let window = web_sys::window()?;
		let storage = window.local_storage().ok().flatten();

		let stored = storage
			.as_ref()
			.and_then(|s| s.get_item(&self.storage_key).ok().flatten())
			.and_then(|t| normalize_token(&t));
		if stored.is_some() {
			return stored;
		}

		let token = window
			.prompt_with_message("API token:")
			.ok()
			.flatten()
			.and_then(|t| normalize_token(&t))?;
		match storage.map(|s| s.set_item(&self.storage_key, &token)) {
			Some(Ok(())) => info!("API token stored under {}", self.storage_key),
			_ => warn!("API token could not be stored, it will be asked for again"),
		}
		Some(token)
	}
}

/// Value of the `Authorization` header for `token`.
pub fn bearer(token: &str) -> String {
	format!("Bearer {token}")
}

fn normalize_token(raw: &str) -> Option<String> {
	let token = raw.trim();
	(!token.is_empty()).then(|| token.to_string())
}
