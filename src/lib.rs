//! Leptos client-side app for nexon: dependency graph dashboard, token
//! protected preview panel and live notification toasts.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
pub mod api;
pub mod auth;
pub mod components;
pub mod config;
pub mod error;
mod pages;

// Top-Level pages
use crate::components::toasts::ToastHost;
use crate::config::ClientConfig;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;
use crate::pages::preview::Preview;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Router for the dashboard and preview pages, with the notification toasts
/// mounted above every route.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	provide_context(ClientConfig::default());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="nexon" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<ToastHost />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/preview") view=Preview />
			</Routes>
		</Router>
	}
}
