use std::rc::Rc;

use leptos::prelude::*;
use log::warn;

use super::{load_into, report_error};
use crate::api::{ApiClient, Environment, PreviewPackage};
use crate::auth::{BrowserCredentials, CredentialProvider, StaticCredentials};
use crate::config::ClientConfig;
use crate::error::ClientError;

/// Token protected read-only view of environments, packages and the
/// dependency graph of the configured environment.
#[component]
pub fn Preview() -> impl IntoView {
	let config = use_context::<ClientConfig>().unwrap_or_default();

	let envs = RwSignal::new(Vec::<Environment>::new());
	let packages = RwSignal::new(Vec::<PreviewPackage>::new());
	let graph_json = RwSignal::new(String::new());

	// resolve once so a missing token prompts a single time
	match BrowserCredentials::new(config.token_storage_key.clone()).token() {
		Some(token) => {
			let client = ApiClient::new(&config.api_base)
				.with_credentials(Rc::new(StaticCredentials::new(token)));
			{
				let (client, config) = (client.clone(), config.clone());
				load_into(envs, async move { client.preview_envs(&config).await });
			}
			{
				let (client, config) = (client.clone(), config.clone());
				load_into(packages, async move { client.preview_packages(&config).await });
			}
			{
				let (client, config) = (client.clone(), config.clone());
				load_into(graph_json, async move {
					client.preview_graph(&config).await.map(|graph| {
						serde_json::to_string_pretty(&graph).unwrap_or_else(|_| graph.to_string())
					})
				});
			}
		}
		None => {
			warn!("preview opened without an API token");
			report_error(&ClientError::MissingCredentials);
		}
	}

	view! {
		<main class="preview">
			<section id="envs">
				<h2>"Environments"</h2>
				<ul>
					{move || {
						envs.get()
							.into_iter()
							.map(|e| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			</section>
			<section id="pkgs">
				<h2>"Packages"</h2>
				<ul>
					{move || {
						packages
							.get()
							.into_iter()
							.map(|p| view! { <li>{p.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			</section>
			<section id="graph">
				<h2>{format!("Dependency graph ({})", config.preview_env)}</h2>
				<pre>{move || graph_json.get()}</pre>
			</section>
		</main>
	}
}
