use leptos::prelude::*;
use leptos::task::spawn_local;
use log::debug;
use web_sys::MouseEvent;

use super::{load_into, report_error};
use crate::api::{ApiClient, Environment, Package};
use crate::components::force_graph::{AdjacencyGraph, ForceGraphCanvas};
use crate::config::ClientConfig;

const GRAPH_WIDTH: f64 = 960.0;
const GRAPH_HEIGHT: f64 = 600.0;

/// Requirement typed by the user, or `None` when there is nothing to ask for.
fn normalize_requirement(input: &str) -> Option<String> {
	let req = input.trim();
	(!req.is_empty()).then(|| req.to_string())
}

/// Environments, packages and the dependency graph of a requirement.
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<ClientConfig>().unwrap_or_default();
	let client = ApiClient::new(&config.api_base);

	let envs = RwSignal::new(Vec::<Environment>::new());
	let packages = RwSignal::new(Vec::<Package>::new());
	let graph = RwSignal::new(AdjacencyGraph::new());
	let requirement = RwSignal::new(String::new());
	// bumped per request; only the newest response is rendered
	let generation = StoredValue::new(0u64);

	{
		let (client, config) = (client.clone(), config.clone());
		load_into(envs, async move { client.list_envs(&config).await });
	}
	{
		let (client, config) = (client.clone(), config.clone());
		load_into(packages, async move { client.list_packages(&config).await });
	}

	let on_build = move |_: MouseEvent| {
		let Some(req) = normalize_requirement(&requirement.get_untracked()) else {
			return;
		};
		let current = generation.get_value() + 1;
		generation.set_value(current);

		let (client, config) = (client.clone(), config.clone());
		spawn_local(async move {
			let result = client.dependency_graph(&config, vec![req]).await;
			if generation.get_value() != current {
				debug!("dropping graph response {} superseded by a newer request", current);
				return;
			}
			match result {
				Ok(g) => graph.set(g),
				Err(e) => report_error(&e),
			}
		});
	};

	view! {
		<main class="dashboard">
			<section id="envs">
				<h2>"Environments"</h2>
				<ul id="env-list">
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
				<ul id="pkg-list">
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
				<h2>"Dependency graph"</h2>
				<div class="graph-controls">
					<input
						id="req-input"
						type="text"
						placeholder="e.g. pandas>=2.0"
						bind:value=requirement
					/>
					<button id="graph-btn" on:click=on_build>
						"Build graph"
					</button>
				</div>
				<ForceGraphCanvas graph=graph width=Some(GRAPH_WIDTH) height=Some(GRAPH_HEIGHT) />
			</section>
		</main>
	}
}
