use std::rc::Rc;

use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use super::types::{Environment, GraphRequest, Package, PreviewPackage};
use crate::auth::{CredentialProvider, bearer};
use crate::components::force_graph::AdjacencyGraph;
use crate::config::ClientConfig;
use crate::error::ClientError;

/// JSON client for the nexon server, using the browser fetch API.
#[derive(Clone)]
pub struct ApiClient {
	base_url: String,
	credentials: Option<Rc<dyn CredentialProvider>>,
}

impl ApiClient {
	pub fn new(base_url: &str) -> Self {
		Self {
			base_url: base_url.to_string(),
			credentials: None,
		}
	}

	/// Send a bearer token with every request.
	pub fn with_credentials(mut self, provider: Rc<dyn CredentialProvider>) -> Self {
		self.credentials = Some(provider);
		self
	}

	pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
		self.send("GET", path, None).await
	}

	pub async fn post<T: DeserializeOwned, B: Serialize>(
		&self,
		path: &str,
		body: &B,
	) -> Result<T, ClientError> {
		let body = serde_json::to_string(body).map_err(|e| ClientError::Request {
			path: path.to_string(),
			reason: e.to_string(),
		})?;
		self.send("POST", path, Some(body)).await
	}

	pub async fn list_envs(&self, config: &ClientConfig) -> Result<Vec<Environment>, ClientError> {
		self.get(&config.envs_path).await
	}

	pub async fn list_packages(&self, config: &ClientConfig) -> Result<Vec<Package>, ClientError> {
		self.get(&config.packages_path).await
	}

	/// Resolve `requirements` into the dependency graph of their closure.
	pub async fn dependency_graph(
		&self,
		config: &ClientConfig,
		requirements: Vec<String>,
	) -> Result<AdjacencyGraph, ClientError> {
		let value: serde_json::Value = self
			.post(&config.graph_path, &GraphRequest { requirements })
			.await?;
		Ok(AdjacencyGraph::from_value(value)?)
	}

	pub async fn preview_envs(&self, config: &ClientConfig) -> Result<Vec<Environment>, ClientError> {
		self.get(&config.preview_path("envs")).await
	}

	pub async fn preview_packages(
		&self,
		config: &ClientConfig,
	) -> Result<Vec<PreviewPackage>, ClientError> {
		self.get(&config.preview_path("packages")).await
	}

	pub async fn preview_graph(&self, config: &ClientConfig) -> Result<serde_json::Value, ClientError> {
		self.get(&config.preview_graph_path()).await
	}

	async fn send<T: DeserializeOwned>(
		&self,
		method: &str,
		path: &str,
		body: Option<String>,
	) -> Result<T, ClientError> {
		let url = format!("{}{}", self.base_url, path);
		let request_err = |e: JsValue| ClientError::Request {
			path: path.to_string(),
			reason: format!("{:?}", e),
		};

		let headers = Headers::new().map_err(request_err)?;
		headers.set("Accept", "application/json").map_err(request_err)?;
		if let Some(provider) = &self.credentials {
			let token = provider.token().ok_or(ClientError::MissingCredentials)?;
			headers
				.set("Authorization", &bearer(&token))
				.map_err(request_err)?;
		}

		let opts = RequestInit::new();
		opts.set_method(method);
		if let Some(body) = body {
			headers
				.set("Content-Type", "application/json")
				.map_err(request_err)?;
			opts.set_body(&JsValue::from_str(&body));
		}
		opts.set_headers(&headers);

		let request = Request::new_with_str_and_init(&url, &opts).map_err(request_err)?;
		let window = web_sys::window().ok_or(ClientError::NoWindow)?;

		debug!("{} {}", method, url);
		let resp_value = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(|e| ClientError::Network {
				path: path.to_string(),
				reason: format!("{:?}", e),
			})?;
		let resp: Response = resp_value.dyn_into().map_err(|_| ClientError::Network {
			path: path.to_string(),
			reason: "response is not a Response".into(),
		})?;

		if !resp.ok() {
			return Err(ClientError::Http {
				path: path.to_string(),
				status: resp.status(),
			});
		}

		let decode_err = |reason: String| ClientError::Decode {
			path: path.to_string(),
			reason,
		};
		let json = JsFuture::from(resp.json().map_err(|e| decode_err(format!("{:?}", e)))?)
			.await
			.map_err(|e| decode_err(format!("{:?}", e)))?;
		serde_wasm_bindgen::from_value(json).map_err(|e| decode_err(e.to_string()))
	}
}
