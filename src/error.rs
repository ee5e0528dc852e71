//! Error types shared by the API client and the graph view.

use thiserror::Error;

/// Input handed to the graph view could not be interpreted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
	/// Not an object mapping identifiers to arrays of identifiers.
	#[error("malformed adjacency graph: {0}")]
	Malformed(String),
}

/// Failure of a single request against the nexon server.
#[derive(Debug, Error)]
pub enum ClientError {
	/// Running outside a browser window.
	#[error("no browser window available")]
	NoWindow,

	/// The request object could not be constructed.
	#[error("failed to build request for {path}: {reason}")]
	Request { path: String, reason: String },

	/// The fetch itself failed before a response arrived.
	#[error("network error loading {path}: {reason}")]
	Network { path: String, reason: String },

	/// The server answered with a non-success status.
	#[error("Error loading {path}: {status}")]
	Http { path: String, status: u16 },

	/// The response body was not the expected JSON shape.
	#[error("failed to decode response from {path}: {reason}")]
	Decode { path: String, reason: String },

	/// A token is required but none was supplied.
	#[error("no API token available")]
	MissingCredentials,

	/// The decoded graph was rejected.
	#[error(transparent)]
	Graph(#[from] GraphError),
}
