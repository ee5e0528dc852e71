use std::fmt;

use serde::{Deserialize, Serialize};

/// Environment as listed by the server.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Environment {
	pub name: String,
	pub role: String,
}

impl fmt::Display for Environment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.name, self.role)
	}
}

/// Package with every available version.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Package {
	pub name: String,
	#[serde(default)]
	pub versions: Vec<String>,
}

impl fmt::Display for Package {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.name, self.versions.join(", "))
	}
}

/// Package pinned to one version, as shown by the preview endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PreviewPackage {
	pub name: String,
	pub version: String,
}

impl fmt::Display for PreviewPackage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}-{}", self.name, self.version)
	}
}

/// Body of the dependency graph request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphRequest {
	pub requirements: Vec<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn environment_listing() {
		let envs: Vec<Environment> =
			serde_json::from_str(r#"[{"name": "dev", "role": "development", "packages": []}]"#)
				.unwrap();
		assert_eq!(envs[0].to_string(), "dev (development)");
	}

	#[test]
	fn package_listing() {
		let pkg: Package =
			serde_json::from_str(r#"{"name": "numpy", "versions": ["1.26.0", "2.0.1"]}"#).unwrap();
		assert_eq!(pkg.to_string(), "numpy: 1.26.0, 2.0.1");

		let bare: Package = serde_json::from_str(r#"{"name": "six"}"#).unwrap();
		assert_eq!(bare.to_string(), "six: ");
	}

	#[test]
	fn preview_package_listing() {
		let pkg: PreviewPackage =
			serde_json::from_str(r#"{"name": "requests", "version": "2.32.3"}"#).unwrap();
		assert_eq!(pkg.to_string(), "requests-2.32.3");
	}

	#[test]
	fn graph_request_body() {
		let body = GraphRequest {
			requirements: vec!["pandas>=2".into()],
		};
		assert_eq!(
			serde_json::to_value(&body).unwrap(),
			serde_json::json!({"requirements": ["pandas>=2"]})
		);
	}
}
