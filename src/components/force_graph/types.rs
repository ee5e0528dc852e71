use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Mapping of package identifier to its direct dependency identifiers, as
/// returned by the graph endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdjacencyGraph(BTreeMap<String, Vec<String>>);

impl AdjacencyGraph {
	/// An empty graph.
	pub fn new() -> Self {
		Self::default()
	}

	/// Decode a graph from JSON text, failing on anything that is not an
	/// object of string arrays.
	pub fn from_json(json: &str) -> Result<Self, GraphError> {
		serde_json::from_str(json).map_err(|e| GraphError::Malformed(e.to_string()))
	}

	/// Decode a graph from an already parsed JSON value.
	pub fn from_value(value: serde_json::Value) -> Result<Self, GraphError> {
		serde_json::from_value(value).map_err(|e| GraphError::Malformed(e.to_string()))
	}

	/// Set the dependency list of `id`, replacing any previous one.
	pub fn insert(&mut self, id: impl Into<String>, deps: Vec<String>) {
		self.0.insert(id.into(), deps);
	}

	/// Number of keys.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// True when there are no keys.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Keys with their dependency lists, in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
	}
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for AdjacencyGraph {
	fn from_iter<I: IntoIterator<Item = (K, Vec<String>)>>(iter: I) -> Self {
		Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
	}
}

/// Directed edge from a package to one of its dependencies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
}

/// Renderable node and link sets derived from an [`AdjacencyGraph`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphData {
	pub nodes: Vec<String>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Keys come first in key order, followed by dependencies that are not
	/// keys themselves in order of first appearance. Every (key, dependency)
	/// pair yields one link, duplicates included.
	pub fn from_adjacency(graph: &AdjacencyGraph) -> Self {
		let mut seen: HashSet<&str> = graph.iter().map(|(id, _)| id).collect();
		let mut nodes: Vec<String> = graph.iter().map(|(id, _)| id.to_string()).collect();
		let mut links = Vec::new();

		for (source, deps) in graph.iter() {
			for target in deps {
				if seen.insert(target.as_str()) {
					nodes.push(target.clone());
				}
				links.push(GraphLink {
					source: source.to_string(),
					target: target.clone(),
				});
			}
		}

		Self { nodes, links }
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Point-in-time copy of a laid out node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSnapshot {
	pub id: String,
	pub x: f64,
	pub y: f64,
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use super::*;

	fn deps(ids: &[&str]) -> Vec<String> {
		ids.iter().map(|id| id.to_string()).collect()
	}

	fn link(source: &str, target: &str) -> GraphLink {
		GraphLink {
			source: source.into(),
			target: target.into(),
		}
	}

	#[test]
	fn derives_nodes_and_links_from_adjacency() {
		let graph = AdjacencyGraph::from_json(r#"{"a": ["b", "c"], "b": ["c"]}"#).unwrap();
		let data = GraphData::from_adjacency(&graph);

		assert_eq!(data.nodes, vec!["a", "b", "c"]);
		assert_eq!(data.links, vec![link("a", "b"), link("a", "c"), link("b", "c")]);
	}

	#[test]
	fn dangling_dependency_becomes_implicit_node() {
		let graph = AdjacencyGraph::from_json(r#"{"a": ["x"]}"#).unwrap();
		let data = GraphData::from_adjacency(&graph);

		assert_eq!(data.nodes, vec!["a", "x"]);
		assert_eq!(data.links, vec![link("a", "x")]);
	}

	#[test]
	fn empty_graph_has_no_nodes_or_links() {
		let data = GraphData::from_adjacency(&AdjacencyGraph::from_json("{}").unwrap());
		assert!(data.is_empty());
		assert!(data.links.is_empty());
	}

	#[test]
	fn node_set_is_union_of_keys_and_values() {
		let graph: AdjacencyGraph = [
			("numpy", deps(&[])),
			("pandas", deps(&["numpy", "pytz", "dateutil"])),
			("dateutil", deps(&["six"])),
			("scipy", deps(&["numpy", "numpy"])),
		]
		.into_iter()
		.collect();
		let data = GraphData::from_adjacency(&graph);

		let expected: BTreeSet<&str> = graph
			.iter()
			.flat_map(|(k, deps)| std::iter::once(k).chain(deps.iter().map(String::as_str)))
			.collect();
		let actual: BTreeSet<&str> = data.nodes.iter().map(String::as_str).collect();
		assert_eq!(actual, expected);
		assert_eq!(data.nodes.len(), expected.len());

		let dep_total: usize = graph.iter().map(|(_, deps)| deps.len()).sum();
		assert_eq!(data.links.len(), dep_total);
	}

	#[test]
	fn self_dependency_is_kept_as_link() {
		let graph: AdjacencyGraph = [("a", deps(&["a"]))].into_iter().collect();
		let data = GraphData::from_adjacency(&graph);
		assert_eq!(data.nodes, vec!["a"]);
		assert_eq!(data.links, vec![link("a", "a")]);
	}

	#[test]
	fn rejects_malformed_input() {
		assert!(matches!(
			AdjacencyGraph::from_json(r#"["a", "b"]"#),
			Err(GraphError::Malformed(_))
		));
		assert!(AdjacencyGraph::from_json(r#"{"a": "b"}"#).is_err());
		assert!(AdjacencyGraph::from_json(r#"{"a": [1, 2]}"#).is_err());
		assert!(AdjacencyGraph::from_value(serde_json::json!({"a": null})).is_err());
	}
}
