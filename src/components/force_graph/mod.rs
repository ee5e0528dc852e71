mod component;
pub mod drag;
mod render;
pub mod simulation;
pub mod surface;
mod types;
pub mod view;

pub use component::ForceGraphCanvas;
pub use types::{AdjacencyGraph, GraphData, GraphLink, NodeSnapshot};
pub use view::GraphView;
