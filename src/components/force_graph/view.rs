use force_graph::DefaultNodeIdx;
use log::{debug, info};

use super::drag::{DragCommand, DragMachine, DragPhase, PointerEvent};
use super::render;
use super::simulation::{FRAME_DT, LayoutConfig, Phase, Simulation};
use super::surface::{DrawingSurface, NODE_RADIUS};
use super::types::{AdjacencyGraph, GraphData, GraphLink, NodeSnapshot};

/// Pointer distance within which a node counts as hit.
pub const HIT_RADIUS: f64 = NODE_RADIUS;

/// One mounted dependency graph: owns its surface, the derived node and
/// link sets, the running simulation and the drag gesture state.
pub struct GraphView<S: DrawingSurface> {
	surface: S,
	config: LayoutConfig,
	data: GraphData,
	simulation: Simulation,
	drag: DragMachine<DefaultNodeIdx>,
}

impl<S: DrawingSurface> GraphView<S> {
	pub fn new(surface: S) -> Self {
		Self::with_config(surface, LayoutConfig::default())
	}

	pub fn with_config(surface: S, config: LayoutConfig) -> Self {
		let center = center_of(surface.size());
		Self {
			simulation: Simulation::empty(config.clone(), center),
			surface,
			config,
			data: GraphData::default(),
			drag: DragMachine::new(),
		}
	}

	/// Replace whatever is shown with `graph` and start laying it out.
	pub fn render(&mut self, graph: &AdjacencyGraph) {
		self.surface.clear();
		self.data = GraphData::from_adjacency(graph);
		self.drag = DragMachine::new();
		let center = center_of(self.surface.size());
		self.simulation = Simulation::new(&self.data, self.config.clone(), center);
		info!(
			"rendering dependency graph: {} nodes, {} links",
			self.data.nodes.len(),
			self.data.links.len()
		);
	}

	/// Drop all nodes and links and blank the surface.
	pub fn clear(&mut self) {
		self.render(&AdjacencyGraph::new());
	}

	/// Advance the layout by one animation frame.
	pub fn tick(&mut self) -> bool {
		let ticked = self.simulation.tick(FRAME_DT);
		self.drag.settle(self.simulation.alpha_target() > 0.0);
		ticked
	}

	/// Paint current positions. Nothing is drawn for an empty graph.
	pub fn draw(&self) {
		if self.data.is_empty() {
			return;
		}
		render::draw(&self.simulation, &self.surface);
	}

	/// One animation frame: tick when the layout is still moving, then paint.
	pub fn frame(&mut self) {
		if self.simulation.is_active() {
			self.tick();
		}
		self.draw();
	}

	pub fn pointer(&mut self, event: PointerEvent) {
		let hit = match event {
			PointerEvent::Down { x, y } => self
				.node_at(x, y)
				.and_then(|idx| Some((idx, self.simulation.position(idx)?))),
			_ => None,
		};
		let Some(command) = self.drag.handle(event, hit) else {
			return;
		};
		match command {
			DragCommand::Start { node } => self.drag_start(node),
			DragCommand::Move { node, x, y } => self.drag_move(node, x, y),
			DragCommand::End { node } => self.drag_end(node),
		}
	}

	/// Reheat the layout and pin `node` at its current position.
	pub fn drag_start(&mut self, node: DefaultNodeIdx) {
		self.simulation.set_alpha_target(self.config.drag_alpha_target);
		self.simulation.restart();
		if let Some((x, y)) = self.simulation.position(node) {
			self.simulation.pin(node, x, y);
		}
		debug!("drag start on node {:?}", node);
	}

	pub fn drag_move(&mut self, node: DefaultNodeIdx, x: f64, y: f64) {
		self.simulation.pin(node, x, y);
	}

	/// Let the layout cool and release `node` back to the forces.
	pub fn drag_end(&mut self, node: DefaultNodeIdx) {
		self.simulation.set_alpha_target(0.0);
		self.simulation.unpin(node);
		debug!("drag end on node {:?}", node);
	}

	/// Closest node within [`HIT_RADIUS`] of a surface point.
	pub fn node_at(&self, x: f64, y: f64) -> Option<DefaultNodeIdx> {
		let mut best: Option<(DefaultNodeIdx, f64)> = None;
		self.simulation.visit_nodes(|idx, _, nx, ny| {
			let dist = ((nx - x).powi(2) + (ny - y).powi(2)).sqrt();
			if dist < HIT_RADIUS && best.is_none_or(|(_, d)| dist < d) {
				best = Some((idx, dist));
			}
		});
		best.map(|(idx, _)| idx)
	}

	/// Keep the centering target in the middle of a resized surface.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.simulation.set_center(center_of((width, height)));
	}

	pub fn phase(&self) -> Phase {
		self.simulation.phase()
	}

	pub fn is_active(&self) -> bool {
		self.simulation.is_active()
	}

	pub fn alpha_target(&self) -> f64 {
		self.simulation.alpha_target()
	}

	pub fn drag_phase(&self) -> DragPhase<DefaultNodeIdx> {
		self.drag.phase()
	}

	pub fn index_of(&self, id: &str) -> Option<DefaultNodeIdx> {
		self.simulation.index_of(id)
	}

	pub fn nodes(&self) -> Vec<NodeSnapshot> {
		let mut nodes = Vec::with_capacity(self.simulation.node_count());
		self.simulation.visit_nodes(|_, info, x, y| {
			nodes.push(NodeSnapshot {
				id: info.id.clone(),
				x,
				y,
				fx: info.fx.map(f64::from),
				fy: info.fy.map(f64::from),
			});
		});
		nodes
	}

	pub fn node(&self, id: &str) -> Option<NodeSnapshot> {
		self.nodes().into_iter().find(|n| n.id == id)
	}

	pub fn links(&self) -> &[GraphLink] {
		&self.data.links
	}

	pub fn surface(&self) -> &S {
		&self.surface
	}
}

fn center_of((width, height): (f64, f64)) -> (f64, f64) {
	(width / 2.0, height / 2.0)
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::collections::BTreeSet;

	use super::*;

	#[derive(Clone, Debug, PartialEq)]
	enum Op {
		Clear,
		Link,
		Node(String),
	}

	#[derive(Default)]
	struct RecordingSurface {
		ops: RefCell<Vec<Op>>,
	}

	impl RecordingSurface {
		fn take(&self) -> Vec<Op> {
			std::mem::take(&mut *self.ops.borrow_mut())
		}
	}

	impl DrawingSurface for RecordingSurface {
		fn size(&self) -> (f64, f64) {
			(800.0, 600.0)
		}

		fn clear(&self) {
			self.ops.borrow_mut().push(Op::Clear);
		}

		fn draw_link(&self, _: (f64, f64), _: (f64, f64)) {
			self.ops.borrow_mut().push(Op::Link);
		}

		fn draw_node(&self, _: (f64, f64), label: &str, _: bool) {
			self.ops.borrow_mut().push(Op::Node(label.to_string()));
		}
	}

	fn graph(json: &str) -> AdjacencyGraph {
		AdjacencyGraph::from_json(json).unwrap()
	}

	fn ids(view: &GraphView<RecordingSurface>) -> BTreeSet<String> {
		view.nodes().into_iter().map(|n| n.id).collect()
	}

	fn settle(view: &mut GraphView<RecordingSurface>) {
		let mut ticks = 0;
		while view.tick() {
			ticks += 1;
			assert!(ticks < 10_000);
		}
	}

	fn grab(view: &mut GraphView<RecordingSurface>, id: &str) {
		let node = view.node(id).unwrap();
		view.pointer(PointerEvent::Down {
			x: node.x,
			y: node.y,
		});
	}

	#[test]
	fn renders_nodes_and_links() {
		let mut view = GraphView::new(RecordingSurface::default());
		view.render(&graph(r#"{"a": ["b", "c"], "b": ["c"]}"#));

		assert_eq!(ids(&view), BTreeSet::from(["a", "b", "c"].map(String::from)));
		assert_eq!(view.links().len(), 3);
		assert_eq!(view.phase(), Phase::Active);

		view.surface().take();
		view.draw();
		let ops = view.surface().take();
		assert_eq!(ops[0], Op::Clear);
		assert_eq!(ops.iter().filter(|op| **op == Op::Link).count(), 3);
		assert_eq!(
			ops.iter().filter(|op| matches!(op, Op::Node(_))).count(),
			3
		);
	}

	#[test]
	fn renders_dangling_reference() {
		let mut view = GraphView::new(RecordingSurface::default());
		view.render(&graph(r#"{"a": ["x"]}"#));
		assert_eq!(ids(&view), BTreeSet::from(["a", "x"].map(String::from)));
		assert_eq!(
			view.links(),
			&[GraphLink {
				source: "a".into(),
				target: "x".into()
			}]
		);
	}

	#[test]
	fn empty_graph_clears_previous_render() {
		let mut view = GraphView::new(RecordingSurface::default());
		view.render(&graph(r#"{"a": ["b"]}"#));
		view.surface().take();

		view.render(&graph("{}"));
		assert!(view.nodes().is_empty());
		assert!(view.links().is_empty());
		assert_eq!(view.phase(), Phase::Idle);
		assert_eq!(view.surface().take(), vec![Op::Clear]);

		view.frame();
		assert!(view.surface().take().is_empty());
	}

	#[test]
	fn rerender_replaces_graph() {
		let mut view = GraphView::new(RecordingSurface::default());
		view.render(&graph(r#"{"a": ["b"]}"#));
		settle(&mut view);
		view.render(&graph(r#"{"c": ["d", "e"]}"#));
		assert_eq!(ids(&view), BTreeSet::from(["c", "d", "e"].map(String::from)));
		assert_eq!(view.phase(), Phase::Active);
	}

	#[test]
	fn drag_start_wakes_settled_simulation() {
		let mut view = GraphView::new(RecordingSurface::default());
		view.render(&graph(r#"{"a": ["b", "c"], "b": ["c"]}"#));
		settle(&mut view);
		assert!(!view.is_active());

		grab(&mut view, "a");
		assert!(view.is_active());
		assert_eq!(view.phase(), Phase::Active);
		assert!(view.alpha_target() > 0.0);

		let a = view.node("a").unwrap();
		assert_eq!((a.fx, a.fy), (Some(a.x), Some(a.y)));
	}

	#[test]
	fn drag_move_follows_pointer() {
		let mut view = GraphView::new(RecordingSurface::default());
		view.render(&graph(r#"{"a": ["b"]}"#));
		settle(&mut view);
		grab(&mut view, "a");

		view.pointer(PointerEvent::Move { x: 100.0, y: 50.0 });
		view.tick();
		let a = view.node("a").unwrap();
		assert_eq!((a.fx, a.fy), (Some(100.0), Some(50.0)));
		assert_eq!((a.x, a.y), (100.0, 50.0));
	}

	#[test]
	fn drag_end_unpins_and_cools() {
		let mut view = GraphView::new(RecordingSurface::default());
		view.render(&graph(r#"{"a": ["b"]}"#));
		settle(&mut view);
		grab(&mut view, "a");
		view.pointer(PointerEvent::Move { x: 120.0, y: 80.0 });
		view.pointer(PointerEvent::Up);

		let a = view.node("a").unwrap();
		assert_eq!((a.fx, a.fy), (None, None));
		assert_eq!(view.alpha_target(), 0.0);
		assert_eq!(view.phase(), Phase::Settling);
		assert!(matches!(view.drag_phase(), DragPhase::Releasing { .. }));

		view.tick();
		assert_eq!(view.drag_phase(), DragPhase::Idle);
		settle(&mut view);
		assert_eq!(view.phase(), Phase::Idle);
	}

	#[test]
	fn self_dependency_renders_and_ticks() {
		let mut view = GraphView::new(RecordingSurface::default());
		view.render(&graph(r#"{"a": ["a", "b"]}"#));
		assert_eq!(view.links().len(), 2);
		assert!(view.tick());
		view.frame();
		assert_eq!(ids(&view), BTreeSet::from(["a", "b"].map(String::from)));
	}

	#[test]
	fn resize_moves_centering_target() {
		let mut view = GraphView::new(RecordingSurface::default());
		view.render(&graph(r#"{"a": ["b", "c"]}"#));
		view.resize(200.0, 100.0);
		view.tick();

		let nodes = view.nodes();
		let n = nodes.len() as f64;
		let cx = nodes.iter().map(|n| n.x).sum::<f64>() / n;
		let cy = nodes.iter().map(|n| n.y).sum::<f64>() / n;
		assert!((cx - 100.0).abs() < 0.1);
		assert!((cy - 50.0).abs() < 0.1);
	}

	#[test]
	fn clear_drops_everything() {
		let mut view = GraphView::new(RecordingSurface::default());
		view.render(&graph(r#"{"a": ["b"]}"#));
		assert!(view.index_of("a").is_some());

		view.clear();
		assert!(view.index_of("a").is_none());
		assert!(view.nodes().is_empty());
		assert!(!view.is_active());
	}

	#[test]
	fn pointer_on_background_leaves_layout_alone() {
		let mut view = GraphView::new(RecordingSurface::default());
		view.render(&graph(r#"{"a": ["b"]}"#));
		settle(&mut view);
		view.pointer(PointerEvent::Down { x: -500.0, y: -500.0 });
		assert!(!view.is_active());
		assert_eq!(view.drag_phase(), DragPhase::Idle);
	}
}
