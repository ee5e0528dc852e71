use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::types::GraphData;

/// Rest length of a dependency link.
pub const LINK_DISTANCE: f32 = 80.0;
/// Many-body strength; negative values repel.
pub const CHARGE_STRENGTH: f32 = -300.0;
/// Below this energy the simulation stops ticking.
pub const ALPHA_MIN: f64 = 0.001;
/// Energy the simulation is held at while a node is being dragged.
pub const DRAG_ALPHA_TARGET: f64 = 0.3;
/// Seconds of simulated time advanced per animation frame.
pub const FRAME_DT: f32 = 0.016;

const NODE_MASS: f32 = 10.0;
const SEED_RADIUS: f64 = 100.0;

/// Physics constants handed to the force engine.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	pub link_distance: f32,
	pub charge_strength: f32,
	pub node_mass: f32,
	pub force_max: f32,
	pub node_speed: f32,
	pub damping_factor: f32,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	pub drag_alpha_target: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			link_distance: LINK_DISTANCE,
			charge_strength: CHARGE_STRENGTH,
			node_mass: NODE_MASS,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			alpha_min: ALPHA_MIN,
			// reaches alpha_min from 1.0 in 300 ticks
			alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / 300.0),
			drag_alpha_target: DRAG_ALPHA_TARGET,
		}
	}
}

impl LayoutConfig {
	/// Spring constant for which an isolated linked pair comes to rest at
	/// `link_distance`: the engine's spring pull `0.5 * k * d` balances the
	/// charge push `q * m^2 / d^2`.
	pub fn spring_strength(&self) -> f32 {
		let charge = -self.charge_strength;
		2.0 * charge * self.node_mass * self.node_mass / self.link_distance.powi(3)
	}

	pub fn parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: -self.charge_strength,
			force_spring: self.spring_strength(),
			force_max: self.force_max,
			node_speed: self.node_speed,
			damping_factor: self.damping_factor,
		}
	}
}

/// Lifecycle of one simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	/// Not ticking: nothing rendered yet, or settled.
	Idle,
	/// Freshly started or held warm by a drag.
	Active,
	/// Alpha decaying toward zero.
	Settling,
}

/// Per-node payload stored in the force engine.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub fx: Option<f32>,
	pub fy: Option<f32>,
}

/// Force engine plus the alpha energy model, pinning and the centering force.
pub struct Simulation {
	graph: ForceGraph<NodeInfo, ()>,
	index: HashMap<String, DefaultNodeIdx>,
	config: LayoutConfig,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	phase: Phase,
}

impl Simulation {
	/// An empty, idle simulation.
	pub fn empty(config: LayoutConfig, center: (f64, f64)) -> Self {
		Self {
			graph: ForceGraph::new(config.parameters()),
			index: HashMap::new(),
			config,
			center,
			alpha: 0.0,
			alpha_target: 0.0,
			phase: Phase::Idle,
		}
	}

	/// Seed every node on a circle around `center` and start ticking.
	pub fn new(data: &GraphData, config: LayoutConfig, center: (f64, f64)) -> Self {
		let mut sim = Self::empty(config, center);
		let mass = sim.config.node_mass;

		for (i, id) in data.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
			let idx = sim.graph.add_node(NodeData {
				x: (center.0 + SEED_RADIUS * angle.cos()) as f32,
				y: (center.1 + SEED_RADIUS * angle.sin()) as f32,
				mass,
				is_anchor: false,
				user_data: NodeInfo {
					id: id.clone(),
					fx: None,
					fy: None,
				},
			});
			sim.index.insert(id.clone(), idx);
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) = (sim.index.get(&link.source), sim.index.get(&link.target))
			{
				// the engine cannot borrow one node twice; a self link exerts no force anyway
				if src != tgt {
					sim.graph.add_edge(src, tgt, EdgeData::default());
				}
			}
		}

		if !data.is_empty() {
			sim.alpha = 1.0;
			sim.phase = Phase::Active;
		}
		sim
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}

	/// True while the simulation is still ticking.
	pub fn is_active(&self) -> bool {
		self.phase != Phase::Idle
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn config(&self) -> &LayoutConfig {
		&self.config
	}

	pub fn node_count(&self) -> usize {
		self.index.len()
	}

	pub fn index_of(&self, id: &str) -> Option<DefaultNodeIdx> {
		self.index.get(id).copied()
	}

	pub fn set_center(&mut self, center: (f64, f64)) {
		self.center = center;
	}

	/// Set the energy the simulation converges to. Dropping it to zero while
	/// warm moves the simulation into `Settling`.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
		if target <= 0.0 && self.phase == Phase::Active {
			self.phase = Phase::Settling;
		}
	}

	/// Resume ticking after the simulation went idle.
	pub fn restart(&mut self) {
		if self.index.is_empty() {
			return;
		}
		if self.phase != Phase::Active {
			debug!("simulation restarted at alpha {:.4}", self.alpha);
		}
		self.phase = Phase::Active;
	}

	/// Advance one frame. Returns false when idle.
	pub fn tick(&mut self, dt: f32) -> bool {
		if self.phase == Phase::Idle {
			return false;
		}

		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
		self.apply_pins();
		self.graph.update(dt * self.alpha as f32);
		self.apply_centering();
		self.apply_pins();

		if self.alpha_target <= 0.0 {
			self.phase = Phase::Settling;
		}
		if self.alpha < self.config.alpha_min {
			self.phase = Phase::Idle;
			debug!("simulation settled");
		}
		true
	}

	/// Fix a node at `(x, y)`; forces no longer move it.
	pub fn pin(&mut self, idx: DefaultNodeIdx, x: f64, y: f64) {
		let (x, y) = (x as f32, y as f32);
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.user_data.fx = Some(x);
				node.data.user_data.fy = Some(y);
				node.data.x = x;
				node.data.y = y;
				node.data.is_anchor = true;
			}
		});
	}

	/// Hand a node back to the forces.
	pub fn unpin(&mut self, idx: DefaultNodeIdx) {
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.user_data.fx = None;
				node.data.user_data.fy = None;
				node.data.is_anchor = false;
			}
		});
	}

	pub fn position(&self, idx: DefaultNodeIdx) -> Option<(f64, f64)> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some((node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	/// Visit `(index, info, x, y)` for every node.
	pub fn visit_nodes(&self, mut f: impl FnMut(DefaultNodeIdx, &NodeInfo, f64, f64)) {
		self.graph.visit_nodes(|node| {
			f(node.index(), &node.data.user_data, node.x() as f64, node.y() as f64);
		});
	}

	/// Visit the endpoint positions of every link.
	pub fn visit_links(&self, mut f: impl FnMut((f64, f64), (f64, f64))) {
		self.graph.visit_edges(|n1, n2, _| {
			f(
				(n1.x() as f64, n1.y() as f64),
				(n2.x() as f64, n2.y() as f64),
			);
		});
	}

	fn apply_pins(&mut self) {
		self.graph.visit_nodes_mut(|node| {
			if let (Some(fx), Some(fy)) = (node.data.user_data.fx, node.data.user_data.fy) {
				node.data.x = fx;
				node.data.y = fy;
			}
		});
	}

	fn apply_centering(&mut self) {
		let (mut sum_x, mut sum_y, mut count) = (0.0, 0.0, 0usize);
		self.graph.visit_nodes(|node| {
			sum_x += node.x() as f64;
			sum_y += node.y() as f64;
			count += 1;
		});
		let Some((dx, dy)) = centering_offset(sum_x, sum_y, count, self.center) else {
			return;
		};
		let (dx, dy) = (dx as f32, dy as f32);
		self.graph.visit_nodes_mut(|node| {
			if !node.data.is_anchor {
				node.data.x += dx;
				node.data.y += dy;
			}
		});
	}
}

/// Translation that moves the barycenter of `count` points onto `center`.
pub fn centering_offset(
	sum_x: f64,
	sum_y: f64,
	count: usize,
	center: (f64, f64),
) -> Option<(f64, f64)> {
	if count == 0 {
		return None;
	}
	let n = count as f64;
	Some((center.0 - sum_x / n, center.1 - sum_y / n))
}
