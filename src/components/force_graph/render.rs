use super::simulation::Simulation;
use super::surface::DrawingSurface;

/// Repaint the whole surface from the current simulation positions: links
/// first so node circles sit on top of them.
pub fn draw<S: DrawingSurface>(simulation: &Simulation, surface: &S) {
	surface.clear();
	simulation.visit_links(|from, to| surface.draw_link(from, to));
	simulation.visit_nodes(|_, info, x, y| {
		surface.draw_node((x, y), &info.id, info.fx.is_some());
	});
}
