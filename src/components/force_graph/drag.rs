/// Input-library agnostic pointer event in surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
	Down { x: f64, y: f64 },
	Move { x: f64, y: f64 },
	Up,
	Leave,
}

/// What the view has to do to the simulation in response to an event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragCommand<N> {
	/// Reheat and pin `node` where it is.
	Start { node: N },
	/// Move the pin of `node` to `(x, y)`.
	Move { node: N, x: f64, y: f64 },
	/// Cool down and release `node`.
	End { node: N },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragPhase<N> {
	Idle,
	Dragging {
		node: N,
		/// Node position minus pointer position at grab time.
		offset: (f64, f64),
	},
	/// Node let go; the simulation is cooling down.
	Releasing { node: N },
}

/// Three-state drag gesture tracker.
#[derive(Clone, Debug)]
pub struct DragMachine<N> {
	phase: DragPhase<N>,
}

impl<N: Copy + PartialEq> DragMachine<N> {
	pub fn new() -> Self {
		Self {
			phase: DragPhase::Idle,
		}
	}

	pub fn phase(&self) -> DragPhase<N> {
		self.phase
	}

	pub fn dragged(&self) -> Option<N> {
		match self.phase {
			DragPhase::Dragging { node, .. } => Some(node),
			_ => None,
		}
	}

	/// Feed one pointer event. `hit` is the node under a `Down` event and its
	/// current position; it is ignored for every other event.
	pub fn handle(
		&mut self,
		event: PointerEvent,
		hit: Option<(N, (f64, f64))>,
	) -> Option<DragCommand<N>> {
		match (self.phase, event) {
			(DragPhase::Dragging { .. }, PointerEvent::Down { .. }) => None,
			(_, PointerEvent::Down { x, y }) => {
				let (node, (nx, ny)) = hit?;
				self.phase = DragPhase::Dragging {
					node,
					offset: (nx - x, ny - y),
				};
				Some(DragCommand::Start { node })
			}
			(DragPhase::Dragging { node, offset }, PointerEvent::Move { x, y }) => {
				Some(DragCommand::Move {
					node,
					x: x + offset.0,
					y: y + offset.1,
				})
			}
			(DragPhase::Dragging { node, .. }, PointerEvent::Up | PointerEvent::Leave) => {
				self.phase = DragPhase::Releasing { node };
				Some(DragCommand::End { node })
			}
			_ => None,
		}
	}

	/// Called after each simulation tick; a release completes once the
	/// simulation is no longer being held warm.
	pub fn settle(&mut self, reheated: bool) {
		if let DragPhase::Releasing { .. } = self.phase {
			if !reheated {
				self.phase = DragPhase::Idle;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn full_gesture() {
		let mut drag = DragMachine::<usize>::new();

		let cmd = drag.handle(PointerEvent::Down { x: 10.0, y: 10.0 }, Some((3, (12.0, 9.0))));
		assert_eq!(cmd, Some(DragCommand::Start { node: 3 }));
		assert_eq!(drag.dragged(), Some(3));

		let cmd = drag.handle(PointerEvent::Move { x: 50.0, y: 60.0 }, None);
		assert_eq!(
			cmd,
			Some(DragCommand::Move {
				node: 3,
				x: 52.0,
				y: 59.0
			})
		);

		let cmd = drag.handle(PointerEvent::Up, None);
		assert_eq!(cmd, Some(DragCommand::End { node: 3 }));
		assert_eq!(drag.phase(), DragPhase::Releasing { node: 3 });

		drag.settle(true);
		assert_eq!(drag.phase(), DragPhase::Releasing { node: 3 });
		drag.settle(false);
		assert_eq!(drag.phase(), DragPhase::Idle);
	}

	#[test]
	fn down_on_background_does_nothing() {
		let mut drag = DragMachine::<usize>::new();
		assert_eq!(drag.handle(PointerEvent::Down { x: 0.0, y: 0.0 }, None), None);
		assert_eq!(drag.handle(PointerEvent::Move { x: 5.0, y: 5.0 }, None), None);
		assert_eq!(drag.handle(PointerEvent::Up, None), None);
		assert_eq!(drag.phase(), DragPhase::Idle);
	}

	#[test]
	fn leaving_the_surface_ends_the_drag() {
		let mut drag = DragMachine::<usize>::new();
		drag.handle(PointerEvent::Down { x: 0.0, y: 0.0 }, Some((1, (0.0, 0.0))));
		assert_eq!(
			drag.handle(PointerEvent::Leave, None),
			Some(DragCommand::End { node: 1 })
		);
	}

	#[test]
	fn new_grab_while_releasing() {
		let mut drag = DragMachine::<usize>::new();
		drag.handle(PointerEvent::Down { x: 0.0, y: 0.0 }, Some((1, (0.0, 0.0))));
		drag.handle(PointerEvent::Up, None);
		let cmd = drag.handle(PointerEvent::Down { x: 0.0, y: 0.0 }, Some((2, (0.0, 0.0))));
		assert_eq!(cmd, Some(DragCommand::Start { node: 2 }));
		assert_eq!(drag.dragged(), Some(2));
	}

	#[test]
	fn second_down_while_dragging_is_ignored() {
		let mut drag = DragMachine::<usize>::new();
		drag.handle(PointerEvent::Down { x: 0.0, y: 0.0 }, Some((1, (0.0, 0.0))));
		assert_eq!(
			drag.handle(PointerEvent::Down { x: 1.0, y: 1.0 }, Some((2, (1.0, 1.0)))),
			None
		);
		assert_eq!(drag.dragged(), Some(1));
	}
}
