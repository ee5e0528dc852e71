use std::f64::consts::PI;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub const NODE_RADIUS: f64 = 12.0;

const DEFAULT_WIDTH: f64 = 800.0;
const DEFAULT_HEIGHT: f64 = 600.0;
const BACKGROUND: &str = "#ffffff";
const LINK_COLOR: &str = "#999";
const NODE_FILL: &str = "#4A90E2";
const NODE_PINNED_FILL: &str = "#2C5F9E";
const NODE_STROKE: &str = "#fff";
const LABEL_COLOR: &str = "#222";

/// Something the graph view can draw onto.
pub trait DrawingSurface {
	/// Width and height in surface pixels.
	fn size(&self) -> (f64, f64);
	/// Remove everything drawn so far.
	fn clear(&self);
	/// Directed link between two node centers.
	fn draw_link(&self, from: (f64, f64), to: (f64, f64));
	/// Node circle with its label.
	fn draw_node(&self, at: (f64, f64), label: &str, pinned: bool);
}

/// Explicit sizes win; otherwise the rendered client size, and a fixed
/// default when the element has not been laid out yet.
pub fn surface_dimensions(
	width: Option<f64>,
	height: Option<f64>,
	client_width: i32,
	client_height: i32,
) -> (f64, f64) {
	let pick = |explicit: Option<f64>, client: i32, fallback: f64| {
		explicit
			.filter(|v| *v > 0.0)
			.or_else(|| (client > 0).then_some(client as f64))
			.unwrap_or(fallback)
	};
	(
		pick(width, client_width, DEFAULT_WIDTH),
		pick(height, client_height, DEFAULT_HEIGHT),
	)
}

/// 2d canvas backed surface.
pub struct CanvasSurface {
	ctx: CanvasRenderingContext2d,
	width: f64,
	height: f64,
}

impl CanvasSurface {
	/// Size the canvas and grab its 2d context.
	pub fn new(
		canvas: &HtmlCanvasElement,
		width: Option<f64>,
		height: Option<f64>,
	) -> Result<Self, JsValue> {
		let (width, height) =
			surface_dimensions(width, height, canvas.client_width(), canvas.client_height());
		canvas.set_width(width as u32);
		canvas.set_height(height as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")?
			.ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
			.dyn_into()?;
		Ok(Self { ctx, width, height })
	}
}

impl DrawingSurface for CanvasSurface {
	fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	fn clear(&self) {
		self.ctx.set_fill_style_str(BACKGROUND);
		self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
	}

	fn draw_link(&self, from: (f64, f64), to: (f64, f64)) {
		let (dx, dy) = (to.0 - from.0, to.1 - from.1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let arrow = 8.0;

		let ctx = &self.ctx;
		ctx.set_stroke_style_str(LINK_COLOR);
		ctx.set_line_width(2.0);
		ctx.begin_path();
		ctx.move_to(from.0 + ux * NODE_RADIUS, from.1 + uy * NODE_RADIUS);
		ctx.line_to(
			to.0 - ux * (NODE_RADIUS + arrow),
			to.1 - uy * (NODE_RADIUS + arrow),
		);
		ctx.stroke();

		ctx.set_fill_style_str(LINK_COLOR);
		let (tip_x, tip_y) = (to.0 - ux * NODE_RADIUS, to.1 - uy * NODE_RADIUS);
		let (back_x, back_y) = (tip_x - ux * arrow, tip_y - uy * arrow);
		let (px, py) = (-uy * arrow * 0.5, ux * arrow * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}

	fn draw_node(&self, at: (f64, f64), label: &str, pinned: bool) {
		let ctx = &self.ctx;
		ctx.begin_path();
		let _ = ctx.arc(at.0, at.1, NODE_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(if pinned { NODE_PINNED_FILL } else { NODE_FILL });
		ctx.fill();
		ctx.set_stroke_style_str(NODE_STROKE);
		ctx.set_line_width(1.5);
		ctx.stroke();

		ctx.set_fill_style_str(LABEL_COLOR);
		ctx.set_font("10px sans-serif");
		ctx.set_text_align("center");
		let _ = ctx.fill_text(label, at.0, at.1 + 4.0);
	}
}
