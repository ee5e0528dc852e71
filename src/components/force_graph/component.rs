use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

use super::drag::PointerEvent;
use super::surface::CanvasSurface;
use super::types::AdjacencyGraph;
use super::view::GraphView;

type SharedView = Rc<RefCell<Option<GraphView<CanvasSurface>>>>;

/// Canvas showing `graph` as a force-directed diagram. Every change of
/// `graph` re-renders the same view in place; the animation loop stops and
/// the view is dropped once the canvas leaves the document.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] graph: Signal<AdjacencyGraph>,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let view: SharedView = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (view_init, animate_init) = (view.clone(), animate.clone());

	Effect::new(move |_| {
		let graph = graph.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if view_init.borrow().is_none() {
			let surface = match CanvasSurface::new(&canvas, width, height) {
				Ok(surface) => surface,
				Err(e) => {
					error!("graph canvas unavailable: {:?}", e);
					return;
				}
			};
			*view_init.borrow_mut() = Some(GraphView::new(surface));
			start_animation(&canvas, view_init.clone(), animate_init.clone());
		}

		if let Some(ref mut v) = *view_init.borrow_mut() {
			v.render(&graph);
		}
	});

	let dispatch = move |view: &SharedView, event: PointerEvent| {
		if let Some(ref mut v) = *view.borrow_mut() {
			v.pointer(event);
		}
	};
	let position = move |client_x: f64, client_y: f64| -> Option<(f64, f64)> {
		let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
		let rect = canvas.get_bounding_client_rect();
		Some((client_x - rect.left(), client_y - rect.top()))
	};

	let view_md = view.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = position(ev.client_x() as f64, ev.client_y() as f64) {
			dispatch(&view_md, PointerEvent::Down { x, y });
		}
	};
	let view_mm = view.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = position(ev.client_x() as f64, ev.client_y() as f64) {
			dispatch(&view_mm, PointerEvent::Move { x, y });
		}
	};
	let view_mu = view.clone();
	let on_mouseup = move |_: MouseEvent| dispatch(&view_mu, PointerEvent::Up);
	let view_ml = view.clone();
	let on_mouseleave = move |_: MouseEvent| dispatch(&view_ml, PointerEvent::Leave);

	let view_ts = view.clone();
	let on_touchstart = move |ev: TouchEvent| {
		let Some(touch) = ev.touches().get(0) else {
			return;
		};
		if let Some((x, y)) = position(touch.client_x() as f64, touch.client_y() as f64) {
			ev.prevent_default();
			dispatch(&view_ts, PointerEvent::Down { x, y });
		}
	};
	let view_tm = view.clone();
	let on_touchmove = move |ev: TouchEvent| {
		let Some(touch) = ev.touches().get(0) else {
			return;
		};
		if let Some((x, y)) = position(touch.client_x() as f64, touch.client_y() as f64) {
			ev.prevent_default();
			dispatch(&view_tm, PointerEvent::Move { x, y });
		}
	};
	let view_te = view.clone();
	let on_touchend = move |_: TouchEvent| dispatch(&view_te, PointerEvent::Up);

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend
			style="display: block; cursor: grab;"
		/>
	}
}

/// Drive `view` from `requestAnimationFrame` until `canvas` is detached.
fn start_animation(
	canvas: &HtmlCanvasElement,
	view: SharedView,
	animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
) {
	let Some(window) = web_sys::window() else {
		error!("no window, graph animation not started");
		return;
	};
	let (canvas, animate_inner) = (canvas.clone(), animate.clone());
	*animate.borrow_mut() = Some(Closure::new(move || {
		if !canvas.is_connected() {
			debug!("graph canvas detached, disposing view");
			// still running inside this callback, so it is dropped on the next turn
			let callback = detach(&view, &animate_inner);
			set_timeout(move || drop(callback), Duration::ZERO);
			return;
		}
		if let Some(ref mut v) = *view.borrow_mut() {
			v.frame();
		}
		if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
			let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	}));
	if let Some(ref cb) = *animate.borrow() {
		let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
	}
}

/// Empty the view and frame-callback slots of a detached canvas. The callback
/// captures the slot it lives in; taking it out breaks that cycle.
fn detach<V, F>(view: &RefCell<Option<V>>, animate: &RefCell<Option<F>>) -> Option<F> {
	view.borrow_mut().take();
	animate.borrow_mut().take()
}
