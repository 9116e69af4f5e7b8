//! Browser glue: canvas setup, window events and the frame loop.
//!
//! The field is shared between the event handlers and the
//! `requestAnimationFrame` callback through `Rc<RefCell<..>>`; everything runs
//! on the page's single thread. The loop has no stop operation and lives as
//! long as the page.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Event, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window,
};

use super::config::FieldConfig;
use super::render;
use super::state::{ParticleField, ViewState};

/// Key that switches the pointer from repelling to attracting while held.
const MODIFIER_KEY: &str = "Alt";

/// Bundles the simulation with the surface it draws on.
struct FieldContext {
	field: ParticleField,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	/// Timestamp (ms) of the previous frame.
	last_frame: Option<f64>,
}

/// Runs the starfield on the canvas with the given element id.
///
/// Returns `false` without doing anything when the element is missing, is
/// not a canvas, or has no 2D context.
pub fn attach(canvas_id: &str, config: FieldConfig) -> bool {
	let Some(canvas) = find_canvas(canvas_id) else {
		debug!("space-warp: no canvas #{}, nothing to animate", canvas_id);
		return false;
	};
	start(canvas, config).is_some()
}

fn find_canvas(id: &str) -> Option<HtmlCanvasElement> {
	web_sys::window()?
		.document()?
		.get_element_by_id(id)?
		.dyn_into()
		.ok()
}

/// Sets up the field on `canvas`, wires window events and starts the loop.
pub(crate) fn start(canvas: HtmlCanvasElement, config: FieldConfig) -> Option<()> {
	let window = web_sys::window()?;
	let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;

	let (w, h, dpr) = viewport(&window);
	let field = ParticleField::new(config, w, h, dpr, SmallRng::seed_from_u64(seed()));
	fit_canvas(&canvas, &ctx, field.view());
	info!(
		"space-warp: {} particles on {}x{} (dpr {})",
		field.len(),
		w,
		h,
		dpr
	);

	let context = Rc::new(RefCell::new(FieldContext {
		field,
		canvas,
		ctx,
		last_frame: None,
	}));

	let context_resize = context.clone();
	listen(&window, "resize", move |_| {
		let Some(win) = web_sys::window() else {
			return;
		};
		let (nw, nh, dpr) = viewport(&win);
		let mut c = context_resize.borrow_mut();
		c.field.on_resize(nw, nh, dpr);
		fit_canvas(&c.canvas, &c.ctx, c.field.view());
		debug!(
			"space-warp: resized to {}x{}, target {} particles",
			nw,
			nh,
			c.field.view().target_count
		);
	});

	let context_mm = context.clone();
	listen(&window, "mousemove", move |ev| {
		let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
			return;
		};
		let mut c = context_mm.borrow_mut();
		let rect = c.canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		c.field.on_pointer_move(x, y);
	});

	for (event, pressed) in [("mousedown", true), ("mouseup", false)] {
		let context_btn = context.clone();
		listen(&window, event, move |_| {
			context_btn.borrow_mut().field.on_modifier_toggle(pressed);
		});
	}

	for (event, pressed) in [("keydown", true), ("keyup", false)] {
		let context_key = context.clone();
		listen(&window, event, move |ev| {
			let is_modifier = ev
				.dyn_ref::<KeyboardEvent>()
				.is_some_and(|k| k.key() == MODIFIER_KEY);
			if is_modifier {
				context_key.borrow_mut().field.on_modifier_toggle(pressed);
			}
		});
	}

	let animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let (context_anim, animate_inner) = (context, animate.clone());
	*animate.borrow_mut() = Some(Closure::new(move |now: f64| {
		{
			let mut guard = context_anim.borrow_mut();
			let c = &mut *guard;
			let elapsed = c.last_frame.map_or(0.0, |last| (now - last) / 1000.0);
			c.last_frame = Some(now);
			c.field.tick(elapsed);
			render::render(&c.field, &c.ctx);
		}
		if let Some(ref cb) = *animate_inner.borrow() {
			request_frame(cb);
		}
	}));
	if let Some(ref cb) = *animate.borrow() {
		request_frame(cb);
	}

	Some(())
}

fn listen(window: &Window, event: &str, handler: impl FnMut(Event) + 'static) {
	let cb = Closure::<dyn FnMut(Event)>::new(handler);
	let _ = window.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
	// Listeners stay registered for the lifetime of the page.
	cb.forget();
}

fn request_frame(cb: &Closure<dyn FnMut(f64)>) {
	if let Some(window) = web_sys::window() {
		let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
	}
}

/// Window size in CSS pixels and the device pixel ratio.
fn viewport(window: &Window) -> (f64, f64, f64) {
	let dimension = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	(
		dimension(window.inner_width()),
		dimension(window.inner_height()),
		window.device_pixel_ratio(),
	)
}

/// Sizes the backing store for the device pixel ratio and maps CSS pixels onto it.
fn fit_canvas(canvas: &HtmlCanvasElement, ctx: &CanvasRenderingContext2d, view: &ViewState) {
	let (bw, bh) = view.buffer_size();
	canvas.set_width(bw);
	canvas.set_height(bh);

	let style = canvas.style();
	let _ = style.set_property("width", &format!("{}px", view.width));
	let _ = style.set_property("height", &format!("{}px", view.height));

	// Resizing the canvas resets its state, so the scale is set absolutely.
	let _ = ctx.set_transform(view.dpr, 0.0, 0.0, view.dpr, 0.0, 0.0);
}

fn seed() -> u64 {
	let entropy = js_sys::Math::random() * u32::MAX as f64;
	(js_sys::Date::now() as u64) ^ ((entropy as u64) << 32)
}
