//! Leptos component wrapping the starfield canvas.
//!
//! The component renders a fixed, full-viewport canvas behind the page
//! content. Once the element is mounted, the driver takes over: it sizes the
//! backing store, listens to window events and runs the animation loop.

use std::cell::Cell;
use std::rc::Rc;

use leptos::prelude::*;
use log::debug;
use web_sys::HtmlCanvasElement;

use super::config::FieldConfig;
use super::driver;

/// Element id used when none is given.
pub const DEFAULT_CANVAS_ID: &str = "bg-canvas";

/// Renders the animated starfield as a page background.
///
/// Without a `config`, the compiled-in defaults are used. Pointer input is
/// read from the window, so the canvas never intercepts clicks.
#[component]
pub fn SpaceWarpCanvas(
	#[prop(optional)] config: Option<FieldConfig>,
	#[prop(into, default = DEFAULT_CANVAS_ID.to_string())] id: String,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let started = Rc::new(Cell::new(false));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if started.replace(true) {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let config = config.clone().unwrap_or_default();
		if driver::start(canvas, config).is_none() {
			debug!("space-warp: canvas has no 2d context, nothing to animate");
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			id=id
			class="space-warp-canvas"
			style="position: fixed; inset: 0; z-index: -1; display: block; pointer-events: none;"
		/>
	}
}
