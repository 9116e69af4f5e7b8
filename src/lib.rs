//! space-warp: animated starfield background for web pages.
//!
//! This crate renders a "space warp" particle field on an HTML canvas from
//! WASM. It can drive a `<canvas id="bg-canvas">` that already exists on the
//! page, or mount its own full-viewport canvas as a Leptos component.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::space_warp::{
	DEFAULT_CANVAS_ID, FieldConfig, Particle, ParticleField, PointerState, SpaceWarpCanvas,
	Sprite, Theme, ViewState, attach,
};

/// Id of the optional `<script type="application/json">` element holding
/// configuration overrides.
pub const CONFIG_ELEMENT_ID: &str = "bg-canvas-config";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("space-warp: logging initialized");
}

/// Load configuration overrides from a script element with id="bg-canvas-config".
/// Any subset of [`FieldConfig`] fields may be given; the rest keep their defaults.
pub fn load_config() -> FieldConfig {
	let Some(json_text) = config_text() else {
		return FieldConfig::default();
	};

	match FieldConfig::from_json(&json_text) {
		Ok(config) => {
			info!("space-warp: loaded configuration overrides");
			config
		}
		Err(e) => {
			warn!("space-warp: failed to parse configuration: {}", e);
			FieldConfig::default()
		}
	}
}

fn config_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Starts the effect on the page's `#bg-canvas`.
///
/// Intended for pages that embed the module directly. Does nothing when the
/// canvas is missing.
#[wasm_bindgen(js_name = startBackground)]
pub fn start_background() -> bool {
	init_logging();
	attach(DEFAULT_CANVAS_ID, load_config())
}

/// Main application component.
/// Mounts the starfield behind an otherwise empty page.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Space Warp" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<SpaceWarpCanvas config=load_config() />
	}
}
