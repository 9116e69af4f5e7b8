//! Client entrypoint for the CSR build.

// Bin target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use leptos::prelude::*;
use space_warp::{App, DEFAULT_CANVAS_ID, attach, init_logging, load_config};

fn main() {
	init_logging();

	// Pages that ship their own canvas get the effect behind their content.
	if attach(DEFAULT_CANVAS_ID, load_config()) {
		return;
	}

	mount_to_body(|| {
		view! { <App /> }
	})
}
