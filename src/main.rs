//! Client entrypoint for the CSR build.

// Bin target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use leptos::prelude::*;
use log::warn;
use site_fx::{App, enhance_page, init_logging, load_config, set_debug_logging};

fn main() {
	init_logging();
	let config = web_sys::window()
		.and_then(|w| w.document())
		.map(|d| load_config(&d))
		.unwrap_or_default();
	set_debug_logging(config.debug);

	let app_config = config.clone();
	mount_to_body(move || {
		view! { <App config=app_config.clone() /> }
	});

	if let Err(e) = enhance_page(&config) {
		warn!("site-fx: page enhancements unavailable: {e}");
	}
}
