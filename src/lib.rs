//! site-fx: decorative particle overlay and page interactions for static
//! marketing sites.
//!
//! The crate mounts a full-viewport particle canvas as a Leptos component and
//! enhances the existing page markup in place: scroll reveals, hover effects,
//! an FAQ accordion, form validation with simulated submission, animated
//! counters and keyboard accessibility aids. Every enhancement is optional and
//! only applies when its elements are present.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, LevelFilter, info};

pub mod components;
pub mod config;
pub mod enhance;
pub mod error;
pub mod forms;
pub mod host;
pub mod interactions;
pub mod rng;
pub mod scheduler;
pub mod styles;

pub use components::particle_field::{Color, ParticleEngine, ParticleField, ParticleStyle};
pub use config::{FxConfig, Locale, load_config};
pub use error::{FxError, Result};
pub use scheduler::{CancellationToken, Timers};

use crate::enhance::Services;
use crate::forms::SimulatedSubmitter;
use crate::host::web::WebHost;
use crate::interactions::analytics::{Analytics, LogSink};
use crate::rng::{browser_seed, shared_rng};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("site-fx: logging initialized");
}

/// Keep `debug` output only when the page asks for it.
pub fn set_debug_logging(debug: bool) {
	log::set_max_level(if debug { LevelFilter::Debug } else { LevelFilter::Info });
}

/// Install every page enhancement and start driving their timers from
/// animation frames. Returns the scheduler the handlers share.
pub fn enhance_page(config: &FxConfig) -> Result<Timers> {
	let host = WebHost::new()?;
	let timers = Timers::new();
	let rng = shared_rng(browser_seed());
	let services = Services {
		submitter: Rc::new(SimulatedSubmitter::new(
			config.form.delay_ms,
			config.form.failure_rate,
			timers.clone(),
			rng.clone(),
		)),
		timers: timers.clone(),
		rng,
		analytics: Analytics::new(LogSink),
	};

	enhance::install_all(&host, config, &services);
	host.start_timer_pump(timers.clone());
	info!("site-fx: page enhancements installed");
	Ok(timers)
}

/// Overlay component: the effect stylesheet plus the particle canvas.
#[component]
pub fn App(config: FxConfig) -> impl IntoView {
	provide_meta_context();

	view! {
		<Style>{styles::stylesheet()}</Style>
		<ParticleField style=config.particles />
	}
}
