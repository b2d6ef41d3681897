//! Wiring every page handler against one host.

use std::rc::Rc;

use log::{debug, error};

use crate::config::FxConfig;
use crate::forms::{self, Submitter};
use crate::host::{Host, HostEvent, Target};
use crate::interactions::analytics::Analytics;
use crate::interactions::{a11y, accordion, analytics, counter, effects, nav, reveal};
use crate::rng::SharedRng;
use crate::scheduler::Timers;

/// Collaborators shared by the handlers.
#[derive(Clone)]
pub struct Services {
	/// Scheduler for every timed effect.
	pub timers: Timers,
	/// Randomness for decoration jitter.
	pub rng: SharedRng,
	/// Where tracked events go.
	pub analytics: Analytics,
	/// Backend for form submissions.
	pub submitter: Rc<dyn Submitter>,
}

/// Install every handler whose elements exist on the page.
pub fn install_all<H: Host + Clone + 'static>(host: &H, config: &FxConfig, services: &Services) {
	install_error_logging(host);
	a11y::install(host, config.locale.skip_link_label());
	nav::install(host);
	nav::install_anchor_scroll(host);
	accordion::install(host);
	accordion::install_details(host, &services.analytics);
	reveal::install(host, &config.reveal);
	reveal::install_lazy_images(host, &config.reveal);
	counter::install(host, &services.timers, &config.counter, &config.reveal);
	effects::install(host, &services.timers, &services.rng);
	forms::install(
		host,
		&services.timers,
		services.submitter.clone(),
		&config.form_messages(),
		&services.analytics,
		config.form.banner_ms,
	);
	analytics::install(host, &services.analytics);
	debug!("site-fx: page enhanced");
}

/// Log uncaught script errors and keep them from reaching the console twice.
pub fn install_error_logging<H: Host>(host: &H) {
	host.listen(
		Target::Window,
		"error",
		Box::new(|ev: &HostEvent| {
			error!(
				"site-fx: uncaught error: {}",
				ev.message.as_deref().unwrap_or("unknown")
			);
			ev.prevent_default();
		}),
	);
}
