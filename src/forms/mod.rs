//! Contact form handling.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use serde::Deserialize;

use crate::host::Host;
use crate::interactions::analytics::Analytics;
use crate::scheduler::Timers;

pub mod controller;
pub mod submit;
pub mod validation;

pub use controller::{BannerKind, FormController, Phase};
pub use submit::{FormData, SimulatedSubmitter, SubmitError, Submitter};
pub use validation::{FieldKind, FormMessages, Validation, validate};

/// Form timing, failure rate and copy overrides.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormConfig {
	/// Simulated network latency.
	pub delay_ms: f64,
	/// Probability that a simulated submission fails.
	pub failure_rate: f64,
	/// How long result banners stay on the page.
	pub banner_ms: f64,
	/// Overrides the locale's built-in copy.
	pub messages: Option<FormMessages>,
}

impl Default for FormConfig {
	fn default() -> Self {
		Self {
			delay_ms: 1000.0,
			failure_rate: 0.1,
			banner_ms: 5000.0,
			messages: None,
		}
	}
}

/// Attach a controller to every `<form>` on the page.
pub fn install<H: Host + Clone + 'static>(
	host: &H,
	timers: &Timers,
	submitter: Rc<dyn Submitter>,
	messages: &FormMessages,
	analytics: &Analytics,
	banner_ms: f64,
) -> Vec<Rc<RefCell<FormController<H>>>> {
	let controllers: Vec<_> = host
		.query_all("form")
		.into_iter()
		.map(|form| {
			let ctrl = Rc::new(RefCell::new(FormController::new(
				host,
				form,
				submitter.clone(),
				timers,
				messages.clone(),
				analytics.clone(),
				banner_ms,
			)));
			FormController::attach(&ctrl);
			ctrl
		})
		.collect();
	debug!("site-fx: {} forms wired", controllers.len());
	controllers
}
