//! Form submission backends.

use std::collections::BTreeMap;

use log::debug;
use rand::Rng;
use thiserror::Error;

use crate::rng::SharedRng;
use crate::scheduler::Timers;

/// Field name to trimmed value.
pub type FormData = BTreeMap<String, String>;

/// Why a submission did not go through.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
	/// The endpoint could not be reached.
	#[error("network error")]
	Network,
}

/// Receives the outcome of a submission exactly once.
pub type Completion = Box<dyn FnOnce(Result<(), SubmitError>)>;

/// Somewhere form data can be sent.
///
/// Implementations may call `done` synchronously or later; the form
/// controller holds no borrow across the call.
pub trait Submitter {
	/// Send `data` and call `done` with the outcome, possibly later.
	fn submit(&self, data: FormData, done: Completion);
}

/// Pretends to send the form: waits `delay_ms`, then fails with probability
/// `failure_rate`.
#[derive(Clone)]
pub struct SimulatedSubmitter {
	delay_ms: f64,
	failure_rate: f64,
	timers: Timers,
	rng: SharedRng,
}

impl SimulatedSubmitter {
	/// Submitter resolving after `delay_ms`, failing with probability `failure_rate`.
	pub fn new(delay_ms: f64, failure_rate: f64, timers: Timers, rng: SharedRng) -> Self {
		Self {
			delay_ms,
			failure_rate: failure_rate.clamp(0.0, 1.0),
			timers,
			rng,
		}
	}
}

impl Submitter for SimulatedSubmitter {
	fn submit(&self, data: FormData, done: Completion) {
		let fails = self.rng.borrow_mut().random::<f64>() < self.failure_rate;
		debug!(
			"site-fx: simulated submission of {} fields, {} in {}ms",
			data.len(),
			if fails { "failing" } else { "succeeding" },
			self.delay_ms
		);
		self.timers.schedule(self.delay_ms, move || {
			done(if fails { Err(SubmitError::Network) } else { Ok(()) })
		});
	}
}
