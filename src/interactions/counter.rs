//! Count-up animation for statistic labels.
//!
//! A label such as `"250+"` or `"98%"` counts from zero to its number the
//! first time it scrolls into view, easing out over a fixed duration.

use std::cell::RefCell;
use std::collections::HashSet;
use std::hash::Hash;
use std::rc::Rc;

use log::debug;
use serde::Deserialize;

use super::reveal::RevealConfig;
use crate::host::Host;
use crate::scheduler::Timers;

/// Elements that count up.
pub const COUNTER_SELECTOR: &str = ".counter, [data-counter]";

/// Shortest interval between displayed updates.
const MIN_FRAME_MS: f64 = 1.0;

/// Timing of the count-up.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CounterConfig {
	/// Total animation length.
	pub duration_ms: f64,
	/// Interval between displayed updates.
	pub frame_ms: f64,
}

impl CounterConfig {
	/// `frame_ms`, raised to at least one millisecond.
	pub fn frame_interval(&self) -> f64 {
		self.frame_ms.max(MIN_FRAME_MS)
	}
}

impl Default for CounterConfig {
	fn default() -> Self {
		Self {
			duration_ms: 2000.0,
			frame_ms: 16.0,
		}
	}
}

/// Number and format parsed from a label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterLabel {
	/// Final number.
	pub target: u64,
	/// Whether the label ends in `%`.
	pub percent: bool,
}

impl CounterLabel {
	/// Every ASCII digit of `text`, concatenated. `None` if there are none or
	/// the number does not fit.
	pub fn parse(text: &str) -> Option<Self> {
		let digits: String = text.chars().filter(char::is_ascii_digit).collect();
		let target = digits.parse().ok()?;
		Some(Self {
			target,
			percent: text.contains('%'),
		})
	}

	/// Text for `value` in the label's format.
	pub fn display(&self, value: u64) -> String {
		if self.percent {
			format!("{value}%")
		} else {
			value.to_string()
		}
	}
}

/// `1 - (1 - t)^3`.
pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// One running count-up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterAnimation {
	/// What to count to.
	pub label: CounterLabel,
	/// Length of the count-up.
	pub duration_ms: f64,
	/// Clock value when the animation began.
	pub start_ms: f64,
}

impl CounterAnimation {
	/// Animation starting at clock value `start_ms`.
	pub fn new(label: CounterLabel, duration_ms: f64, start_ms: f64) -> Self {
		Self {
			label,
			duration_ms,
			start_ms,
		}
	}

	/// Fraction of the duration elapsed at `now_ms`, in `[0, 1]`.
	pub fn progress(&self, now_ms: f64) -> f64 {
		if self.duration_ms <= 0.0 {
			return 1.0;
		}
		((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
	}

	/// Displayed number at `progress`. Exactly the target once complete.
	pub fn value_at(&self, progress: f64) -> u64 {
		let progress = progress.clamp(0.0, 1.0);
		if progress >= 1.0 {
			return self.label.target;
		}
		(self.label.target as f64 * ease_out_cubic(progress)).floor() as u64
	}

	/// Displayed text at clock value `now_ms`.
	pub fn text_at(&self, now_ms: f64) -> String {
		self.label.display(self.value_at(self.progress(now_ms)))
	}

	/// Whether the final value has been reached.
	pub fn is_finished(&self, now_ms: f64) -> bool {
		self.progress(now_ms) >= 1.0
	}
}

/// Refuses to start the same counter twice.
#[derive(Debug)]
pub struct CounterGuard<K> {
	started: HashSet<K>,
}

impl<K> Default for CounterGuard<K> {
	fn default() -> Self {
		Self {
			started: HashSet::new(),
		}
	}
}

impl<K: Eq + Hash> CounterGuard<K> {
	/// `true` the first time `key` is seen.
	pub fn try_start(&mut self, key: K) -> bool {
		self.started.insert(key)
	}
}

fn tick<H: Host + 'static>(
	host: H,
	timers: Timers,
	element: H::Element,
	animation: CounterAnimation,
	frame_ms: f64,
) {
	let now = timers.now();
	host.set_text(&element, &animation.text_at(now));
	if animation.is_finished(now) {
		return;
	}
	let next = timers.clone();
	timers.schedule(frame_ms, move || {
		tick(host, next, element, animation, frame_ms)
	});
}

/// Start each counter on its first intersection.
pub fn install<H: Host + Clone + 'static>(
	host: &H,
	timers: &Timers,
	config: &CounterConfig,
	reveal: &RevealConfig,
) {
	let counters: Vec<(H::Element, CounterLabel)> = host
		.query_all(COUNTER_SELECTOR)
		.into_iter()
		.filter_map(|el| {
			let source = host
				.attribute(&el, "data-counter")
				.filter(|v| !v.trim().is_empty())
				.unwrap_or_else(|| host.text(&el));
			CounterLabel::parse(&source).map(|label| (el, label))
		})
		.collect();
	if counters.is_empty() {
		return;
	}

	debug!("site-fx: {} counters", counters.len());
	let elements: Vec<H::Element> = counters.iter().map(|(el, _)| el.clone()).collect();
	let guard = Rc::new(RefCell::new(CounterGuard::default()));
	let (h, t, config, threshold) = (host.clone(), timers.clone(), config.clone(), reveal.threshold);
	host.observe_intersections(
		&elements,
		reveal,
		Box::new(move |el: &H::Element, ratio: f64| {
			if ratio <= 0.0 || ratio < threshold {
				return false;
			}
			let Some(idx) = counters.iter().position(|(e, _)| e == el) else {
				return true;
			};
			if guard.borrow_mut().try_start(idx) {
				let animation = CounterAnimation::new(counters[idx].1, config.duration_ms, t.now());
				tick(h.clone(), t.clone(), el.clone(), animation, config.frame_interval());
			}
			true
		}),
	);
}
