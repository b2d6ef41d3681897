//! One-shot scroll reveal.
//!
//! An element starts hidden and becomes visible the first time enough of it
//! enters the viewport. After that it is never observed again, so scrolling
//! away and back has no effect.

use std::cell::RefCell;
use std::collections::HashSet;
use std::hash::Hash;
use std::rc::Rc;

use log::debug;
use serde::Deserialize;

use crate::host::{Host, Rect};

/// Visible ratios within this distance below the threshold still count.
/// The browser reports ratios with float noise at the crossing.
const RATIO_EPSILON: f64 = 1e-3;

/// Elements revealed with inline hidden/visible styles.
pub const FADE_SELECTOR: &str = ".scroll-fade";
/// Elements that are promoted to `.scroll-fade`.
pub const PROMOTED_SELECTOR: &str = ".slide-up, .fade-in, .scale-in";
/// Elements revealed with the `magic-reveal` keyframe animation.
pub const MAGIC_SELECTOR: &str = ".revolution-card, .crystal-ball, .benefit-satellite";
/// Images whose `src` is deferred until first intersection.
pub const LAZY_IMAGE_SELECTOR: &str = "img[data-src]";

/// Intersection trigger settings.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RevealConfig {
	/// Fraction of the element that must be visible, in `[0, 1]`.
	pub threshold: f64,
	/// Bottom margin applied to the viewport in pixels. Negative values shrink
	/// it so elements reveal slightly after they scroll in.
	pub bottom_margin: f64,
	/// CSS transition used for the hidden-to-visible change.
	pub transition: String,
}

impl Default for RevealConfig {
	fn default() -> Self {
		Self {
			threshold: 0.1,
			bottom_margin: -50.0,
			transition: "opacity 0.8s ease-out, transform 0.8s ease-out".into(),
		}
	}
}

impl RevealConfig {
	/// `rootMargin` string for `IntersectionObserver`.
	pub fn root_margin(&self) -> String {
		format!("0px 0px {}px 0px", self.bottom_margin)
	}

	/// Fraction of `rect` inside the (margin-adjusted) viewport.
	pub fn visible_ratio(&self, rect: Rect, viewport: (f64, f64)) -> f64 {
		let area = rect.width * rect.height;
		if area <= 0.0 {
			return 0.0;
		}
		let (vw, vh) = viewport;
		let bottom = vh + self.bottom_margin;
		let w = (rect.right().min(vw) - rect.left.max(0.0)).max(0.0);
		let h = (rect.bottom().min(bottom) - rect.top.max(0.0)).max(0.0);
		(w * h / area).clamp(0.0, 1.0)
	}
}

/// Tracks which observed elements have been revealed.
#[derive(Debug)]
pub struct RevealWatcher<K> {
	threshold: f64,
	observed: HashSet<K>,
	revealed: HashSet<K>,
}

impl<K: Eq + Hash + Clone> RevealWatcher<K> {
	/// Watcher using the threshold from `config`.
	pub fn new(config: &RevealConfig) -> Self {
		Self {
			threshold: config.threshold,
			observed: HashSet::new(),
			revealed: HashSet::new(),
		}
	}

	/// Start watching `key`. Already revealed keys are ignored.
	pub fn observe(&mut self, key: K) {
		if !self.revealed.contains(&key) {
			self.observed.insert(key);
		}
	}

	/// Feed a visibility report. Returns `true` only for the report that
	/// reveals the element; the element is unobserved at that point. A zero
	/// ratio never reveals, whatever the threshold.
	pub fn on_intersection(&mut self, key: &K, visible_ratio: f64) -> bool {
		if !self.observed.contains(key)
			|| visible_ratio <= 0.0
			|| visible_ratio + RATIO_EPSILON < self.threshold
		{
			return false;
		}
		self.observed.remove(key);
		self.revealed.insert(key.clone());
		true
	}

	/// Whether `key` has been revealed.
	pub fn is_revealed(&self, key: &K) -> bool {
		self.revealed.contains(key)
	}

	/// Whether `key` is still waiting to be revealed.
	pub fn is_observed(&self, key: &K) -> bool {
		self.observed.contains(key)
	}
}

/// Hide every reveal target and watch it until it scrolls into view.
pub fn install<H: Host + Clone + 'static>(host: &H, config: &RevealConfig) {
	for el in host.query_all(PROMOTED_SELECTOR) {
		host.add_class(&el, "scroll-fade");
	}

	let fades = host.query_all(FADE_SELECTOR);
	for el in &fades {
		host.set_style(el, "opacity", "0");
		host.set_style(el, "transform", "translateY(30px)");
		host.set_style(el, "transition", &config.transition);
	}
	let mut targets = fades;
	for el in host.query_all(MAGIC_SELECTOR) {
		if !targets.contains(&el) {
			targets.push(el);
		}
	}
	if targets.is_empty() {
		debug!("site-fx: no reveal targets");
		return;
	}

	debug!("site-fx: watching {} reveal targets", targets.len());
	let watcher = Rc::new(RefCell::new(RevealWatcher::new(config)));
	for idx in 0..targets.len() {
		watcher.borrow_mut().observe(idx);
	}
	let (h, elements) = (host.clone(), targets.clone());
	host.observe_intersections(
		&targets,
		config,
		Box::new(move |el: &H::Element, ratio: f64| {
			let Some(idx) = elements.iter().position(|e| e == el) else {
				return true;
			};
			if !watcher.borrow_mut().on_intersection(&idx, ratio) {
				return false;
			}
			if h.has_class(el, "scroll-fade") {
				h.set_style(el, "opacity", "1");
				h.set_style(el, "transform", "translateY(0)");
				h.add_class(el, "visible");
			} else {
				h.add_class(el, "magic-reveal");
			}
			true
		}),
	);
}

/// Swap in deferred image sources on first intersection.
pub fn install_lazy_images<H: Host + Clone + 'static>(host: &H, config: &RevealConfig) {
	let images = host.query_all(LAZY_IMAGE_SELECTOR);
	if images.is_empty() {
		return;
	}
	debug!("site-fx: {} lazy images", images.len());
	let h = host.clone();
	// Lazy images load as soon as any part is visible.
	let eager = RevealConfig {
		threshold: 0.0,
		..config.clone()
	};
	host.observe_intersections(
		&images,
		&eager,
		Box::new(move |img: &H::Element, ratio: f64| {
			if ratio <= 0.0 {
				return false;
			}
			if let Some(src) = h.attribute(img, "data-src") {
				h.set_attribute(img, "src", &src);
			}
			h.remove_class(img, "lazy");
			true
		}),
	);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::host::fake::FakeHost;

	#[test]
	fn reveals_once_per_element() {
		let config = RevealConfig::default();
		let mut watcher = RevealWatcher::new(&config);
		watcher.observe("hero");

		assert!(!watcher.on_intersection(&"hero", 0.05));
		assert!(watcher.on_intersection(&"hero", 0.4));
		assert!(!watcher.on_intersection(&"hero", 1.0));
		assert!(!watcher.on_intersection(&"hero", 0.4));
		assert!(watcher.is_revealed(&"hero"));

		// Observing again after the reveal does not re-arm it.
		watcher.observe("hero");
		assert!(!watcher.is_observed(&"hero"));
		assert!(!watcher.on_intersection(&"hero", 1.0));
	}

	#[test]
	fn zero_threshold_still_needs_an_intersection() {
		let config = RevealConfig {
			threshold: 0.0,
			..RevealConfig::default()
		};
		let host = FakeHost::new(1000.0, 800.0);
		let card = host.element("div", "slide-up");
		install(&host, &config);

		// Initial observer report for an element below the fold.
		host.intersect(card, 0.0);
		assert!(!host.has_class(&card, "visible"));
		assert!(host.observed(card));

		host.intersect(card, 0.01);
		assert!(host.has_class(&card, "visible"));
		assert!(!host.observed(card));
	}

	#[test]
	fn unobserved_elements_never_reveal() {
		let mut watcher: RevealWatcher<u32> = RevealWatcher::new(&RevealConfig::default());
		assert!(!watcher.on_intersection(&7, 1.0));
		assert!(!watcher.is_revealed(&7));
	}

	#[test]
	fn visible_ratio_respects_bottom_margin() {
		let config = RevealConfig::default();
		let viewport = (1000.0, 800.0);

		// Fully inside.
		let inside = Rect::new(100.0, 100.0, 200.0, 100.0);
		assert_eq!(config.visible_ratio(inside, viewport), 1.0);

		// Top edge at 740: only 10px visible above the 750px effective bottom.
		let peeking = Rect::new(100.0, 740.0, 200.0, 100.0);
		assert!((config.visible_ratio(peeking, viewport) - 0.1).abs() < 1e-9);

		// Below the fold.
		let below = Rect::new(100.0, 900.0, 200.0, 100.0);
		assert_eq!(config.visible_ratio(below, viewport), 0.0);

		assert_eq!(config.root_margin(), "0px 0px -50px 0px");
	}

	#[test]
	fn install_reveals_each_element_once() {
		let host = FakeHost::new(1000.0, 800.0);
		let card = host.element("div", "slide-up");
		let ball = host.element("div", "crystal-ball");
		install(&host, &RevealConfig::default());

		assert!(host.has_class(&card, "scroll-fade"));
		assert_eq!(host.style(card, "opacity").as_deref(), Some("0"));

		host.set_rect(card, Rect::new(0.0, 900.0, 100.0, 100.0));
		host.set_rect(ball, Rect::new(0.0, 100.0, 100.0, 100.0));
		host.refresh_intersections();

		assert!(!host.has_class(&card, "visible"));
		assert!(host.has_class(&ball, "magic-reveal"));
		assert!(!host.observed(ball));

		host.set_rect(card, Rect::new(0.0, 300.0, 100.0, 100.0));
		host.refresh_intersections();
		assert!(host.has_class(&card, "visible"));
		assert_eq!(host.style(card, "opacity").as_deref(), Some("1"));
		assert_eq!(host.style(card, "transform").as_deref(), Some("translateY(0)"));

		// Scrolling away and back does not hide or re-trigger.
		host.remove_class(&card, "visible");
		host.intersect(card, 1.0);
		assert!(!host.has_class(&card, "visible"));
	}

	#[test]
	fn lazy_images_swap_source_on_first_sight() {
		let host = FakeHost::default();
		let img = host.with_attr(host.element("img", "lazy"), "data-src", "/hero.webp");
		install_lazy_images(&host, &RevealConfig::default());

		host.intersect(img, 0.0);
		assert_eq!(host.attribute(&img, "src"), None);

		host.intersect(img, 0.2);
		assert_eq!(host.attribute(&img, "src").as_deref(), Some("/hero.webp"));
		assert!(!host.has_class(&img, "lazy"));
		assert!(!host.observed(img));
	}
}
