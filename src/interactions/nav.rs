//! Navigation bar scroll state and in-page anchor scrolling.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::host::{Host, HostEvent, Target};

/// Page offset past which the bar gets its solid background.
pub const SCROLLED_AFTER: f64 = 50.0;
/// Page offset past which scrolling down hides the bar.
pub const HIDE_AFTER: f64 = 200.0;
/// Height of the fixed header that anchor targets must clear.
pub const HEADER_OFFSET: f64 = 80.0;

/// Nav bar appearance for one scroll position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavState {
	/// Past the shadow threshold.
	pub scrolled: bool,
	/// Scrolling down past the hide threshold.
	pub hidden: bool,
}

/// Remembers the previous offset to tell scroll direction.
#[derive(Clone, Copy, Debug, Default)]
pub struct NavScroll {
	last_top: f64,
}

impl NavScroll {
	/// Update with a new scroll offset.
	pub fn on_scroll(&mut self, top: f64) -> NavState {
		let state = NavState {
			scrolled: top > SCROLLED_AFTER,
			hidden: top > self.last_top && top > HIDE_AFTER,
		};
		self.last_top = top;
		state
	}
}

/// Absolute page offset that puts an element just below the fixed header.
pub fn scroll_target(element_top: f64, page_offset: f64, header_offset: f64) -> f64 {
	element_top + page_offset - header_offset
}

/// Track window scroll on `.nav`.
pub fn install<H: Host + Clone + 'static>(host: &H) {
	let Some(nav) = host.query(".nav") else {
		debug!("site-fx: no .nav element");
		return;
	};
	let tracker = Rc::new(RefCell::new(NavScroll::default()));
	let h = host.clone();
	host.listen(
		Target::Window,
		"scroll",
		Box::new(move |_: &HostEvent| {
			let state = tracker.borrow_mut().on_scroll(h.scroll_top());
			if state.scrolled {
				h.add_class(&nav, "nav-scrolled");
			} else {
				h.remove_class(&nav, "nav-scrolled");
			}
			let transform = if state.hidden {
				"translateY(-100%)"
			} else {
				"translateY(0)"
			};
			h.set_style(&nav, "transform", transform);
		}),
	);
}

/// Smooth-scroll `href="#..."` links to their target below the header.
pub fn install_anchor_scroll<H: Host + Clone + 'static>(host: &H) {
	let anchors = host.query_all("a[href^=\"#\"]");
	for anchor in &anchors {
		let (h, a) = (host.clone(), anchor.clone());
		host.listen(
			Target::Element(anchor),
			"click",
			Box::new(move |ev: &HostEvent| {
				ev.prevent_default();
				let Some(href) = h.attribute(&a, "href").filter(|href| href.len() > 1) else {
					return;
				};
				if let Some(target) = h.query(&href) {
					let top = scroll_target(h.rect(&target).top, h.scroll_top(), HEADER_OFFSET);
					h.scroll_to(top);
				}
			}),
		);
	}
	debug!("site-fx: {} in-page anchors", anchors.len());
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::host::Rect;
	use crate::host::fake::FakeHost;

	#[test]
	fn scroll_state_tracks_direction() {
		let mut nav = NavScroll::default();
		assert_eq!(nav.on_scroll(30.0), NavState::default());
		assert_eq!(
			nav.on_scroll(120.0),
			NavState {
				scrolled: true,
				hidden: false
			}
		);
		assert!(nav.on_scroll(400.0).hidden);
		assert!(!nav.on_scroll(350.0).hidden);
		assert!(!nav.on_scroll(10.0).scrolled);
	}

	#[test]
	fn nav_bar_follows_window_scroll() {
		let host = FakeHost::default();
		let nav = host.element("nav", "nav");
		install(&host);

		host.set_scroll_top(300.0);
		host.dispatch(Target::Window, "scroll", HostEvent::default());
		assert!(host.has_class(&nav, "nav-scrolled"));
		assert_eq!(host.style(nav, "transform").as_deref(), Some("translateY(-100%)"));

		host.set_scroll_top(250.0);
		host.dispatch(Target::Window, "scroll", HostEvent::default());
		assert_eq!(host.style(nav, "transform").as_deref(), Some("translateY(0)"));

		host.set_scroll_top(0.0);
		host.dispatch(Target::Window, "scroll", HostEvent::default());
		assert!(!host.has_class(&nav, "nav-scrolled"));
	}

	#[test]
	fn anchors_scroll_below_header() {
		let host = FakeHost::default();
		let link = host.with_attr(host.element("a", ""), "href", "#faq");
		let dead = host.with_attr(host.element("a", ""), "href", "#");
		let faq = host.with_attr(host.element("section", ""), "id", "faq");
		host.set_rect(faq, Rect::new(0.0, 600.0, 1280.0, 400.0));
		host.set_scroll_top(1000.0);
		install_anchor_scroll(&host);

		assert!(host.click(link));
		assert_eq!(host.scrolled_to(), vec![1520.0]);

		assert!(host.click(dead));
		assert_eq!(host.scrolled_to().len(), 1);
	}
}
