//! Event tracking.
//!
//! Handlers report through an [`Analytics`] handle. Without a sink every
//! `track` call is a no-op, so wiring analytics never changes page behavior.

use std::fmt;
use std::rc::Rc;

use log::{debug, info};

use crate::host::{Host, HostEvent, Target};

/// `.btn-primary` click.
pub const CTA_CLICK: &str = "CTA Click";
/// Form submit attempt.
pub const FORM_SUBMISSION: &str = "Form Submission";
/// A `<details>` FAQ entry was opened.
pub const FAQ_OPENED: &str = "FAQ Opened";
/// `mailto:` link click.
pub const EMAIL_CLICK: &str = "email_click";
/// `tel:` link click.
pub const PHONE_CLICK: &str = "phone_click";

/// Free-form event attributes, in insertion order.
pub type Attributes = Vec<(&'static str, String)>;

/// Destination for tracked events.
pub trait AnalyticsSink {
	/// Record one event.
	fn track(&self, name: &str, attributes: &Attributes);
}

/// Writes every event to the log at `info`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl AnalyticsSink for LogSink {
	fn track(&self, name: &str, attributes: &Attributes) {
		info!("site-fx: analytics event {name:?} {attributes:?}");
	}
}

/// Cloneable handle on an optional sink.
#[derive(Clone, Default)]
pub struct Analytics {
	sink: Option<Rc<dyn AnalyticsSink>>,
}

impl fmt::Debug for Analytics {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Analytics")
			.field("enabled", &self.sink.is_some())
			.finish()
	}
}

impl Analytics {
	/// Forward events to `sink`.
	pub fn new(sink: impl AnalyticsSink + 'static) -> Self {
		Self {
			sink: Some(Rc::new(sink)),
		}
	}

	/// Drop every event.
	pub fn disabled() -> Self {
		Self::default()
	}

	/// Send one event to the sink, if any.
	pub fn track(&self, name: &str, attributes: Attributes) {
		if let Some(sink) = &self.sink {
			sink.track(name, &attributes);
		}
	}
}

/// First `max` characters of `text`, on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> String {
	text.chars().take(max).collect()
}

/// Track CTA, e-mail and phone link clicks.
pub fn install<H: Host + Clone + 'static>(host: &H, analytics: &Analytics) {
	let ctas = host.query_all(".btn-primary");
	for button in &ctas {
		let (h, a, b) = (host.clone(), analytics.clone(), button.clone());
		host.listen(
			Target::Element(button),
			"click",
			Box::new(move |_: &HostEvent| {
				let location = h
					.closest(&b, "section")
					.and_then(|section| h.attribute(&section, "class"))
					.filter(|class| !class.is_empty())
					.unwrap_or_else(|| "unknown".to_string());
				a.track(
					CTA_CLICK,
					vec![("text", h.text(&b).trim().to_string()), ("location", location)],
				);
			}),
		);
	}

	let links = [
		("a[href^=\"mailto:\"]", EMAIL_CLICK, "Email Link"),
		("a[href^=\"tel:\"]", PHONE_CLICK, "Phone Link"),
	];
	for (selector, event, label) in links {
		for link in host.query_all(selector) {
			let a = analytics.clone();
			host.listen(
				Target::Element(&link),
				"click",
				Box::new(move |_: &HostEvent| {
					a.track(
						event,
						vec![
							("event_category", "Contact".to_string()),
							("event_label", label.to_string()),
						],
					);
				}),
			);
		}
	}
	debug!("site-fx: analytics on {} CTA buttons", ctas.len());
}
