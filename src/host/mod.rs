//! The page as an injected collaborator.
//!
//! Effects never touch `web_sys` directly; they query and mutate the page
//! through [`Host`]. [`web::WebHost`] backs it with the live document, and
//! tests substitute an in-memory fake.

use std::cell::Cell;

use crate::interactions::reveal::RevealConfig;

pub mod web;

#[cfg(test)]
pub(crate) mod fake;

/// Axis-aligned box in viewport pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	/// Distance from the viewport's left edge.
	pub left: f64,
	/// Distance from the viewport's top edge.
	pub top: f64,
	/// Width in pixels.
	pub width: f64,
	/// Height in pixels.
	pub height: f64,
}

impl Rect {
	/// Box with its top-left corner at (`left`, `top`).
	pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
		Self {
			left,
			top,
			width,
			height,
		}
	}

	/// Midpoint of the box.
	pub fn center(&self) -> (f64, f64) {
		(self.left + self.width / 2.0, self.top + self.height / 2.0)
	}

	/// Bottom edge.
	pub fn bottom(&self) -> f64 {
		self.top + self.height
	}

	/// Right edge.
	pub fn right(&self) -> f64 {
		self.left + self.width
	}
}

/// Where a spawned element is inserted.
#[derive(Clone, Copy, Debug)]
pub enum Placement<'a, E> {
	/// Appended to `<body>`.
	Body,
	/// Inserted as the first child of `<body>`.
	BodyStart,
	/// Appended as the last child of an element.
	Inside(&'a E),
	/// Inserted as the previous sibling of an element.
	Before(&'a E),
	/// Inserted as the next sibling of an element.
	After(&'a E),
}

/// Event source for [`Host::listen`].
#[derive(Clone, Copy, Debug)]
pub enum Target<'a, E> {
	/// The browser window.
	Window,
	/// The document, for events that bubble from anywhere.
	Document,
	/// One element.
	Element(&'a E),
}

/// The subset of a DOM event that handlers read.
#[derive(Debug, Default)]
pub struct HostEvent {
	/// Horizontal pointer position in viewport pixels, for mouse events.
	pub x: f64,
	/// Vertical pointer position.
	pub y: f64,
	/// `KeyboardEvent.key`, for keyboard events.
	pub key: Option<String>,
	/// `ErrorEvent.message`, for window errors.
	pub message: Option<String>,
	default_prevented: Cell<bool>,
}

impl HostEvent {
	/// Mouse event at (`x`, `y`).
	pub fn pointer(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			..Default::default()
		}
	}

	/// Keyboard event for `key`.
	pub fn key(key: &str) -> Self {
		Self {
			key: Some(key.to_string()),
			..Default::default()
		}
	}

	/// Window error event carrying `message`.
	pub fn error(message: &str) -> Self {
		Self {
			message: Some(message.to_string()),
			..Default::default()
		}
	}

	/// Ask the host to cancel the browser's default action.
	pub fn prevent_default(&self) {
		self.default_prevented.set(true);
	}

	/// Whether a handler called [`HostEvent::prevent_default`].
	pub fn default_prevented(&self) -> bool {
		self.default_prevented.get()
	}
}

/// Handler for [`Host::listen`].
pub type EventHandler = Box<dyn FnMut(&HostEvent)>;

/// Handler for [`Host::observe_intersections`]: receives the element and its
/// visible ratio, returns `true` to stop observing it.
pub type IntersectionHandler<E> = Box<dyn FnMut(&E, f64) -> bool>;

/// Description of an element created purely for decoration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Decoration {
	/// Element tag name.
	pub tag: &'static str,
	/// Space-separated class list.
	pub class: String,
	/// Text content, if any.
	pub text: Option<String>,
	/// Attributes in insertion order.
	pub attributes: Vec<(&'static str, String)>,
	/// Inline style properties in insertion order.
	pub styles: Vec<(&'static str, String)>,
}

impl Decoration {
	/// Empty decoration with a tag and class list.
	pub fn new(tag: &'static str, class: impl Into<String>) -> Self {
		Self {
			tag,
			class: class.into(),
			..Default::default()
		}
	}

	/// Empty `<div>` with a class list.
	pub fn div(class: impl Into<String>) -> Self {
		Self::new("div", class)
	}

	/// Add an inline style property. Later values win.
	pub fn style(mut self, property: &'static str, value: impl Into<String>) -> Self {
		self.styles.push((property, value.into()));
		self
	}

	/// Add an attribute.
	pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
		self.attributes.push((name, value.into()));
		self
	}

	/// Set the text content.
	pub fn text(mut self, text: impl Into<String>) -> Self {
		self.text = Some(text.into());
		self
	}

	/// Look up a style property set on this decoration.
	pub fn style_value(&self, property: &str) -> Option<&str> {
		self.styles
			.iter()
			.rev()
			.find(|(p, _)| *p == property)
			.map(|(_, v)| v.as_str())
	}
}

/// Document operations the effects rely on.
///
/// Every query degrades to "nothing found" rather than failing, so a missing
/// element simply disables the feature that wanted it.
pub trait Host {
	/// Handle to one element.
	type Element: Clone + PartialEq + 'static;

	/// Every element matching `selector`, in document order.
	fn query_all(&self, selector: &str) -> Vec<Self::Element>;
	/// Descendants of `parent` matching `selector`.
	fn query_within(&self, parent: &Self::Element, selector: &str) -> Vec<Self::Element>;

	/// First element matching `selector`.
	fn query(&self, selector: &str) -> Option<Self::Element> {
		self.query_all(selector).into_iter().next()
	}

	/// First descendant of `parent` matching `selector`.
	fn query_one_within(&self, parent: &Self::Element, selector: &str) -> Option<Self::Element> {
		self.query_within(parent, selector).into_iter().next()
	}

	/// The `<body>` element.
	fn body(&self) -> Option<Self::Element>;
	/// Parent element, if attached.
	fn parent(&self, element: &Self::Element) -> Option<Self::Element>;
	/// Nearest ancestor of `element`, or itself, matching `selector`.
	fn closest(&self, element: &Self::Element, selector: &str) -> Option<Self::Element>;

	/// Inner viewport size in pixels.
	fn viewport(&self) -> (f64, f64);
	/// Bounding box in viewport pixels.
	fn rect(&self, element: &Self::Element) -> Rect;
	/// Vertical scroll offset of the page.
	fn scroll_top(&self) -> f64;
	/// Smooth-scroll the page to an absolute vertical offset.
	fn scroll_to(&self, top: f64);

	/// Set an inline style property. An empty value clears it.
	fn set_style(&self, element: &Self::Element, property: &str, value: &str);
	/// Add `class` if missing.
	fn add_class(&self, element: &Self::Element, class: &str);
	/// Remove `class` if present.
	fn remove_class(&self, element: &Self::Element, class: &str);
	/// Whether `element` carries `class`.
	fn has_class(&self, element: &Self::Element, class: &str) -> bool;
	/// Attribute value, `None` if absent.
	fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;
	/// Set or replace an attribute.
	fn set_attribute(&self, element: &Self::Element, name: &str, value: &str);
	/// Drop an attribute if present.
	fn remove_attribute(&self, element: &Self::Element, name: &str);
	/// Text content of `element`.
	fn text(&self, element: &Self::Element) -> String;
	/// Replace the text content of `element`.
	fn set_text(&self, element: &Self::Element, text: &str);
	/// Current value of a form control.
	fn value(&self, element: &Self::Element) -> String;
	/// Replace the value of a form control.
	fn set_value(&self, element: &Self::Element, value: &str);

	/// Create an element from `decoration` and insert it. Returns `None` when
	/// the anchor for the placement is missing.
	fn spawn(
		&self,
		placement: Placement<'_, Self::Element>,
		decoration: &Decoration,
	) -> Option<Self::Element>;
	/// Detach `element` from the document. Removing twice is harmless.
	fn remove(&self, element: &Self::Element);

	/// Register a handler for the lifetime of the page.
	fn listen(&self, target: Target<'_, Self::Element>, event: &str, handler: EventHandler);

	/// Watch `elements` for viewport intersection.
	fn observe_intersections(
		&self,
		elements: &[Self::Element],
		config: &RevealConfig,
		handler: IntersectionHandler<Self::Element>,
	);
}
