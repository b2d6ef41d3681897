//! [`Host`] backed by the live browser document.

use std::cell::RefCell;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
	Document, Element, ErrorEvent, Event, EventTarget, HtmlElement, HtmlInputElement,
	HtmlTextAreaElement, IntersectionObserver, IntersectionObserverEntry,
	IntersectionObserverInit, KeyboardEvent, MouseEvent, NodeList, ScrollBehavior,
	ScrollToOptions, Window,
};

use super::{
	Decoration, EventHandler, Host, HostEvent, IntersectionHandler, Placement, Rect, Target,
};
use crate::error::{FxError, Result};
use crate::interactions::reveal::RevealConfig;
use crate::scheduler::Timers;

/// Cheap-to-clone handle on `window` and `document`.
#[derive(Clone)]
pub struct WebHost {
	window: Window,
	document: Document,
}

impl WebHost {
	/// Bind to the global window and document.
	pub fn new() -> Result<Self> {
		let window = web_sys::window().ok_or(FxError::NoWindow)?;
		let document = window.document().ok_or(FxError::NoDocument)?;
		Ok(Self { window, document })
	}

	/// The browser window.
	pub fn window(&self) -> &Window {
		&self.window
	}

	/// The page document.
	pub fn document(&self) -> &Document {
		&self.document
	}

	/// `performance.now()` in milliseconds, or 0 when unavailable.
	pub fn now(&self) -> f64 {
		self.window.performance().map(|p| p.now()).unwrap_or(0.0)
	}

	/// Drive `timers` from `requestAnimationFrame` for the life of the page.
	pub fn start_timer_pump(&self, timers: Timers) {
		timers.advance_to(self.now());

		let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
		let (frame_inner, host) = (frame.clone(), self.clone());
		*frame.borrow_mut() = Some(Closure::new(move || {
			timers.advance_to(host.now());
			if let Some(ref cb) = *frame_inner.borrow() {
				let _ = host
					.window
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *frame.borrow() {
			let _ = self
				.window
				.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	}

	fn collect(list: std::result::Result<NodeList, JsValue>) -> Vec<Element> {
		let Ok(list) = list else {
			return Vec::new();
		};
		(0..list.length())
			.filter_map(|i| list.get(i))
			.filter_map(|node| node.dyn_into::<Element>().ok())
			.collect()
	}

	/// Scroll-driven visibility checks for browsers without
	/// `IntersectionObserver`.
	fn observe_by_scroll(
		&self,
		elements: Vec<Element>,
		config: RevealConfig,
		handler: Rc<RefCell<IntersectionHandler<Element>>>,
	) {
		let pending = Rc::new(RefCell::new(elements));
		let host = self.clone();
		let check = move || {
			let viewport = host.viewport();
			pending.borrow_mut().retain(|el| {
				let ratio = config.visible_ratio(host.rect(el), viewport);
				!(&mut *handler.borrow_mut())(el, ratio)
			});
		};
		check();
		self.listen(Target::Window, "scroll", Box::new(move |_: &HostEvent| check()));
	}
}

fn host_event(ev: &Event) -> HostEvent {
	let mut payload = HostEvent::default();
	if let Some(mouse) = ev.dyn_ref::<MouseEvent>() {
		payload.x = mouse.client_x() as f64;
		payload.y = mouse.client_y() as f64;
	}
	if let Some(key) = ev.dyn_ref::<KeyboardEvent>() {
		payload.key = Some(key.key());
	}
	if let Some(err) = ev.dyn_ref::<ErrorEvent>() {
		payload.message = Some(err.message());
	}
	payload
}

impl Host for WebHost {
	type Element = Element;

	fn query_all(&self, selector: &str) -> Vec<Element> {
		Self::collect(self.document.query_selector_all(selector))
	}

	fn query_within(&self, parent: &Element, selector: &str) -> Vec<Element> {
		Self::collect(parent.query_selector_all(selector))
	}

	fn body(&self) -> Option<Element> {
		self.document.body().map(Into::into)
	}

	fn parent(&self, element: &Element) -> Option<Element> {
		element.parent_element()
	}

	fn closest(&self, element: &Element, selector: &str) -> Option<Element> {
		element.closest(selector).ok().flatten()
	}

	fn viewport(&self) -> (f64, f64) {
		let dim = |v: std::result::Result<JsValue, JsValue>| {
			v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
		};
		(dim(self.window.inner_width()), dim(self.window.inner_height()))
	}

	fn rect(&self, element: &Element) -> Rect {
		let r = element.get_bounding_client_rect();
		Rect::new(r.left(), r.top(), r.width(), r.height())
	}

	fn scroll_top(&self) -> f64 {
		self.window.scroll_y().unwrap_or(0.0)
	}

	fn scroll_to(&self, top: f64) {
		let options = ScrollToOptions::new();
		options.set_top(top);
		options.set_behavior(ScrollBehavior::Smooth);
		self.window.scroll_to_with_scroll_to_options(&options);
	}

	fn set_style(&self, element: &Element, property: &str, value: &str) {
		if let Some(el) = element.dyn_ref::<HtmlElement>() {
			let _ = el.style().set_property(property, value);
		}
	}

	fn add_class(&self, element: &Element, class: &str) {
		let _ = element.class_list().add_1(class);
	}

	fn remove_class(&self, element: &Element, class: &str) {
		let _ = element.class_list().remove_1(class);
	}

	fn has_class(&self, element: &Element, class: &str) -> bool {
		element.class_list().contains(class)
	}

	fn attribute(&self, element: &Element, name: &str) -> Option<String> {
		element.get_attribute(name)
	}

	fn set_attribute(&self, element: &Element, name: &str, value: &str) {
		let _ = element.set_attribute(name, value);
	}

	fn remove_attribute(&self, element: &Element, name: &str) {
		let _ = element.remove_attribute(name);
	}

	fn text(&self, element: &Element) -> String {
		element.text_content().unwrap_or_default()
	}

	fn set_text(&self, element: &Element, text: &str) {
		element.set_text_content(Some(text));
	}

	fn value(&self, element: &Element) -> String {
		if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
			input.value()
		} else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
			area.value()
		} else {
			String::new()
		}
	}

	fn set_value(&self, element: &Element, value: &str) {
		if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
			input.set_value(value);
		} else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
			area.set_value(value);
		}
	}

	fn spawn(&self, placement: Placement<'_, Element>, decoration: &Decoration) -> Option<Element> {
		let el = self.document.create_element(decoration.tag).ok()?;
		el.set_class_name(&decoration.class);
		for (name, value) in &decoration.attributes {
			let _ = el.set_attribute(name, value);
		}
		if let Some(html) = el.dyn_ref::<HtmlElement>() {
			let style = html.style();
			for (property, value) in &decoration.styles {
				let _ = style.set_property(property, value);
			}
		}
		if let Some(text) = &decoration.text {
			el.set_text_content(Some(text));
		}

		let inserted = match placement {
			Placement::Body => self.document.body()?.append_child(&el).map(|_| ()),
			Placement::BodyStart => {
				let body = self.document.body()?;
				body.insert_before(&el, body.first_child().as_ref())
					.map(|_| ())
			}
			Placement::Inside(parent) => parent.append_child(&el).map(|_| ()),
			Placement::Before(anchor) => {
				let parent = anchor.parent_node()?;
				parent.insert_before(&el, Some(&**anchor)).map(|_| ())
			}
			Placement::After(anchor) => anchor.after_with_node_1(&el),
		};
		inserted.ok().map(|_| el)
	}

	fn remove(&self, element: &Element) {
		element.remove();
	}

	fn listen(&self, target: Target<'_, Element>, event: &str, mut handler: EventHandler) {
		let target: &EventTarget = match target {
			Target::Window => self.window.as_ref(),
			Target::Document => self.document.as_ref(),
			Target::Element(el) => el.as_ref(),
		};
		let cb = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
			let payload = host_event(&ev);
			handler(&payload);
			if payload.default_prevented() {
				ev.prevent_default();
			}
		});
		if let Err(e) = target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()) {
			warn!("site-fx: failed to listen for {event}: {:?}", e);
		}
		// Listeners live as long as the page.
		cb.forget();
	}

	fn observe_intersections(
		&self,
		elements: &[Element],
		config: &RevealConfig,
		handler: IntersectionHandler<Element>,
	) {
		if elements.is_empty() {
			return;
		}
		let handler = Rc::new(RefCell::new(handler));
		let handler_cb = handler.clone();
		let cb = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
			move |entries: js_sys::Array, observer: IntersectionObserver| {
				for entry in entries.iter() {
					let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
						continue;
					};
					let ratio = if entry.is_intersecting() {
						entry.intersection_ratio()
					} else {
						0.0
					};
					let target = entry.target();
					if (&mut *handler_cb.borrow_mut())(&target, ratio) {
						observer.unobserve(&target);
					}
				}
			},
		);

		let init = IntersectionObserverInit::new();
		init.set_threshold(&JsValue::from_f64(config.threshold));
		init.set_root_margin(&config.root_margin());
		match IntersectionObserver::new_with_options(cb.as_ref().unchecked_ref(), &init) {
			Ok(observer) => {
				for el in elements {
					observer.observe(el);
				}
				cb.forget();
			}
			Err(e) => {
				warn!("site-fx: IntersectionObserver unavailable ({:?}), using scroll checks", e);
				self.observe_by_scroll(elements.to_vec(), config.clone(), handler);
			}
		}
	}
}
