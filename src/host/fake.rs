//! In-memory [`Host`] for unit tests.
//!
//! Elements are indices into a flat node table. Selector support covers what
//! the effects use: comma lists of compound selectors built from a tag,
//! `.class`, `#id`, `[attr]`, `[attr="v"]` and `[attr^="v"]`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::{
	Decoration, EventHandler, Host, HostEvent, IntersectionHandler, Placement, Rect, Target,
};
use crate::interactions::reveal::RevealConfig;

#[derive(Debug, Default)]
pub struct FakeNode {
	pub tag: String,
	pub classes: Vec<String>,
	pub attributes: BTreeMap<String, String>,
	pub styles: BTreeMap<String, String>,
	pub text: String,
	pub value: String,
	pub rect: Rect,
	pub parent: Option<usize>,
	pub removed: bool,
	pub spawned: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum ListenTarget {
	Window,
	Document,
	Element(usize),
}

struct Listener {
	target: ListenTarget,
	event: String,
	handler: EventHandler,
}

struct Observer {
	elements: Vec<usize>,
	config: RevealConfig,
	handler: IntersectionHandler<usize>,
}

struct FakeDom {
	nodes: Vec<FakeNode>,
	listeners: Vec<Listener>,
	observers: Vec<Observer>,
	viewport: (f64, f64),
	scroll_top: f64,
	scrolled_to: Vec<f64>,
}

/// Shared handle to a fake document. Node 0 is `<body>`.
#[derive(Clone)]
pub struct FakeHost {
	dom: Rc<RefCell<FakeDom>>,
}

impl Default for FakeHost {
	fn default() -> Self {
		Self::new(1280.0, 800.0)
	}
}

impl FakeHost {
	pub fn new(width: f64, height: f64) -> Self {
		let body = FakeNode {
			tag: "body".into(),
			rect: Rect::new(0.0, 0.0, width, height),
			..Default::default()
		};
		Self {
			dom: Rc::new(RefCell::new(FakeDom {
				nodes: vec![body],
				listeners: Vec::new(),
				observers: Vec::new(),
				viewport: (width, height),
				scroll_top: 0.0,
				scrolled_to: Vec::new(),
			})),
		}
	}

	/// Append an element under `<body>`. `classes` is space separated.
	pub fn element(&self, tag: &str, classes: &str) -> usize {
		self.child(0, tag, classes)
	}

	pub fn child(&self, parent: usize, tag: &str, classes: &str) -> usize {
		let mut dom = self.dom.borrow_mut();
		dom.nodes.push(FakeNode {
			tag: tag.into(),
			classes: classes.split_whitespace().map(String::from).collect(),
			parent: Some(parent),
			..Default::default()
		});
		dom.nodes.len() - 1
	}

	pub fn with_attr(&self, element: usize, name: &str, value: &str) -> usize {
		self.set_attribute(&element, name, value);
		element
	}

	pub fn with_text(&self, element: usize, text: &str) -> usize {
		self.set_text(&element, text);
		element
	}

	pub fn set_rect(&self, element: usize, rect: Rect) {
		self.dom.borrow_mut().nodes[element].rect = rect;
	}

	pub fn set_scroll_top(&self, top: f64) {
		self.dom.borrow_mut().scroll_top = top;
	}

	pub fn set_viewport(&self, width: f64, height: f64) {
		self.dom.borrow_mut().viewport = (width, height);
	}

	pub fn style(&self, element: usize, property: &str) -> Option<String> {
		self.dom.borrow().nodes[element].styles.get(property).cloned()
	}

	pub fn is_removed(&self, element: usize) -> bool {
		self.dom.borrow().nodes[element].removed
	}

	pub fn scrolled_to(&self) -> Vec<f64> {
		self.dom.borrow().scrolled_to.clone()
	}

	/// Live elements created through [`Host::spawn`] carrying `class`.
	pub fn spawned_with_class(&self, class: &str) -> Vec<usize> {
		let dom = self.dom.borrow();
		(0..dom.nodes.len())
			.filter(|&i| {
				let n = &dom.nodes[i];
				n.spawned && !n.removed && n.classes.iter().any(|c| c == class)
			})
			.collect()
	}

	pub fn listener_count(&self) -> usize {
		self.dom.borrow().listeners.len()
	}

	/// Deliver an event to every listener registered for `target`/`event`.
	/// Returns whether any handler prevented the default action.
	pub fn dispatch(&self, target: Target<'_, usize>, event: &str, payload: HostEvent) -> bool {
		let target = match target {
			Target::Window => ListenTarget::Window,
			Target::Document => ListenTarget::Document,
			Target::Element(e) => ListenTarget::Element(*e),
		};
		let matching: Vec<usize> = {
			let dom = self.dom.borrow();
			dom.listeners
				.iter()
				.enumerate()
				.filter(|(_, l)| l.target == target && l.event == event)
				.map(|(i, _)| i)
				.collect()
		};
		for idx in matching {
			// Take the handler out so it can call back into the host.
			let mut handler = std::mem::replace(
				&mut self.dom.borrow_mut().listeners[idx].handler,
				Box::new(|_: &HostEvent| {}),
			);
			handler(&payload);
			self.dom.borrow_mut().listeners[idx].handler = handler;
		}
		payload.default_prevented()
	}

	pub fn click(&self, element: usize) -> bool {
		self.dispatch(Target::Element(&element), "click", HostEvent::default())
	}

	/// Report `ratio` visibility for `element` to every observer watching it.
	pub fn intersect(&self, element: usize, ratio: f64) {
		let count = self.dom.borrow().observers.len();
		for idx in 0..count {
			if !self.dom.borrow().observers[idx].elements.contains(&element) {
				continue;
			}
			let mut handler =
				std::mem::replace(&mut self.dom.borrow_mut().observers[idx].handler, Box::new(|_: &usize, _: f64| false));
			let unobserve = handler(&element, ratio);
			let mut dom = self.dom.borrow_mut();
			dom.observers[idx].handler = handler;
			if unobserve {
				dom.observers[idx].elements.retain(|&e| e != element);
			}
		}
	}

	/// Recompute visibility of every observed element from its rect.
	pub fn refresh_intersections(&self) {
		let checks: Vec<(usize, f64)> = {
			let dom = self.dom.borrow();
			let (nodes, viewport) = (&dom.nodes, dom.viewport);
			dom.observers
				.iter()
				.flat_map(|o| {
					o.elements
						.iter()
						.map(move |&e| (e, o.config.visible_ratio(nodes[e].rect, viewport)))
				})
				.collect()
		};
		for (element, ratio) in checks {
			self.intersect(element, ratio);
		}
	}

	pub fn observed(&self, element: usize) -> bool {
		self.dom
			.borrow()
			.observers
			.iter()
			.any(|o| o.elements.contains(&element))
	}

	fn attached(dom: &FakeDom, mut idx: usize) -> bool {
		loop {
			let node = &dom.nodes[idx];
			if node.removed {
				return false;
			}
			match node.parent {
				Some(p) => idx = p,
				None => return idx == 0,
			}
		}
	}

	fn is_descendant(dom: &FakeDom, mut idx: usize, ancestor: usize) -> bool {
		while let Some(p) = dom.nodes[idx].parent {
			if p == ancestor {
				return true;
			}
			idx = p;
		}
		false
	}
}

fn matches(node: &FakeNode, selector: &str) -> bool {
	selector
		.split(',')
		.any(|compound| matches_compound(node, compound.trim()))
}

fn matches_compound(node: &FakeNode, selector: &str) -> bool {
	let stops = ['.', '#', '['];
	let tag_end = selector.find(stops).unwrap_or(selector.len());
	let tag = &selector[..tag_end];
	if !tag.is_empty() && tag != "*" && tag != node.tag {
		return false;
	}
	let mut rest = &selector[tag_end..];
	while !rest.is_empty() {
		if let Some(r) = rest.strip_prefix('.') {
			let end = r.find(stops).unwrap_or(r.len());
			if !node.classes.iter().any(|c| c == &r[..end]) {
				return false;
			}
			rest = &r[end..];
		} else if let Some(r) = rest.strip_prefix('#') {
			let end = r.find(stops).unwrap_or(r.len());
			if node.attributes.get("id").map(String::as_str) != Some(&r[..end]) {
				return false;
			}
			rest = &r[end..];
		} else if let Some(r) = rest.strip_prefix('[') {
			let Some(end) = r.find(']') else {
				return false;
			};
			let inner = &r[..end];
			rest = &r[end + 1..];
			let unquote = |v: &str| v.trim_matches('"').to_string();
			let ok = if let Some((name, value)) = inner.split_once("^=") {
				node.attributes
					.get(name)
					.is_some_and(|a| a.starts_with(&unquote(value)))
			} else if let Some((name, value)) = inner.split_once('=') {
				node.attributes.get(name) == Some(&unquote(value))
			} else {
				node.attributes.contains_key(inner)
			};
			if !ok {
				return false;
			}
		} else {
			return false;
		}
	}
	true
}

impl Host for FakeHost {
	type Element = usize;

	fn query_all(&self, selector: &str) -> Vec<usize> {
		let dom = self.dom.borrow();
		(1..dom.nodes.len())
			.filter(|&i| Self::attached(&dom, i) && matches(&dom.nodes[i], selector))
			.collect()
	}

	fn query_within(&self, parent: &usize, selector: &str) -> Vec<usize> {
		let dom = self.dom.borrow();
		(1..dom.nodes.len())
			.filter(|&i| {
				!dom.nodes[i].removed
					&& Self::is_descendant(&dom, i, *parent)
					&& matches(&dom.nodes[i], selector)
			})
			.collect()
	}

	fn body(&self) -> Option<usize> {
		Some(0)
	}

	fn parent(&self, element: &usize) -> Option<usize> {
		self.dom.borrow().nodes[*element].parent
	}

	fn closest(&self, element: &usize, selector: &str) -> Option<usize> {
		let dom = self.dom.borrow();
		let mut idx = Some(*element);
		while let Some(i) = idx {
			if matches(&dom.nodes[i], selector) {
				return Some(i);
			}
			idx = dom.nodes[i].parent;
		}
		None
	}

	fn viewport(&self) -> (f64, f64) {
		self.dom.borrow().viewport
	}

	fn rect(&self, element: &usize) -> Rect {
		self.dom.borrow().nodes[*element].rect
	}

	fn scroll_top(&self) -> f64 {
		self.dom.borrow().scroll_top
	}

	fn scroll_to(&self, top: f64) {
		let mut dom = self.dom.borrow_mut();
		dom.scroll_top = top;
		dom.scrolled_to.push(top);
	}

	fn set_style(&self, element: &usize, property: &str, value: &str) {
		self.dom.borrow_mut().nodes[*element]
			.styles
			.insert(property.into(), value.into());
	}

	fn add_class(&self, element: &usize, class: &str) {
		let mut dom = self.dom.borrow_mut();
		let classes = &mut dom.nodes[*element].classes;
		if !classes.iter().any(|c| c == class) {
			classes.push(class.into());
		}
	}

	fn remove_class(&self, element: &usize, class: &str) {
		self.dom.borrow_mut().nodes[*element]
			.classes
			.retain(|c| c != class);
	}

	fn has_class(&self, element: &usize, class: &str) -> bool {
		self.dom.borrow().nodes[*element]
			.classes
			.iter()
			.any(|c| c == class)
	}

	fn attribute(&self, element: &usize, name: &str) -> Option<String> {
		let dom = self.dom.borrow();
		let node = &dom.nodes[*element];
		if name == "class" {
			return Some(node.classes.join(" "));
		}
		node.attributes.get(name).cloned()
	}

	fn set_attribute(&self, element: &usize, name: &str, value: &str) {
		self.dom.borrow_mut().nodes[*element]
			.attributes
			.insert(name.into(), value.into());
	}

	fn remove_attribute(&self, element: &usize, name: &str) {
		self.dom.borrow_mut().nodes[*element].attributes.remove(name);
	}

	fn text(&self, element: &usize) -> String {
		self.dom.borrow().nodes[*element].text.clone()
	}

	fn set_text(&self, element: &usize, text: &str) {
		self.dom.borrow_mut().nodes[*element].text = text.into();
	}

	fn value(&self, element: &usize) -> String {
		self.dom.borrow().nodes[*element].value.clone()
	}

	fn set_value(&self, element: &usize, value: &str) {
		self.dom.borrow_mut().nodes[*element].value = value.into();
	}

	fn spawn(&self, placement: Placement<'_, usize>, decoration: &Decoration) -> Option<usize> {
		let parent = match placement {
			Placement::Body | Placement::BodyStart => 0,
			Placement::Inside(e) => *e,
			Placement::Before(e) | Placement::After(e) => self.parent(e)?,
		};
		let el = self.child(parent, decoration.tag, &decoration.class);
		let mut dom = self.dom.borrow_mut();
		let node = &mut dom.nodes[el];
		node.spawned = true;
		node.text = decoration.text.clone().unwrap_or_default();
		for (name, value) in &decoration.attributes {
			node.attributes.insert((*name).into(), value.clone());
		}
		for (property, value) in &decoration.styles {
			node.styles.insert((*property).into(), value.clone());
		}
		Some(el)
	}

	fn remove(&self, element: &usize) {
		self.dom.borrow_mut().nodes[*element].removed = true;
	}

	fn listen(&self, target: Target<'_, usize>, event: &str, handler: EventHandler) {
		let target = match target {
			Target::Window => ListenTarget::Window,
			Target::Document => ListenTarget::Document,
			Target::Element(e) => ListenTarget::Element(*e),
		};
		self.dom.borrow_mut().listeners.push(Listener {
			target,
			event: event.into(),
			handler,
		});
	}

	fn observe_intersections(
		&self,
		elements: &[usize],
		config: &RevealConfig,
		handler: IntersectionHandler<usize>,
	) {
		self.dom.borrow_mut().observers.push(Observer {
			elements: elements.to_vec(),
			config: config.clone(),
			handler,
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn selectors_match_compound_and_lists() {
		let host = FakeHost::default();
		let link = host.with_attr(host.element("a", "nav-link"), "href", "#faq");
		let mail = host.with_attr(host.element("a", ""), "href", "mailto:hi@example.com");
		let button = host.with_attr(host.element("button", "btn btn-primary"), "type", "submit");
		let input = host.element("input", "");

		assert_eq!(host.query_all("a[href^=\"#\"]"), vec![link]);
		assert_eq!(host.query_all("a[href^=\"mailto:\"]"), vec![mail]);
		assert_eq!(host.query_all("button[type=\"submit\"]"), vec![button]);
		assert_eq!(host.query_all(".btn.btn-primary"), vec![button]);
		assert_eq!(host.query_all("input, button"), vec![button, input]);
		assert!(host.query_all(".missing").is_empty());
	}

	#[test]
	fn removed_subtrees_are_not_queried() {
		let host = FakeHost::default();
		let item = host.element("div", "faq-item");
		let question = host.child(item, "button", "faq-question");
		assert_eq!(host.query_within(&item, ".faq-question"), vec![question]);

		host.remove(&item);
		assert!(host.query_all(".faq-question").is_empty());
	}
}
