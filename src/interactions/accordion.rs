//! FAQ accordion with at most one expanded item.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use super::analytics::{Analytics, FAQ_OPENED, truncate_chars};
use crate::host::{Host, HostEvent, Target};

/// Longest question prefix reported to analytics.
const QUESTION_PREVIEW_CHARS: usize = 50;

/// Expansion state of `len` items.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Accordion {
	len: usize,
	expanded: Option<usize>,
}

/// Items whose state changed as the result of a click.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Toggle {
	/// Item that was collapsed, if any.
	pub collapsed: Option<usize>,
	/// Item that was expanded, if any.
	pub expanded: Option<usize>,
}

impl Accordion {
	/// `len` items, all collapsed.
	pub fn new(len: usize) -> Self {
		Self {
			len,
			expanded: None,
		}
	}

	/// Start with `index` expanded. Out of range leaves everything collapsed.
	pub fn with_expanded(len: usize, index: Option<usize>) -> Self {
		Self {
			len,
			expanded: index.filter(|&i| i < len),
		}
	}

	/// Number of items.
	pub fn len(&self) -> usize {
		self.len
	}

	/// Whether there are no items.
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Index of the open item.
	pub fn expanded(&self) -> Option<usize> {
		self.expanded
	}

	/// Whether item `index` is open.
	pub fn is_expanded(&self, index: usize) -> bool {
		self.expanded == Some(index)
	}

	/// Click the question of item `index`. Clicking the open item closes it;
	/// clicking any other item opens it and closes the previous one.
	pub fn click(&mut self, index: usize) -> Toggle {
		if index >= self.len {
			return Toggle::default();
		}
		if self.expanded == Some(index) {
			self.expanded = None;
			Toggle {
				collapsed: Some(index),
				expanded: None,
			}
		} else {
			Toggle {
				collapsed: self.expanded.replace(index),
				expanded: Some(index),
			}
		}
	}
}

struct FaqItem<E> {
	question: E,
	answer: E,
}

fn set_item<H: Host>(host: &H, item: &FaqItem<H::Element>, open: bool) {
	for el in [&item.question, &item.answer] {
		if open {
			host.add_class(el, "active");
		} else {
			host.remove_class(el, "active");
		}
	}
	host.set_attribute(&item.question, "aria-expanded", if open { "true" } else { "false" });
}

/// Wire `.faq-item` blocks with a `.faq-question` and a `.faq-answer`.
pub fn install<H: Host + Clone + 'static>(host: &H) {
	let items: Vec<FaqItem<H::Element>> = host
		.query_all(".faq-item")
		.iter()
		.filter_map(|item| {
			Some(FaqItem {
				question: host.query_one_within(item, ".faq-question")?,
				answer: host.query_one_within(item, ".faq-answer")?,
			})
		})
		.collect();
	if items.is_empty() {
		debug!("site-fx: no FAQ items");
		return;
	}

	let initial = items.iter().position(|i| host.has_class(&i.answer, "active"));
	let state = Rc::new(RefCell::new(Accordion::with_expanded(items.len(), initial)));
	for (index, item) in items.iter().enumerate() {
		set_item(host, item, initial == Some(index));
	}

	debug!("site-fx: accordion with {} items", items.len());
	let items = Rc::new(items);
	for index in 0..items.len() {
		let (h, state, all) = (host.clone(), state.clone(), items.clone());
		host.listen(
			Target::Element(&items[index].question),
			"click",
			Box::new(move |_: &HostEvent| {
				let toggle = state.borrow_mut().click(index);
				if let Some(i) = toggle.collapsed {
					set_item(&h, &all[i], false);
				}
				if let Some(i) = toggle.expanded {
					set_item(&h, &all[i], true);
				}
			}),
		);
	}
}

/// Mirror native `<details>` state into `aria-expanded` on its `<summary>`
/// and report openings.
pub fn install_details<H: Host + Clone + 'static>(host: &H, analytics: &Analytics) {
	for details in host.query_all("details") {
		let Some(summary) = host.query_one_within(&details, "summary") else {
			continue;
		};
		let open = host.attribute(&details, "open").is_some();
		host.set_attribute(&summary, "aria-expanded", &open.to_string());

		let (h, a, d) = (host.clone(), analytics.clone(), details.clone());
		host.listen(
			Target::Element(&details),
			"toggle",
			Box::new(move |_: &HostEvent| {
				let open = h.attribute(&d, "open").is_some();
				h.set_attribute(&summary, "aria-expanded", &open.to_string());
				if open {
					let question = truncate_chars(&h.text(&summary), QUESTION_PREVIEW_CHARS);
					a.track(FAQ_OPENED, vec![("question", question)]);
				}
			}),
		);
	}
}
