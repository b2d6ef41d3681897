//! Accessibility affordances: skip link, keyboard focus ring, field labels.

use log::debug;

use crate::host::{Decoration, Host, HostEvent, Placement, Target};

/// Id the skip link jumps to.
pub const MAIN_CONTENT_ID: &str = "main-content";
/// Class on `<body>` while the user navigates with the keyboard.
pub const KEYBOARD_NAV_CLASS: &str = "keyboard-nav";

const SKIP_LINK_SHOWN: &str = "6px";
const SKIP_LINK_HIDDEN: &str = "-40px";

/// Hidden link that jumps past the header when focused.
pub fn skip_link(label: &str) -> Decoration {
	Decoration::new("a", "skip-link")
		.attr("href", format!("#{MAIN_CONTENT_ID}"))
		.text(label)
		.style("position", "absolute")
		.style("top", SKIP_LINK_HIDDEN)
		.style("left", "6px")
		.style("background", "var(--color-primary)")
		.style("color", "white")
		.style("padding", "8px")
		.style("text-decoration", "none")
		.style("z-index", "1000")
}

/// Skip link, focus ring and field labels.
pub fn install<H: Host + Clone + 'static>(host: &H, skip_label: &str) {
	install_skip_link(host, skip_label);
	install_focus_ring(host);
	install_field_labels(host);
}

/// Insert the skip link as the first child of `<body>` and give `.hero` the
/// target id when it has none.
pub fn install_skip_link<H: Host + Clone + 'static>(host: &H, label: &str) {
	let Some(link) = host.spawn(Placement::BodyStart, &skip_link(label)) else {
		return;
	};
	for (event, top) in [("focus", SKIP_LINK_SHOWN), ("blur", SKIP_LINK_HIDDEN)] {
		let (h, l) = (host.clone(), link.clone());
		host.listen(
			Target::Element(&link),
			event,
			Box::new(move |_: &HostEvent| h.set_style(&l, "top", top)),
		);
	}

	if let Some(hero) = host.query(".hero") {
		let has_id = host.attribute(&hero, "id").is_some_and(|id| !id.is_empty());
		if !has_id {
			host.set_attribute(&hero, "id", MAIN_CONTENT_ID);
		}
	}
}

/// Show the focus ring only after Tab is pressed; any mouse press hides it.
pub fn install_focus_ring<H: Host + Clone + 'static>(host: &H) {
	let Some(body) = host.body() else {
		return;
	};
	let (h, b) = (host.clone(), body.clone());
	host.listen(
		Target::Document,
		"keydown",
		Box::new(move |ev: &HostEvent| {
			if ev.key.as_deref() == Some("Tab") {
				h.add_class(&b, KEYBOARD_NAV_CLASS);
			}
		}),
	);
	let h = host.clone();
	host.listen(
		Target::Document,
		"mousedown",
		Box::new(move |_: &HostEvent| h.remove_class(&body, KEYBOARD_NAV_CLASS)),
	);
}

/// Copy sibling `<label>` text into `aria-label` for unlabeled fields.
pub fn install_field_labels<H: Host>(host: &H) {
	let mut labelled = 0;
	for field in host.query_all("input, textarea") {
		if host.attribute(&field, "aria-label").is_some() {
			continue;
		}
		let label = host
			.parent(&field)
			.and_then(|parent| host.query_one_within(&parent, "label"));
		if let Some(label) = label {
			host.set_attribute(&field, "aria-label", host.text(&label).trim());
			labelled += 1;
		}
	}
	debug!("site-fx: added aria-label to {labelled} fields");
}
