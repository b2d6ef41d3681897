//! Hover, focus and entrance micro-interactions.
//!
//! Handlers here keep no state between events. Short-lived decorations are
//! spawned through the host and removed by a scheduler task after their
//! animation ends; the returned tokens can cancel that removal.

use log::debug;
use rand::Rng;

use crate::host::{Decoration, Host, HostEvent, Placement, Rect, Target};
use crate::rng::SharedRng;
use crate::scheduler::{CancellationToken, Timers};

/// Sparks in a crystal-ball burst.
pub const BURST_COUNT: usize = 12;
/// Lifetime of a burst.
pub const BURST_LIFETIME_MS: f64 = 800.0;
/// Dots left behind a hovered nav item.
pub const TRAIL_COUNT: usize = 5;
/// Lifetime of a nav trail.
pub const TRAIL_LIFETIME_MS: f64 = 1000.0;
/// Sparkles around a focused input.
pub const SPARKLE_COUNT: usize = 8;
/// Lifetime of input sparkles.
pub const SPARKLE_LIFETIME_MS: f64 = 1500.0;
/// Lifetime of a button ripple.
pub const RIPPLE_LIFETIME_MS: f64 = 600.0;
/// How long a word glitches.
pub const GLITCH_MS: f64 = 800.0;
/// Falling streams in `.data-streams`.
pub const DATA_STREAM_COUNT: usize = 8;

const CASCADE_SELECTOR: &str = ".text-cascade, .text-cascade-delay, .text-cascade-delay-2";
const MAGIC_WORD_SELECTOR: &str = ".magic-word, .highlight-word, .future-word";
const ENTRANCE_TRANSITION: &str = "all 1s cubic-bezier(0.4, 0, 0.2, 1)";

/// Inline style set applied as a unit.
pub type StyleSet = &'static [(&'static str, &'static str)];

/// Hovered card.
pub const CARD_ACTIVE: StyleSet = &[
	("transform", "translateY(-10px) scale(1.02)"),
	(
		"box-shadow",
		"0 20px 40px rgba(114, 9, 183, 0.3), 0 0 30px rgba(0, 212, 255, 0.2)",
	),
];
/// Card at rest.
pub const CARD_IDLE: StyleSet = &[
	("transform", "translateY(0) scale(1)"),
	("box-shadow", "0 10px 20px rgba(114, 9, 183, 0.1)"),
];
/// Focused input.
pub const INPUT_FOCUSED: StyleSet = &[
	("box-shadow", "0 0 20px rgba(0, 212, 255, 0.5)"),
	("border-color", "#00d4ff"),
];
/// Input at rest.
pub const INPUT_IDLE: StyleSet = &[
	("box-shadow", "0 0 10px rgba(114, 9, 183, 0.2)"),
	("border-color", "rgba(114, 9, 183, 0.3)"),
];

/// Set every property in `styles` on `element`.
pub fn apply_styles<H: Host>(host: &H, element: &H::Element, styles: StyleSet) {
	for (property, value) in styles {
		host.set_style(element, property, value);
	}
}

fn dot(class: &str, size: f64, background: &str, x: f64, y: f64, animation: &str) -> Decoration {
	Decoration::div(class)
		.style("position", "fixed")
		.style("width", format!("{size}px"))
		.style("height", format!("{size}px"))
		.style("background", background)
		.style("border-radius", "50%")
		.style("left", format!("{x}px"))
		.style("top", format!("{y}px"))
		.style("pointer-events", "none")
		.style("z-index", "1000")
		.style("animation", animation)
}

/// Radial burst of dots from the center of `rect`, one every 30 degrees.
pub fn magic_burst(rect: Rect) -> Vec<Decoration> {
	let (cx, cy) = rect.center();
	(0..BURST_COUNT)
		.map(|i| {
			dot(
				"magic-burst",
				4.0,
				"radial-gradient(circle, #7209b7, #00d4ff)",
				cx,
				cy,
				"burstOut 0.8s ease-out forwards",
			)
			.style("transform-origin", "center")
			.style("--angle", format!("{}deg", i * 30))
		})
		.collect()
}

/// Trail dots scattered inside `rect`.
pub fn nav_trail(rect: Rect, rng: &mut impl Rng) -> Vec<Decoration> {
	(0..TRAIL_COUNT)
		.map(|_| {
			let x = rect.left + rng.random::<f64>() * rect.width;
			let y = rect.top + rng.random::<f64>() * rect.height;
			dot(
				"nav-magic-trail",
				6.0,
				"radial-gradient(circle, #7209b7, transparent)",
				x,
				y,
				"magicTrail 1s ease-out forwards",
			)
		})
		.collect()
}

/// Sparkles rising from just below an input.
pub fn input_sparkles(rect: Rect, rng: &mut impl Rng) -> Vec<Decoration> {
	(0..SPARKLE_COUNT)
		.map(|_| {
			let x = rect.left + rng.random::<f64>() * rect.width;
			dot(
				"input-sparkle",
				3.0,
				"#00d4ff",
				x,
				rect.bottom() + 5.0,
				"inputMagic 1.5s ease-out forwards",
			)
		})
		.collect()
}

/// Expanding ripple centered on a button.
pub fn button_ripple(rect: Rect) -> Decoration {
	let (cx, cy) = rect.center();
	dot(
		"button-ripple",
		10.0,
		"radial-gradient(circle, rgba(114, 9, 183, 0.6), transparent)",
		cx - 5.0,
		cy - 5.0,
		"buttonRipple 0.6s ease-out forwards",
	)
}

/// Falling light column for the `.data-streams` backdrop. Runs forever.
pub fn data_stream(rng: &mut impl Rng) -> Decoration {
	let duration = 3.0 + rng.random::<f64>() * 4.0;
	let delay = rng.random::<f64>() * 2.0;
	Decoration::div("data-stream")
		.style("position", "absolute")
		.style("width", "2px")
		.style("height", "100px")
		.style(
			"background",
			"linear-gradient(to bottom, transparent, #00d4ff, transparent)",
		)
		.style("left", format!("{}%", rng.random::<f64>() * 100.0))
		.style("animation", format!("dataFlow {duration}s linear infinite"))
		.style("animation-delay", format!("{delay}s"))
}

/// Append `decorations` to the body and remove each after `lifetime_ms`.
pub fn spawn_transient<H: Host + Clone + 'static>(
	host: &H,
	timers: &Timers,
	decorations: &[Decoration],
	lifetime_ms: f64,
) -> Vec<CancellationToken> {
	decorations
		.iter()
		.filter_map(|d| host.spawn(Placement::Body, d))
		.map(|el| {
			let h = host.clone();
			timers.schedule(lifetime_ms, move || h.remove(&el))
		})
		.collect()
}

/// Wire every micro-interaction present on the page.
pub fn install<H: Host + Clone + 'static>(host: &H, timers: &Timers, rng: &SharedRng) {
	install_text_cascade(host, timers);
	install_data_streams(host, rng);
	install_crystal_balls(host, timers);
	install_revolution_cards(host, timers);
	install_nav_items(host, timers, rng);
	install_magic_inputs(host, timers, rng);
	install_magic_buttons(host, timers);
}

fn install_text_cascade<H: Host + Clone + 'static>(host: &H, timers: &Timers) {
	for (index, el) in host.query_all(CASCADE_SELECTOR).into_iter().enumerate() {
		host.set_style(&el, "opacity", "0");
		host.set_style(&el, "transform", "translateY(30px)");

		let (h, t) = (host.clone(), timers.clone());
		timers.schedule(index as f64 * 300.0 + 500.0, move || {
			h.set_style(&el, "transition", ENTRANCE_TRANSITION);
			h.set_style(&el, "opacity", "1");
			h.set_style(&el, "transform", "translateY(0)");
			install_glitch(&h, &t, &el);
		});
	}
}

fn install_glitch<H: Host + Clone + 'static>(host: &H, timers: &Timers, parent: &H::Element) {
	for word in host.query_within(parent, MAGIC_WORD_SELECTOR) {
		let (h, t, w) = (host.clone(), timers.clone(), word.clone());
		host.listen(
			Target::Element(&word),
			"mouseenter",
			Box::new(move |_: &HostEvent| {
				h.add_class(&w, "glitch-text");
				let (h, w) = (h.clone(), w.clone());
				t.schedule(GLITCH_MS, move || h.remove_class(&w, "glitch-text"));
			}),
		);
	}
}

fn install_data_streams<H: Host>(host: &H, rng: &SharedRng) {
	let Some(container) = host.query(".data-streams") else {
		return;
	};
	let mut rng = rng.borrow_mut();
	for _ in 0..DATA_STREAM_COUNT {
		host.spawn(Placement::Inside(&container), &data_stream(&mut *rng));
	}
}

fn install_crystal_balls<H: Host + Clone + 'static>(host: &H, timers: &Timers) {
	for (index, ball) in host.query_all(".crystal-ball").into_iter().enumerate() {
		host.set_style(&ball, "animation-delay", &format!("{}s", index as f64 * 0.5));
		let (h, t, b) = (host.clone(), timers.clone(), ball.clone());
		host.listen(
			Target::Element(&ball),
			"mouseenter",
			Box::new(move |_: &HostEvent| {
				spawn_transient(&h, &t, &magic_burst(h.rect(&b)), BURST_LIFETIME_MS);
			}),
		);
	}
}

fn install_revolution_cards<H: Host + Clone + 'static>(host: &H, timers: &Timers) {
	for (index, card) in host.query_all(".revolution-card").into_iter().enumerate() {
		host.set_style(&card, "opacity", "0");
		host.set_style(&card, "transform", "translateY(50px) rotateX(15deg)");
		let (h, c) = (host.clone(), card.clone());
		timers.schedule(index as f64 * 200.0 + 1000.0, move || {
			h.set_style(&c, "transition", ENTRANCE_TRANSITION);
			h.set_style(&c, "opacity", "1");
			h.set_style(&c, "transform", "translateY(0) rotateX(0)");
		});

		for (event, styles, opacity) in [
			("mouseenter", CARD_ACTIVE, "1"),
			("mouseleave", CARD_IDLE, "0"),
		] {
			let (h, c) = (host.clone(), card.clone());
			host.listen(
				Target::Element(&card),
				event,
				Box::new(move |_: &HostEvent| {
					apply_styles(&h, &c, styles);
					for particle in h.query_within(&c, ".card-particle") {
						h.set_style(&particle, "opacity", opacity);
					}
				}),
			);
		}
	}
}

fn install_nav_items<H: Host + Clone + 'static>(host: &H, timers: &Timers, rng: &SharedRng) {
	for item in host.query_all(".nav-item") {
		let (h, t, r, i) = (host.clone(), timers.clone(), rng.clone(), item.clone());
		host.listen(
			Target::Element(&item),
			"mouseenter",
			Box::new(move |_: &HostEvent| {
				let trail = nav_trail(h.rect(&i), &mut *r.borrow_mut());
				spawn_transient(&h, &t, &trail, TRAIL_LIFETIME_MS);
			}),
		);
	}
}

fn install_magic_inputs<H: Host + Clone + 'static>(host: &H, timers: &Timers, rng: &SharedRng) {
	for input in host.query_all(".magic-input") {
		let (h, t, r, i) = (host.clone(), timers.clone(), rng.clone(), input.clone());
		host.listen(
			Target::Element(&input),
			"focus",
			Box::new(move |_: &HostEvent| {
				apply_styles(&h, &i, INPUT_FOCUSED);
				let sparkles = input_sparkles(h.rect(&i), &mut *r.borrow_mut());
				spawn_transient(&h, &t, &sparkles, SPARKLE_LIFETIME_MS);
			}),
		);
		let (h, i) = (host.clone(), input.clone());
		host.listen(
			Target::Element(&input),
			"blur",
			Box::new(move |_: &HostEvent| apply_styles(&h, &i, INPUT_IDLE)),
		);
	}
}

fn install_magic_buttons<H: Host + Clone + 'static>(host: &H, timers: &Timers) {
	for button in host.query_all(".magic-button") {
		let (h, t, b) = (host.clone(), timers.clone(), button.clone());
		host.listen(
			Target::Element(&button),
			"click",
			Box::new(move |_: &HostEvent| {
				spawn_transient(&h, &t, &[button_ripple(h.rect(&b))], RIPPLE_LIFETIME_MS);
			}),
		);
	}
	debug!("site-fx: micro-interactions installed");
}
