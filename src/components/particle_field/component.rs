//! Leptos component owning the particle overlay canvas.
//!
//! The canvas is fixed over the whole viewport and ignores pointer input.
//! Window resizes resize the canvas and the engine; pointer moves anywhere on
//! the document update the engine's cursor. An animation loop runs via
//! `requestAnimationFrame`, advancing the engine one step and drawing it.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::particles::ParticleEngine;
use super::render;
use super::theme::ParticleStyle;
use crate::error::{FxError, Result};
use crate::rng::browser_seed;

/// One display refresh.
const FRAME_STEP: f64 = 1.0;

fn viewport(window: &Window) -> (f64, f64) {
	let dim = |v: std::result::Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	(dim(window.inner_width()), dim(window.inner_height()))
}

fn drawing_context(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d> {
	canvas
		.get_context("2d")?
		.ok_or(FxError::NoDrawingContext)?
		.dyn_into()
		.map_err(|_| FxError::NoDrawingContext)
}

/// Full-viewport particle animation overlay.
///
/// Without a 2D context the component logs a warning and stays inert. Pass
/// `seed` for a reproducible layout; otherwise the browser's RNG seeds it.
#[component]
pub fn ParticleField(
	#[prop(into)] style: ParticleStyle,
	#[prop(default = None)] seed: Option<u64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let engine: Rc<RefCell<Option<ParticleEngine>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let pointer_cb: Rc<RefCell<Option<Closure<dyn FnMut(MouseEvent)>>>> =
		Rc::new(RefCell::new(None));
	let css = format!(
		"position: fixed; top: 0; left: 0; width: 100%; height: 100%; \
		 pointer-events: none; z-index: {};",
		style.z_index
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if !style.enabled || engine.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let ctx = match drawing_context(&canvas) {
			Ok(ctx) => ctx,
			Err(e) => {
				warn!("site-fx: particle field disabled: {e}");
				return;
			}
		};

		let (w, h) = viewport(&window);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		let field = ParticleEngine::new(style.clone(), w, h, seed.unwrap_or_else(browser_seed));
		debug!("site-fx: particle field with {} particles", field.particles().len());
		*engine.borrow_mut() = Some(field);

		let (engine_resize, canvas_resize, window_resize) =
			(engine.clone(), canvas.clone(), window.clone());
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = viewport(&window_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut e) = *engine_resize.borrow_mut() {
				if e.resize(nw, nh) {
					debug!("site-fx: particle field reset to {} particles", e.particles().len());
				}
			}
		}));
		if let Some(ref cb) = *resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let engine_pointer = engine.clone();
		*pointer_cb.borrow_mut() = Some(Closure::new(move |ev: MouseEvent| {
			if let Some(ref mut e) = *engine_pointer.borrow_mut() {
				e.set_cursor(ev.client_x() as f64, ev.client_y() as f64);
			}
		}));
		if let (Some(document), Some(cb)) = (window.document(), pointer_cb.borrow().as_ref()) {
			let _ = document.add_event_listener_with_callback("mousemove", cb.as_ref().unchecked_ref());
		}

		let (engine_anim, animate_inner, window_anim) =
			(engine.clone(), animate.clone(), window.clone());
		*animate.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut e) = *engine_anim.borrow_mut() {
				render::frame(e, Some(&ctx), FRAME_STEP);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = window_anim.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			id="particles-canvas"
			class="particle-field"
			aria-hidden="true"
			style=css
		/>
	}
}
