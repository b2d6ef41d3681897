//! Canvas drawing for the particle field.
//!
//! Drawing goes through [`Surface`] so a frame can be recorded in tests
//! instead of painted.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::particles::ParticleEngine;

/// The 2D drawing operations a frame needs.
pub trait Surface {
	/// Erase the whole surface.
	fn clear(&self, width: f64, height: f64);
	/// Global alpha for subsequent fills.
	fn set_alpha(&self, alpha: f64);
	/// Fill color for subsequent fills.
	fn set_fill(&self, css_color: &str);
	/// Soft shadow around subsequent fills. A blur of zero disables it.
	fn set_glow(&self, blur: f64, css_color: &str);
	/// Fill a circle centered on (`x`, `y`).
	fn fill_circle(&self, x: f64, y: f64, radius: f64);
}

impl Surface for CanvasRenderingContext2d {
	fn clear(&self, width: f64, height: f64) {
		self.clear_rect(0.0, 0.0, width, height);
	}

	fn set_alpha(&self, alpha: f64) {
		self.set_global_alpha(alpha);
	}

	fn set_fill(&self, css_color: &str) {
		self.set_fill_style_str(css_color);
	}

	fn set_glow(&self, blur: f64, css_color: &str) {
		self.set_shadow_blur(blur);
		self.set_shadow_color(css_color);
	}

	fn fill_circle(&self, x: f64, y: f64, radius: f64) {
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, PI * 2.0);
		self.fill();
	}
}

/// Clear the surface and draw every particle at its current pulse.
pub fn render<S: Surface + ?Sized>(engine: &ParticleEngine, surface: &S) {
	let (width, height) = engine.size();
	let glow = engine.style().glow_blur;
	surface.clear(width, height);

	for p in engine.particles() {
		let pulse = p.pulse();
		let color = p.color.to_css_rgb();
		surface.set_alpha(p.opacity * pulse);
		surface.set_fill(&color);
		surface.set_glow(glow, &color);
		surface.fill_circle(p.x, p.y, p.radius * (0.5 + pulse));
	}

	surface.set_alpha(1.0);
	surface.set_glow(0.0, "transparent");
}

/// Advance the engine by `dt` frames and draw it. Without a surface nothing
/// happens, not even the update. Returns whether a frame was produced.
pub fn frame<S: Surface + ?Sized>(engine: &mut ParticleEngine, surface: Option<&S>, dt: f64) -> bool {
	let Some(surface) = surface else {
		return false;
	};
	engine.advance(dt);
	render(engine, surface);
	true
}
