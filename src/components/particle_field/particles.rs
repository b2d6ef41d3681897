//! Pointer-attracted particle simulation.
//!
//! The engine is a plain value: it owns its particles, the last known cursor
//! and the viewport size, and knows nothing about the canvas. Several engines
//! can run side by side and tests drive one without a document.

use std::f64::consts::TAU;

use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use super::theme::{Color, ParticleStyle};

/// A single floating particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	/// Horizontal position in canvas pixels.
	pub x: f64,
	/// Vertical position in canvas pixels.
	pub y: f64,
	/// Horizontal velocity in pixels per frame.
	pub vx: f64,
	/// Vertical velocity in pixels per frame.
	pub vy: f64,
	/// Base radius before pulsing.
	pub radius: f64,
	/// Baseline opacity before pulsing
	pub opacity: f64,
	/// Fill and glow color.
	pub color: Color,
	/// Pulse phase in radians.
	pub phase: f64,
}

impl Particle {
	/// Oscillation factor in `[0, 1]`.
	pub fn pulse(&self) -> f64 {
		self.phase.sin() * 0.5 + 0.5
	}

	/// Magnitude of the velocity.
	pub fn speed(&self) -> f64 {
		self.vx.hypot(self.vy)
	}
}

/// Last pointer position in viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cursor {
	/// Horizontal position in viewport pixels.
	pub x: f64,
	/// Vertical position in viewport pixels.
	pub y: f64,
}

/// One batch of particles. Every (re)initialization bumps `generation`.
#[derive(Clone, Debug, Default)]
pub struct ParticleSet {
	/// Incremented on every (re)initialization.
	pub generation: u64,
	/// Particles of this batch.
	pub particles: Vec<Particle>,
}

/// Uniform sample from `[lo, hi)`, or `lo` when the range is empty.
fn between(rng: &mut impl Rng, lo: f64, hi: f64) -> f64 {
	if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Fresh particles scattered over a `width` by `height` viewport.
pub fn spawn(style: &ParticleStyle, width: f64, height: f64, rng: &mut impl Rng) -> Vec<Particle> {
	let fallback = Color::rgb(255, 255, 255);
	(0..style.target_count(width))
		.map(|_| Particle {
			x: between(rng, 0.0, width),
			y: between(rng, 0.0, height),
			vx: between(rng, -style.speed, style.speed),
			vy: between(rng, -style.speed, style.speed),
			radius: between(rng, style.size_min, style.size_max),
			opacity: between(rng, style.opacity_min, style.opacity_max),
			color: style.palette.choose(rng).copied().unwrap_or(fallback),
			phase: between(rng, 0.0, TAU),
		})
		.collect()
}

/// Keep `pos` inside `[0, max]`, turning `vel` back toward the inside.
fn reflect(pos: &mut f64, vel: &mut f64, max: f64) {
	if *pos < 0.0 {
		*pos = 0.0;
		*vel = vel.abs();
	} else if *pos > max {
		*pos = max;
		*vel = -vel.abs();
	}
}

/// One simulation step of `dt` frames.
pub fn advance(
	particles: &mut [Particle],
	cursor: Option<Cursor>,
	dt: f64,
	style: &ParticleStyle,
	width: f64,
	height: f64,
) {
	for p in particles {
		p.x += p.vx * dt;
		p.y += p.vy * dt;
		p.phase = (p.phase + style.phase_step * dt) % TAU;

		reflect(&mut p.x, &mut p.vx, width.max(0.0));
		reflect(&mut p.y, &mut p.vy, height.max(0.0));

		if let Some(cursor) = cursor {
			let (dx, dy) = (cursor.x - p.x, cursor.y - p.y);
			let distance = dx.hypot(dy);
			if distance > 0.0 && distance < style.attraction_radius {
				let force = (style.attraction_radius - distance) / style.attraction_radius;
				p.vx += dx / distance * force * style.attraction_strength;
				p.vy += dy / distance * force * style.attraction_strength;
			}
		}

		p.vx *= style.damping;
		p.vy *= style.damping;
	}
}

/// Particle simulation context for one viewport.
pub struct ParticleEngine {
	style: ParticleStyle,
	width: f64,
	height: f64,
	cursor: Option<Cursor>,
	set: ParticleSet,
	rng: SmallRng,
}

impl ParticleEngine {
	/// Engine for a `width` x `height` viewport, seeded with its first batch.
	pub fn new(style: ParticleStyle, width: f64, height: f64, seed: u64) -> Self {
		let mut engine = Self {
			style,
			width,
			height,
			cursor: None,
			set: ParticleSet::default(),
			rng: SmallRng::seed_from_u64(seed),
		};
		engine.initialize(width, height);
		engine
	}

	/// Style the engine was built with.
	pub fn style(&self) -> &ParticleStyle {
		&self.style
	}

	/// Viewport size as `(width, height)`.
	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	/// Current particles.
	pub fn particles(&self) -> &[Particle] {
		&self.set.particles
	}

	/// Generation of the current particle batch.
	pub fn generation(&self) -> u64 {
		self.set.generation
	}

	/// Last pointer position, if the pointer has moved yet.
	pub fn cursor(&self) -> Option<Cursor> {
		self.cursor
	}

	/// Particle count for a viewport `width` wide.
	pub fn target_count(&self, width: f64) -> usize {
		self.style.target_count(width)
	}

	/// Discard the current particles and scatter a new batch.
	pub fn initialize(&mut self, width: f64, height: f64) -> &ParticleSet {
		self.width = width;
		self.height = height;
		self.set = ParticleSet {
			generation: self.set.generation + 1,
			particles: spawn(&self.style, width, height, &mut self.rng),
		};
		&self.set
	}

	/// Record a pointer position. Particles near it are attracted.
	pub fn set_cursor(&mut self, x: f64, y: f64) {
		self.cursor = Some(Cursor { x, y });
	}

	/// Forget the pointer, e.g. when it leaves the page.
	pub fn clear_cursor(&mut self) {
		self.cursor = None;
	}

	/// Step every particle by `dt` frames.
	pub fn advance(&mut self, dt: f64) {
		advance(
			&mut self.set.particles,
			self.cursor,
			dt,
			&self.style,
			self.width,
			self.height,
		);
	}

	/// Adopt a new viewport size. The particles are replaced only when the
	/// target count changes; returns whether that happened.
	pub fn resize(&mut self, width: f64, height: f64) -> bool {
		if self.target_count(width) != self.set.particles.len() {
			self.initialize(width, height);
			return true;
		}
		self.width = width;
		self.height = height;
		false
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn engine(width: f64, height: f64) -> ParticleEngine {
		ParticleEngine::new(ParticleStyle::default(), width, height, 42)
	}

	#[test]
	fn initialize_respects_style_ranges() {
		let e = engine(1280.0, 800.0);
		let style = ParticleStyle::default();
		assert_eq!(e.particles().len(), 50);
		assert_eq!(e.generation(), 1);
		for p in e.particles() {
			assert!((0.0..1280.0).contains(&p.x) && (0.0..800.0).contains(&p.y));
			assert!(p.vx.abs() <= style.speed && p.vy.abs() <= style.speed);
			assert!((style.size_min..style.size_max).contains(&p.radius));
			assert!((style.opacity_min..style.opacity_max).contains(&p.opacity));
			assert!(style.palette.contains(&p.color));
			assert!((0.0..=1.0).contains(&p.pulse()));
		}
	}

	#[test]
	fn particles_stay_in_bounds() {
		let mut e = engine(400.0, 300.0);
		e.set_cursor(399.0, 1.0);
		for frame in 0..5000 {
			if frame == 2500 {
				e.set_cursor(0.0, 299.0);
			}
			e.advance(1.0);
			for p in e.particles() {
				assert!((0.0..=400.0).contains(&p.x), "x escaped: {}", p.x);
				assert!((0.0..=300.0).contains(&p.y), "y escaped: {}", p.y);
			}
		}
	}

	#[test]
	fn large_steps_are_clamped() {
		let style = ParticleStyle::default();
		let mut particles = vec![Particle {
			x: 5.0,
			y: 5.0,
			vx: -8.0,
			vy: 40.0,
			radius: 1.0,
			opacity: 0.5,
			color: Color::rgb(0, 0, 0),
			phase: 0.0,
		}];
		advance(&mut particles, None, 1.0, &style, 20.0, 20.0);
		let p = &particles[0];
		assert_eq!((p.x, p.y), (0.0, 20.0));
		assert!(p.vx > 0.0 && p.vy < 0.0);
	}

	#[test]
	fn speed_never_grows_without_cursor() {
		let mut e = engine(800.0, 600.0);
		let mut last: Vec<f64> = e.particles().iter().map(Particle::speed).collect();
		for _ in 0..600 {
			e.advance(1.0);
			for (p, prev) in e.particles().iter().zip(&mut last) {
				assert!(p.speed() <= *prev + 1e-12);
				*prev = p.speed();
			}
		}
	}

	#[test]
	fn cursor_pulls_nearby_particles() {
		let style = ParticleStyle::default();
		let mut particles = vec![Particle {
			x: 100.0,
			y: 100.0,
			vx: 0.0,
			vy: 0.0,
			radius: 1.0,
			opacity: 0.5,
			color: Color::rgb(0, 0, 0),
			phase: 0.0,
		}];
		let near = Some(Cursor { x: 150.0, y: 100.0 });
		advance(&mut particles, near, 1.0, &style, 800.0, 600.0);
		// force = (100 - 50) / 100 = 0.5, then damped.
		assert!((particles[0].vx - 0.5 * 0.01 * 0.995).abs() < 1e-12);
		assert_eq!(particles[0].vy, 0.0);

		let far = Some(Cursor { x: 500.0, y: 500.0 });
		let before = particles[0].vx;
		advance(&mut particles, far, 1.0, &style, 800.0, 600.0);
		assert!(particles[0].vx < before);
	}

	#[test]
	fn resize_replaces_set_only_when_count_changes() {
		let mut e = engine(600.0, 400.0);
		assert_eq!(e.particles().len(), 30);
		let before = e.particles().to_vec();

		assert!(!e.resize(610.0, 500.0));
		assert_eq!(e.generation(), 1);
		assert_eq!(e.particles(), before.as_slice());
		assert_eq!(e.size(), (610.0, 500.0));

		assert!(e.resize(900.0, 500.0));
		assert_eq!(e.generation(), 2);
		assert_eq!(e.particles().len(), 45);
		assert!(e.particles().iter().all(|p| !before.contains(p)));
	}

	#[test]
	fn seeded_engines_are_reproducible() {
		assert_eq!(engine(500.0, 500.0).particles(), engine(500.0, 500.0).particles());
	}

	#[test]
	fn degenerate_style_does_not_panic() {
		let style = ParticleStyle {
			speed: 0.0,
			size_min: 2.0,
			size_max: 2.0,
			palette: Vec::new(),
			..ParticleStyle::default()
		};
		let e = ParticleEngine::new(style, 200.0, 0.0, 1);
		assert_eq!(e.particles().len(), 10);
		assert!(e.particles().iter().all(|p| p.vx == 0.0 && p.radius == 2.0 && p.y == 0.0));
	}
}
