//! Colors and particle style configuration.

use serde::Deserialize;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Same color with alpha `a`.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Parse `#rgb` or `#rrggbb`.
	pub fn from_hex(hex: &str) -> Option<Self> {
		let digits = hex.trim().strip_prefix('#')?;
		let channel = |s: &str| u8::from_str_radix(s, 16).ok();
		match digits.len() {
			3 => {
				let mut it = digits.chars().map(|c| channel(&c.to_string()).map(|v| v * 17));
				Some(Self::rgb(it.next()??, it.next()??, it.next()??))
			}
			6 => Some(Self::rgb(
				channel(digits.get(0..2)?)?,
				channel(digits.get(2..4)?)?,
				channel(digits.get(4..6)?)?,
			)),
			_ => None,
		}
	}

	/// `rgba(...)` CSS value.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			self.to_css_rgb()
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// `rgb(...)` CSS value, ignoring alpha.
	pub fn to_css_rgb(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

impl TryFrom<String> for Color {
	type Error = String;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::from_hex(&value).ok_or_else(|| format!("invalid color {value:?}"))
	}
}

/// Particle field configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleStyle {
	/// Whether the canvas overlay is mounted at all
	pub enabled: bool,
	/// Particles per pixel of viewport width
	pub density: f64,
	/// Upper bound on the particle count
	pub max_count: usize,
	/// Largest absolute initial velocity component
	pub speed: f64,
	/// Smallest particle radius in pixels.
	pub size_min: f64,
	/// Largest particle radius in pixels.
	pub size_max: f64,
	/// Lowest base opacity.
	pub opacity_min: f64,
	/// Highest base opacity.
	pub opacity_max: f64,
	/// Colors drawn uniformly per particle; repeats weight a color
	pub palette: Vec<Color>,
	/// Phase advance per frame
	pub phase_step: f64,
	/// Cursor distance inside which particles are pulled
	pub attraction_radius: f64,
	/// Velocity added per frame at zero distance.
	pub attraction_strength: f64,
	/// Velocity multiplier applied every frame
	pub damping: f64,
	/// Shadow blur radius of the glow.
	pub glow_blur: f64,
	/// CSS `z-index` of the overlay canvas
	pub z_index: i32,
}

impl Default for ParticleStyle {
	fn default() -> Self {
		let (violet, cyan, orange) = (
			Color::rgb(0x72, 0x09, 0xb7),
			Color::rgb(0x00, 0xd4, 0xff),
			Color::rgb(0xff, 0x6b, 0x35),
		);
		Self {
			enabled: true,
			density: 0.05,
			max_count: 50,
			speed: 0.25,
			size_min: 1.0,
			size_max: 3.0,
			opacity_min: 0.1,
			opacity_max: 0.6,
			palette: vec![violet, cyan, orange, violet, cyan],
			phase_step: 0.02,
			attraction_radius: 100.0,
			attraction_strength: 0.01,
			damping: 0.995,
			glow_blur: 10.0,
			z_index: 1,
		}
	}
}

impl ParticleStyle {
	/// Number of particles for a viewport `width` pixels wide.
	pub fn target_count(&self, width: f64) -> usize {
		let by_width = (width.max(0.0) * self.density.max(0.0)).floor() as usize;
		by_width.min(self.max_count)
	}
}
