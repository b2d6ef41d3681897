//! Particle animation overlay.
//!
//! A fixed, full-viewport canvas of softly pulsing particles that drift,
//! bounce off the viewport edges and are drawn toward the pointer.
//!
//! - [`ParticleEngine`] holds the simulation and is usable without a browser
//! - [`render::Surface`] abstracts the 2D context it draws on
//! - [`ParticleField`] mounts the canvas and drives the frame loop
//!
//! # Example
//!
//! ```ignore
//! use site_fx::{ParticleField, ParticleStyle};
//!
//! view! { <ParticleField style=ParticleStyle::default() /> }
//! ```

mod component;
pub mod particles;
pub mod render;
pub mod theme;

pub use component::ParticleField;
pub use particles::{Cursor, Particle, ParticleEngine, ParticleSet};
pub use theme::{Color, ParticleStyle};
