//! Seedable randomness shared by effects that need jitter.

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Single-threaded shared RNG handle.
pub type SharedRng = Rc<RefCell<SmallRng>>;

/// Create a shared RNG from a fixed seed.
pub fn shared_rng(seed: u64) -> SharedRng {
	Rc::new(RefCell::new(SmallRng::seed_from_u64(seed)))
}

/// Seed drawn from the browser's `Math.random()`.
///
/// Only meaningful on the WASM target; natively the JS shim is unavailable.
pub fn browser_seed() -> u64 {
	let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
	let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
	(hi << 32) | lo
}
