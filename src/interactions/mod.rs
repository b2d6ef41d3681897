//! Page handlers. Each module pairs a small state machine or pure function
//! with an `install` function that wires it into a [`Host`](crate::host::Host).

pub mod a11y;
pub mod accordion;
pub mod analytics;
pub mod counter;
pub mod effects;
pub mod nav;
pub mod reveal;
