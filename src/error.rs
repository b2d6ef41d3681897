//! Error types for page setup.
//!
//! Nothing here is fatal to the page: callers log the error and skip the
//! affected feature.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised while wiring effects into the host page.
#[derive(Debug, Error)]
pub enum FxError {
	/// `window` is not available (not running in a browser).
	#[error("no window available")]
	NoWindow,

	/// The window has no document.
	#[error("no document available")]
	NoDocument,

	/// The canvas refused a 2D drawing context.
	#[error("2d drawing context unavailable")]
	NoDrawingContext,

	/// A browser API call threw.
	#[error("javascript error: {0}")]
	Js(String),

	/// Embedded configuration could not be parsed.
	#[error("invalid configuration: {0}")]
	Config(#[from] serde_json::Error),
}

impl From<JsValue> for FxError {
	fn from(value: JsValue) -> Self {
		FxError::Js(
			value
				.as_string()
				.unwrap_or_else(|| format!("{value:?}")),
		)
	}
}

/// Result alias used by setup functions.
pub type Result<T> = std::result::Result<T, FxError>;
