//! Page-embedded configuration.
//!
//! A page may carry `<script id="site-fx-config" type="application/json">`.
//! Every field is optional; missing fields take their defaults.

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlScriptElement};

use crate::components::particle_field::ParticleStyle;
use crate::error::Result;
use crate::forms::{FormConfig, FormMessages};
use crate::interactions::counter::CounterConfig;
use crate::interactions::reveal::RevealConfig;

/// Id of the script element holding the JSON configuration.
pub const CONFIG_ELEMENT_ID: &str = "site-fx-config";

/// Language of the built-in copy.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
	/// English.
	#[default]
	En,
	/// Japanese.
	Ja,
}

impl Locale {
	/// Built-in form copy for this locale.
	pub fn form_messages(self) -> FormMessages {
		match self {
			Self::En => FormMessages::english(),
			Self::Ja => FormMessages::japanese(),
		}
	}

	/// Text of the skip link for this locale.
	pub fn skip_link_label(self) -> &'static str {
		match self {
			Self::En => "Skip to main content",
			Self::Ja => "メインコンテンツにスキップ",
		}
	}
}

/// Everything a page can configure. All sections are optional.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct FxConfig {
	/// Language of the built-in copy.
	pub locale: Locale,
	/// Particle overlay appearance.
	pub particles: ParticleStyle,
	/// Scroll reveal threshold and margin.
	pub reveal: RevealConfig,
	/// Counter timing.
	pub counter: CounterConfig,
	/// Form timing and copy.
	pub form: FormConfig,
	/// Log at `debug` instead of `info`.
	pub debug: bool,
}

impl FxConfig {
	/// Parse a configuration document.
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	/// Form copy: explicit overrides win over the locale's set.
	pub fn form_messages(&self) -> FormMessages {
		self.form
			.messages
			.clone()
			.unwrap_or_else(|| self.locale.form_messages())
	}
}

/// Read the configuration from `document`. Missing or invalid JSON yields the
/// defaults; invalid JSON is logged.
pub fn load_config(document: &Document) -> FxConfig {
	let Some(script) = document
		.get_element_by_id(CONFIG_ELEMENT_ID)
		.and_then(|el| el.dyn_into::<HtmlScriptElement>().ok())
	else {
		return FxConfig::default();
	};
	let Ok(json) = script.text() else {
		return FxConfig::default();
	};

	match FxConfig::from_json(&json) {
		Ok(config) => {
			info!("site-fx: loaded configuration from #{CONFIG_ELEMENT_ID}");
			config
		}
		Err(e) => {
			warn!("site-fx: ignoring configuration: {e}");
			FxConfig::default()
		}
	}
}
