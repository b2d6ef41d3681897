//! Field validation.
//!
//! Checks are pure: [`check`] reports what is wrong and [`FormMessages`]
//! turns that into user-facing text.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use url::Url;

static EMAIL: LazyLock<Result<Regex, regex::Error>> =
	LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));

/// What a field is expected to contain, from its `type` attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldKind {
	/// Free text.
	#[default]
	Text,
	/// `type="email"`.
	Email,
	/// `type="url"`.
	Url,
}

impl FieldKind {
	/// Kind for an `<input type>` value. Unknown types are plain text.
	pub fn from_input_type(input_type: &str) -> Self {
		match input_type.trim().to_ascii_lowercase().as_str() {
			"email" => Self::Email,
			"url" => Self::Url,
			_ => Self::Text,
		}
	}
}

/// Why a field value was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldError {
	/// Required field left blank.
	Required,
	/// Not a `local@domain.tld` address.
	InvalidEmail,
	/// Not a parseable absolute URL.
	InvalidUrl,
}

/// Outcome of validating one field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Validation {
	/// Whether the value passed.
	pub valid: bool,
	/// Message to show when invalid.
	pub message: Option<String>,
}

impl Validation {
	/// A passing result.
	pub fn ok() -> Self {
		Self {
			valid: true,
			message: None,
		}
	}
}

/// `local@domain.tld` shape.
pub fn is_email(value: &str) -> bool {
	EMAIL.as_ref().is_ok_and(|re| re.is_match(value))
}

/// Absolute URL with a scheme.
pub fn is_url(value: &str) -> bool {
	Url::parse(value).is_ok()
}

/// Validate the trimmed `value`. Format checks only apply to non-empty input.
pub fn check(value: &str, kind: FieldKind, required: bool) -> Result<(), FieldError> {
	let value = value.trim();
	if value.is_empty() {
		return if required {
			Err(FieldError::Required)
		} else {
			Ok(())
		};
	}
	match kind {
		FieldKind::Email if !is_email(value) => Err(FieldError::InvalidEmail),
		FieldKind::Url if !is_url(value) => Err(FieldError::InvalidUrl),
		_ => Ok(()),
	}
}

/// [`check`] with the failure rendered through `messages`.
pub fn validate(value: &str, kind: FieldKind, required: bool, messages: &FormMessages) -> Validation {
	match check(value, kind, required) {
		Ok(()) => Validation::ok(),
		Err(error) => Validation {
			valid: false,
			message: Some(messages.field_error(error).to_string()),
		},
	}
}

/// User-facing copy for the form flow.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FormMessages {
	/// Shown for an empty required field.
	pub required: String,
	/// Shown for a malformed email.
	pub invalid_email: String,
	/// Shown for a malformed URL.
	pub invalid_url: String,
	/// Banner shown when submission is blocked by invalid fields.
	pub check_fields: String,
	/// Button text while a submission is in flight.
	pub sending: String,
	/// Banner after a successful submission.
	pub success: String,
	/// Banner after a failed submission.
	pub failure: String,
}

impl Default for FormMessages {
	fn default() -> Self {
		Self::english()
	}
}

impl FormMessages {
	/// English copy.
	pub fn english() -> Self {
		Self {
			required: "This field is required".into(),
			invalid_email: "Please enter a valid email address".into(),
			invalid_url: "Please enter a valid URL (e.g. https://example.com)".into(),
			check_fields: "Please check the highlighted fields".into(),
			sending: "Sending...".into(),
			success: "Thank you for your message. We will reply within 24 hours.".into(),
			failure: "Sending failed. Please wait a moment and try again.".into(),
		}
	}

	/// Japanese copy.
	pub fn japanese() -> Self {
		Self {
			required: "この項目は必須です".into(),
			invalid_email: "有効なメールアドレスを入力してください".into(),
			invalid_url: "有効なURLを入力してください（例: https://example.com）".into(),
			check_fields: "入力内容をご確認ください".into(),
			sending: "送信中...".into(),
			success: "お問い合わせありがとうございます。24時間以内にご返信いたします。".into(),
			failure: "送信に失敗しました。しばらく待ってから再度お試しください。".into(),
		}
	}

	/// Message for a validation failure.
	pub fn field_error(&self, error: FieldError) -> &str {
		match error {
			FieldError::Required => &self.required,
			FieldError::InvalidEmail => &self.invalid_email,
			FieldError::InvalidUrl => &self.invalid_url,
		}
	}
}
