//! Contact form flow: inline validation, busy button, result banner.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};

use super::submit::{FormData, SubmitError, Submitter};
use super::validation::{FieldKind, FormMessages, Validation, validate};
use crate::host::{Decoration, Host, HostEvent, Placement, Target};
use crate::interactions::analytics::{Analytics, FORM_SUBMISSION};
use crate::scheduler::{CancellationToken, Timers};

const FIELD_SELECTOR: &str = "input, textarea";
const SUBMIT_SELECTOR: &str = "button[type=\"submit\"]";
const ERROR_BORDER: &str = "var(--color-error)";

/// Status banner flavor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerKind {
	/// Submission went through.
	Success,
	/// Validation or submission failed.
	Error,
}

impl BannerKind {
	fn class(self) -> &'static str {
		match self {
			Self::Success => "form-message form-message-success",
			Self::Error => "form-message form-message-error",
		}
	}

	fn background(self) -> &'static str {
		match self {
			Self::Success => "var(--color-accent)",
			Self::Error => "var(--color-error)",
		}
	}
}

/// Banner shown above the form after a submission attempt.
pub fn banner(kind: BannerKind, text: &str) -> Decoration {
	Decoration::div(kind.class())
		.text(text)
		.style("padding", "var(--space-4)")
		.style("border-radius", "var(--radius-md)")
		.style("margin-bottom", "var(--space-4)")
		.style("font-weight", "500")
		.style("background", kind.background())
		.style("color", "white")
}

/// Message placed after an invalid field.
pub fn inline_error(text: &str) -> Decoration {
	Decoration::div("error-message")
		.text(text)
		.style("color", ERROR_BORDER)
		.style("font-size", "var(--text-sm)")
		.style("margin-top", "var(--space-1)")
}

#[derive(Clone, Debug)]
struct Field<E> {
	element: E,
	name: Option<String>,
	kind: FieldKind,
	required: bool,
	/// Inline message currently shown for this field.
	error: RefCell<Option<E>>,
}

/// Where the form is in its submit cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Phase {
	/// No submission running.
	#[default]
	Idle,
	/// Waiting on the submitter. Holds the button text to restore.
	Sending { button_text: String },
}

/// Validation and submission for one `<form>`.
pub struct FormController<H: Host> {
	host: H,
	form: H::Element,
	fields: Vec<Field<H::Element>>,
	button: Option<H::Element>,
	messages: FormMessages,
	analytics: Analytics,
	submitter: Rc<dyn Submitter>,
	timers: Timers,
	banner_ms: f64,
	phase: Phase,
}

impl<H: Host + Clone + 'static> FormController<H> {
	/// Collect the fields and submit button of `form`.
	pub fn new(
		host: &H,
		form: H::Element,
		submitter: Rc<dyn Submitter>,
		timers: &Timers,
		messages: FormMessages,
		analytics: Analytics,
		banner_ms: f64,
	) -> Self {
		let fields = host
			.query_within(&form, FIELD_SELECTOR)
			.into_iter()
			.map(|element| Field {
				kind: host
					.attribute(&element, "type")
					.map(|t| FieldKind::from_input_type(&t))
					.unwrap_or_default(),
				required: host.attribute(&element, "required").is_some(),
				name: host.attribute(&element, "name"),
				error: RefCell::new(None),
				element,
			})
			.collect();
		let button = host.query_one_within(&form, SUBMIT_SELECTOR);
		Self {
			host: host.clone(),
			form,
			fields,
			button,
			messages,
			analytics,
			submitter,
			timers: timers.clone(),
			banner_ms,
			phase: Phase::Idle,
		}
	}

	/// Current submit phase.
	pub fn phase(&self) -> &Phase {
		&self.phase
	}

	/// Validate one field and update its inline message and border.
	pub fn validate_field(&self, element: &H::Element) -> Validation {
		let Some(field) = self.fields.iter().find(|f| &f.element == element) else {
			return Validation::ok();
		};
		let validation = validate(
			&self.host.value(&field.element),
			field.kind,
			field.required,
			&self.messages,
		);
		self.show_validation(field, &validation);
		validation
	}

	/// Validate every field. Each field's message is updated independently.
	pub fn validate_all(&self) -> bool {
		// Every field is visited so all messages are refreshed.
		self.fields
			.iter()
			.map(|f| self.validate_field(&f.element).valid)
			.fold(true, |all, valid| all && valid)
	}

	fn show_validation(&self, field: &Field<H::Element>, validation: &Validation) {
		if let Some(old) = field.error.borrow_mut().take() {
			self.host.remove(&old);
		}
		let border = if validation.valid { "" } else { ERROR_BORDER };
		self.host.set_style(&field.element, "border-color", border);

		if let Some(message) = validation.message.as_deref().filter(|_| !validation.valid) {
			let spawned = self
				.host
				.spawn(Placement::After(&field.element), &inline_error(message));
			*field.error.borrow_mut() = spawned;
		}
	}

	/// Replace any banner with a new one that expires after the banner timeout.
	pub fn show_banner(&self, kind: BannerKind, text: &str) -> Option<CancellationToken> {
		for old in self.host.query_all(".form-message") {
			self.host.remove(&old);
		}
		let el = self.host.spawn(Placement::Before(&self.form), &banner(kind, text))?;
		let h = self.host.clone();
		Some(self.timers.schedule(self.banner_ms, move || h.remove(&el)))
	}

	fn collect(&self) -> FormData {
		self.fields
			.iter()
			.filter_map(|f| {
				let name = f.name.clone().filter(|n| !n.is_empty())?;
				Some((name, self.host.value(&f.element).trim().to_string()))
			})
			.collect()
	}

	fn reset(&self) {
		for field in &self.fields {
			self.host.set_value(&field.element, "");
			self.show_validation(field, &Validation::ok());
		}
	}

	/// Enter the sending phase. `None` if a submission is already running
	/// or a field is invalid.
	fn begin(&mut self) -> Option<FormData> {
		self.analytics
			.track(FORM_SUBMISSION, vec![("form", "contact".to_string())]);
		if self.phase != Phase::Idle {
			debug!("site-fx: submission already in flight");
			return None;
		}
		if !self.validate_all() {
			self.show_banner(BannerKind::Error, &self.messages.check_fields);
			return None;
		}

		let button_text = match &self.button {
			Some(button) => {
				let text = self.host.text(button);
				self.host.set_text(button, &self.messages.sending);
				self.host.set_attribute(button, "disabled", "");
				text
			}
			None => String::new(),
		};
		self.phase = Phase::Sending { button_text };
		Some(self.collect())
	}

	fn finish(&mut self, outcome: Result<(), SubmitError>) {
		let Phase::Sending { button_text } = std::mem::take(&mut self.phase) else {
			return;
		};
		match outcome {
			Ok(()) => {
				self.show_banner(BannerKind::Success, &self.messages.success);
				self.reset();
			}
			Err(e) => {
				warn!("site-fx: form submission failed: {e}");
				self.show_banner(BannerKind::Error, &self.messages.failure);
			}
		}
		if let Some(button) = &self.button {
			self.host.set_text(button, &button_text);
			self.host.remove_attribute(button, "disabled");
		}
	}

	/// Validate and, if everything passes, hand the data to the submitter.
	pub fn submit(this: &Rc<RefCell<Self>>) {
		let (data, submitter) = {
			let mut ctrl = this.borrow_mut();
			let Some(data) = ctrl.begin() else {
				return;
			};
			(data, ctrl.submitter.clone())
		};
		let ctrl = this.clone();
		submitter.submit(
			data,
			Box::new(move |outcome: Result<(), SubmitError>| ctrl.borrow_mut().finish(outcome)),
		);
	}

	/// Register submit and per-field blur handlers.
	pub fn attach(this: &Rc<RefCell<Self>>) {
		let (host, form, fields) = {
			let ctrl = this.borrow();
			let fields: Vec<H::Element> = ctrl.fields.iter().map(|f| f.element.clone()).collect();
			(ctrl.host.clone(), ctrl.form.clone(), fields)
		};

		let ctrl = this.clone();
		host.listen(
			Target::Element(&form),
			"submit",
			Box::new(move |ev: &HostEvent| {
				ev.prevent_default();
				FormController::submit(&ctrl);
			}),
		);
		for field in fields {
			let (ctrl, el) = (this.clone(), field.clone());
			host.listen(
				Target::Element(&field),
				"blur",
				Box::new(move |_: &HostEvent| {
					ctrl.borrow().validate_field(&el);
				}),
			);
		}
	}
}
