//! Stylesheet injected once at mount for the decorations and focus ring.

/// Keyframes referenced by decorations and the `magic-reveal` class.
pub const EFFECT_KEYFRAMES: &str = r#"
@keyframes dataFlow {
	0% { transform: translateY(-100px); opacity: 0; }
	50% { opacity: 1; }
	100% { transform: translateY(100vh); opacity: 0; }
}

@keyframes burstOut {
	0% { transform: scale(0) rotate(var(--angle)); opacity: 1; }
	100% { transform: scale(4) rotate(calc(var(--angle) + 180deg)) translateX(50px); opacity: 0; }
}

@keyframes magicTrail {
	0% { transform: scale(0); opacity: 1; }
	50% { transform: scale(1); opacity: 0.8; }
	100% { transform: scale(0) translateY(-20px); opacity: 0; }
}

@keyframes inputMagic {
	0% { transform: translateY(0); opacity: 1; }
	100% { transform: translateY(-30px); opacity: 0; }
}

@keyframes buttonRipple {
	0% { transform: scale(1); opacity: 0.6; }
	100% { transform: scale(20); opacity: 0; }
}

.magic-reveal {
	animation: magicReveal 1s ease-out forwards;
}

@keyframes magicReveal {
	0% { opacity: 0; transform: translateY(50px) rotateX(15deg); }
	100% { opacity: 1; transform: translateY(0) rotateX(0); }
}
"#;

/// Outline shown only while `body.keyboard-nav` is set.
pub const FOCUS_RING: &str = r#"
.keyboard-nav *:focus {
	outline: 3px solid var(--color-primary) !important;
	outline-offset: 2px !important;
}
"#;

/// Every rule the page needs, as one stylesheet.
pub fn stylesheet() -> String {
	[EFFECT_KEYFRAMES, FOCUS_RING].concat()
}
