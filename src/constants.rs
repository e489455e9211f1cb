/// Default analog value below which an input is considered at rest
pub const DEFAULT_ANALOG_CUTOFF: f64 = 0.25;
/// Default gamepad sampling interval in milliseconds
pub const DEFAULT_POLLING_FREQUENCY_MS: u64 = 50;
/// Interval in milliseconds between continuous scroll nudges
pub const SCROLL_FREQUENCY_MS: u64 = 50;
/// Pixels scrolled per nudge at full deflection and a scroll factor of 1
pub const SCROLL_INPUT_MULTIPLIER: f64 = 50.0;
/// Range every scroll action clamps its scroll factor into
pub const SCROLL_FACTOR_MIN: f64 = 0.1;
pub const SCROLL_FACTOR_MAX: f64 = 2.5;
/// Maximum number of visible options when a select element is expanded
pub const SELECT_MAX_VISIBLE_OPTIONS: u32 = 15;
/// Haptic pulse emitted when a continuous action reaches a boundary
pub const BOUNDARY_VIBRATION_DURATION_MS: u64 = 250;
pub const BOUNDARY_VIBRATION_MAGNITUDE: f64 = 0.25;
