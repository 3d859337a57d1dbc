/// Temperature above which the alert output goes active, in °C.
pub const TEMPERATURE_THRESHOLD_C: f32 = 30.0;

/// Outcome of evaluating one message against the threshold.
///
/// `ParseError` is only ever produced by a malformed message, never by
/// [`evaluate`]; a missing temperature field reads as `Normal`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlertState {
    #[default]
    Normal,
    Exceeded,
    ParseError,
}

impl AlertState {
    /// Level the digital alert output should be driven to.
    pub fn is_active(self) -> bool {
        matches!(self, AlertState::Exceeded)
    }

    /// The user-facing alert line for this state.
    pub fn message(self) -> &'static str {
        match self {
            AlertState::Normal => "Alert: Temperature is normal.",
            AlertState::Exceeded => "Alert: Temperature threshold exceeded!",
            AlertState::ParseError => "Error parsing data!",
        }
    }
}

/// Compares a parsed temperature against [`TEMPERATURE_THRESHOLD_C`].
///
/// An absent temperature is treated as normal (fail-safe low), matching the
/// behavior of the deployed senders.
pub fn evaluate(temperature: Option<f32>) -> AlertState {
    match temperature {
        Some(value) if value > TEMPERATURE_THRESHOLD_C => AlertState::Exceeded,
        _ => AlertState::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn above_threshold_is_exceeded() {
        assert_eq!(evaluate(Some(30.1)), AlertState::Exceeded);
        assert_eq!(evaluate(Some(32.5)), AlertState::Exceeded);
    }

    #[test]
    fn at_or_below_threshold_is_normal() {
        assert_eq!(evaluate(Some(30.0)), AlertState::Normal);
        assert_eq!(evaluate(Some(-5.0)), AlertState::Normal);
    }

    #[test]
    fn absent_temperature_is_normal() {
        assert_eq!(evaluate(None), AlertState::Normal);
    }

    #[test]
    fn only_exceeded_drives_the_output_active() {
        assert!(AlertState::Exceeded.is_active());
        assert!(!AlertState::Normal.is_active());
        assert!(!AlertState::ParseError.is_active());
    }

    #[test]
    fn messages_match_the_display_wording() {
        assert_eq!(AlertState::Normal.message(), "Alert: Temperature is normal.");
        assert_eq!(
            AlertState::Exceeded.message(),
            "Alert: Temperature threshold exceeded!"
        );
        assert_eq!(AlertState::ParseError.message(), "Error parsing data!");
    }
}
