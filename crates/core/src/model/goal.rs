use std::num::NonZeroU32;

use crate::model::input::InputError;

/// Number of questions the user wants to complete per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DailyGoal(NonZeroU32);

impl DailyGoal {
    pub const DEFAULT: u32 = 10;

    #[must_use]
    pub fn new(goal: NonZeroU32) -> Self {
        Self(goal)
    }

    /// `None` for zero.
    #[must_use]
    pub fn from_u32(goal: u32) -> Option<Self> {
        NonZeroU32::new(goal).map(Self)
    }

    /// Validate free-text input from the goal editor.
    ///
    /// # Errors
    ///
    /// Returns `InputError::InvalidGoal` for non-numeric, zero or negative text.
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        raw.trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::from_u32)
            .ok_or_else(|| InputError::InvalidGoal {
                raw: raw.to_string(),
            })
    }

    /// Rehydrate a persisted integer; anything non-positive or too large is rejected.
    #[must_use]
    pub fn from_persisted(value: i64) -> Option<Self> {
        u32::try_from(value).ok().and_then(Self::from_u32)
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Completion percentage for `done` questions, rounded and capped at 100.
    #[must_use]
    pub fn progress_percent(self, done: u32) -> u8 {
        let percent = (f64::from(done) / f64::from(self.get()) * 100.0).round();
        // Capped at 100, so the cast cannot truncate.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let capped = percent.min(100.0) as u8;
        capped
    }

    #[must_use]
    pub fn is_met(self, done: u32) -> bool {
        done >= self.get()
    }
}

impl Default for DailyGoal {
    fn default() -> Self {
        Self(NonZeroU32::new(Self::DEFAULT).unwrap_or(NonZeroU32::MIN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_goal_is_ten() {
        assert_eq!(DailyGoal::default().get(), 10);
    }

    #[test]
    fn parse_accepts_positive_numbers() {
        assert_eq!(DailyGoal::parse(" 25 ").unwrap().get(), 25);
    }

    #[test]
    fn parse_rejects_invalid_input() {
        for raw in ["", "abc", "0", "-3", "2.5"] {
            let err = DailyGoal::parse(raw).unwrap_err();
            assert!(matches!(err, InputError::InvalidGoal { .. }), "{raw}");
        }
    }

    #[test]
    fn persisted_values_must_be_positive() {
        assert_eq!(DailyGoal::from_persisted(15).map(DailyGoal::get), Some(15));
        assert_eq!(DailyGoal::from_persisted(0), None);
        assert_eq!(DailyGoal::from_persisted(-4), None);
    }

    #[test]
    fn progress_is_rounded_and_capped() {
        let goal = DailyGoal::from_u32(3).unwrap();
        assert_eq!(goal.progress_percent(0), 0);
        assert_eq!(goal.progress_percent(1), 33);
        assert_eq!(goal.progress_percent(2), 67);
        assert_eq!(goal.progress_percent(7), 100);
        assert!(goal.is_met(3));
        assert!(!goal.is_met(2));
    }
}
