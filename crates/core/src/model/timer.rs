use crate::model::input::InputError;

/// Per-question pace target for the timer pill, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerThreshold(u64);

/// How the elapsed time compares to the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerIndicator {
    OnPace,
    Warning,
    Overdue,
}

impl TimerThreshold {
    pub const DEFAULT_MILLIS: u64 = 120_000;

    /// `None` for zero.
    #[must_use]
    pub fn from_millis(millis: u64) -> Option<Self> {
        (millis > 0).then_some(Self(millis))
    }

    #[must_use]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Parse threshold input in `m`, `mm`, `mm:ss` or `mmss` form.
    ///
    /// Empty parts count as zero.
    ///
    /// # Errors
    ///
    /// Returns `InputError::InvalidThreshold` for non-digit input or a zero duration.
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let invalid = || InputError::InvalidThreshold {
            raw: raw.to_string(),
        };
        let trimmed = raw.trim();

        let (minutes, seconds) = match trimmed.split_once(':') {
            Some(parts) => parts,
            None if trimmed.len() > 2 && trimmed.is_char_boundary(2) => trimmed.split_at(2),
            None => (trimmed, ""),
        };

        let part = |text: &str| -> Result<u64, InputError> {
            if text.is_empty() {
                return Ok(0);
            }
            if !text.chars().all(|ch| ch.is_ascii_digit()) {
                return Err(invalid());
            }
            text.parse::<u64>().map_err(|_| invalid())
        };

        let minutes = part(minutes)?;
        let seconds = part(seconds)?;

        minutes
            .checked_mul(60)
            .and_then(|secs| secs.checked_add(seconds))
            .and_then(|secs| secs.checked_mul(1000))
            .and_then(Self::from_millis)
            .ok_or_else(invalid)
    }

    /// Zero-padded `mm:ss` rendering of the threshold.
    #[must_use]
    pub fn format_mm_ss(self) -> String {
        let total_secs = self.0 / 1000;
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }

    /// Classify an elapsed duration: under the threshold is on pace, up to
    /// 25% over is a warning, anything beyond is overdue.
    #[must_use]
    pub fn indicator(self, elapsed_millis: u64) -> TimerIndicator {
        if elapsed_millis < self.0 {
            TimerIndicator::OnPace
        } else if u128::from(elapsed_millis) * 4 < u128::from(self.0) * 5 {
            TimerIndicator::Warning
        } else {
            TimerIndicator::Overdue
        }
    }

    /// The pill pulses once the threshold is exceeded.
    #[must_use]
    pub fn pulses(self, elapsed_millis: u64) -> bool {
        elapsed_millis > self.0
    }
}

impl Default for TimerThreshold {
    fn default() -> Self {
        Self(Self::DEFAULT_MILLIS)
    }
}

/// Stopwatch rendering: `mm:ss.cc` with centiseconds.
#[must_use]
pub fn format_stopwatch(elapsed_millis: u64) -> String {
    let total_secs = elapsed_millis / 1000;
    let centis = (elapsed_millis % 1000) / 10;
    format!("{:02}:{:02}.{:02}", total_secs / 60, total_secs % 60, centis)
}
