use std::time::Duration;

/// Default period of the progress save loop.
pub const DEFAULT_SAVE_INTERVAL: Duration = Duration::from_secs(10);

/// Default minimum change, in percentage points, before progress is saved again.
pub const DEFAULT_SAVE_THRESHOLD: f64 = 5.0;

/// Tuning knobs for upstream progress reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSettings {
    save_interval: Duration,
    save_threshold: f64,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            save_interval: DEFAULT_SAVE_INTERVAL,
            save_threshold: DEFAULT_SAVE_THRESHOLD,
        }
    }
}

impl ProgressSettings {
    /// Zero intervals and negative or non-finite thresholds fall back to the defaults.
    #[must_use]
    pub fn new(save_interval: Duration, save_threshold: f64) -> Self {
        let defaults = Self::default();
        Self {
            save_interval: if save_interval.is_zero() {
                defaults.save_interval
            } else {
                save_interval
            },
            save_threshold: if save_threshold.is_finite() && save_threshold >= 0.0 {
                save_threshold
            } else {
                defaults.save_threshold
            },
        }
    }

    #[must_use]
    pub fn save_interval(&self) -> Duration {
        self.save_interval
    }

    #[must_use]
    pub fn save_threshold(&self) -> f64 {
        self.save_threshold
    }

    /// A save is due only when progress moved strictly more than the threshold.
    #[must_use]
    pub fn should_save(&self, current: f64, last_saved: f64) -> bool {
        (current - last_saved).abs() > self.save_threshold
    }
}

/// Position reported by the video surface on a time update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaybackSample {
    /// Seconds into the video.
    pub current_time: f64,
    /// Total length in seconds; zero or NaN until metadata has loaded.
    pub duration: f64,
}

impl PlaybackSample {
    #[must_use]
    pub fn new(current_time: f64, duration: f64) -> Self {
        Self {
            current_time,
            duration,
        }
    }

    /// `current_time / duration * 100`, or 0 while the duration is unknown.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if !self.duration.is_finite() || self.duration <= 0.0 || !self.current_time.is_finite() {
            return 0.0;
        }
        self.current_time / self.duration * 100.0
    }

    /// Percentage rounded to an integer in 0..=100, as sent upstream.
    #[must_use]
    pub fn whole_percentage(&self) -> u32 {
        to_whole_percentage(self.percentage())
    }
}

/// Round and clamp a percentage to the 0..=100 integer range.
#[must_use]
pub fn to_whole_percentage(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = value.round().clamp(0.0, 100.0) as u32;
    whole
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_strict() {
        let settings = ProgressSettings::default();
        assert!(!settings.should_save(5.0, 0.0));
        assert!(settings.should_save(5.0001, 0.0));
        assert!(!settings.should_save(42.0, 40.0));
        assert!(settings.should_save(30.0, 40.0));
    }

    #[test]
    fn custom_threshold_is_respected() {
        let settings = ProgressSettings::new(Duration::from_secs(3), 1.0);
        assert_eq!(settings.save_interval(), Duration::from_secs(3));
        assert!(settings.should_save(1.5, 0.0));
    }

    #[test]
    fn invalid_settings_fall_back_to_defaults() {
        let settings = ProgressSettings::new(Duration::ZERO, f64::NAN);
        assert_eq!(settings, ProgressSettings::default());
        let settings = ProgressSettings::new(Duration::from_secs(1), -2.0);
        assert!((settings.save_threshold() - DEFAULT_SAVE_THRESHOLD).abs() < f64::EPSILON);
    }

    #[test]
    fn percentage_is_time_over_duration() {
        let sample = PlaybackSample::new(30.0, 120.0);
        assert!((sample.percentage() - 25.0).abs() < f64::EPSILON);
        assert_eq!(sample.whole_percentage(), 25);
    }

    #[test]
    fn unknown_duration_reads_as_zero() {
        assert!(PlaybackSample::new(10.0, 0.0).percentage().abs() < f64::EPSILON);
        assert!(PlaybackSample::new(10.0, f64::NAN).percentage().abs() < f64::EPSILON);
    }

    #[test]
    fn whole_percentage_clamps() {
        assert_eq!(to_whole_percentage(150.2), 100);
        assert_eq!(to_whole_percentage(-3.0), 0);
        assert_eq!(to_whole_percentage(66.6), 67);
    }
}
