//! Before/after bonus delta for offer comparisons.
//!
//! The delta is presentational only. An offer's status tag comes from the
//! research pipeline and is never recomputed from these numbers.

/// Change between the current and newly discovered bonus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonusDelta {
    /// `new - current`.
    pub diff: f64,
    /// Whole-number percentage change relative to `current`, or 0 when
    /// `current <= 0`.
    pub percent: i64,
}

impl BonusDelta {
    /// Both inputs are expected to be coerced already (finite).
    pub fn between(current: f64, new: f64) -> Self {
        let diff = new - current;
        let percent = if current > 0.0 {
            (diff / current * 100.0).round() as i64
        } else {
            0
        };
        Self { diff, percent }
    }

    /// Sign-prefixed label such as `+50%` or `-20%`; `None` when nothing changed.
    pub fn label(&self) -> Option<String> {
        if self.diff == 0.0 {
            return None;
        }
        let sign = if self.diff > 0.0 { "+" } else { "" };
        Some(format!("{sign}{}%", self.percent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifty_percent_increase() {
        let d = BonusDelta::between(100.0, 150.0);
        assert_eq!(d.diff, 50.0);
        assert_eq!(d.percent, 50);
        assert_eq!(d.percent.to_string(), "50");
        assert_eq!(d.label().as_deref(), Some("+50%"));
    }

    #[test]
    fn decrease_is_negative() {
        let d = BonusDelta::between(500.0, 400.0);
        assert_eq!(d.diff, -100.0);
        assert_eq!(d.percent, -20);
        assert_eq!(d.label().as_deref(), Some("-20%"));
    }

    #[test]
    fn zero_baseline_is_guarded() {
        let d = BonusDelta::between(0.0, 50.0);
        assert_eq!(d.diff, 50.0);
        assert_eq!(d.percent, 0);
        assert_eq!(d.label().as_deref(), Some("+0%"));
    }

    #[test]
    fn negative_baseline_is_guarded() {
        assert_eq!(BonusDelta::between(-10.0, 50.0).percent, 0);
    }

    #[test]
    fn unchanged_has_no_label() {
        let d = BonusDelta::between(250.0, 250.0);
        assert_eq!(d.percent, 0);
        assert!(d.label().is_none());
    }

    #[test]
    fn rounds_half_away_from_zero() {
        // 1/8 = 12.5%
        assert_eq!(BonusDelta::between(8.0, 9.0).percent, 13);
        assert_eq!(BonusDelta::between(8.0, 7.0).percent, -13);
        // 1/3 = 33.33%
        assert_eq!(BonusDelta::between(300.0, 400.0).percent, 33);
    }
}
