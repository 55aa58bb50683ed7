//! Responsible-gaming predicates.
//!
//! Pure functions over timestamps and caps; the engine feeds them values read
//! inside its transaction and the current wall clock.

use chrono::Duration;
use serde::Serialize;

use crate::types::Timestamp;

/// A guardrail that blocks play right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinBlock {
    SelfExcluded { until: Timestamp },
    CooldownActive { until: Timestamp },
}

/// Self-exclusion is checked before cooldown.
pub fn check_spin_allowed(
    self_excluded_until: Option<Timestamp>,
    cooldown_until: Option<Timestamp>,
    now: Timestamp,
) -> Result<(), SpinBlock> {
    if let Some(until) = self_excluded_until.filter(|t| *t > now) {
        return Err(SpinBlock::SelfExcluded { until });
    }
    if let Some(until) = cooldown_until.filter(|t| *t > now) {
        return Err(SpinBlock::CooldownActive { until });
    }
    Ok(())
}

/// Trailing windows for charge caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeWindow {
    Daily,
    Weekly,
    Monthly,
}

impl ChargeWindow {
    pub const ALL: [ChargeWindow; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    pub fn days(self) -> i64 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 7,
            Self::Monthly => 30,
        }
    }

    /// Start of the window ending at `now`.
    pub fn since(self, now: Timestamp) -> Timestamp {
        now - Duration::days(self.days())
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }
}

/// A cap of `None` is unlimited. Zero or negative caps mean "unset".
pub fn normalize_cap(cap: Option<i64>) -> Option<i64> {
    cap.filter(|c| *c > 0)
}

/// Whether adding `incoming` points to `already_charged` stays within `cap`.
pub fn within_cap(cap: Option<i64>, already_charged: i64, incoming: i64) -> bool {
    match cap {
        None => true,
        Some(cap) => already_charged.saturating_add(incoming) <= cap,
    }
}

/// Validate a cooldown request and return the resulting expiry.
///
/// `0` requests no new cooldown. An already-running cooldown that ends later
/// than the requested one is kept, so a cooldown can be extended but never
/// cut short.
pub fn next_cooldown(
    current: Option<Timestamp>,
    minutes: Option<i64>,
    now: Timestamp,
) -> Result<Option<Timestamp>, String> {
    let requested = match minutes {
        None | Some(0) => None,
        Some(m) if m < 0 => return Err("cooldownMinutes must be >= 0".into()),
        Some(m) => Some(now + Duration::minutes(m)),
    };
    let active = current.filter(|t| *t > now);
    Ok(later_of(active, requested))
}

/// Expiry for a self-exclusion of `days` days. Never shortens an active one.
pub fn next_self_exclusion(
    current: Option<Timestamp>,
    days: i64,
    now: Timestamp,
) -> Result<Timestamp, String> {
    if days <= 0 {
        return Err("days must be > 0".into());
    }
    let requested = now + Duration::days(days);
    Ok(later_of(current.filter(|t| *t > now), Some(requested)).unwrap_or(requested))
}

fn later_of(a: Option<Timestamp>, b: Option<Timestamp>) -> Option<Timestamp> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn future_self_exclusion_blocks() {
        let until = t0() + Duration::days(3);
        assert_eq!(
            check_spin_allowed(Some(until), None, t0()),
            Err(SpinBlock::SelfExcluded { until })
        );
    }

    #[test]
    fn elapsed_guardrails_allow() {
        let past = t0() - Duration::seconds(1);
        assert_eq!(check_spin_allowed(Some(past), Some(past), t0()), Ok(()));
        assert_eq!(check_spin_allowed(None, None, t0()), Ok(()));
    }

    #[test]
    fn expiry_equal_to_now_has_elapsed() {
        assert_eq!(check_spin_allowed(Some(t0()), Some(t0()), t0()), Ok(()));
    }

    #[test]
    fn self_exclusion_reported_before_cooldown() {
        let a = t0() + Duration::days(1);
        let b = t0() + Duration::minutes(5);
        assert!(matches!(
            check_spin_allowed(Some(a), Some(b), t0()),
            Err(SpinBlock::SelfExcluded { .. })
        ));
        assert_eq!(
            check_spin_allowed(None, Some(b), t0()),
            Err(SpinBlock::CooldownActive { until: b })
        );
    }

    #[test]
    fn caps_normalize_non_positive_to_unset() {
        assert_eq!(normalize_cap(Some(0)), None);
        assert_eq!(normalize_cap(Some(-5)), None);
        assert_eq!(normalize_cap(None), None);
        assert_eq!(normalize_cap(Some(10_000)), Some(10_000));
    }

    #[test]
    fn cap_is_inclusive() {
        assert!(within_cap(Some(100), 60, 40));
        assert!(!within_cap(Some(100), 60, 41));
        assert!(within_cap(None, i64::MAX, 1));
    }

    #[test]
    fn window_starts() {
        assert_eq!(ChargeWindow::Weekly.since(t0()), t0() - Duration::days(7));
        assert_eq!(ChargeWindow::Monthly.days(), 30);
    }

    #[test]
    fn cooldown_zero_clears_only_when_nothing_active() {
        assert_eq!(next_cooldown(None, Some(0), t0()), Ok(None));
        let expired = t0() - Duration::minutes(1);
        assert_eq!(next_cooldown(Some(expired), None, t0()), Ok(None));
    }

    #[test]
    fn cooldown_cannot_be_shortened() {
        let active = t0() + Duration::minutes(60);
        assert_eq!(next_cooldown(Some(active), Some(0), t0()), Ok(Some(active)));
        assert_eq!(next_cooldown(Some(active), Some(10), t0()), Ok(Some(active)));
        assert_eq!(
            next_cooldown(Some(active), Some(120), t0()),
            Ok(Some(t0() + Duration::minutes(120)))
        );
    }

    #[test]
    fn negative_cooldown_rejected() {
        assert!(next_cooldown(None, Some(-1), t0()).is_err());
    }

    #[test]
    fn self_exclusion_requires_positive_days_and_never_shortens() {
        assert!(next_self_exclusion(None, 0, t0()).is_err());
        assert_eq!(
            next_self_exclusion(None, 7, t0()),
            Ok(t0() + Duration::days(7))
        );
        let long = t0() + Duration::days(90);
        assert_eq!(next_self_exclusion(Some(long), 7, t0()), Ok(long));
    }
}
