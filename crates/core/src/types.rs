use chrono::{SecondsFormat, SubsecRound, Utc};

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Current time truncated to the microsecond precision of `TIMESTAMPTZ`.
///
/// Values signed before insert must survive the database round trip
/// unchanged, so anything that feeds a signature goes through here.
pub fn now_micros() -> Timestamp {
    Utc::now().trunc_subsecs(6)
}

/// RFC 3339 rendering with fixed microsecond precision and a `Z` suffix.
pub fn to_rfc3339(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rfc3339_uses_micros_and_z() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(to_rfc3339(&ts), "2026-03-01T12:30:00.000000Z");
    }

    #[test]
    fn now_micros_has_no_nanosecond_remainder() {
        let ts = now_micros();
        assert_eq!(ts.timestamp_subsec_nanos() % 1_000, 0);
    }
}
