use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::America::Caracas;
use chrono_tz::Tz;

/// Isolates all time sources behind one capability, per the DESIGN NOTES'
/// "Today" and timezone guidance — the engine never calls `Utc::now()`
/// directly, so tests can swap in a fixed instant.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;

    fn local_today(&self, timezone: Tz) -> NaiveDate {
        self.now_utc().with_timezone(&timezone).date_naive()
    }

    /// "Today" for exchange-rate freshness (§6): the emitter's local civil
    /// timezone, `America/Caracas`.
    fn rate_today(&self) -> NaiveDate {
        self.local_today(Caracas)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test/batch double: always reports a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rate_today_uses_caracas_civil_date() {
        // 2025-03-02T02:00:00Z is still 2025-03-01 in UTC-4 Caracas.
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 3, 2, 2, 0, 0).unwrap());
        assert_eq!(clock.rate_today(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }
}
