use chrono::{DateTime, Days, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

/// Look-back window for "new" counts and the review analytics trend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl Period {
    /// Unknown or absent values fall back to `Month`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("week") => Period::Week,
            Some("quarter") => Period::Quarter,
            Some("year") => Period::Year,
            _ => Period::Month,
        }
    }

    /// Midnight UTC of the first day inside the window ending at `now`.
    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive();
        let start = match self {
            Period::Week => today.checked_sub_days(Days::new(7)),
            Period::Month => today.checked_sub_months(Months::new(1)),
            Period::Quarter => today.checked_sub_months(Months::new(3)),
            Period::Year => today.checked_sub_months(Months::new(12)),
        }
        .unwrap_or(NaiveDate::MIN);
        Utc.from_utc_datetime(&start.and_time(NaiveTime::MIN))
    }
}
