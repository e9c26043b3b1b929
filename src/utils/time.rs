use chrono::{DateTime, Months, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Same wall-clock instant `months` calendar months earlier, with the day
/// clamped to the end of shorter months (Aug 31 minus 6 months is Feb 28/29).
pub fn months_before(at: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    at.checked_sub_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Short month label, e.g. `Jan 24`.
pub fn month_label(at: DateTime<Utc>) -> String {
    at.format("%b %y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn months_before_clamps_day() {
        let at = Utc.with_ymd_and_hms(2024, 8, 31, 10, 0, 0).unwrap();
        assert_eq!(
            months_before(at, 6),
            Utc.with_ymd_and_hms(2024, 2, 29, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn month_label_uses_two_digit_year() {
        let at = Utc.with_ymd_and_hms(2025, 12, 3, 0, 0, 0).unwrap();
        assert_eq!(month_label(at), "Dec 25");
    }
}
