use chrono::NaiveDate;

/// Whole days a milestone slipped past its nominal date
///
/// A reschedule date on or before the nominal date is stale data rather than
/// a pull-in, so it counts as no delay.
pub fn compute_delay(nominal: NaiveDate, reschedule: Option<NaiveDate>) -> i64 {
    match reschedule {
        Some(r) if r > nominal => (r - nominal).num_days(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_no_reschedule() {
        assert_eq!(compute_delay(date(2024, 12, 1), None), 0);
    }

    #[test]
    fn test_short_slip() {
        assert_eq!(compute_delay(date(2025, 1, 20), Some(date(2025, 1, 23))), 3);
    }

    #[test]
    fn test_slip_across_year_boundary() {
        assert_eq!(compute_delay(date(2024, 12, 15), Some(date(2025, 3, 1))), 76);
    }

    #[test]
    fn test_earlier_or_equal_reschedule_is_not_a_delay() {
        let nominal = date(2025, 5, 20);
        assert_eq!(compute_delay(nominal, Some(nominal)), 0);
        assert_eq!(compute_delay(nominal, Some(date(2025, 5, 1))), 0);
        assert_eq!(compute_delay(nominal, Some(date(2020, 1, 1))), 0);
    }

    #[test]
    fn test_later_reschedule_is_at_least_one_day() {
        let nominal = date(2025, 2, 28);
        for offset in 1..400 {
            let r = nominal + chrono::Duration::days(offset);
            let delay = compute_delay(nominal, Some(r));
            assert_eq!(delay, offset);
            assert!(delay >= 1);
        }
    }
}
