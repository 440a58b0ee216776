//! Booking code and queue number generation
//!
//! Both formats are part of the external contract (printed on tickets,
//! searched by staff): booking codes are `PREFIX-IN-YYYYMM-NNNNNN` with a
//! six-digit sequence scoped to the year-month, queue numbers are
//! `PREFIX-NNN` with a three-digit sequence that resets daily.

use chrono::{Datelike, NaiveDate};

/// Period prefix for booking codes, e.g. "SOC-IN-202608-"
pub fn period_prefix(code_prefix: &str, date: NaiveDate) -> String {
    format!("{}-IN-{}{:02}-", code_prefix, date.year(), date.month())
}

/// Next booking code for a period, given the highest existing code.
///
/// The trailing sequence is parsed from the last code; an unparseable or
/// missing tail restarts the period at 1.
pub fn next_booking_code(period_prefix: &str, last_code: Option<&str>) -> String {
    let mut next_seq: u64 = 1;
    if let Some(code) = last_code {
        if let Some(tail) = code.rsplit('-').next() {
            if let Ok(seq) = tail.parse::<u64>() {
                next_seq = seq + 1;
            }
        }
    }
    format!("{}{:06}", period_prefix, next_seq)
}

/// Queue number from the count of drivers already verified today
pub fn queue_number(code_prefix: &str, verified_today: i64) -> String {
    format!("{}-{:03}", code_prefix, verified_today + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_prefix_zero_pads_month() {
        assert_eq!(period_prefix("SOC", date(2026, 8, 29)), "SOC-IN-202608-");
        assert_eq!(period_prefix("SOC", date(2026, 12, 1)), "SOC-IN-202612-");
    }

    #[test]
    fn test_first_code_of_period() {
        assert_eq!(
            next_booking_code("SOC-IN-202608-", None),
            "SOC-IN-202608-000001"
        );
    }

    #[test]
    fn test_codes_increase_within_period() {
        let first = next_booking_code("SOC-IN-202608-", None);
        let second = next_booking_code("SOC-IN-202608-", Some(&first));
        let third = next_booking_code("SOC-IN-202608-", Some(&second));
        assert_eq!(second, "SOC-IN-202608-000002");
        assert_eq!(third, "SOC-IN-202608-000003");
        assert!(first < second && second < third);
    }

    #[test]
    fn test_sequence_resets_across_periods() {
        let august = next_booking_code("SOC-IN-202608-", Some("SOC-IN-202608-000042"));
        assert_eq!(august, "SOC-IN-202608-000043");
        // September has no codes yet, so its sequence starts over
        let september = next_booking_code("SOC-IN-202609-", None);
        assert_eq!(september, "SOC-IN-202609-000001");
    }

    #[test]
    fn test_garbage_tail_restarts_at_one() {
        assert_eq!(
            next_booking_code("SOC-IN-202608-", Some("SOC-IN-202608-oops")),
            "SOC-IN-202608-000001"
        );
    }

    #[test]
    fn test_queue_numbers_start_at_one() {
        assert_eq!(queue_number("SOC", 0), "SOC-001");
        assert_eq!(queue_number("SOC", 1), "SOC-002");
        assert_eq!(queue_number("SOC", 99), "SOC-100");
    }
}
