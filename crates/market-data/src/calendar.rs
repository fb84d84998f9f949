//! Weekday calendar helpers.
//!
//! Daily series skip weekends. Exchange holidays are not modelled.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Returns true for Saturday and Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Next weekday strictly after `date`.
pub fn next_trading_day(date: NaiveDate) -> NaiveDate {
    let mut next = date + Duration::days(1);
    while is_weekend(next) {
        next += Duration::days(1);
    }
    next
}

/// `date` itself when it is a weekday, otherwise the following Monday.
pub fn roll_forward(date: NaiveDate) -> NaiveDate {
    let mut current = date;
    while is_weekend(current) {
        current += Duration::days(1);
    }
    current
}

/// `count` consecutive weekdays starting at `start` (rolled forward if needed).
pub fn trading_days_from(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(count);
    if count == 0 {
        return days;
    }
    let mut current = roll_forward(start);
    days.push(current);
    while days.len() < count {
        current = next_trading_day(current);
        days.push(current);
    }
    days
}

/// `count` consecutive weekdays ending on or before `end`, in ascending order.
pub fn trading_days_until(end: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(count);
    let mut current = end;
    while days.len() < count {
        if !is_weekend(current) {
            days.push(current);
        }
        current -= Duration::days(1);
    }
    days.reverse();
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_next_trading_day_skips_weekend() {
        // Friday -> Monday
        assert_eq!(next_trading_day(date(2024, 3, 8)), date(2024, 3, 11));
        // Tuesday -> Wednesday
        assert_eq!(next_trading_day(date(2024, 3, 5)), date(2024, 3, 6));
    }

    #[test]
    fn test_trading_days_from_rolls_saturday() {
        let days = trading_days_from(date(2024, 3, 9), 3);
        assert_eq!(days, vec![date(2024, 3, 11), date(2024, 3, 12), date(2024, 3, 13)]);
    }

    #[test]
    fn test_trading_days_until_is_ascending() {
        let days = trading_days_until(date(2024, 3, 11), 3);
        assert_eq!(days, vec![date(2024, 3, 7), date(2024, 3, 8), date(2024, 3, 11)]);
        assert!(days.iter().all(|d| !is_weekend(*d)));
    }

    #[test]
    fn test_zero_count() {
        assert!(trading_days_from(date(2024, 3, 9), 0).is_empty());
        assert!(trading_days_until(date(2024, 3, 9), 0).is_empty());
    }
}
