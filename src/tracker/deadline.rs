use chrono::{Local, NaiveDate};
use std::fmt;

/// Deadlines at most this many days away count as urgent
pub const URGENT_WINDOW_DAYS: i64 = 3;

/// The local calendar day
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whole calendar days from `today` to `deadline`, negative when past
pub fn days_until(deadline: NaiveDate, today: NaiveDate) -> i64 {
    (deadline - today).num_days()
}

/// Deadline proximity of a single job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DDay {
    NoDeadline,
    Today,
    /// Days left, always at least 1
    Remaining(i64),
    /// Days elapsed since the deadline, always at least 1
    Closed(i64),
}

impl DDay {
    pub fn classify(deadline: Option<NaiveDate>, today: NaiveDate) -> Self {
        let Some(deadline) = deadline else {
            return DDay::NoDeadline;
        };
        match days_until(deadline, today) {
            0 => DDay::Today,
            n if n > 0 => DDay::Remaining(n),
            n => DDay::Closed(-n),
        }
    }

    /// Remaining count within `0..=URGENT_WINDOW_DAYS`. Past-due is not urgent.
    pub fn is_urgent(&self) -> bool {
        match self {
            DDay::Today => true,
            DDay::Remaining(n) => *n <= URGENT_WINDOW_DAYS,
            DDay::NoDeadline | DDay::Closed(_) => false,
        }
    }
}

impl fmt::Display for DDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DDay::NoDeadline => f.write_str("-"),
            DDay::Today => f.write_str("D-Day"),
            DDay::Remaining(n) => write!(f, "D-{}", n),
            DDay::Closed(n) => write!(f, "마감 (D-{})", n),
        }
    }
}

/// D-day label for an optional deadline
pub fn dday(deadline: Option<NaiveDate>, today: NaiveDate) -> String {
    DDay::classify(deadline, today).to_string()
}

/// True when a deadline exists and falls within the urgent window
pub fn is_urgent(deadline: Option<NaiveDate>, today: NaiveDate) -> bool {
    DDay::classify(deadline, today).is_urgent()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    #[test]
    fn missing_deadline_is_a_dash() {
        assert_eq!(dday(None, today()), "-");
        assert!(!is_urgent(None, today()));
    }

    #[test]
    fn same_day_is_d_day() {
        assert_eq!(dday(Some(today()), today()), "D-Day");
        assert!(is_urgent(Some(today()), today()));
    }

    #[test]
    fn future_dates_count_down() {
        for k in 1..=40 {
            let deadline = today() + Duration::days(k);
            assert_eq!(dday(Some(deadline), today()), format!("D-{}", k));
        }
    }

    #[test]
    fn past_dates_are_closed_with_negative_offset() {
        for k in 1..=40 {
            let deadline = today() - Duration::days(k);
            assert_eq!(dday(Some(deadline), today()), format!("마감 (D-{})", k));
        }
    }

    #[test]
    fn urgency_covers_zero_through_three_days() {
        for k in 0..=3 {
            assert!(is_urgent(Some(today() + Duration::days(k)), today()), "D-{}", k);
        }
        assert!(!is_urgent(Some(today() + Duration::days(4)), today()));
        assert!(!is_urgent(Some(today() - Duration::days(1)), today()));
    }

    #[test]
    fn month_and_year_boundaries_use_calendar_days() {
        let new_years_eve = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        let next_day = NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
        assert_eq!(dday(Some(next_day), new_years_eve), "D-1");
        assert_eq!(dday(Some(new_years_eve), next_day), "마감 (D-1)");

        let leap = NaiveDate::from_ymd_opt(2028, 2, 28).unwrap();
        let march = NaiveDate::from_ymd_opt(2028, 3, 1).unwrap();
        assert_eq!(dday(Some(march), leap), "D-2");
    }
}
