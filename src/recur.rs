use chrono::{Datelike, Days, NaiveDate};

use crate::error::{Result, SchedError};

/// Wire format for all dates: 8 digits, `YYYYMMDD`.
pub const DATE_FMT: &str = "%Y%m%d";

/// Safety cap on the next-occurrence search; enough for a daily rule
/// spanning roughly 270 years.
const MAX_STEPS: usize = 100_000;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    // chrono would accept non-padded variants like "2024115"; the wire
    // format is fixed-width.
    if s.len() != 8 {
        return Err(SchedError::InvalidDate(s.to_string()));
    }
    NaiveDate::parse_from_str(s, DATE_FMT).map_err(|_| SchedError::InvalidDate(s.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

/// A parsed recurrence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// `"y"`: once a year.
    Yearly,
    /// `"d N"`: every N days, 1..=400.
    EveryDays(u32),
}

impl Repeat {
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let Some(kind) = parts.next() else {
            return Err(SchedError::EmptyRepeat);
        };
        match kind {
            "y" => {
                if parts.next().is_some() {
                    return Err(SchedError::UnsupportedRepeat(s.trim().to_string()));
                }
                Ok(Self::Yearly)
            }
            "d" => {
                let arg = parts
                    .next()
                    .ok_or_else(|| SchedError::BadInterval("missing day count".into()))?;
                if parts.next().is_some() {
                    return Err(SchedError::BadInterval("too many fields".into()));
                }
                let n: u32 = arg
                    .parse()
                    .map_err(|_| SchedError::BadInterval(format!("'{arg}' is not a number")))?;
                if n == 0 || n > 400 {
                    return Err(SchedError::BadInterval(format!("{n} is outside 1..=400")));
                }
                Ok(Self::EveryDays(n))
            }
            other => Err(SchedError::UnsupportedRepeat(other.to_string())),
        }
    }

    fn step(self, date: NaiveDate) -> Result<NaiveDate> {
        let next = match self {
            Self::Yearly => {
                let year = date.year() + 1;
                // Feb 29 rolls over to Mar 1 in non-leap years.
                NaiveDate::from_ymd_opt(year, date.month(), date.day())
                    .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
            }
            Self::EveryDays(n) => date.checked_add_days(Days::new(u64::from(n))),
        };
        next.ok_or_else(|| SchedError::Internal(format!("date out of range after {date}")))
    }
}

/// Compute the first occurrence strictly after `now`, starting from `start`
/// and stepping by `repeat`. Always advances at least one full period, even
/// when `start` already lies after `now`.
pub fn next_date(now: NaiveDate, start: &str, repeat: &str) -> Result<String> {
    if repeat.trim().is_empty() {
        return Err(SchedError::EmptyRepeat);
    }
    let start = parse_date(start)?;
    let rule = Repeat::parse(repeat)?;

    let mut date = start;
    for _ in 0..MAX_STEPS {
        date = rule.step(date)?;
        if date > now {
            return Ok(format_date(date));
        }
    }
    Err(SchedError::Internal(format!(
        "no occurrence within {MAX_STEPS} steps of {start}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn parse_yearly() {
        assert_eq!(Repeat::parse("y").unwrap(), Repeat::Yearly);
    }

    #[test]
    fn parse_daily_interval() {
        assert_eq!(Repeat::parse("d 7").unwrap(), Repeat::EveryDays(7));
        assert_eq!(Repeat::parse("d 1").unwrap(), Repeat::EveryDays(1));
        assert_eq!(Repeat::parse("d 400").unwrap(), Repeat::EveryDays(400));
    }

    #[test]
    fn rejects_bad_intervals() {
        assert!(matches!(Repeat::parse("d 0"), Err(SchedError::BadInterval(_))));
        assert!(matches!(Repeat::parse("d 401"), Err(SchedError::BadInterval(_))));
        assert!(matches!(Repeat::parse("d abc"), Err(SchedError::BadInterval(_))));
        assert!(matches!(Repeat::parse("d"), Err(SchedError::BadInterval(_))));
        assert!(matches!(Repeat::parse("d 3 4"), Err(SchedError::BadInterval(_))));
    }

    #[test]
    fn rejects_unknown_kinds() {
        assert!(matches!(Repeat::parse("w 1"), Err(SchedError::UnsupportedRepeat(_))));
        assert!(matches!(Repeat::parse("m 40"), Err(SchedError::UnsupportedRepeat(_))));
        assert!(matches!(Repeat::parse("y 1"), Err(SchedError::UnsupportedRepeat(_))));
    }

    #[test]
    fn empty_rule_fails() {
        assert!(matches!(
            next_date(date("20240115"), "20240110", ""),
            Err(SchedError::EmptyRepeat)
        ));
        assert!(matches!(
            next_date(date("20240115"), "20240110", "   "),
            Err(SchedError::EmptyRepeat)
        ));
    }

    #[test]
    fn bad_start_date_fails() {
        assert!(matches!(
            next_date(date("20240115"), "2024-01-10", "d 3"),
            Err(SchedError::InvalidDate(_))
        ));
        assert!(matches!(
            next_date(date("20240115"), "20240230", "d 3"),
            Err(SchedError::InvalidDate(_))
        ));
        // not fixed-width, even though chrono alone would take it
        assert!(matches!(
            next_date(date("20240115"), "2024115", "d 3"),
            Err(SchedError::InvalidDate(_))
        ));
    }

    #[test]
    fn daily_steps_to_first_date_after_now() {
        // 0110 -> 0113 -> 0116; 0116 is the first step past 0115
        assert_eq!(next_date(date("20240115"), "20240110", "d 3").unwrap(), "20240116");
    }

    #[test]
    fn landing_exactly_on_now_keeps_going() {
        // strictly after: a step that lands on `now` is not enough
        assert_eq!(next_date(date("20240108"), "20240101", "d 7").unwrap(), "20240115");
    }

    #[test]
    fn start_after_now_still_advances_one_period() {
        assert_eq!(next_date(date("20240115"), "20240201", "d 10").unwrap(), "20240211");
    }

    #[test]
    fn yearly_advances_past_now() {
        assert_eq!(next_date(date("20240115"), "20230301", "y").unwrap(), "20240301");
        assert_eq!(next_date(date("20260115"), "20230301", "y").unwrap(), "20260301");
    }

    #[test]
    fn yearly_from_leap_day_rolls_over() {
        assert_eq!(next_date(date("20240301"), "20240229", "y").unwrap(), "20250301");
        assert_eq!(next_date(date("20200601"), "20200229", "y").unwrap(), "20210301");
    }

    #[test]
    fn daily_spanning_a_year() {
        assert_eq!(next_date(date("20240115"), "20230115", "d 400").unwrap(), "20240219");
    }

    #[test]
    fn daily_result_is_the_smallest_valid_step() {
        let start = date("20240110");
        let now = date("20240515");
        for n in [1u32, 3, 7, 30, 400] {
            let next = date(&next_date(now, "20240110", &format!("d {n}")).unwrap());
            assert!(next > now);
            assert_eq!((next - start).num_days() % i64::from(n), 0);
            // one period earlier would not be strictly after `now`
            assert!(next - chrono::Duration::days(i64::from(n)) <= now);
        }
    }
}
