//! Business-day arithmetic and holiday-aware date reasoning
//!
//! A business day is a calendar day that is neither a weekend day nor a
//! configured recurring holiday. Holidays recur annually: only (day, month)
//! is compared, never the year.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use tracing::warn;

use crate::types::{HolidayEntry, HolidaySet, ReconError, ReconResult};

/// True iff `date` falls on Saturday or Sunday
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// True iff the (day, month) of `date` appears in the holiday set
pub fn is_holiday(date: NaiveDate, holidays: &HolidaySet) -> bool {
    holidays.contains(date)
}

/// True iff `date` is a weekend day or a configured holiday.
///
/// An unavailable date is a business day by definition, so it never blocks
/// downstream checks.
pub fn is_non_business_day(date: Option<NaiveDate>, holidays: &HolidaySet) -> bool {
    match date {
        Some(d) => is_weekend(d) || is_holiday(d, holidays),
        None => false,
    }
}

/// The closest business day strictly before `date`.
///
/// Steps backward one day at a time while the candidate is a weekend day or
/// holiday; `date` itself is never returned. The caller must guarantee the
/// holiday configuration leaves at least one business day per week, or this
/// does not terminate.
pub fn previous_business_day(date: NaiveDate, holidays: &HolidaySet) -> NaiveDate {
    let mut candidate = date - Duration::days(1);
    while is_non_business_day(Some(candidate), holidays) {
        candidate -= Duration::days(1);
    }
    candidate
}

/// True iff `date` equals `today` at day granularity.
///
/// Both sides are calendar dates, so hour and finer components are already
/// out of the comparison.
pub fn is_today(date: NaiveDate, today: NaiveDate) -> bool {
    date == today
}

/// Parse a textual `day-month-year` date.
///
/// Hyphen-delimited, exactly three fields. Only the first four characters of
/// the year field are significant; the source field sometimes carries
/// trailing noise. A year field shorter than four characters breaks the
/// field-width contract and is rejected. Returns `None` for anything that
/// does not form a real calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.trim().splitn(3, '-');
    let day: u32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts.next()?.trim().parse().ok()?;
    let year: i32 = parts.next()?.trim().get(..4)?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Format a timestamp for the diagnostic side-channel: `dd/mm/yyyy - HH:mm:ss`
pub fn format_timestamp(dt: NaiveDateTime) -> String {
    dt.format("%d/%m/%Y - %H:%M:%S").to_string()
}

impl HolidaySet {
    /// Parse the holiday configuration string.
    ///
    /// The format is a flat `#`-delimited list of 5-character tokens: day in
    /// positions 0-1, a separator in position 2, month in positions 3-4,
    /// e.g. `01-01#18-09#25-12`. A token of the wrong length or with
    /// non-numeric fields is a configuration error rather than a silent
    /// truncation; the source behavior on such tokens was undefined.
    pub fn parse(raw: &str) -> ReconResult<HolidaySet> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(HolidaySet::empty());
        }

        let mut entries = Vec::new();
        for token in raw.split('#') {
            let token = token.trim();
            if token.len() != 5 {
                return Err(ReconError::HolidayConfig(format!(
                    "holiday token '{token}' is not exactly 5 characters"
                )));
            }
            let day: u32 = token
                .get(0..2)
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| {
                    ReconError::HolidayConfig(format!(
                        "holiday token '{token}' has a non-numeric day"
                    ))
                })?;
            let month: u32 = token
                .get(3..5)
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| {
                    ReconError::HolidayConfig(format!(
                        "holiday token '{token}' has a non-numeric month"
                    ))
                })?;
            if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
                warn!(token, "holiday token outside calendar range");
                return Err(ReconError::HolidayConfig(format!(
                    "holiday token '{token}' is outside the calendar range"
                )));
            }
            entries.push(HolidayEntry { day, month });
        }
        Ok(HolidaySet(entries))
    }
}
