//! Tour request form assembly.
//!
//! The public page collects a single tour date plus separate hour, minute and
//! AM/PM selectors for the start and end of the visit. This module turns those
//! selector values into UTC instants and applies the same checks the page does
//! before posting.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use std::str::FromStr;
use serde_json::Value;
use thiserror::Error;

use crate::models::TourRequest;

/// Errors surfaced to the person filling in the form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill all required fields ({}).", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid tour date: {0}")]
    InvalidDate(String),

    #[error("Tour date cannot be in the past.")]
    DateInPast,

    #[error("End time must be after start time.")]
    EndNotAfterStart,
}

/// AM/PM selector value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl FromStr for Meridiem {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AM" => Ok(Meridiem::Am),
            "PM" => Ok(Meridiem::Pm),
            other => Err(FormError::InvalidTime(format!("unknown meridiem '{}'", other))),
        }
    }
}

/// Convert 12-hour selector values to a wall-clock time.
///
/// 12 AM is midnight and 12 PM is noon.
pub fn to_24_hour(hour: &str, minute: &str, meridiem: Meridiem) -> Result<NaiveTime, FormError> {
    let h: u32 = hour
        .trim()
        .parse()
        .map_err(|_| FormError::InvalidTime(format!("hour '{}'", hour.trim())))?;
    let m: u32 = minute
        .trim()
        .parse()
        .map_err(|_| FormError::InvalidTime(format!("minute '{}'", minute.trim())))?;

    if !(1..=12).contains(&h) {
        return Err(FormError::InvalidTime(format!("hour '{}'", h)));
    }

    let mut h24 = h % 12;
    if meridiem == Meridiem::Pm {
        h24 += 12;
    }

    NaiveTime::from_hms_opt(h24, m, 0)
        .ok_or_else(|| FormError::InvalidTime(format!("minute '{}'", m)))
}

/// Parse the date picker value (`YYYY-MM-DD`).
pub fn parse_tour_date(date: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| FormError::InvalidDate(date.trim().to_string()))
}

/// Interpret a local date and time at `offset` and return the UTC instant.
pub fn combine_date_time(
    date: &str,
    time: NaiveTime,
    offset: FixedOffset,
) -> Result<DateTime<Utc>, FormError> {
    let local = parse_tour_date(date)?.and_time(time);
    offset
        .from_local_datetime(&local)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| FormError::InvalidDate(date.trim().to_string()))
}

/// Build a fixed offset from minutes east of UTC.
pub fn offset_from_minutes(minutes: i32) -> Result<FixedOffset, FormError> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| FormError::InvalidTime(format!("UTC offset {} minutes", minutes)))
}

/// Render an instant the way the page posts it.
pub fn to_utc_iso(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Hour/minute/meridiem selectors for one end of the visit.
#[derive(Debug, Clone, Default)]
pub struct TimeSelect {
    pub hour: String,
    pub minute: String,
    pub meridiem: String,
}

impl TimeSelect {
    pub fn new(hour: impl Into<String>, minute: impl Into<String>, meridiem: impl Into<String>) -> Self {
        Self {
            hour: hour.into(),
            minute: minute.into(),
            meridiem: meridiem.into(),
        }
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.hour.trim().is_empty() || self.minute.trim().is_empty() || self.meridiem.trim().is_empty()
    }

    pub fn to_time(&self) -> Result<NaiveTime, FormError> {
        to_24_hour(&self.hour, &self.minute, self.meridiem.parse()?)
    }
}

/// Start and end of a visit on a single tour date.
pub fn tour_window(
    date: &str,
    start: &TimeSelect,
    end: &TimeSelect,
    offset: FixedOffset,
) -> Result<(DateTime<Utc>, DateTime<Utc>), FormError> {
    let start = combine_date_time(date, start.to_time()?, offset)?;
    let end = combine_date_time(date, end.to_time()?, offset)?;

    if end <= start {
        return Err(FormError::EndNotAfterStart);
    }

    Ok((start, end))
}

/// The full tour request form as filled in on the page.
#[derive(Debug, Clone, Default)]
pub struct TourForm {
    pub company: String,
    pub requester_name: String,
    pub requester_email: String,
    pub phone: String,
    pub party_size: String,
    pub tour_date: String,
    pub start: TimeSelect,
    pub end: TimeSelect,
    pub reason: String,
}

impl TourForm {
    /// Run the page's checks and produce the payload it would post.
    ///
    /// `today` is the earliest date the picker allows.
    pub fn validate(&self, offset: FixedOffset, today: NaiveDate) -> Result<TourRequest, FormError> {
        let mut missing = Vec::new();
        if self.company.trim().is_empty() {
            missing.push("Company");
        }
        if self.requester_name.trim().is_empty() {
            missing.push("Requester");
        }
        if self.requester_email.trim().is_empty() {
            missing.push("Email");
        }
        if self.tour_date.trim().is_empty() {
            missing.push("Date");
        }
        if self.start.is_blank() {
            missing.push("Start");
        }
        if self.end.is_blank() {
            missing.push("End");
        }
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }

        if parse_tour_date(&self.tour_date)? < today {
            return Err(FormError::DateInPast);
        }

        let (start, end) = tour_window(&self.tour_date, &self.start, &self.end, offset)?;

        Ok(TourRequest {
            company: non_blank(&self.company),
            requester_name: non_blank(&self.requester_name),
            requester_email: non_blank(&self.requester_email),
            start: Some(to_utc_iso(start)),
            end: Some(to_utc_iso(end)),
            phone: non_blank(&self.phone).map(Value::String),
            party_size: non_blank(&self.party_size).map(Value::String),
            reason: non_blank(&self.reason).map(Value::String),
            ..TourRequest::default()
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn filled_form() -> TourForm {
        TourForm {
            company: " Acme Corp ".to_string(),
            requester_name: "Dana Smith".to_string(),
            requester_email: "dana@acme.example".to_string(),
            phone: "".to_string(),
            party_size: "6".to_string(),
            tour_date: "2026-11-03".to_string(),
            start: TimeSelect::new("9", "30", "AM"),
            end: TimeSelect::new("11", "00", "AM"),
            reason: "Site visit".to_string(),
        }
    }

    #[test]
    fn test_to_24_hour_edges() {
        assert_eq!(to_24_hour("12", "00", Meridiem::Am).unwrap(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        assert_eq!(to_24_hour("12", "15", Meridiem::Pm).unwrap(), NaiveTime::from_hms_opt(12, 15, 0).unwrap());
        assert_eq!(to_24_hour("1", "45", Meridiem::Pm).unwrap(), NaiveTime::from_hms_opt(13, 45, 0).unwrap());
        assert_eq!(to_24_hour("07", "05", Meridiem::Am).unwrap(), NaiveTime::from_hms_opt(7, 5, 0).unwrap());
    }

    #[test]
    fn test_to_24_hour_rejects_out_of_range() {
        assert!(to_24_hour("0", "00", Meridiem::Am).is_err());
        assert!(to_24_hour("13", "00", Meridiem::Pm).is_err());
        assert!(to_24_hour("9", "60", Meridiem::Am).is_err());
        assert!(to_24_hour("nine", "00", Meridiem::Am).is_err());
    }

    #[test]
    fn test_meridiem_parse() {
        assert_eq!("pm".parse::<Meridiem>().unwrap(), Meridiem::Pm);
        assert_eq!(" AM ".parse::<Meridiem>().unwrap(), Meridiem::Am);
        assert!("noon".parse::<Meridiem>().is_err());
    }

    #[test]
    fn test_combine_date_time_applies_offset() {
        let eastern = offset_from_minutes(-5 * 60).unwrap();
        let time = to_24_hour("9", "00", Meridiem::Am).unwrap();
        let instant = combine_date_time("2026-11-03", time, eastern).unwrap();
        assert_eq!(to_utc_iso(instant), "2026-11-03T14:00:00.000Z");
    }

    #[test]
    fn test_combine_date_time_rolls_over_midnight() {
        let tokyo = offset_from_minutes(9 * 60).unwrap();
        let time = to_24_hour("8", "00", Meridiem::Am).unwrap();
        let instant = combine_date_time("2026-11-03", time, tokyo).unwrap();
        assert_eq!(to_utc_iso(instant), "2026-11-02T23:00:00.000Z");
    }

    #[test]
    fn test_form_produces_request() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let request = filled_form().validate(utc(), today).unwrap();

        assert_eq!(request.company.as_deref(), Some("Acme Corp"));
        assert_eq!(request.start.as_deref(), Some("2026-11-03T09:30:00.000Z"));
        assert_eq!(request.end.as_deref(), Some("2026-11-03T11:00:00.000Z"));
        assert_eq!(request.phone, None);
        assert_eq!(request.party_size, Some(serde_json::json!("6")));
    }

    #[test]
    fn test_form_missing_fields() {
        let mut form = filled_form();
        form.company = "   ".to_string();
        form.end = TimeSelect::default();

        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let err = form.validate(utc(), today).unwrap_err();
        assert_eq!(err, FormError::MissingFields(vec!["Company", "End"]));
        assert_eq!(
            err.to_string(),
            "Please fill all required fields (Company, End)."
        );
    }

    #[test]
    fn test_form_end_must_follow_start() {
        let mut form = filled_form();
        form.end = TimeSelect::new("9", "30", "AM");

        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(form.validate(utc(), today).unwrap_err(), FormError::EndNotAfterStart);
    }

    #[test]
    fn test_form_rejects_past_date() {
        let today = NaiveDate::from_ymd_opt(2026, 11, 4).unwrap();
        assert_eq!(filled_form().validate(utc(), today).unwrap_err(), FormError::DateInPast);
    }
}
