//! Tour request data models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::form::{self, TimeSelect};
use crate::{Error, Result};

/// Required fields, in the order they are reported when missing.
pub const REQUIRED_FIELDS: [&str; 5] = ["company", "requesterName", "requesterEmail", "start", "end"];

/// Tour request payload as posted by the web form.
///
/// All values are optional at this stage; [`TourRequest::into_submission`]
/// decides what is actually required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_email: Option<String>,
    /// UTC ISO start of the visit
    #[serde(alias = "startUtc", skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// UTC ISO end of the visit
    #[serde(alias = "endUtc", skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    // Optional fields take any scalar; the page sends strings, other clients numbers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Value>,
    /// Number of visitors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party_size: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<Value>,

    // Raw selector values, used when the client did not assemble the window itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tour_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_hour: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_min: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_mer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_hour: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_min: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_mer: Option<String>,
    /// Minutes east of UTC for the selector values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_offset_minutes: Option<i32>,
}

/// A validated, trimmed tour request ready to hand downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourSubmission {
    pub company: String,
    pub requester_name: String,
    pub requester_email: String,
    #[serde(rename = "startUtc")]
    pub start: String,
    #[serde(rename = "endUtc")]
    pub end: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn selector(value: &Option<String>) -> String {
    value.as_deref().unwrap_or_default().to_string()
}

/// Normalize an optional scalar field to trimmed text.
fn optional_scalar(name: &str, value: Option<Value>) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(trimmed(Some(s))),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(Error::Validation(format!(
            "{} must be a string or number",
            name
        ))),
    }
}

impl TourRequest {
    /// Trim every field and check the required ones.
    ///
    /// Blank values count as missing. When neither `start` nor `end` is given
    /// but a tour date and both sets of selectors are, the window is assembled
    /// from them and must end after it starts.
    pub fn into_submission(self) -> Result<TourSubmission> {
        let mut start = trimmed(self.start.clone());
        let mut end = trimmed(self.end.clone());

        if start.is_none() && end.is_none() {
            if let Some((s, e)) = self.assemble_window()? {
                start = Some(s);
                end = Some(e);
            }
        }

        let company = trimmed(self.company);
        let requester_name = trimmed(self.requester_name);
        let requester_email = trimmed(self.requester_email);

        let present = [
            company.is_some(),
            requester_name.is_some(),
            requester_email.is_some(),
            start.is_some(),
            end.is_some(),
        ];
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .zip(present)
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| name.to_string())
            .collect();

        match (company, requester_name, requester_email, start, end) {
            (Some(company), Some(requester_name), Some(requester_email), Some(start), Some(end)) => {
                Ok(TourSubmission {
                    company,
                    requester_name,
                    requester_email,
                    start,
                    end,
                    phone: optional_scalar("phone", self.phone)?,
                    party_size: optional_scalar("partySize", self.party_size)?,
                    reason: optional_scalar("reason", self.reason)?,
                })
            }
            _ => Err(Error::MissingFields(missing)),
        }
    }

    fn assemble_window(&self) -> Result<Option<(String, String)>> {
        let Some(date) = trimmed(self.tour_date.clone()) else {
            return Ok(None);
        };

        let start = TimeSelect::new(
            selector(&self.start_hour),
            selector(&self.start_min),
            selector(&self.start_mer),
        );
        let end = TimeSelect::new(
            selector(&self.end_hour),
            selector(&self.end_min),
            selector(&self.end_mer),
        );
        if start.is_blank() || end.is_blank() {
            return Ok(None);
        }

        let offset = form::offset_from_minutes(self.utc_offset_minutes.unwrap_or(0))
            .map_err(|e| Error::Validation(e.to_string()))?;
        let (start, end) = form::tour_window(&date, &start, &end, offset)
            .map_err(|e| Error::Validation(e.to_string()))?;

        Ok(Some((form::to_utc_iso(start), form::to_utc_iso(end))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> TourRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_trims_and_accepts_utc_aliases() {
        let request = parse(json!({
            "company": "  Acme  ",
            "requesterName": "Dana",
            "requesterEmail": "dana@acme.example ",
            "startUtc": "2026-11-03T14:00:00.000Z",
            "endUtc": "2026-11-03T15:00:00.000Z",
            "phone": "   ",
            "partySize": 4
        }));

        let submission = request.into_submission().unwrap();
        assert_eq!(submission.company, "Acme");
        assert_eq!(submission.requester_email, "dana@acme.example");
        assert_eq!(submission.phone, None);
        assert_eq!(submission.party_size.as_deref(), Some("4"));
    }

    #[test]
    fn test_missing_fields_listed_in_order() {
        let request = parse(json!({
            "company": "Acme",
            "requesterName": "   ",
            "start": "2026-11-03T14:00:00.000Z",
            "end": null
        }));

        match request.into_submission() {
            Err(Error::MissingFields(fields)) => {
                assert_eq!(fields, vec!["requesterName", "requesterEmail", "end"]);
            }
            other => panic!("expected missing fields, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_payload_reports_all_fields() {
        match TourRequest::default().into_submission() {
            Err(Error::MissingFields(fields)) => assert_eq!(fields, REQUIRED_FIELDS.to_vec()),
            other => panic!("expected missing fields, got {:?}", other),
        }
    }

    #[test]
    fn test_submission_serializes_for_forwarding() {
        let submission = TourSubmission {
            company: "Acme".to_string(),
            requester_name: "Dana".to_string(),
            requester_email: "dana@acme.example".to_string(),
            start: "2026-11-03T14:00:00.000Z".to_string(),
            end: "2026-11-03T15:00:00.000Z".to_string(),
            phone: None,
            party_size: None,
            reason: Some("Audit".to_string()),
        };

        assert_eq!(
            serde_json::to_value(&submission).unwrap(),
            json!({
                "company": "Acme",
                "requesterName": "Dana",
                "requesterEmail": "dana@acme.example",
                "startUtc": "2026-11-03T14:00:00.000Z",
                "endUtc": "2026-11-03T15:00:00.000Z",
                "reason": "Audit"
            })
        );
    }

    #[test]
    fn test_assembles_window_from_selectors() {
        let request = parse(json!({
            "company": "Acme",
            "requesterName": "Dana",
            "requesterEmail": "dana@acme.example",
            "tourDate": "2026-11-03",
            "startHour": "12", "startMin": "30", "startMer": "PM",
            "endHour": "2", "endMin": "00", "endMer": "PM",
            "utcOffsetMinutes": -300
        }));

        let submission = request.into_submission().unwrap();
        assert_eq!(submission.start, "2026-11-03T17:30:00.000Z");
        assert_eq!(submission.end, "2026-11-03T19:00:00.000Z");
    }

    #[test]
    fn test_selector_window_must_be_ordered() {
        let request = parse(json!({
            "company": "Acme",
            "requesterName": "Dana",
            "requesterEmail": "dana@acme.example",
            "tourDate": "2026-11-03",
            "startHour": "3", "startMin": "00", "startMer": "PM",
            "endHour": "1", "endMin": "00", "endMer": "PM"
        }));

        match request.into_submission() {
            Err(Error::Validation(msg)) => assert_eq!(msg, "End time must be after start time."),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_window_is_not_reordered() {
        // Only the presence of start/end is checked when the client sends them.
        let request = parse(json!({
            "company": "Acme",
            "requesterName": "Dana",
            "requesterEmail": "dana@acme.example",
            "start": "2026-11-03T15:00:00.000Z",
            "end": "2026-11-03T14:00:00.000Z"
        }));

        assert!(request.into_submission().is_ok());
    }

    #[test]
    fn test_numeric_optional_fields_are_accepted() {
        let request = parse(json!({
            "company": "Acme",
            "requesterName": "Dana",
            "requesterEmail": "dana@acme.example",
            "start": "2026-11-03T14:00:00.000Z",
            "end": "2026-11-03T15:00:00.000Z",
            "phone": 5550100,
            "reason": null
        }));

        let submission = request.into_submission().unwrap();
        assert_eq!(submission.phone.as_deref(), Some("5550100"));
        assert_eq!(submission.reason, None);
    }

    fn selector_request(date: &str, start_mer: &str, offset: i32) -> TourRequest {
        parse(json!({
            "company": "Acme",
            "requesterName": "Dana",
            "requesterEmail": "dana@acme.example",
            "tourDate": date,
            "startHour": "9", "startMin": "00", "startMer": start_mer,
            "endHour": "11", "endMin": "00", "endMer": "AM",
            "utcOffsetMinutes": offset
        }))
    }

    fn validation_message(request: TourRequest) -> String {
        match request.into_submission() {
            Err(e @ Error::Validation(_)) => {
                assert_eq!(e.status_code(), 400);
                e.to_string()
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_offset_is_rejected() {
        assert_eq!(
            validation_message(selector_request("2026-11-03", "AM", 100_000)),
            "Invalid time: UTC offset 100000 minutes"
        );
    }

    #[test]
    fn test_malformed_tour_date_is_rejected() {
        assert_eq!(
            validation_message(selector_request("11/03/2026", "AM", 0)),
            "Invalid tour date: 11/03/2026"
        );
    }

    #[test]
    fn test_unknown_meridiem_is_rejected() {
        assert_eq!(
            validation_message(selector_request("2026-11-03", "XM", 0)),
            "Invalid time: unknown meridiem 'XM'"
        );
    }

    #[test]
    fn test_rejects_non_scalar_party_size() {
        let request = parse(json!({
            "company": "Acme",
            "requesterName": "Dana",
            "requesterEmail": "dana@acme.example",
            "start": "a",
            "end": "b",
            "partySize": [1, 2]
        }));

        assert!(matches!(request.into_submission(), Err(Error::Validation(_))));
    }
}
