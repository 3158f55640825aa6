use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::delivery_assignment::{DEFAULT_OVERDUE_HOURS, NewDeliveryAssignment};
use crate::domain::delivery_person::{NewDeliveryPerson, UpdateDeliveryPerson, VehicleType};
use crate::forms::{non_blank, sanitize_inline_text};

const NAME_MAX_LEN: u64 = 100;
const CONTACT_MAX_LEN: u64 = 20;
const VEHICLE_NUMBER_MAX_LEN: u64 = 20;

/// Reason recorded when a reassignment request does not give one.
pub const DEFAULT_REASSIGN_REASON: &str = "Reassigned by administrator";

pub type DeliveryFormResult<T> = Result<T, DeliveryFormError>;

#[derive(Debug, Error)]
pub enum DeliveryFormError {
    #[error("{}", first_message(.0))]
    Validation(#[from] ValidationErrors),
    #[error("Invalid vehicle type: {0}")]
    InvalidVehicleType(String),
    #[error("Order ID is required")]
    MissingOrderId,
    #[error("Delivery person ID is required")]
    MissingDeliveryPersonId,
    #[error("New delivery person ID is required")]
    MissingNewDeliveryPersonId,
    #[error("Notes field is required")]
    MissingNotes,
    #[error("Search term is required")]
    MissingSearchTerm,
    #[error("Invalid date format. Use ISO format: yyyy-MM-ddTHH:mm:ss")]
    InvalidDate(String),
    #[error("Start date must not be after end date")]
    InvertedRange,
    #[error("Hours must be a positive number within range")]
    InvalidHours,
}

/// Message of the alphabetically first failing field.
fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .next()
        .unwrap_or_else(|| "Validation failed".to_string())
}

/// Courier payload used by both create and full update.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPersonForm {
    #[serde(default)]
    #[validate(length(min = 1, max = NAME_MAX_LEN, message = "Name is required and must not exceed 100 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Email should be valid"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, max = CONTACT_MAX_LEN, message = "Contact number is required and must not exceed 20 characters"))]
    pub contact_number: String,
    #[serde(default)]
    pub vehicle_type: String,
    #[serde(default)]
    #[validate(length(min = 1, max = VEHICLE_NUMBER_MAX_LEN, message = "Vehicle number is required and must not exceed 20 characters"))]
    pub vehicle_number: String,
    /// Only honoured by updates; new couriers always start active.
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl DeliveryPersonForm {
    fn sanitized(&self) -> DeliveryFormResult<(String, String, String, VehicleType, String)> {
        let trimmed = DeliveryPersonForm {
            name: sanitize_inline_text(&self.name),
            email: self.email.trim().to_string(),
            contact_number: self.contact_number.trim().to_string(),
            vehicle_type: self.vehicle_type.trim().to_string(),
            vehicle_number: sanitize_inline_text(&self.vehicle_number),
            is_active: self.is_active,
        };
        trimmed.validate()?;

        let vehicle_type = trimmed
            .vehicle_type
            .parse::<VehicleType>()
            .map_err(|_| DeliveryFormError::InvalidVehicleType(self.vehicle_type.clone()))?;

        Ok((
            trimmed.name,
            trimmed.email,
            trimmed.contact_number,
            vehicle_type,
            trimmed.vehicle_number,
        ))
    }

    pub fn into_new_person(self) -> DeliveryFormResult<NewDeliveryPerson> {
        let (name, email, contact_number, vehicle_type, vehicle_number) = self.sanitized()?;
        Ok(NewDeliveryPerson::new(
            name,
            email,
            contact_number,
            vehicle_type,
            vehicle_number,
        ))
    }

    /// Replace every editable field. `is_active` is kept when omitted.
    pub fn into_update(self) -> DeliveryFormResult<UpdateDeliveryPerson> {
        let (name, email, contact_number, vehicle_type, vehicle_number) = self.sanitized()?;
        let mut update = UpdateDeliveryPerson::new()
            .name(name)
            .email(email)
            .contact_number(contact_number)
            .vehicle_type(vehicle_type)
            .vehicle_number(vehicle_number);
        if let Some(active) = self.is_active {
            update = update.active(active);
        }
        Ok(update)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub order_id: Option<i32>,
    pub delivery_person_id: Option<i32>,
    pub notes: Option<String>,
}

impl CreateAssignmentRequest {
    pub fn into_new_assignment(self, now: NaiveDateTime) -> DeliveryFormResult<NewDeliveryAssignment> {
        let order_id = self.order_id.ok_or(DeliveryFormError::MissingOrderId)?;
        let delivery_person_id = self
            .delivery_person_id
            .ok_or(DeliveryFormError::MissingDeliveryPersonId)?;

        let mut assignment = NewDeliveryAssignment::new(order_id, delivery_person_id, now);
        if let Some(notes) = self.notes {
            assignment = assignment.with_notes(notes);
        }
        Ok(assignment)
    }
}

/// Optional note sent with pickup and delivery.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteRequest {
    pub notes: Option<String>,
}

impl NoteRequest {
    pub fn note(&self) -> Option<String> {
        non_blank(self.notes.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelRequest {
    pub reason: Option<String>,
}

impl CancelRequest {
    pub fn reason(&self) -> Option<String> {
        non_blank(self.reason.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReassignRequest {
    pub new_delivery_person_id: Option<i32>,
    pub reason: Option<String>,
}

impl ReassignRequest {
    /// The new courier id and the reason to record.
    pub fn parts(&self) -> DeliveryFormResult<(i32, String)> {
        let person_id = self
            .new_delivery_person_id
            .ok_or(DeliveryFormError::MissingNewDeliveryPersonId)?;
        let reason = non_blank(self.reason.as_deref())
            .unwrap_or_else(|| DEFAULT_REASSIGN_REASON.to_string());
        Ok((person_id, reason))
    }
}

/// Notes replacement. The field must be present; an empty string clears the notes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNotesRequest {
    pub notes: Option<String>,
}

impl UpdateNotesRequest {
    pub fn notes(self) -> DeliveryFormResult<Option<String>> {
        let notes = self.notes.ok_or(DeliveryFormError::MissingNotes)?;
        Ok(if notes.is_empty() { None } else { Some(notes) })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverdueQuery {
    pub hours_ago: Option<i64>,
}

impl OverdueQuery {
    pub fn hours(&self) -> DeliveryFormResult<i64> {
        match self.hours_ago {
            Some(hours) if hours <= 0 => Err(DeliveryFormError::InvalidHours),
            Some(hours) => Ok(hours),
            None => Ok(DEFAULT_OVERDUE_HOURS),
        }
    }

    /// The instant `hours` before `now`. Values chrono cannot represent are
    /// rejected.
    pub fn cutoff(&self, now: NaiveDateTime) -> DeliveryFormResult<NaiveDateTime> {
        let hours = self.hours()?;
        Duration::try_hours(hours)
            .and_then(|span| now.checked_sub_signed(span))
            .ok_or(DeliveryFormError::InvalidHours)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

impl DateRangeQuery {
    /// Half-open `[start, end)` bounds covering both given instants.
    ///
    /// A bare date as the end covers that whole day.
    pub fn bounds(&self) -> DeliveryFormResult<(NaiveDateTime, NaiveDateTime)> {
        let start = parse_instant(&self.start_date, false)?;
        let end = parse_instant(&self.end_date, true)?;
        if start >= end {
            return Err(DeliveryFormError::InvertedRange);
        }
        Ok((start, end))
    }
}

fn parse_instant(value: &str, upper: bool) -> DeliveryFormResult<NaiveDateTime> {
    let value = value.trim();
    let invalid = || DeliveryFormError::InvalidDate(value.to_string());

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(instant) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(if upper {
                instant + Duration::microseconds(1)
            } else {
                instant
            });
        }
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())?;
    let date = if upper { date.succ_opt().ok_or_else(invalid)? } else { date };
    date.and_hms_opt(0, 0, 0).ok_or_else(invalid)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default)]
    pub search_term: String,
}

impl SearchQuery {
    pub fn term(&self) -> DeliveryFormResult<String> {
        let term = sanitize_inline_text(&self.search_term);
        if term.is_empty() {
            return Err(DeliveryFormError::MissingSearchTerm);
        }
        Ok(term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn courier() -> DeliveryPersonForm {
        DeliveryPersonForm {
            name: "  Nimal   Silva ".to_string(),
            email: "Nimal@Example.com".to_string(),
            contact_number: "0771234567".to_string(),
            vehicle_type: "bike".to_string(),
            vehicle_number: "WP BAA-1234".to_string(),
            is_active: None,
        }
    }

    #[test]
    fn courier_form_normalizes_input() {
        let person = courier().into_new_person().unwrap();

        assert_eq!(person.name, "Nimal Silva");
        assert_eq!(person.email, "nimal@example.com");
        assert_eq!(person.vehicle_type, VehicleType::Bike);
    }

    #[test]
    fn courier_form_rejects_unknown_vehicles() {
        let mut form = courier();
        form.vehicle_type = "boat".to_string();

        assert_eq!(
            form.into_new_person().unwrap_err().to_string(),
            "Invalid vehicle type: boat"
        );
    }

    #[test]
    fn courier_form_reports_field_messages() {
        let mut form = courier();
        form.email = "not-an-email".to_string();
        assert_eq!(form.into_new_person().unwrap_err().to_string(), "Email should be valid");

        let mut form = courier();
        form.name = "   ".to_string();
        assert_eq!(
            form.into_new_person().unwrap_err().to_string(),
            "Name is required and must not exceed 100 characters"
        );

        let mut form = courier();
        form.contact_number = "1".repeat(21);
        assert!(matches!(
            form.into_new_person(),
            Err(DeliveryFormError::Validation(_))
        ));
    }

    #[test]
    fn update_keeps_activity_when_omitted() {
        let update = courier().into_update().unwrap();
        assert_eq!(update.is_active, None);

        let mut form = courier();
        form.is_active = Some(false);
        assert_eq!(form.into_update().unwrap().is_active, Some(false));
    }

    #[test]
    fn create_assignment_requires_both_ids() {
        let request = CreateAssignmentRequest {
            order_id: Some(1),
            delivery_person_id: None,
            notes: None,
        };
        let now = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap();

        assert!(matches!(
            request.into_new_assignment(now),
            Err(DeliveryFormError::MissingDeliveryPersonId)
        ));
    }

    #[test]
    fn reassign_defaults_the_reason() {
        let request = ReassignRequest {
            new_delivery_person_id: Some(4),
            reason: Some("  ".to_string()),
        };

        assert_eq!(
            request.parts().unwrap(),
            (4, DEFAULT_REASSIGN_REASON.to_string())
        );
    }

    #[test]
    fn notes_field_must_be_present() {
        assert!(matches!(
            UpdateNotesRequest { notes: None }.notes(),
            Err(DeliveryFormError::MissingNotes)
        ));
        assert_eq!(
            UpdateNotesRequest {
                notes: Some(String::new())
            }
            .notes()
            .unwrap(),
            None
        );
    }

    #[test]
    fn overdue_hours_default_to_a_day() {
        assert_eq!(OverdueQuery { hours_ago: None }.hours().unwrap(), 24);
        assert!(OverdueQuery { hours_ago: Some(0) }.hours().is_err());
    }

    #[test]
    fn overdue_cutoff_rejects_out_of_range_hours() {
        let now = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let cutoff = OverdueQuery { hours_ago: Some(6) }.cutoff(now).unwrap();
        assert_eq!(cutoff.to_string(), "2024-01-01 18:00:00");

        let huge = OverdueQuery {
            hours_ago: Some(1_000_000_000_000),
        };
        assert!(matches!(huge.cutoff(now), Err(DeliveryFormError::InvalidHours)));

        let max = OverdueQuery {
            hours_ago: Some(i64::MAX),
        };
        assert!(matches!(max.cutoff(now), Err(DeliveryFormError::InvalidHours)));
    }

    #[test]
    fn date_range_accepts_dates_and_datetimes() {
        let query = DateRangeQuery {
            start_date: "2024-01-01T08:00:00".to_string(),
            end_date: "2024-01-02".to_string(),
        };
        let (start, end) = query.bounds().unwrap();

        assert_eq!(start.to_string(), "2024-01-01 08:00:00");
        assert_eq!(end.to_string(), "2024-01-03 00:00:00");

        let bad = DateRangeQuery {
            start_date: "yesterday".to_string(),
            end_date: "2024-01-02".to_string(),
        };
        assert!(matches!(bad.bounds(), Err(DeliveryFormError::InvalidDate(_))));
    }

    #[test]
    fn search_term_is_required() {
        let query = SearchQuery {
            search_term: "  ".to_string(),
        };
        assert!(matches!(query.term(), Err(DeliveryFormError::MissingSearchTerm)));
    }
}
