//! Delivery assignments and their lifecycle.
//!
//! ```text
//! ASSIGNED -> PICKED_UP -> DELIVERED
//!     \           \
//!      +-----------+--> CANCELLED / FAILED
//! ```
//!
//! Transitions are pure: each returns the next version of the assignment or a
//! [`TransitionError`]. Persisting the result is the repository's job.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::delivery_person::DeliveryPerson;

/// Reason recorded when an administrator deletes an assignment.
pub const ADMIN_DELETE_REASON: &str = "Assignment deleted by administrator";

/// Default age after which an unfinished assignment counts as overdue.
pub const DEFAULT_OVERDUE_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    Assigned,
    PickedUp,
    InTransit,
    Delivered,
    Cancelled,
    Failed,
}

impl AssignmentStatus {
    pub const ALL: [AssignmentStatus; 6] = [
        AssignmentStatus::Assigned,
        AssignmentStatus::PickedUp,
        AssignmentStatus::InTransit,
        AssignmentStatus::Delivered,
        AssignmentStatus::Cancelled,
        AssignmentStatus::Failed,
    ];

    /// Statuses that still need courier work.
    pub const ACTIVE: [AssignmentStatus; 2] = [AssignmentStatus::Assigned, AssignmentStatus::PickedUp];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Assigned => "ASSIGNED",
            AssignmentStatus::PickedUp => "PICKED_UP",
            AssignmentStatus::InTransit => "IN_TRANSIT",
            AssignmentStatus::Delivered => "DELIVERED",
            AssignmentStatus::Cancelled => "CANCELLED",
            AssignmentStatus::Failed => "FAILED",
        }
    }

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown assignment status `{0}`")]
pub struct UnknownAssignmentStatus(pub String);

impl FromStr for AssignmentStatus {
    type Err = UnknownAssignmentStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase();
        AssignmentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| UnknownAssignmentStatus(value.to_string()))
    }
}

/// Whether a failed transition pointed at something that does not exist (or
/// cannot be used) or was attempted from the wrong state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionErrorKind {
    BadReference,
    IllegalState,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Order not found with ID: {0}")]
    OrderNotFound(i32),
    #[error("Assignment not found with ID: {0}")]
    AssignmentNotFound(i32),
    #[error("Delivery person not found with ID: {0}")]
    DeliveryPersonNotFound(i32),
    #[error("Delivery person is not active or has been deleted")]
    DeliveryPersonUnavailable(i32),
    #[error("Order already has a delivery assignment")]
    AlreadyAssigned(i32),
    #[error("Assignment must be in {expected} status to {action}")]
    WrongState {
        expected: AssignmentStatus,
        actual: AssignmentStatus,
        action: &'static str,
    },
    #[error("Cannot {action} a delivered assignment")]
    AlreadyDelivered { action: &'static str },
    #[error("Assignment {0} was modified by another request")]
    StaleAssignment(i32),
}

impl TransitionError {
    pub fn kind(&self) -> TransitionErrorKind {
        match self {
            TransitionError::OrderNotFound(_)
            | TransitionError::AssignmentNotFound(_)
            | TransitionError::DeliveryPersonNotFound(_)
            | TransitionError::DeliveryPersonUnavailable(_) => TransitionErrorKind::BadReference,
            TransitionError::AlreadyAssigned(_)
            | TransitionError::WrongState { .. }
            | TransitionError::AlreadyDelivered { .. }
            | TransitionError::StaleAssignment(_) => TransitionErrorKind::IllegalState,
        }
    }
}

/// Binding of one courier to one order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAssignment {
    pub id: i32,
    pub order_id: i32,
    pub delivery_person_id: i32,
    pub status: AssignmentStatus,
    pub assigned_at: NaiveDateTime,
    pub picked_up_at: Option<NaiveDateTime>,
    pub delivered_at: Option<NaiveDateTime>,
    /// Free text; lifecycle events are appended as `[TAG] text` lines.
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl DeliveryAssignment {
    /// ASSIGNED -> PICKED_UP.
    pub fn picked_up(
        &self,
        note: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<DeliveryAssignment, TransitionError> {
        self.expect_status(AssignmentStatus::Assigned, "mark as picked up")?;

        let mut next = self.clone();
        next.status = AssignmentStatus::PickedUp;
        next.picked_up_at = Some(now);
        next.updated_at = now;
        next.append_note("PICKUP", note);
        Ok(next)
    }

    /// PICKED_UP -> DELIVERED.
    pub fn delivered(
        &self,
        note: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<DeliveryAssignment, TransitionError> {
        self.expect_status(AssignmentStatus::PickedUp, "mark as delivered")?;

        let mut next = self.clone();
        next.status = AssignmentStatus::Delivered;
        next.delivered_at = Some(now);
        next.updated_at = now;
        next.append_note("DELIVERY", note);
        Ok(next)
    }

    /// Any state except DELIVERED -> CANCELLED.
    pub fn cancelled(
        &self,
        reason: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<DeliveryAssignment, TransitionError> {
        self.reject_delivered("cancel")?;

        let mut next = self.clone();
        next.status = AssignmentStatus::Cancelled;
        next.updated_at = now;
        next.append_note("CANCELLED", reason);
        Ok(next)
    }

    /// Hand the delivery to another courier and restart it from ASSIGNED.
    pub fn reassigned(
        &self,
        person: &DeliveryPerson,
        reason: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<DeliveryAssignment, TransitionError> {
        self.reject_delivered("reassign")?;
        if !person.is_available() {
            return Err(TransitionError::DeliveryPersonUnavailable(person.id));
        }

        let mut next = self.clone();
        next.delivery_person_id = person.id;
        next.status = AssignmentStatus::Assigned;
        next.assigned_at = now;
        next.picked_up_at = None;
        next.updated_at = now;
        next.append_note("REASSIGNED", reason);
        Ok(next)
    }

    /// Replace the notes verbatim.
    pub fn with_notes(&self, notes: Option<String>, now: NaiveDateTime) -> DeliveryAssignment {
        let mut next = self.clone();
        next.notes = notes;
        next.updated_at = now;
        next
    }

    fn expect_status(
        &self,
        expected: AssignmentStatus,
        action: &'static str,
    ) -> Result<(), TransitionError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(TransitionError::WrongState {
                expected,
                actual: self.status,
                action,
            })
        }
    }

    fn reject_delivered(&self, action: &'static str) -> Result<(), TransitionError> {
        if self.status == AssignmentStatus::Delivered {
            Err(TransitionError::AlreadyDelivered { action })
        } else {
            Ok(())
        }
    }

    fn append_note(&mut self, tag: &str, text: Option<&str>) {
        let Some(text) = text.map(str::trim).filter(|text| !text.is_empty()) else {
            return;
        };
        let entry = format!("[{tag}] {text}");
        self.notes = Some(match self.notes.take() {
            Some(existing) if !existing.is_empty() => format!("{existing}\n{entry}"),
            _ => entry,
        });
    }
}

/// Payload required to create an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeliveryAssignment {
    pub order_id: i32,
    pub delivery_person_id: i32,
    pub notes: Option<String>,
    pub assigned_at: NaiveDateTime,
}

impl NewDeliveryAssignment {
    pub fn new(order_id: i32, delivery_person_id: i32, assigned_at: NaiveDateTime) -> Self {
        Self {
            order_id,
            delivery_person_id,
            notes: None,
            assigned_at,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() {
            None
        } else {
            Some(notes)
        };
        self
    }
}

/// Filters for listing assignments. Results are ordered newest assignment first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentListQuery {
    pub delivery_person_id: Option<i32>,
    pub statuses: Option<Vec<AssignmentStatus>>,
    pub assigned_after: Option<NaiveDateTime>,
    pub assigned_before: Option<NaiveDateTime>,
    /// Substring match on the notes.
    pub notes: Option<String>,
}

impl AssignmentListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivery_person(mut self, delivery_person_id: i32) -> Self {
        self.delivery_person_id = Some(delivery_person_id);
        self
    }

    pub fn status(mut self, status: AssignmentStatus) -> Self {
        self.statuses = Some(vec![status]);
        self
    }

    /// Only ASSIGNED and PICKED_UP assignments.
    pub fn active(mut self) -> Self {
        self.statuses = Some(AssignmentStatus::ACTIVE.to_vec());
        self
    }

    /// Inclusive lower bound on `assigned_at`.
    pub fn assigned_after(mut self, at: NaiveDateTime) -> Self {
        self.assigned_after = Some(at);
        self
    }

    /// Exclusive upper bound on `assigned_at`.
    pub fn assigned_before(mut self, at: NaiveDateTime) -> Self {
        self.assigned_before = Some(at);
        self
    }

    pub fn notes(mut self, term: impl Into<String>) -> Self {
        self.notes = Some(term.into());
        self
    }
}

/// Number of assignments per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentStats {
    pub assigned: i64,
    pub picked_up: i64,
    pub in_transit: i64,
    pub delivered: i64,
    pub cancelled: i64,
    pub failed: i64,
}

impl AssignmentStats {
    pub fn record(&mut self, status: AssignmentStatus, count: i64) {
        match status {
            AssignmentStatus::Assigned => self.assigned += count,
            AssignmentStatus::PickedUp => self.picked_up += count,
            AssignmentStatus::InTransit => self.in_transit += count,
            AssignmentStatus::Delivered => self.delivered += count,
            AssignmentStatus::Cancelled => self.cancelled += count,
            AssignmentStatus::Failed => self.failed += count,
        }
    }
}

/// Delivery performance of one courier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPersonStats {
    pub total_assignments: usize,
    pub delivered_count: usize,
    /// Mean hours between assignment and delivery, `None` before the first delivery.
    pub average_delivery_time: Option<f64>,
}

impl DeliveryPersonStats {
    /// Summarise every assignment a courier ever held.
    pub fn from_assignments(assignments: &[DeliveryAssignment]) -> Self {
        let durations: Vec<f64> = assignments
            .iter()
            .filter(|assignment| assignment.status == AssignmentStatus::Delivered)
            .filter_map(|assignment| {
                assignment
                    .delivered_at
                    .map(|delivered| (delivered - assignment.assigned_at).num_minutes() as f64 / 60.0)
            })
            .collect();

        let delivered_count = assignments
            .iter()
            .filter(|assignment| assignment.status == AssignmentStatus::Delivered)
            .count();

        let average_delivery_time = if durations.is_empty() {
            None
        } else {
            Some(durations.iter().sum::<f64>() / durations.len() as f64)
        };

        Self {
            total_assignments: assignments.len(),
            delivered_count,
            average_delivery_time,
        }
    }
}
