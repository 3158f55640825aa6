//! Delivery assignment lifecycle and reporting.
//!
//! Every state change loads the assignment, lets the domain type compute the
//! next state and saves it only if nobody changed the row in between.

use chrono::NaiveDateTime;

use crate::domain::auth::AuthenticatedEmployee;
use crate::domain::delivery_assignment::{
    ADMIN_DELETE_REASON, AssignmentListQuery, AssignmentStats, AssignmentStatus,
    DeliveryAssignment, DeliveryPersonStats, TransitionError,
};
use crate::domain::delivery_person::{DeliveryPerson, DeliveryPersonListQuery};
use crate::domain::employee::EmployeeType;
use crate::forms::delivery::{
    CancelRequest, CreateAssignmentRequest, DateRangeQuery, NoteRequest, OverdueQuery,
    ReassignRequest, SearchQuery, UpdateNotesRequest,
};
use crate::repository::{
    DeliveryAssignmentReader, DeliveryAssignmentWriter, DeliveryPersonReader,
};
use crate::services::{ServiceError, ServiceResult};

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_utc()
}

fn transition<R, F>(
    repo: &R,
    user: &AuthenticatedEmployee,
    assignment_id: i32,
    apply: F,
) -> ServiceResult<DeliveryAssignment>
where
    R: DeliveryAssignmentReader + DeliveryAssignmentWriter + ?Sized,
    F: FnOnce(&DeliveryAssignment, NaiveDateTime) -> Result<DeliveryAssignment, TransitionError>,
{
    if !user.has_role(EmployeeType::DeliveryCoordinator) {
        return Err(ServiceError::Unauthorized);
    }

    let current = repo
        .get_assignment_by_id(assignment_id)
        .map_err(ServiceError::from)?
        .ok_or(TransitionError::AssignmentNotFound(assignment_id))?;

    let next = apply(&current, now()).inspect_err(|err| {
        log::warn!("Assignment {assignment_id} transition refused: {err}");
    })?;

    let saved = repo
        .save_assignment(&current, &next)
        .map_err(ServiceError::from)?;
    log::info!(
        "Assignment {} moved from {} to {} by {}",
        saved.id,
        current.status,
        saved.status,
        user.empid
    );
    Ok(saved)
}

fn list<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    query: AssignmentListQuery,
) -> ServiceResult<Vec<DeliveryAssignment>>
where
    R: DeliveryAssignmentReader + ?Sized,
{
    if !user.has_role(EmployeeType::DeliveryCoordinator) {
        return Err(ServiceError::Unauthorized);
    }

    repo.list_assignments(query).map_err(ServiceError::from)
}

pub fn create_assignment<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    request: CreateAssignmentRequest,
) -> ServiceResult<DeliveryAssignment>
where
    R: DeliveryAssignmentWriter + ?Sized,
{
    if !user.has_role(EmployeeType::DeliveryCoordinator) {
        return Err(ServiceError::Unauthorized);
    }

    let new_assignment = request
        .into_new_assignment(now())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let assignment = repo
        .create_assignment(&new_assignment)
        .map_err(ServiceError::from)?;
    log::info!(
        "Order {} assigned to delivery person {} by {}",
        assignment.order_id,
        assignment.delivery_person_id,
        user.empid
    );
    Ok(assignment)
}

pub fn list_assignments<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
) -> ServiceResult<Vec<DeliveryAssignment>>
where
    R: DeliveryAssignmentReader + ?Sized,
{
    list(repo, user, AssignmentListQuery::new())
}

pub fn get_assignment<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    assignment_id: i32,
) -> ServiceResult<DeliveryAssignment>
where
    R: DeliveryAssignmentReader + ?Sized,
{
    if !user.has_role(EmployeeType::DeliveryCoordinator) {
        return Err(ServiceError::Unauthorized);
    }

    repo.get_assignment_by_id(assignment_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

pub fn assignments_for_person<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    delivery_person_id: i32,
) -> ServiceResult<Vec<DeliveryAssignment>>
where
    R: DeliveryAssignmentReader + ?Sized,
{
    list(
        repo,
        user,
        AssignmentListQuery::new().delivery_person(delivery_person_id),
    )
}

/// ASSIGNED and PICKED_UP assignments of one courier.
pub fn active_assignments_for_person<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    delivery_person_id: i32,
) -> ServiceResult<Vec<DeliveryAssignment>>
where
    R: DeliveryAssignmentReader + ?Sized,
{
    list(
        repo,
        user,
        AssignmentListQuery::new()
            .delivery_person(delivery_person_id)
            .active(),
    )
}

pub fn assignment_for_order<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    order_id: i32,
) -> ServiceResult<DeliveryAssignment>
where
    R: DeliveryAssignmentReader + ?Sized,
{
    if !user.has_role(EmployeeType::DeliveryCoordinator) {
        return Err(ServiceError::Unauthorized);
    }

    repo.get_assignment_by_order_id(order_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

pub fn assignments_by_status<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    status: &str,
) -> ServiceResult<Vec<DeliveryAssignment>>
where
    R: DeliveryAssignmentReader + ?Sized,
{
    let status = status
        .parse::<AssignmentStatus>()
        .map_err(|_| ServiceError::Form(format!("Invalid status: {status}")))?;
    list(repo, user, AssignmentListQuery::new().status(status))
}

pub fn mark_picked_up<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    assignment_id: i32,
    request: NoteRequest,
) -> ServiceResult<DeliveryAssignment>
where
    R: DeliveryAssignmentReader + DeliveryAssignmentWriter + ?Sized,
{
    let note = request.note();
    transition(repo, user, assignment_id, |current, at| {
        current.picked_up(note.as_deref(), at)
    })
}

pub fn mark_delivered<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    assignment_id: i32,
    request: NoteRequest,
) -> ServiceResult<DeliveryAssignment>
where
    R: DeliveryAssignmentReader + DeliveryAssignmentWriter + ?Sized,
{
    let note = request.note();
    transition(repo, user, assignment_id, |current, at| {
        current.delivered(note.as_deref(), at)
    })
}

pub fn cancel_assignment<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    assignment_id: i32,
    request: CancelRequest,
) -> ServiceResult<DeliveryAssignment>
where
    R: DeliveryAssignmentReader + DeliveryAssignmentWriter + ?Sized,
{
    let reason = request.reason();
    transition(repo, user, assignment_id, |current, at| {
        current.cancelled(reason.as_deref(), at)
    })
}

/// Hand the delivery to another available courier.
pub fn reassign<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    assignment_id: i32,
    request: ReassignRequest,
) -> ServiceResult<DeliveryAssignment>
where
    R: DeliveryAssignmentReader + DeliveryAssignmentWriter + DeliveryPersonReader + ?Sized,
{
    if !user.has_role(EmployeeType::DeliveryCoordinator) {
        return Err(ServiceError::Unauthorized);
    }

    let (person_id, reason) = request
        .parts()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let person = repo
        .get_delivery_person_by_id(person_id)
        .map_err(ServiceError::from)?
        .ok_or(TransitionError::DeliveryPersonNotFound(person_id))?;

    transition(repo, user, assignment_id, |current, at| {
        current.reassigned(&person, Some(&reason), at)
    })
}

pub fn update_notes<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    assignment_id: i32,
    request: UpdateNotesRequest,
) -> ServiceResult<DeliveryAssignment>
where
    R: DeliveryAssignmentReader + DeliveryAssignmentWriter + ?Sized,
{
    let notes = request
        .notes()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    transition(repo, user, assignment_id, |current, at| {
        Ok(current.with_notes(notes, at))
    })
}

/// Cancel with the administrator reason. Rows are never removed.
pub fn delete_assignment<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    assignment_id: i32,
) -> ServiceResult<DeliveryAssignment>
where
    R: DeliveryAssignmentReader + DeliveryAssignmentWriter + ?Sized,
{
    transition(repo, user, assignment_id, |current, at| {
        current.cancelled(Some(ADMIN_DELETE_REASON), at)
    })
}

/// Active assignments handed out more than `hoursAgo` hours ago.
pub fn overdue_assignments<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    query: &OverdueQuery,
) -> ServiceResult<Vec<DeliveryAssignment>>
where
    R: DeliveryAssignmentReader + ?Sized,
{
    let cutoff = query
        .cutoff(now())
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    list(
        repo,
        user,
        AssignmentListQuery::new().active().assigned_before(cutoff),
    )
}

pub fn assignments_in_range<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    query: &DateRangeQuery,
) -> ServiceResult<Vec<DeliveryAssignment>>
where
    R: DeliveryAssignmentReader + ?Sized,
{
    let (start, end) = query
        .bounds()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    list(
        repo,
        user,
        AssignmentListQuery::new()
            .assigned_after(start)
            .assigned_before(end),
    )
}

pub fn search_assignments<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    query: &SearchQuery,
) -> ServiceResult<Vec<DeliveryAssignment>>
where
    R: DeliveryAssignmentReader + ?Sized,
{
    let term = query
        .term()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    list(repo, user, AssignmentListQuery::new().notes(term))
}

pub fn assignment_stats<R>(repo: &R, user: &AuthenticatedEmployee) -> ServiceResult<AssignmentStats>
where
    R: DeliveryAssignmentReader + ?Sized,
{
    if !user.has_role(EmployeeType::DeliveryCoordinator) {
        return Err(ServiceError::Unauthorized);
    }

    repo.assignment_stats().map_err(ServiceError::from)
}

pub fn person_stats<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    delivery_person_id: i32,
) -> ServiceResult<DeliveryPersonStats>
where
    R: DeliveryAssignmentReader + ?Sized,
{
    let assignments = assignments_for_person(repo, user, delivery_person_id)?;
    Ok(DeliveryPersonStats::from_assignments(&assignments))
}

/// Couriers that may receive a new assignment.
pub fn available_delivery_persons<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
) -> ServiceResult<Vec<DeliveryPerson>>
where
    R: DeliveryPersonReader + ?Sized,
{
    if !user.has_role(EmployeeType::DeliveryCoordinator) {
        return Err(ServiceError::Unauthorized);
    }

    repo.list_delivery_persons(DeliveryPersonListQuery::new().active_only())
        .map_err(ServiceError::from)
}

pub fn has_assignment<R>(repo: &R, user: &AuthenticatedEmployee, order_id: i32) -> ServiceResult<bool>
where
    R: DeliveryAssignmentReader + ?Sized,
{
    if !user.has_role(EmployeeType::DeliveryCoordinator) {
        return Err(ServiceError::Unauthorized);
    }

    Ok(repo
        .get_assignment_by_order_id(order_id)
        .map_err(ServiceError::from)?
        .is_some())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::domain::delivery_assignment::{NewDeliveryAssignment, TransitionErrorKind};
    use crate::domain::delivery_person::VehicleType;
    use crate::repository::mock::{
        MockDeliveryAssignmentReader, MockDeliveryAssignmentWriter, MockDeliveryPersonReader,
    };
    use crate::repository::{RepositoryError, RepositoryResult};

    fn datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    fn coordinator() -> AuthenticatedEmployee {
        AuthenticatedEmployee {
            empid: "D001".to_string(),
            employee_type: EmployeeType::DeliveryCoordinator,
        }
    }

    fn assignment(id: i32, status: AssignmentStatus) -> DeliveryAssignment {
        DeliveryAssignment {
            id,
            order_id: 10,
            delivery_person_id: 1,
            status,
            assigned_at: datetime(),
            picked_up_at: None,
            delivered_at: None,
            notes: Some("Leave at the gate".to_string()),
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn person(id: i32, is_active: bool) -> DeliveryPerson {
        DeliveryPerson {
            id,
            name: "Kamal Perera".to_string(),
            email: "kamal@example.com".to_string(),
            contact_number: "0711111111".to_string(),
            vehicle_type: VehicleType::Threewheel,
            vehicle_number: "WP QA-2222".to_string(),
            is_active,
            is_deleted: false,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn assert_transition(err: ServiceError, kind: TransitionErrorKind) {
        match err {
            ServiceError::Transition(inner) => assert_eq!(inner.kind(), kind),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn pickup_saves_against_the_loaded_status() {
        let mut repo = FakeRepo::new();
        repo.assignment_reader
            .expect_get_assignment_by_id()
            .returning(|id| Ok(Some(assignment(id, AssignmentStatus::Assigned))));
        repo.assignment_writer
            .expect_save_assignment()
            .times(1)
            .withf(|current, next| {
                current.status == AssignmentStatus::Assigned
                    && next.status == AssignmentStatus::PickedUp
                    && next.picked_up_at.is_some()
                    && next.notes.as_deref() == Some("Leave at the gate\n[PICKUP] Collected")
            })
            .returning(|_, next| Ok(next.clone()));

        let saved = mark_picked_up(
            &repo,
            &coordinator(),
            5,
            NoteRequest {
                notes: Some("Collected".to_string()),
            },
        )
        .expect("picked up");

        assert_eq!(saved.status, AssignmentStatus::PickedUp);
    }

    #[test]
    fn delivering_an_assigned_order_is_illegal() {
        let mut repo = FakeRepo::new();
        repo.assignment_reader
            .expect_get_assignment_by_id()
            .returning(|id| Ok(Some(assignment(id, AssignmentStatus::Assigned))));
        repo.assignment_writer.expect_save_assignment().times(0);

        let err = mark_delivered(&repo, &coordinator(), 5, NoteRequest::default()).unwrap_err();

        assert_transition(err, TransitionErrorKind::IllegalState);
    }

    #[test]
    fn missing_assignment_is_a_bad_reference() {
        let mut repo = FakeRepo::new();
        repo.assignment_reader
            .expect_get_assignment_by_id()
            .returning(|_| Ok(None));

        let err = cancel_assignment(&repo, &coordinator(), 5, CancelRequest::default()).unwrap_err();

        assert_transition(err, TransitionErrorKind::BadReference);
    }

    #[test]
    fn delivered_assignments_cannot_be_reassigned() {
        let mut repo = FakeRepo::new();
        repo.person_reader
            .expect_get_delivery_person_by_id()
            .returning(|id| Ok(Some(person(id, true))));
        repo.assignment_reader
            .expect_get_assignment_by_id()
            .returning(|id| Ok(Some(assignment(id, AssignmentStatus::Delivered))));
        repo.assignment_writer.expect_save_assignment().times(0);

        let request = ReassignRequest {
            new_delivery_person_id: Some(2),
            reason: None,
        };
        let err = reassign(&repo, &coordinator(), 5, request).unwrap_err();

        assert_transition(err, TransitionErrorKind::IllegalState);
    }

    #[test]
    fn reassign_to_an_unknown_courier_is_a_bad_reference() {
        let mut repo = FakeRepo::new();
        repo.person_reader
            .expect_get_delivery_person_by_id()
            .returning(|_| Ok(None));
        repo.assignment_reader.expect_get_assignment_by_id().times(0);

        let request = ReassignRequest {
            new_delivery_person_id: Some(2),
            reason: None,
        };
        let err = reassign(&repo, &coordinator(), 5, request).unwrap_err();

        assert_transition(err, TransitionErrorKind::BadReference);
    }

    #[test]
    fn reassign_records_the_default_reason() {
        let mut repo = FakeRepo::new();
        repo.person_reader
            .expect_get_delivery_person_by_id()
            .returning(|id| Ok(Some(person(id, true))));
        repo.assignment_reader
            .expect_get_assignment_by_id()
            .returning(|id| Ok(Some(assignment(id, AssignmentStatus::PickedUp))));
        repo.assignment_writer
            .expect_save_assignment()
            .withf(|current, next| {
                current.status == AssignmentStatus::PickedUp
                    && next.delivery_person_id == 2
                    && next.status == AssignmentStatus::Assigned
                    && next.picked_up_at.is_none()
                    && next
                        .notes
                        .as_deref()
                        .is_some_and(|notes| notes.ends_with("[REASSIGNED] Reassigned by administrator"))
            })
            .returning(|_, next| Ok(next.clone()));

        let request = ReassignRequest {
            new_delivery_person_id: Some(2),
            reason: None,
        };
        let saved = reassign(&repo, &coordinator(), 5, request).expect("reassigned");

        assert_eq!(saved.delivery_person_id, 2);
    }

    #[test]
    fn concurrent_change_surfaces_as_illegal_state() {
        let mut repo = FakeRepo::new();
        repo.assignment_reader
            .expect_get_assignment_by_id()
            .returning(|id| Ok(Some(assignment(id, AssignmentStatus::Assigned))));
        repo.assignment_writer
            .expect_save_assignment()
            .returning(|_, next| {
                Err(RepositoryError::Transition(TransitionError::StaleAssignment(
                    next.id,
                )))
            });

        let err = delete_assignment(&repo, &coordinator(), 5).unwrap_err();

        assert_transition(err, TransitionErrorKind::IllegalState);
    }

    #[test]
    fn delete_cancels_with_the_admin_reason() {
        let mut repo = FakeRepo::new();
        repo.assignment_reader
            .expect_get_assignment_by_id()
            .returning(|id| Ok(Some(assignment(id, AssignmentStatus::Assigned))));
        repo.assignment_writer
            .expect_save_assignment()
            .withf(|_, next| {
                next.status == AssignmentStatus::Cancelled
                    && next
                        .notes
                        .as_deref()
                        .is_some_and(|notes| notes.ends_with(ADMIN_DELETE_REASON))
            })
            .returning(|_, next| Ok(next.clone()));

        let saved = delete_assignment(&repo, &coordinator(), 5).expect("cancelled");

        assert_eq!(saved.status, AssignmentStatus::Cancelled);
    }

    #[test]
    fn unknown_status_filter_names_the_value() {
        let repo = FakeRepo::new();

        let err = assignments_by_status(&repo, &coordinator(), "LOST").unwrap_err();

        assert!(matches!(err, ServiceError::Form(message) if message == "Invalid status: LOST"));
    }

    #[test]
    fn overdue_lists_only_active_assignments() {
        let mut repo = FakeRepo::new();
        repo.assignment_reader
            .expect_list_assignments()
            .withf(|query| {
                query.statuses.as_deref() == Some(&AssignmentStatus::ACTIVE[..])
                    && query.assigned_before.is_some()
                    && query.assigned_after.is_none()
            })
            .returning(|_| Ok(vec![assignment(1, AssignmentStatus::Assigned)]));

        let overdue =
            overdue_assignments(&repo, &coordinator(), &OverdueQuery::default()).expect("overdue");

        assert_eq!(overdue.len(), 1);
    }

    #[test]
    fn overdue_rejects_hours_beyond_the_calendar() {
        let repo = FakeRepo::new();
        let query = OverdueQuery {
            hours_ago: Some(1_000_000_000_000),
        };

        let err = overdue_assignments(&repo, &coordinator(), &query).unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Form(message) if message == "Hours must be a positive number within range"
        ));
    }

    #[test]
    fn person_stats_average_delivered_assignments() {
        let mut repo = FakeRepo::new();
        repo.assignment_reader
            .expect_list_assignments()
            .withf(|query| query.delivery_person_id == Some(1) && query.statuses.is_none())
            .returning(|_| {
                let mut delivered = assignment(1, AssignmentStatus::Delivered);
                delivered.delivered_at = Some(delivered.assigned_at + Duration::hours(3));
                Ok(vec![delivered, assignment(2, AssignmentStatus::Assigned)])
            });

        let stats = person_stats(&repo, &coordinator(), 1).expect("stats");

        assert_eq!(stats.total_assignments, 2);
        assert_eq!(stats.delivered_count, 1);
        assert_eq!(stats.average_delivery_time, Some(3.0));
    }

    #[test]
    fn has_assignment_checks_the_order() {
        let mut repo = FakeRepo::new();
        repo.assignment_reader
            .expect_get_assignment_by_order_id()
            .returning(|order_id| {
                Ok((order_id == 10).then(|| assignment(1, AssignmentStatus::Assigned)))
            });

        assert!(has_assignment(&repo, &coordinator(), 10).expect("lookup"));
        assert!(!has_assignment(&repo, &coordinator(), 11).expect("lookup"));
    }

    #[test]
    fn cashiers_cannot_touch_assignments() {
        let repo = FakeRepo::new();
        let cashier = AuthenticatedEmployee {
            empid: "C001".to_string(),
            employee_type: EmployeeType::Cashier,
        };

        assert!(matches!(
            list_assignments(&repo, &cashier),
            Err(ServiceError::Unauthorized)
        ));
        assert!(matches!(
            delete_assignment(&repo, &cashier, 1),
            Err(ServiceError::Unauthorized)
        ));
    }

    struct FakeRepo {
        assignment_reader: MockDeliveryAssignmentReader,
        assignment_writer: MockDeliveryAssignmentWriter,
        person_reader: MockDeliveryPersonReader,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                assignment_reader: MockDeliveryAssignmentReader::new(),
                assignment_writer: MockDeliveryAssignmentWriter::new(),
                person_reader: MockDeliveryPersonReader::new(),
            }
        }
    }

    impl DeliveryAssignmentReader for FakeRepo {
        fn get_assignment_by_id(&self, id: i32) -> RepositoryResult<Option<DeliveryAssignment>> {
            self.assignment_reader.get_assignment_by_id(id)
        }

        fn get_assignment_by_order_id(
            &self,
            order_id: i32,
        ) -> RepositoryResult<Option<DeliveryAssignment>> {
            self.assignment_reader.get_assignment_by_order_id(order_id)
        }

        fn list_assignments(
            &self,
            query: AssignmentListQuery,
        ) -> RepositoryResult<Vec<DeliveryAssignment>> {
            self.assignment_reader.list_assignments(query)
        }

        fn assignment_stats(&self) -> RepositoryResult<AssignmentStats> {
            self.assignment_reader.assignment_stats()
        }
    }

    impl DeliveryAssignmentWriter for FakeRepo {
        fn create_assignment(
            &self,
            new_assignment: &NewDeliveryAssignment,
        ) -> RepositoryResult<DeliveryAssignment> {
            self.assignment_writer.create_assignment(new_assignment)
        }

        fn save_assignment(
            &self,
            current: &DeliveryAssignment,
            next: &DeliveryAssignment,
        ) -> RepositoryResult<DeliveryAssignment> {
            self.assignment_writer.save_assignment(current, next)
        }
    }

    impl DeliveryPersonReader for FakeRepo {
        fn get_delivery_person_by_id(&self, id: i32) -> RepositoryResult<Option<DeliveryPerson>> {
            self.person_reader.get_delivery_person_by_id(id)
        }

        fn list_delivery_persons(
            &self,
            query: DeliveryPersonListQuery,
        ) -> RepositoryResult<Vec<DeliveryPerson>> {
            self.person_reader.list_delivery_persons(query)
        }
    }
}
