//! Courier administration for delivery coordinators.

use crate::domain::auth::AuthenticatedEmployee;
use crate::domain::delivery_person::{
    DeliveryPerson, DeliveryPersonListQuery, UpdateDeliveryPerson, VehicleType,
};
use crate::domain::employee::EmployeeType;
use crate::forms::delivery::{DeliveryPersonForm, SearchQuery};
use crate::repository::{DeliveryPersonReader, DeliveryPersonWriter};
use crate::services::{ServiceError, ServiceResult};

fn list<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    query: DeliveryPersonListQuery,
) -> ServiceResult<Vec<DeliveryPerson>>
where
    R: DeliveryPersonReader + ?Sized,
{
    if !user.has_role(EmployeeType::DeliveryCoordinator) {
        return Err(ServiceError::Unauthorized);
    }

    repo.list_delivery_persons(query)
        .map_err(ServiceError::from)
}

/// Every courier that has not been soft deleted.
pub fn list_delivery_persons<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
) -> ServiceResult<Vec<DeliveryPerson>>
where
    R: DeliveryPersonReader + ?Sized,
{
    list(repo, user, DeliveryPersonListQuery::new())
}

/// Couriers that can take new deliveries.
pub fn list_active_delivery_persons<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
) -> ServiceResult<Vec<DeliveryPerson>>
where
    R: DeliveryPersonReader + ?Sized,
{
    list(repo, user, DeliveryPersonListQuery::new().active_only())
}

pub fn list_by_vehicle_type<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    vehicle_type: &str,
) -> ServiceResult<Vec<DeliveryPerson>>
where
    R: DeliveryPersonReader + ?Sized,
{
    if !user.has_role(EmployeeType::DeliveryCoordinator) {
        return Err(ServiceError::Unauthorized);
    }

    let vehicle_type = vehicle_type
        .parse::<VehicleType>()
        .map_err(|err| ServiceError::Form(format!("Invalid vehicle type: {}", err.0)))?;
    list(repo, user, DeliveryPersonListQuery::new().vehicle_type(vehicle_type))
}

pub fn search_delivery_persons<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    query: &SearchQuery,
) -> ServiceResult<Vec<DeliveryPerson>>
where
    R: DeliveryPersonReader + ?Sized,
{
    if !user.has_role(EmployeeType::DeliveryCoordinator) {
        return Err(ServiceError::Unauthorized);
    }

    let term = query
        .term()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    list(repo, user, DeliveryPersonListQuery::new().name(term))
}

pub fn get_delivery_person<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    id: i32,
) -> ServiceResult<DeliveryPerson>
where
    R: DeliveryPersonReader + ?Sized,
{
    if !user.has_role(EmployeeType::DeliveryCoordinator) {
        return Err(ServiceError::Unauthorized);
    }

    repo.get_delivery_person_by_id(id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

pub fn create_delivery_person<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    form: DeliveryPersonForm,
) -> ServiceResult<DeliveryPerson>
where
    R: DeliveryPersonWriter + ?Sized,
{
    if !user.has_role(EmployeeType::DeliveryCoordinator) {
        return Err(ServiceError::Unauthorized);
    }

    let new_person = form
        .into_new_person()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let person = repo
        .create_delivery_person(&new_person)
        .map_err(ServiceError::from)?;
    log::info!("Delivery person {} registered by {}", person.id, user.empid);
    Ok(person)
}

pub fn update_delivery_person<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    id: i32,
    form: DeliveryPersonForm,
) -> ServiceResult<DeliveryPerson>
where
    R: DeliveryPersonReader + DeliveryPersonWriter + ?Sized,
{
    let updates = form
        .into_update()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    apply_update(repo, user, id, updates)
}

/// Hide the courier from listings while keeping assignment history intact.
pub fn soft_delete_delivery_person<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    id: i32,
) -> ServiceResult<DeliveryPerson>
where
    R: DeliveryPersonReader + DeliveryPersonWriter + ?Sized,
{
    apply_update(repo, user, id, UpdateDeliveryPerson::new().deleted(true))
}

pub fn hard_delete_delivery_person<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    id: i32,
) -> ServiceResult<()>
where
    R: DeliveryPersonReader + DeliveryPersonWriter + ?Sized,
{
    let person = get_delivery_person(repo, user, id)?;

    repo.delete_delivery_person(person.id)
        .map_err(ServiceError::from)?;
    log::info!("Delivery person {} permanently deleted by {}", person.id, user.empid);
    Ok(())
}

pub fn activate_delivery_person<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    id: i32,
) -> ServiceResult<DeliveryPerson>
where
    R: DeliveryPersonReader + DeliveryPersonWriter + ?Sized,
{
    apply_update(repo, user, id, UpdateDeliveryPerson::new().active(true))
}

pub fn deactivate_delivery_person<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    id: i32,
) -> ServiceResult<DeliveryPerson>
where
    R: DeliveryPersonReader + DeliveryPersonWriter + ?Sized,
{
    apply_update(repo, user, id, UpdateDeliveryPerson::new().active(false))
}

fn apply_update<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    id: i32,
    updates: UpdateDeliveryPerson,
) -> ServiceResult<DeliveryPerson>
where
    R: DeliveryPersonReader + DeliveryPersonWriter + ?Sized,
{
    let person = get_delivery_person(repo, user, id)?;

    let updated = repo
        .update_delivery_person(person.id, &updates)
        .map_err(ServiceError::from)?;
    log::info!("Delivery person {} updated by {}", updated.id, user.empid);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::domain::delivery_person::NewDeliveryPerson;
    use crate::repository::mock::{MockDeliveryPersonReader, MockDeliveryPersonWriter};
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

    fn person(id: i32) -> DeliveryPerson {
        DeliveryPerson {
            id,
            name: "Nimal Silva".to_string(),
            email: "nimal@example.com".to_string(),
            contact_number: "0771234567".to_string(),
            vehicle_type: VehicleType::Bike,
            vehicle_number: "WP BAA-1234".to_string(),
            is_active: true,
            is_deleted: false,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn form() -> DeliveryPersonForm {
        DeliveryPersonForm {
            name: "Nimal Silva".to_string(),
            email: "nimal@example.com".to_string(),
            contact_number: "0771234567".to_string(),
            vehicle_type: "LORRY".to_string(),
            vehicle_number: "WP LA-1111".to_string(),
            is_active: Some(true),
        }
    }

    #[test]
    fn cashiers_cannot_manage_couriers() {
        let repo = FakeRepo::new();
        let cashier = AuthenticatedEmployee {
            empid: "C001".to_string(),
            employee_type: EmployeeType::Cashier,
        };

        assert!(matches!(
            list_delivery_persons(&repo, &cashier),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn active_listing_filters_in_the_query() {
        let mut repo = FakeRepo::new();
        repo.person_reader
            .expect_list_delivery_persons()
            .withf(|query| query.active_only && query.vehicle_type.is_none())
            .returning(|_| Ok(vec![person(1)]));

        let persons = list_active_delivery_persons(&repo, &coordinator()).expect("persons");

        assert_eq!(persons.len(), 1);
    }

    #[test]
    fn unknown_vehicle_type_is_a_form_error() {
        let mut repo = FakeRepo::new();
        repo.person_reader.expect_list_delivery_persons().times(0);

        let err = list_by_vehicle_type(&repo, &coordinator(), "rocket").unwrap_err();

        assert!(matches!(err, ServiceError::Form(message) if message == "Invalid vehicle type: rocket"));
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let mut repo = FakeRepo::new();
        repo.person_writer
            .expect_create_delivery_person()
            .returning(|_| {
                Err(RepositoryError::ConstraintViolation(
                    "UNIQUE constraint failed: delivery_persons.email".to_string(),
                ))
            });

        assert!(matches!(
            create_delivery_person(&repo, &coordinator(), form()),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn soft_delete_only_flags_the_row() {
        let mut repo = FakeRepo::new();
        repo.person_reader
            .expect_get_delivery_person_by_id()
            .returning(|id| Ok(Some(person(id))));
        repo.person_writer
            .expect_update_delivery_person()
            .times(1)
            .withf(|id, updates| {
                *id == 3
                    && updates.is_deleted == Some(true)
                    && updates.is_active.is_none()
                    && updates.name.is_none()
            })
            .returning(|id, _| {
                let mut deleted = person(id);
                deleted.is_deleted = true;
                Ok(deleted)
            });
        repo.person_writer.expect_delete_delivery_person().times(0);

        let deleted = soft_delete_delivery_person(&repo, &coordinator(), 3).expect("deleted");

        assert!(deleted.is_deleted);
    }

    #[test]
    fn updating_a_missing_courier_is_not_found() {
        let mut repo = FakeRepo::new();
        repo.person_reader
            .expect_get_delivery_person_by_id()
            .returning(|_| Ok(None));
        repo.person_writer.expect_update_delivery_person().times(0);

        assert!(matches!(
            deactivate_delivery_person(&repo, &coordinator(), 9),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn update_replaces_the_fields() {
        let mut repo = FakeRepo::new();
        repo.person_reader
            .expect_get_delivery_person_by_id()
            .returning(|id| Ok(Some(person(id))));
        repo.person_writer
            .expect_update_delivery_person()
            .withf(|_, updates| {
                updates.vehicle_type == Some(VehicleType::Lorry)
                    && updates.vehicle_number.as_deref() == Some("WP LA-1111")
                    && updates.is_active == Some(true)
            })
            .returning(|id, _| Ok(person(id)));

        assert!(update_delivery_person(&repo, &coordinator(), 2, form()).is_ok());
    }

    struct FakeRepo {
        person_reader: MockDeliveryPersonReader,
        person_writer: MockDeliveryPersonWriter,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                person_reader: MockDeliveryPersonReader::new(),
                person_writer: MockDeliveryPersonWriter::new(),
            }
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

    impl DeliveryPersonWriter for FakeRepo {
        fn create_delivery_person(
            &self,
            new_person: &NewDeliveryPerson,
        ) -> RepositoryResult<DeliveryPerson> {
            self.person_writer.create_delivery_person(new_person)
        }

        fn update_delivery_person(
            &self,
            id: i32,
            updates: &UpdateDeliveryPerson,
        ) -> RepositoryResult<DeliveryPerson> {
            self.person_writer.update_delivery_person(id, updates)
        }

        fn delete_delivery_person(&self, id: i32) -> RepositoryResult<()> {
            self.person_writer.delete_delivery_person(id)
        }
    }
}
