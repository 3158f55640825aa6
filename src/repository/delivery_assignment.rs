use diesel::dsl::{count_star, exists, select};
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::delivery_assignment::{
        AssignmentListQuery, AssignmentStats, AssignmentStatus,
        DeliveryAssignment as DomainDeliveryAssignment,
        NewDeliveryAssignment as DomainNewDeliveryAssignment, TransitionError,
    },
    domain::delivery_person::DeliveryPerson as DomainDeliveryPerson,
    models::delivery_assignment::{
        DeliveryAssignment as DbDeliveryAssignment,
        NewDeliveryAssignment as DbNewDeliveryAssignment,
        UpdateDeliveryAssignment as DbUpdateDeliveryAssignment,
    },
    models::delivery_person::DeliveryPerson as DbDeliveryPerson,
    repository::{
        DeliveryAssignmentReader, DeliveryAssignmentWriter, DieselRepository, LIKE_ESCAPE,
        RepositoryError, RepositoryResult, contains_pattern,
    },
    schema::{delivery_assignments, delivery_persons, orders},
};

impl DeliveryAssignmentReader for DieselRepository {
    fn get_assignment_by_id(&self, id: i32) -> RepositoryResult<Option<DomainDeliveryAssignment>> {
        let mut conn = self.conn()?;
        let assignment = delivery_assignments::table
            .find(id)
            .first::<DbDeliveryAssignment>(&mut conn)
            .optional()?;

        assignment.map(DomainDeliveryAssignment::try_from).transpose()
    }

    fn get_assignment_by_order_id(
        &self,
        order_id: i32,
    ) -> RepositoryResult<Option<DomainDeliveryAssignment>> {
        let mut conn = self.conn()?;
        let assignment = delivery_assignments::table
            .filter(delivery_assignments::order_id.eq(order_id))
            .first::<DbDeliveryAssignment>(&mut conn)
            .optional()?;

        assignment.map(DomainDeliveryAssignment::try_from).transpose()
    }

    fn list_assignments(
        &self,
        query: AssignmentListQuery,
    ) -> RepositoryResult<Vec<DomainDeliveryAssignment>> {
        let mut conn = self.conn()?;

        let mut items = delivery_assignments::table.into_boxed::<Sqlite>();

        if let Some(person_id) = query.delivery_person_id {
            items = items.filter(delivery_assignments::delivery_person_id.eq(person_id));
        }

        if let Some(statuses) = query.statuses.as_ref() {
            let values: Vec<&'static str> = statuses.iter().map(AssignmentStatus::as_str).collect();
            items = items.filter(delivery_assignments::status.eq_any(values));
        }

        if let Some(after) = query.assigned_after {
            items = items.filter(delivery_assignments::assigned_at.ge(after));
        }

        if let Some(before) = query.assigned_before {
            items = items.filter(delivery_assignments::assigned_at.lt(before));
        }

        if let Some(term) = query.notes.as_ref() {
            items = items.filter(
                delivery_assignments::notes
                    .like(contains_pattern(term))
                    .escape(LIKE_ESCAPE),
            );
        }

        items
            .order((
                delivery_assignments::assigned_at.desc(),
                delivery_assignments::id.desc(),
            ))
            .load::<DbDeliveryAssignment>(&mut conn)?
            .into_iter()
            .map(DomainDeliveryAssignment::try_from)
            .collect()
    }

    fn assignment_stats(&self) -> RepositoryResult<AssignmentStats> {
        let mut conn = self.conn()?;

        let counts = delivery_assignments::table
            .group_by(delivery_assignments::status)
            .select((delivery_assignments::status, count_star()))
            .load::<(String, i64)>(&mut conn)?;

        let mut stats = AssignmentStats::default();
        for (status, count) in counts {
            let status = status
                .parse::<AssignmentStatus>()
                .map_err(|err| RepositoryError::InvalidData(err.to_string()))?;
            stats.record(status, count);
        }

        Ok(stats)
    }
}

impl DeliveryAssignmentWriter for DieselRepository {
    fn create_assignment(
        &self,
        new_assignment: &DomainNewDeliveryAssignment,
    ) -> RepositoryResult<DomainDeliveryAssignment> {
        let mut conn = self.conn()?;
        let order_id = new_assignment.order_id;
        let person_id = new_assignment.delivery_person_id;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let order_exists =
                select(exists(orders::table.find(order_id))).get_result::<bool>(conn)?;
            if !order_exists {
                return Err(TransitionError::OrderNotFound(order_id).into());
            }

            let already_assigned = select(exists(
                delivery_assignments::table.filter(delivery_assignments::order_id.eq(order_id)),
            ))
            .get_result::<bool>(conn)?;
            if already_assigned {
                return Err(TransitionError::AlreadyAssigned(order_id).into());
            }

            let person: DomainDeliveryPerson = delivery_persons::table
                .find(person_id)
                .first::<DbDeliveryPerson>(conn)
                .optional()?
                .ok_or(TransitionError::DeliveryPersonNotFound(person_id))?
                .try_into()?;
            if !person.is_available() {
                return Err(TransitionError::DeliveryPersonUnavailable(person_id).into());
            }

            let created = diesel::insert_into(delivery_assignments::table)
                .values(&DbNewDeliveryAssignment::from(new_assignment))
                .get_result::<DbDeliveryAssignment>(conn)?;

            created.try_into()
        })
    }

    fn save_assignment(
        &self,
        current: &DomainDeliveryAssignment,
        next: &DomainDeliveryAssignment,
    ) -> RepositoryResult<DomainDeliveryAssignment> {
        let mut conn = self.conn()?;

        let target = delivery_assignments::table
            .filter(delivery_assignments::id.eq(current.id))
            .filter(delivery_assignments::status.eq(current.status.as_str()))
            .filter(delivery_assignments::updated_at.eq(current.updated_at));

        let updated = diesel::update(target)
            .set(&DbUpdateDeliveryAssignment::from(next))
            .get_result::<DbDeliveryAssignment>(&mut conn)
            .optional()?;

        match updated {
            Some(row) => row.try_into(),
            None => Err(TransitionError::StaleAssignment(next.id).into()),
        }
    }
}
