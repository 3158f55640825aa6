use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::delivery_person::{
        DeliveryPerson as DomainDeliveryPerson, DeliveryPersonListQuery,
        NewDeliveryPerson as DomainNewDeliveryPerson,
        UpdateDeliveryPerson as DomainUpdateDeliveryPerson,
    },
    models::delivery_person::{
        DeliveryPerson as DbDeliveryPerson, NewDeliveryPerson as DbNewDeliveryPerson,
        UpdateDeliveryPerson as DbUpdateDeliveryPerson,
    },
    repository::{
        DeliveryPersonReader, DeliveryPersonWriter, DieselRepository, LIKE_ESCAPE,
        RepositoryError, RepositoryResult, contains_pattern,
    },
    schema::delivery_persons,
};

impl DeliveryPersonReader for DieselRepository {
    fn get_delivery_person_by_id(&self, id: i32) -> RepositoryResult<Option<DomainDeliveryPerson>> {
        let mut conn = self.conn()?;
        let person = delivery_persons::table
            .find(id)
            .first::<DbDeliveryPerson>(&mut conn)
            .optional()?;

        person.map(DomainDeliveryPerson::try_from).transpose()
    }

    fn list_delivery_persons(
        &self,
        query: DeliveryPersonListQuery,
    ) -> RepositoryResult<Vec<DomainDeliveryPerson>> {
        let mut conn = self.conn()?;

        let mut items = delivery_persons::table
            .filter(delivery_persons::is_deleted.eq(false))
            .into_boxed::<Sqlite>();

        if query.active_only {
            items = items.filter(delivery_persons::is_active.eq(true));
        }

        if let Some(vehicle_type) = query.vehicle_type {
            items = items.filter(delivery_persons::vehicle_type.eq(vehicle_type.as_str()));
        }

        if let Some(name) = query.name.as_ref() {
            items = items.filter(
                delivery_persons::name
                    .like(contains_pattern(name))
                    .escape(LIKE_ESCAPE),
            );
        }

        items
            .order(delivery_persons::id.asc())
            .load::<DbDeliveryPerson>(&mut conn)?
            .into_iter()
            .map(DomainDeliveryPerson::try_from)
            .collect()
    }
}

impl DeliveryPersonWriter for DieselRepository {
    fn create_delivery_person(
        &self,
        new_person: &DomainNewDeliveryPerson,
    ) -> RepositoryResult<DomainDeliveryPerson> {
        let mut conn = self.conn()?;

        let created = diesel::insert_into(delivery_persons::table)
            .values(&DbNewDeliveryPerson::from(new_person))
            .get_result::<DbDeliveryPerson>(&mut conn)?;

        created.try_into()
    }

    fn update_delivery_person(
        &self,
        id: i32,
        updates: &DomainUpdateDeliveryPerson,
    ) -> RepositoryResult<DomainDeliveryPerson> {
        let mut conn = self.conn()?;

        let updated = diesel::update(delivery_persons::table.find(id))
            .set(&DbUpdateDeliveryPerson::from(updates))
            .get_result::<DbDeliveryPerson>(&mut conn)?;

        updated.try_into()
    }

    fn delete_delivery_person(&self, id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(delivery_persons::table.find(id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
