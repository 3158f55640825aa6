use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::delivery_person::{
    DeliveryPerson as DomainDeliveryPerson, NewDeliveryPerson as DomainNewDeliveryPerson,
    UpdateDeliveryPerson as DomainUpdateDeliveryPerson, VehicleType,
};
use crate::repository::errors::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::delivery_persons)]
pub struct DeliveryPerson {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub contact_number: String,
    pub vehicle_type: String,
    pub vehicle_number: String,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::delivery_persons)]
pub struct NewDeliveryPerson<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub contact_number: &'a str,
    pub vehicle_type: &'a str,
    pub vehicle_number: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::delivery_persons)]
pub struct UpdateDeliveryPerson<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub contact_number: Option<&'a str>,
    pub vehicle_type: Option<&'a str>,
    pub vehicle_number: Option<&'a str>,
    pub is_active: Option<bool>,
    pub is_deleted: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<DeliveryPerson> for DomainDeliveryPerson {
    type Error = RepositoryError;

    fn try_from(value: DeliveryPerson) -> Result<Self, Self::Error> {
        let vehicle_type = VehicleType::from_str(&value.vehicle_type)
            .map_err(|err| RepositoryError::InvalidData(err.to_string()))?;

        Ok(Self {
            id: value.id,
            name: value.name,
            email: value.email,
            contact_number: value.contact_number,
            vehicle_type,
            vehicle_number: value.vehicle_number,
            is_active: value.is_active,
            is_deleted: value.is_deleted,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewDeliveryPerson> for NewDeliveryPerson<'a> {
    fn from(value: &'a DomainNewDeliveryPerson) -> Self {
        Self {
            name: value.name.as_str(),
            email: value.email.as_str(),
            contact_number: value.contact_number.as_str(),
            vehicle_type: value.vehicle_type.as_str(),
            vehicle_number: value.vehicle_number.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateDeliveryPerson> for UpdateDeliveryPerson<'a> {
    fn from(value: &'a DomainUpdateDeliveryPerson) -> Self {
        Self {
            name: value.name.as_deref(),
            email: value.email.as_deref(),
            contact_number: value.contact_number.as_deref(),
            vehicle_type: value.vehicle_type.as_ref().map(VehicleType::as_str),
            vehicle_number: value.vehicle_number.as_deref(),
            is_active: value.is_active,
            is_deleted: value.is_deleted,
            updated_at: value.updated_at,
        }
    }
}
