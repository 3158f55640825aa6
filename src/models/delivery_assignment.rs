use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::delivery_assignment::{
    AssignmentStatus, DeliveryAssignment as DomainDeliveryAssignment,
    NewDeliveryAssignment as DomainNewDeliveryAssignment,
};
use crate::repository::errors::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::delivery_assignments)]
pub struct DeliveryAssignment {
    pub id: i32,
    pub order_id: i32,
    pub delivery_person_id: i32,
    pub status: String,
    pub assigned_at: NaiveDateTime,
    pub picked_up_at: Option<NaiveDateTime>,
    pub delivered_at: Option<NaiveDateTime>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::delivery_assignments)]
pub struct NewDeliveryAssignment<'a> {
    pub order_id: i32,
    pub delivery_person_id: i32,
    pub status: &'a str,
    pub assigned_at: NaiveDateTime,
    pub notes: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Full lifecycle state written back after a transition.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::delivery_assignments)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateDeliveryAssignment<'a> {
    pub delivery_person_id: i32,
    pub status: &'a str,
    pub assigned_at: NaiveDateTime,
    pub picked_up_at: Option<NaiveDateTime>,
    pub delivered_at: Option<NaiveDateTime>,
    pub notes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<DeliveryAssignment> for DomainDeliveryAssignment {
    type Error = RepositoryError;

    fn try_from(value: DeliveryAssignment) -> Result<Self, Self::Error> {
        let status = AssignmentStatus::from_str(&value.status)
            .map_err(|err| RepositoryError::InvalidData(err.to_string()))?;

        Ok(Self {
            id: value.id,
            order_id: value.order_id,
            delivery_person_id: value.delivery_person_id,
            status,
            assigned_at: value.assigned_at,
            picked_up_at: value.picked_up_at,
            delivered_at: value.delivered_at,
            notes: value.notes,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewDeliveryAssignment> for NewDeliveryAssignment<'a> {
    fn from(value: &'a DomainNewDeliveryAssignment) -> Self {
        Self {
            order_id: value.order_id,
            delivery_person_id: value.delivery_person_id,
            status: AssignmentStatus::Assigned.as_str(),
            assigned_at: value.assigned_at,
            notes: value.notes.as_deref(),
            created_at: value.assigned_at,
            updated_at: value.assigned_at,
        }
    }
}

impl<'a> From<&'a DomainDeliveryAssignment> for UpdateDeliveryAssignment<'a> {
    fn from(value: &'a DomainDeliveryAssignment) -> Self {
        Self {
            delivery_person_id: value.delivery_person_id,
            status: value.status.as_str(),
            assigned_at: value.assigned_at,
            picked_up_at: value.picked_up_at,
            delivered_at: value.delivered_at,
            notes: value.notes.as_deref(),
            updated_at: value.updated_at,
        }
    }
}
