use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VehicleType {
    Bike,
    Threewheel,
    Lorry,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Bike => "BIKE",
            VehicleType::Threewheel => "THREEWHEEL",
            VehicleType::Lorry => "LORRY",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown vehicle type `{0}`")]
pub struct UnknownVehicleType(pub String);

impl FromStr for VehicleType {
    type Err = UnknownVehicleType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "BIKE" => Ok(VehicleType::Bike),
            "THREEWHEEL" => Ok(VehicleType::Threewheel),
            "LORRY" => Ok(VehicleType::Lorry),
            _ => Err(UnknownVehicleType(value.to_string())),
        }
    }
}

/// A courier who can be assigned to approved orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPerson {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub contact_number: String,
    pub vehicle_type: VehicleType,
    pub vehicle_number: String,
    pub is_active: bool,
    /// Soft-delete marker. Deleted couriers stay in the table for history.
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl DeliveryPerson {
    /// Whether the courier may receive new or reassigned deliveries.
    pub fn is_available(&self) -> bool {
        self.is_active && !self.is_deleted
    }
}

/// Payload required to register a courier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeliveryPerson {
    pub name: String,
    pub email: String,
    pub contact_number: String,
    pub vehicle_type: VehicleType,
    pub vehicle_number: String,
}

impl NewDeliveryPerson {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        contact_number: impl Into<String>,
        vehicle_type: VehicleType,
        vehicle_number: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into().to_lowercase(),
            contact_number: contact_number.into(),
            vehicle_type,
            vehicle_number: vehicle_number.into(),
        }
    }
}

/// Patch data applied when updating a courier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateDeliveryPerson {
    pub name: Option<String>,
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub vehicle_type: Option<VehicleType>,
    pub vehicle_number: Option<String>,
    pub is_active: Option<bool>,
    pub is_deleted: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateDeliveryPerson {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateDeliveryPerson {
    pub fn new() -> Self {
        Self {
            name: None,
            email: None,
            contact_number: None,
            vehicle_type: None,
            vehicle_number: None,
            is_active: None,
            is_deleted: None,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into().to_lowercase());
        self
    }

    pub fn contact_number(mut self, contact_number: impl Into<String>) -> Self {
        self.contact_number = Some(contact_number.into());
        self
    }

    pub fn vehicle_type(mut self, vehicle_type: VehicleType) -> Self {
        self.vehicle_type = Some(vehicle_type);
        self
    }

    pub fn vehicle_number(mut self, vehicle_number: impl Into<String>) -> Self {
        self.vehicle_number = Some(vehicle_number.into());
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn deleted(mut self, is_deleted: bool) -> Self {
        self.is_deleted = Some(is_deleted);
        self
    }
}

/// Query definition used to list couriers.
///
/// Soft-deleted couriers are always excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryPersonListQuery {
    pub active_only: bool,
    pub vehicle_type: Option<VehicleType>,
    /// Case-insensitive substring match on the name.
    pub name: Option<String>,
}

impl DeliveryPersonListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    pub fn vehicle_type(mut self, vehicle_type: VehicleType) -> Self {
        self.vehicle_type = Some(vehicle_type);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
