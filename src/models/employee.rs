use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::employee::{
    Employee as DomainEmployee, EmployeeType, NewEmployee as DomainNewEmployee,
};
use crate::repository::errors::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::employees, primary_key(empid))]
pub struct Employee {
    pub empid: String,
    pub password_hash: String,
    pub employee_type: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::employees)]
pub struct NewEmployee<'a> {
    pub empid: &'a str,
    pub password_hash: &'a str,
    pub employee_type: &'a str,
}

impl TryFrom<Employee> for DomainEmployee {
    type Error = RepositoryError;

    fn try_from(value: Employee) -> Result<Self, Self::Error> {
        let employee_type = EmployeeType::from_str(&value.employee_type)
            .map_err(|err| RepositoryError::InvalidData(err.to_string()))?;

        Ok(Self {
            empid: value.empid,
            password_hash: value.password_hash,
            employee_type,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewEmployee> for NewEmployee<'a> {
    fn from(value: &'a DomainNewEmployee) -> Self {
        Self {
            empid: value.empid.as_str(),
            password_hash: value.password_hash.as_str(),
            employee_type: value.employee_type.as_str(),
        }
    }
}
