use diesel::prelude::*;

use crate::{
    domain::employee::{Employee as DomainEmployee, NewEmployee as DomainNewEmployee},
    models::employee::{Employee as DbEmployee, NewEmployee as DbNewEmployee},
    repository::{DieselRepository, EmployeeReader, EmployeeWriter, RepositoryResult},
    schema::employees,
};

impl EmployeeReader for DieselRepository {
    fn get_employee_by_id(&self, empid: &str) -> RepositoryResult<Option<DomainEmployee>> {
        let mut conn = self.conn()?;
        let employee = employees::table
            .find(empid)
            .first::<DbEmployee>(&mut conn)
            .optional()?;

        employee.map(DomainEmployee::try_from).transpose()
    }

    fn count_employees(&self) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let total = employees::table.count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }
}

impl EmployeeWriter for DieselRepository {
    fn create_employee(&self, new_employee: &DomainNewEmployee) -> RepositoryResult<DomainEmployee> {
        let mut conn = self.conn()?;

        let created = diesel::insert_into(employees::table)
            .values(&DbNewEmployee::from(new_employee))
            .get_result::<DbEmployee>(&mut conn)?;

        created.try_into()
    }
}
