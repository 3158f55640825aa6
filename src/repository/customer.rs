use diesel::prelude::*;

use crate::{
    domain::customer::{Customer as DomainCustomer, NewCustomer as DomainNewCustomer},
    domain::customer_payment::{
        CustomerPayment as DomainCustomerPayment, NewCustomerPayment as DomainNewCustomerPayment,
    },
    models::customer::{Customer as DbCustomer, NewCustomer as DbNewCustomer},
    models::customer_payment::{
        CustomerPayment as DbCustomerPayment, NewCustomerPayment as DbNewCustomerPayment,
    },
    repository::{CustomerReader, CustomerWriter, DieselRepository, RepositoryResult},
};

impl CustomerReader for DieselRepository {
    fn get_customer_by_username(&self, username: &str) -> RepositoryResult<Option<DomainCustomer>> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let customer = customers::table
            .find(username)
            .first::<DbCustomer>(&mut conn)
            .optional()?;

        Ok(customer.map(Into::into))
    }

    fn get_customer_by_email(&self, email: &str) -> RepositoryResult<Option<DomainCustomer>> {
        use crate::schema::customers;

        let normalized_email = email.trim().to_lowercase();

        let mut conn = self.conn()?;
        let customer = customers::table
            .filter(customers::email.eq(normalized_email))
            .first::<DbCustomer>(&mut conn)
            .optional()?;

        Ok(customer.map(Into::into))
    }

    fn get_latest_payment_details(
        &self,
        username: &str,
    ) -> RepositoryResult<Option<DomainCustomerPayment>> {
        let mut conn = self.conn()?;
        let payment = latest_payment_details(&mut conn, username)?;
        Ok(payment.map(Into::into))
    }
}

impl CustomerWriter for DieselRepository {
    fn create_customer(&self, new_customer: &DomainNewCustomer) -> RepositoryResult<DomainCustomer> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let db_new = DbNewCustomer::from(new_customer);

        let created = diesel::insert_into(customers::table)
            .values(&db_new)
            .get_result::<DbCustomer>(&mut conn)?;

        Ok(created.into())
    }

    fn save_payment_details(
        &self,
        details: &DomainNewCustomerPayment,
    ) -> RepositoryResult<DomainCustomerPayment> {
        let mut conn = self.conn()?;
        let created = insert_payment_details(&mut conn, details)?;
        Ok(created.into())
    }
}

/// Latest active bank record, newest first with the id as tie breaker.
pub(crate) fn latest_payment_details(
    conn: &mut SqliteConnection,
    username: &str,
) -> QueryResult<Option<DbCustomerPayment>> {
    use crate::schema::customer_payments;

    customer_payments::table
        .filter(customer_payments::username.eq(username))
        .filter(customer_payments::is_active.eq(true))
        .order((
            customer_payments::created_at.desc(),
            customer_payments::id.desc(),
        ))
        .first::<DbCustomerPayment>(conn)
        .optional()
}

pub(crate) fn insert_payment_details(
    conn: &mut SqliteConnection,
    details: &DomainNewCustomerPayment,
) -> QueryResult<DbCustomerPayment> {
    use crate::schema::customer_payments;

    diesel::insert_into(customer_payments::table)
        .values(&DbNewCustomerPayment::from(details))
        .get_result::<DbCustomerPayment>(conn)
}
