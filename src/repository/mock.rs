use mockall::mock;

use super::{
    CustomerReader, CustomerWriter, DeliveryAssignmentReader, DeliveryAssignmentWriter,
    DeliveryPersonReader, DeliveryPersonWriter, EmployeeReader, EmployeeWriter, OrderReader,
    OrderWriter, ProductReader, ProductWriter, RepositoryResult,
};
use crate::domain::{
    bill::Bill,
    customer::{Customer, NewCustomer},
    customer_payment::{CustomerPayment, NewCustomerPayment},
    delivery_assignment::{
        AssignmentListQuery, AssignmentStats, DeliveryAssignment, NewDeliveryAssignment,
    },
    delivery_person::{
        DeliveryPerson, DeliveryPersonListQuery, NewDeliveryPerson, UpdateDeliveryPerson,
    },
    employee::{Employee, NewEmployee},
    order::{NewOrder, Order, OrderListQuery, OrderStatus, OrderSummary, OrderUpdate},
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
};

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn get_products_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
        fn list_categories(&self) -> RepositoryResult<Vec<String>>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn create_products(&self, new_products: &[NewProduct]) -> RepositoryResult<usize>;
        fn update_product(&self, product_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn set_product_stock(&self, product_id: i32, stock_quantity: i32) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
        fn delete_all_products(&self) -> RepositoryResult<usize>;
    }
}

mock! {
    pub CustomerReader {}

    impl CustomerReader for CustomerReader {
        fn get_customer_by_username(&self, username: &str) -> RepositoryResult<Option<Customer>>;
        fn get_customer_by_email(&self, email: &str) -> RepositoryResult<Option<Customer>>;
        fn get_latest_payment_details(&self, username: &str) -> RepositoryResult<Option<CustomerPayment>>;
    }
}

mock! {
    pub CustomerWriter {}

    impl CustomerWriter for CustomerWriter {
        fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
        fn save_payment_details(&self, details: &NewCustomerPayment) -> RepositoryResult<CustomerPayment>;
    }
}

mock! {
    pub EmployeeReader {}

    impl EmployeeReader for EmployeeReader {
        fn get_employee_by_id(&self, empid: &str) -> RepositoryResult<Option<Employee>>;
        fn count_employees(&self) -> RepositoryResult<usize>;
    }
}

mock! {
    pub EmployeeWriter {}

    impl EmployeeWriter for EmployeeWriter {
        fn create_employee(&self, new_employee: &NewEmployee) -> RepositoryResult<Employee>;
    }
}

mock! {
    pub OrderReader {}

    impl OrderReader for OrderReader {
        fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>>;
        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
        fn order_summary(&self) -> RepositoryResult<OrderSummary>;
        fn get_bill_by_payment_id(&self, payment_id: i32) -> RepositoryResult<Option<Bill>>;
    }
}

mock! {
    pub OrderWriter {}

    impl OrderWriter for OrderWriter {
        fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
        fn place_order(&self, new_order: &NewOrder, payment: &NewCustomerPayment) -> RepositoryResult<Order>;
        fn approve_order(&self, order_id: i32) -> RepositoryResult<(Order, Bill)>;
        fn set_order_status(&self, order_id: i32, status: OrderStatus) -> RepositoryResult<Order>;
        fn update_order(&self, order_id: i32, update: &OrderUpdate) -> RepositoryResult<Order>;
        fn delete_order(&self, order_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub DeliveryPersonReader {}

    impl DeliveryPersonReader for DeliveryPersonReader {
        fn get_delivery_person_by_id(&self, id: i32) -> RepositoryResult<Option<DeliveryPerson>>;
        fn list_delivery_persons(&self, query: DeliveryPersonListQuery) -> RepositoryResult<Vec<DeliveryPerson>>;
    }
}

mock! {
    pub DeliveryPersonWriter {}

    impl DeliveryPersonWriter for DeliveryPersonWriter {
        fn create_delivery_person(&self, new_person: &NewDeliveryPerson) -> RepositoryResult<DeliveryPerson>;
        fn update_delivery_person(&self, id: i32, updates: &UpdateDeliveryPerson) -> RepositoryResult<DeliveryPerson>;
        fn delete_delivery_person(&self, id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub DeliveryAssignmentReader {}

    impl DeliveryAssignmentReader for DeliveryAssignmentReader {
        fn get_assignment_by_id(&self, id: i32) -> RepositoryResult<Option<DeliveryAssignment>>;
        fn get_assignment_by_order_id(&self, order_id: i32) -> RepositoryResult<Option<DeliveryAssignment>>;
        fn list_assignments(&self, query: AssignmentListQuery) -> RepositoryResult<Vec<DeliveryAssignment>>;
        fn assignment_stats(&self) -> RepositoryResult<AssignmentStats>;
    }
}

mock! {
    pub DeliveryAssignmentWriter {}

    impl DeliveryAssignmentWriter for DeliveryAssignmentWriter {
        fn create_assignment(&self, new_assignment: &NewDeliveryAssignment) -> RepositoryResult<DeliveryAssignment>;
        fn save_assignment(&self, current: &DeliveryAssignment, next: &DeliveryAssignment) -> RepositoryResult<DeliveryAssignment>;
    }
}
