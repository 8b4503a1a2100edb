pub mod create_employee;
pub mod delete_employee;
pub mod find_employees;
pub mod update_employee;
