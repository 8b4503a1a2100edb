pub mod create_guest;
pub mod find_guests;
pub mod update_guest;
