pub mod create_order;
pub mod find_orders;
pub mod revoke_order;
pub mod update_order;
