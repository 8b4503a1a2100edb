pub mod memory;
pub mod order;
pub mod user;

pub use memory::InMemoryCredentialStore;
pub use memory::InMemoryOrderRepository;
pub use order::PostgresOrderRepository;
pub use user::PostgresCredentialStore;
