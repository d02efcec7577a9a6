/// Connection pool management
pub mod connection;
/// Entity models and their queries
pub mod models;
/// Idempotent schema creation and evolution
pub mod schema;
