/// Target-group list parsing for poll audience filters
pub mod groups;
/// Structured log formatting helpers
pub mod logging;
/// Password hashing and verification
pub mod password;
