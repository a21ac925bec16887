//! HTTP handlers for records, provider config, and service status.

pub mod providers;
pub mod records;
pub use providers::*;
pub use records::*;
