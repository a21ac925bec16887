pub mod providers;
pub mod settings;

pub use providers::*;
pub use settings::*;
