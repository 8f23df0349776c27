pub mod sources;
pub mod tweaks_config;
pub mod validation;

pub use sources::*;
pub use tweaks_config::*;
pub use validation::*;
