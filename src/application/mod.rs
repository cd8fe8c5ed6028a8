mod application;
pub mod data;
mod runtime_config;
mod sources;

pub use application::{Application, ApplicationError};
pub use runtime_config::RuntimeConfig;
pub use sources::{DiscoveryError, discover, parse_front_matter, read_metadata};
