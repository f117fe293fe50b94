// Healthcheck Core - Probe Logic & Ports
// NO infrastructure dependencies (Hexagonal Architecture)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::Probe;
pub use error::{FailureKind, HealthcheckError, Result};
