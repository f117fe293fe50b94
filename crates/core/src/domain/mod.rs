// Domain Layer - Probe settings and result values

pub mod constants;
pub mod output;
pub mod report;
pub mod settings;

// Re-exports
pub use output::{CapturedOutput, DecodeError};
pub use report::ProbeReport;
pub use settings::{ProbeSettings, SettingsError};
