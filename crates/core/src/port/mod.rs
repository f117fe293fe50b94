// Port Layer - Interfaces for the operating system

pub mod client_runner;
pub mod executable_resolver;
pub mod filesystem;
pub mod time_provider; // For deterministic testing

// Re-exports
pub use client_runner::{ClientInvocation, ClientOutput, ClientRunner, RunError};
pub use executable_resolver::ExecutableResolver;
pub use filesystem::{EntryKind, FileSystemInspector};
pub use time_provider::TimeProvider;
