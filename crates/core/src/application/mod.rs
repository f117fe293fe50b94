// Application Layer - Use Cases

pub mod probe;

// Re-exports
pub use probe::Probe;
