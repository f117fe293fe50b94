// Healthcheck Infrastructure - System Adapters
// Implements: FileSystemInspector, ExecutableResolver, ClientRunner

pub mod local_filesystem;
pub mod path_resolver;
pub mod subprocess_runner;

pub use local_filesystem::LocalFileSystem;
pub use path_resolver::PathResolver;
pub use subprocess_runner::SubprocessClientRunner;
