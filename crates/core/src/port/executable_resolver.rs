// Executable lookup port
use std::path::PathBuf;

/// Resolves a bare command name the way a shell would
pub trait ExecutableResolver: Send + Sync {
    /// Absolute path of the first matching executable, or `None`
    fn resolve(&self, name: &str) -> Option<PathBuf>;
}

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    pub struct MockExecutableResolver {
        known: HashMap<String, PathBuf>,
        call_count: Arc<Mutex<usize>>,
    }

    impl MockExecutableResolver {
        /// Resolver that finds nothing
        pub fn empty() -> Self {
            Self::default()
        }

        pub fn with(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
            self.known.insert(name.into(), path.into());
            self
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    impl ExecutableResolver for MockExecutableResolver {
        fn resolve(&self, name: &str) -> Option<PathBuf> {
            *self.call_count.lock().unwrap() += 1;
            self.known.get(name).cloned()
        }
    }
}
