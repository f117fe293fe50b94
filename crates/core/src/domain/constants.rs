// Probe defaults (No magic values)
use std::time::Duration;

/// Runtime directory of the server
pub const DEFAULT_RUNTIME_DIR: &str = "/run/edgedb";

/// Instance name embedded in the admin socket filename
pub const DEFAULT_INSTANCE: &str = "EDGEDB";

/// Port number embedded in the admin socket filename
pub const DEFAULT_ADMIN_PORT: u16 = 5656;

/// Client executable looked up on the search path
pub const DEFAULT_CLIENT: &str = "edgedb";

/// Query written to the client's stdin
pub const HEALTH_QUERY: &str = "SELECT 1;";

/// Trimmed stdout the client must print for the probe to pass
pub const EXPECTED_RESULT: &str = "1";

/// Bound on the client round-trip (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Time between SIGTERM and SIGKILL for a client that overran its timeout (5 seconds)
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);
