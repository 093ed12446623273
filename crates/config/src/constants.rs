//! Fixed names and documented constants

/// Per-user application directory name (under the platform config dir)
pub const APP_DIR_NAME: &str = "extup";

/// Default configuration file name inside the application directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings document holding the progress record
pub const PROGRESS_DOCUMENT: &str = "extup";

/// Settings document holding the editor preferences
pub const PREFERENCES_DOCUMENT: &str = "preferences";

/// Default override list file name inside the application directory
pub const OVERRIDE_FILE_NAME: &str = "extra-packages.txt";

/// Settle delay imposed around disable/install/remove, in milliseconds.
///
/// The host needs time to release file handles and unregister a package
/// before the next step proceeds. This is a fixed pause, not a retry
/// backoff.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1000;

/// Upper bound accepted for a configured settle delay
pub const MAX_SETTLE_DELAY_MS: u64 = 60_000;
