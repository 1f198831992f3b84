//! SDK constants
//!
//! Centralized location for defaults and wire-level names shared by the
//! pipeline, the auth coordinator and the configuration loader.

// Client defaults
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

// Request headers
pub const ORGANIZATION_HEADER: &str = "X-Envase-Organization";
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

// Auth endpoints
pub const AUTH_REFRESH_PATH: &str = "/api/auth/refresh";
pub const AUTH_VERIFY_PATH: &str = "/api/auth/verify";

// Encryption
pub const ENCRYPTION_KEY_HEX_LENGTH: usize = 64;
pub const ENCRYPTION_KEY_BYTES: usize = 32;
pub const ENCRYPTION_IV_BYTES: usize = 12;
pub const ENCRYPTION_TAG_BYTES: usize = 16;

// Local configuration file
pub const CONFIG_DIR_NAME: &str = ".envase";
pub const CONFIG_FILE_NAME: &str = "config.json";
