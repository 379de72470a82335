//! Documented constants for the bookmark service
//!
//! Centralizing tunable limits here prevents magic numbers in handlers
//! and keeps validation and storage in agreement.

// =============================================================================
// ACCOUNT LIMITS
// =============================================================================

/// Maximum username length in characters
pub const MAX_USERNAME_LENGTH: usize = 64;

/// Minimum password length (matches the registration contract)
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length, bounds scrypt input size
pub const MAX_PASSWORD_LENGTH: usize = 512;

// =============================================================================
// BOOKMARK / CATEGORY LIMITS
// =============================================================================

/// Maximum bookmark display-name length
pub const MAX_BOOKMARK_NAME_LENGTH: usize = 256;

/// Maximum stored URL length
pub const MAX_URL_LENGTH: usize = 2048;

/// Maximum stored site-credential length (bookmark username/password fields)
pub const MAX_CREDENTIAL_LENGTH: usize = 256;

/// Maximum category name length
pub const MAX_CATEGORY_NAME_LENGTH: usize = 128;

// =============================================================================
// SESSION LIFECYCLE
// =============================================================================

/// Session cookie name
pub const SESSION_COOKIE: &str = "webmark_session";

/// Random bytes per session token (hex-encoded to 64 chars)
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Default session lifetime: 7 days, in seconds
pub const DEFAULT_SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

// =============================================================================
// CHAT ASSISTANT
// =============================================================================

/// Maximum messages accepted in a single chat request
pub const MAX_CHAT_MESSAGES: usize = 64;

/// Maximum length of a single chat message
pub const MAX_CHAT_CONTENT_LENGTH: usize = 8192;

/// Local LLM models to try, in order of preference
pub const PREFERRED_CHAT_MODELS: &[&str] = &["mistral", "llama2", "llama3", "gemma", "phi"];
