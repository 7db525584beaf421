//! Default timing values for transaction submission and confirmation.

/// Request timeout applied to every RPC call (in seconds).
pub const DEFAULT_RPC_TIMEOUT_SECONDS: u64 = 30;

/// Upper bound on the confirmation wait (in seconds). Reaching it does not
/// mean the transaction failed; its on-chain effect is unknown at that point.
pub const DEFAULT_CONFIRMATION_TIMEOUT_SECONDS: u64 = 90;

/// First delay between confirmation status polls (in milliseconds).
pub const CONFIRMATION_INITIAL_POLL_INTERVAL_MILLIS: u64 = 500;

/// Ceiling for the exponentially growing poll interval (in milliseconds).
pub const CONFIRMATION_MAX_POLL_INTERVAL_MILLIS: u64 = 8_000;

/// Maximum attempts for a single RPC operation before surfacing the error.
pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;

/// First delay between retries of a transient RPC failure (in milliseconds).
pub const DEFAULT_RETRY_BASE_DELAY_MILLIS: u64 = 200;

/// Ceiling for the exponentially growing retry delay (in milliseconds).
pub const DEFAULT_RETRY_MAX_DELAY_MILLIS: u64 = 2_000;
