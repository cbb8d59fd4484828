// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_STORAGE_BACKEND: &str = "sqlite";
pub const DEFAULT_DB_FILENAME: &str = "incubator.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

// --- Provider ---
pub const DEFAULT_PROVIDER_BACKEND: &str = "gemini";
pub const DEFAULT_PROVIDER_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_PROVIDER_MAX_RETRIES: u32 = 2;
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 1_000;
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 3.0;
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 10_000;
pub const DEFAULT_MIN_INSIGHT_CHARS: usize = 50;
pub const DEFAULT_PROMPT_LOG_CAPACITY: usize = 1_000;

// --- Insights ---
pub const DEFAULT_HOT_CACHE_SIZE: u64 = 1_000;
pub const DEFAULT_HOT_CACHE_TTL_SECS: u64 = 3_600; // 1 hour
pub const DEFAULT_MAX_APPEND_ATTEMPTS: u32 = 3;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
