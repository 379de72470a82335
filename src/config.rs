//! Configuration management for Webmark
//!
//! All configurable parameters in one place with environment variable
//! overrides. Sensible defaults for development, configurable in production.

use std::env;
use tracing::info;

use crate::constants::DEFAULT_SESSION_TTL_SECS;

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Allowed origins (empty = allow all)
    pub allowed_origins: Vec<String>,
    /// Allowed HTTP methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Whether to allow credentials (required for cross-origin cookie auth)
    pub allow_credentials: bool,
    /// Max age for preflight cache (seconds)
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(), // Empty = allow all origins
            allowed_methods: vec![
                "GET".to_string(),
                "POST".to_string(),
                "PUT".to_string(),
                "DELETE".to_string(),
                "OPTIONS".to_string(),
            ],
            allowed_headers: vec!["Content-Type".to_string(), "X-Request-ID".to_string()],
            allow_credentials: false,
            max_age_seconds: 86400, // 24 hours
        }
    }
}

impl CorsConfig {
    /// Load from environment variables with production safety checks
    ///
    /// In production mode (WEBMARK_ENV=production), warns if CORS origins
    /// are not configured.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(origins) = env::var("WEBMARK_CORS_ORIGINS") {
            config.allowed_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(methods) = env::var("WEBMARK_CORS_METHODS") {
            config.allowed_methods = methods
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(headers) = env::var("WEBMARK_CORS_HEADERS") {
            config.allowed_headers = headers
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(val) = env::var("WEBMARK_CORS_CREDENTIALS") {
            config.allow_credentials = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = env::var("WEBMARK_CORS_MAX_AGE") {
            if let Ok(n) = val.parse() {
                config.max_age_seconds = n;
            }
        }

        let is_production = env::var("WEBMARK_ENV")
            .map(|v| {
                let v = v.to_lowercase();
                v == "production" || v == "prod"
            })
            .unwrap_or(false);

        if is_production && config.allowed_origins.is_empty() {
            tracing::warn!(
                "PRODUCTION WARNING: CORS allows all origins. Set WEBMARK_CORS_ORIGINS for security."
            );
        }

        config
    }

    /// Check if any origin restrictions are configured
    pub fn is_restricted(&self) -> bool {
        !self.allowed_origins.is_empty()
    }

    /// Convert to tower-http CorsLayer
    pub fn to_layer(&self) -> tower_http::cors::CorsLayer {
        use tower_http::cors::{AllowOrigin, Any, CorsLayer};

        let mut layer = CorsLayer::new();

        if self.allowed_origins.is_empty() {
            // Intentionally permissive - no origins configured
            layer = layer.allow_origin(Any);
        } else {
            let mut valid_origins = Vec::new();
            let mut invalid_origins = Vec::new();

            for origin_str in &self.allowed_origins {
                match origin_str.parse::<axum::http::HeaderValue>() {
                    Ok(origin) => valid_origins.push(origin),
                    Err(_) => invalid_origins.push(origin_str.clone()),
                }
            }

            for invalid in &invalid_origins {
                tracing::warn!("CORS: Invalid origin '{}' - skipping", invalid);
            }

            if valid_origins.is_empty() {
                // All configured origins failed to parse - this is a config
                // error. Do NOT fall back to permissive.
                tracing::error!(
                    "CORS: All {} configured origin(s) failed to parse. \
                     Rejecting all cross-origin requests. Fix WEBMARK_CORS_ORIGINS.",
                    self.allowed_origins.len()
                );
                layer =
                    layer.allow_origin(AllowOrigin::list(Vec::<axum::http::HeaderValue>::new()));
            } else {
                if !invalid_origins.is_empty() {
                    tracing::info!(
                        "CORS: Using {} valid origin(s), {} invalid skipped",
                        valid_origins.len(),
                        invalid_origins.len()
                    );
                }
                layer = layer.allow_origin(AllowOrigin::list(valid_origins));
            }
        }

        let methods: Vec<axum::http::Method> = self
            .allowed_methods
            .iter()
            .filter_map(|m| m.parse().ok())
            .collect();
        if methods.is_empty() {
            layer = layer.allow_methods(Any);
        } else {
            layer = layer.allow_methods(methods);
        }

        let headers: Vec<axum::http::HeaderName> = self
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        if headers.is_empty() {
            layer = layer.allow_headers(Any);
        } else {
            layer = layer.allow_headers(headers);
        }

        if self.allow_credentials {
            layer = layer.allow_credentials(true);
        }

        layer = layer.max_age(std::time::Duration::from_secs(self.max_age_seconds));

        layer
    }
}

/// Server configuration loaded from environment with defaults
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host address (default: 127.0.0.1)
    /// Set to 0.0.0.0 for Docker or network-accessible deployments
    pub host: String,

    /// Server port (default: 5000)
    pub port: u16,

    /// Session lifetime in seconds (default: 7 days)
    pub session_ttl_secs: u64,

    /// Expired-session sweep interval in seconds (default: 3600)
    pub session_sweep_interval_secs: u64,

    /// Whether the session cookie carries the Secure attribute
    /// (default: on in production, off in development so plain http works)
    pub cookie_secure: bool,

    /// Rate limit: requests per second on protected routes (default: 100)
    pub rate_limit_per_second: u64,

    /// Rate limit: burst size (default: 200)
    pub rate_limit_burst: u32,

    /// Maximum concurrent requests (default: 100)
    pub max_concurrent_requests: usize,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_secs: u64,

    /// Whether running in production mode
    pub is_production: bool,

    /// Base URL of the local LLM server for the chat assistant
    pub assistant_endpoint: String,

    /// CORS configuration
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            session_sweep_interval_secs: 3600,
            cookie_secure: false,
            rate_limit_per_second: 100,
            rate_limit_burst: 200,
            max_concurrent_requests: 100,
            request_timeout_secs: 30,
            is_production: false,
            assistant_endpoint: "http://localhost:11434".to_string(),
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults
    #[allow(clippy::field_reassign_with_default)] // Environment overrides require mutable config
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Check production mode first
        config.is_production = env::var("WEBMARK_ENV")
            .map(|v| {
                let v = v.to_lowercase();
                v == "production" || v == "prod"
            })
            .unwrap_or(false);

        // Host (bind address)
        if let Ok(val) = env::var("WEBMARK_HOST") {
            config.host = val;
        }

        // Port
        if let Ok(val) = env::var("WEBMARK_PORT") {
            if let Ok(port) = val.parse() {
                config.port = port;
            }
        }

        // Session lifecycle
        if let Ok(val) = env::var("WEBMARK_SESSION_TTL") {
            if let Ok(n) = val.parse() {
                config.session_ttl_secs = n;
            }
        }

        if let Ok(val) = env::var("WEBMARK_SESSION_SWEEP_INTERVAL") {
            if let Ok(n) = val.parse() {
                config.session_sweep_interval_secs = n;
            }
        }

        // Secure cookies default to on in production; explicit env wins
        config.cookie_secure = config.is_production;
        if let Ok(val) = env::var("WEBMARK_COOKIE_SECURE") {
            config.cookie_secure = val.to_lowercase() == "true" || val == "1";
        }

        // Rate limiting
        if let Ok(val) = env::var("WEBMARK_RATE_LIMIT") {
            if let Ok(n) = val.parse() {
                config.rate_limit_per_second = n;
            }
        }

        if let Ok(val) = env::var("WEBMARK_RATE_BURST") {
            if let Ok(n) = val.parse() {
                config.rate_limit_burst = n;
            }
        }

        // Concurrency
        if let Ok(val) = env::var("WEBMARK_MAX_CONCURRENT") {
            if let Ok(n) = val.parse() {
                config.max_concurrent_requests = n;
            }
        }

        // Request timeout
        if let Ok(val) = env::var("WEBMARK_REQUEST_TIMEOUT") {
            if let Ok(n) = val.parse() {
                config.request_timeout_secs = n;
            }
        }

        // Chat assistant backend
        if let Ok(val) = env::var("WEBMARK_OLLAMA_URL") {
            config.assistant_endpoint = val.trim_end_matches('/').to_string();
        }

        // CORS configuration
        config.cors = CorsConfig::from_env();

        config
    }

    /// Log the current configuration
    pub fn log(&self) {
        info!("Configuration:");
        info!(
            "   Mode: {}",
            if self.is_production {
                "PRODUCTION"
            } else {
                "Development"
            }
        );
        info!("   Bind: {}:{}", self.host, self.port);
        info!(
            "   Sessions: ttl {}s, sweep every {}s, secure cookie: {}",
            self.session_ttl_secs, self.session_sweep_interval_secs, self.cookie_secure
        );
        if self.rate_limit_per_second > 0 {
            info!(
                "   Rate limit: {} req/sec (burst: {})",
                self.rate_limit_per_second, self.rate_limit_burst
            );
        } else {
            info!("   Rate limit: disabled");
        }
        info!("   Max concurrent: {}", self.max_concurrent_requests);
        info!("   Request timeout: {}s", self.request_timeout_secs);
        info!("   Assistant backend: {}", self.assistant_endpoint);
        if self.cors.is_restricted() {
            info!("   CORS origins: {:?}", self.cors.allowed_origins);
        } else {
            info!("   CORS: Permissive (all origins allowed)");
        }
    }
}

/// Environment variable documentation
#[allow(unused)] // Public API - available for CLI help output
pub fn print_env_help() {
    println!("Webmark Configuration Environment Variables:");
    println!();
    println!("  WEBMARK_ENV                    - Set to 'production' or 'prod' for production mode");
    println!("  WEBMARK_HOST                   - Bind address (default: 127.0.0.1)");
    println!("  WEBMARK_PORT                   - Server port (default: 5000)");
    println!("  WEBMARK_SESSION_TTL            - Session lifetime in seconds (default: 604800)");
    println!("  WEBMARK_SESSION_SWEEP_INTERVAL - Expired-session sweep seconds (default: 3600)");
    println!("  WEBMARK_COOKIE_SECURE          - Secure cookie attribute true/false (default: auto)");
    println!("  WEBMARK_RATE_LIMIT             - Requests per second (default: 100)");
    println!("  WEBMARK_RATE_BURST             - Burst size (default: 200)");
    println!("  WEBMARK_MAX_CONCURRENT         - Max concurrent requests (default: 100)");
    println!("  WEBMARK_REQUEST_TIMEOUT        - Request timeout in seconds (default: 30)");
    println!("  WEBMARK_OLLAMA_URL             - Local LLM server URL (default: http://localhost:11434)");
    println!();
    println!("CORS Configuration:");
    println!("  WEBMARK_CORS_ORIGINS     - Comma-separated allowed origins (default: all)");
    println!("  WEBMARK_CORS_METHODS     - Comma-separated allowed methods (default: GET,POST,PUT,DELETE,OPTIONS)");
    println!("  WEBMARK_CORS_HEADERS     - Comma-separated allowed headers (default: Content-Type,X-Request-ID)");
    println!("  WEBMARK_CORS_CREDENTIALS - Allow credentials true/false (default: false)");
    println!("  WEBMARK_CORS_MAX_AGE     - Preflight cache seconds (default: 86400)");
    println!();
    println!("  RUST_LOG                 - Log level (e.g., info, debug, trace)");
    println!();
}
