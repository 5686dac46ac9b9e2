//! Process configuration.
//!
//! Loaded once at startup from environment variables and passed explicitly
//! into the wiring; nothing here is globally mutable.

use tracing::warn;

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Socket address the HTTP server binds.
    pub bind_addr: String,
    /// HS256 secret for access tokens.
    pub jwt_secret: String,
    /// Access-token lifetime in minutes.
    pub token_ttl_minutes: i64,
    /// Interpreter used to run the analysis script.
    pub python_executable: String,
    /// Path of the analysis script.
    pub analysis_script: String,
    /// Directory where generated analysis artifacts are written.
    pub output_dir: String,
    /// Fixed mode string passed to every analysis invocation.
    pub analysis_mode: String,
    /// Crop selector substituted when a job specifies none.
    pub default_crop_type: String,
    /// Maximum number of concurrently executing jobs.
    pub max_concurrent_jobs: usize,
    /// Simulated-training delay window in seconds.
    pub trainer_min_delay_secs: f64,
    pub trainer_max_delay_secs: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            jwt_secret: "dev-secret".to_string(),
            token_ttl_minutes: 30,
            python_executable: "python3".to_string(),
            analysis_script: "scripts/run_analysis.py".to_string(),
            output_dir: "outputs".to_string(),
            analysis_mode: "batch".to_string(),
            default_crop_type: "generic".to_string(),
            max_concurrent_jobs: 4,
            trainer_min_delay_secs: 5.0,
            trainer_max_delay_secs: 15.0,
        }
    }
}

impl Settings {
    /// Load settings from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                warn!("JWT_SECRET not set; using insecure dev default");
                defaults.jwt_secret
            }
        };

        Self {
            bind_addr: env_or("BIND_ADDR", defaults.bind_addr),
            jwt_secret,
            token_ttl_minutes: env_parsed("TOKEN_TTL_MINUTES", defaults.token_ttl_minutes),
            python_executable: env_or("PYTHON_EXECUTABLE", defaults.python_executable),
            analysis_script: env_or("ANALYSIS_SCRIPT", defaults.analysis_script),
            output_dir: env_or("OUTPUT_DIR", defaults.output_dir),
            analysis_mode: env_or("ANALYSIS_MODE", defaults.analysis_mode),
            default_crop_type: env_or("DEFAULT_CROP_TYPE", defaults.default_crop_type),
            max_concurrent_jobs: env_parsed("MAX_CONCURRENT_JOBS", defaults.max_concurrent_jobs),
            trainer_min_delay_secs: env_parsed(
                "TRAINER_MIN_DELAY_SECS",
                defaults.trainer_min_delay_secs,
            ),
            trainer_max_delay_secs: env_parsed(
                "TRAINER_MAX_DELAY_SECS",
                defaults.trainer_max_delay_secs,
            ),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
