use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::{env, fs};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub http_timeout_seconds: u64,
    pub report_poll_interval_ms: u64,
    pub report_poll_max_attempts: u32,
}

static CONFIG: OnceCell<Config> = OnceCell::new();

impl Config {
    pub fn init(env_path: &str) -> &'static Self {
        dotenvy::from_filename(env_path).ok();

        CONFIG.get_or_init(|| {
            let project_name = env::var("PROJECT_NAME").unwrap_or_else(|_| "rollcall".into());
            let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".into());
            let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/rollcall.log".into());
            let api_base_url = env::var("API_BASE_URL").expect("API_BASE_URL must be set");
            let api_token = env::var("API_TOKEN").ok();
            let http_timeout_seconds = env::var("HTTP_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30);
            let report_poll_interval_ms = env::var("REPORT_POLL_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1000);
            let report_poll_max_attempts = env::var("REPORT_POLL_MAX_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300);

            if let Some(parent) = std::path::Path::new(&log_file).parent() {
                fs::create_dir_all(parent).expect("Failed to create log directory");
            }

            Config {
                project_name,
                log_level,
                log_file,
                api_base_url,
                api_token,
                http_timeout_seconds,
                report_poll_interval_ms,
                report_poll_max_attempts,
            }
        })
    }

    pub fn get() -> &'static Self {
        CONFIG.get().expect("Config not initialized")
    }
}
