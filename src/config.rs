use std::env;
use std::path::PathBuf;

/// AppConfig
///
/// Holds the shell's entire configuration state. This struct is designed to be
/// immutable once loaded, ensuring consistency across all services that read it
/// (transport client, session store, gate). It is bundled into the shared
/// `ShellState`, embodying the "immutable AppConfig" part of the Unified State
/// Pattern.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Base URL of the portal REST API, consumed by the HTTP transport.
    pub api_base_url: String,
    // Path of the login entry point. The session gate redirects here whenever
    // no credential is present; the originally requested path is discarded.
    pub login_path: String,
    // Location of the durable credential slot on disk.
    pub session_file: PathBuf,
    // Per-request timeout applied to the transport client.
    pub request_timeout_secs: u64,
    // Runtime environment marker. Controls logging format selection.
    pub env: Env,
}

/// Env
///
/// Defines the runtime context, used to switch between development conveniences
/// (pretty logs, localhost API defaults) and production settings (JSON logs,
/// mandatory explicit endpoints).
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a safe, non-panicking AppConfig instance primarily used for test
    /// setup. This allows tests to instantiate the configuration without setting
    /// environment variables.
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            login_path: "/auth/login".to_string(),
            session_file: PathBuf::from(".portal-session.json"),
            request_timeout_secs: 30,
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical function for initializing the shell configuration at
    /// startup. It reads all parameters from environment variables (after
    /// loading any `.env` file) and implements the **fail-fast** principle.
    ///
    /// # Panics
    /// Panics if a variable required for the current runtime environment
    /// (especially Production) is not set. This prevents the shell from
    /// starting against an unknown API endpoint.
    pub fn load() -> Self {
        dotenv::dotenv().ok();

        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        // API endpoint resolution. The production endpoint is mandatory and
        // must be explicitly set; local falls back to the dev server.
        let api_base_url = match env {
            Env::Production => env::var("PORTAL_API_URL")
                .expect("FATAL: PORTAL_API_URL must be set in production."),
            _ => env::var("PORTAL_API_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        };

        let login_path =
            env::var("PORTAL_LOGIN_PATH").unwrap_or_else(|_| "/auth/login".to_string());

        let session_file = env::var("PORTAL_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".portal-session.json"));

        // A malformed timeout is still an authoring bug and fails fast.
        let request_timeout_secs = match env::var("PORTAL_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .expect("FATAL: PORTAL_REQUEST_TIMEOUT_SECS must be an integer number of seconds"),
            Err(_) => 30,
        };

        Self {
            api_base_url,
            login_path,
            session_file,
            request_timeout_secs,
            env,
        }
    }
}
