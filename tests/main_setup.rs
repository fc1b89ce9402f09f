use portal_shell::{AppConfig, config::Env};
use serial_test::serial;
use std::{env, panic};

// --- Setup/Teardown Utilities ---

/// Utility to run a test function and restore environment variables afterward
fn run_with_env<T, R>(test: T, cleanup_vars: Vec<&'static str>) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    // Save current environment variables
    let originals: Vec<(String, Option<String>)> = cleanup_vars
        .iter()
        .map(|&var| (var.to_string(), env::var(var).ok()))
        .collect();

    // Run the test
    let result = panic::catch_unwind(test);

    // Restore original environment variables
    for (key, original_value) in originals.into_iter().rev() {
        unsafe {
            if let Some(val) = original_value {
                env::set_var(&key, val);
            } else {
                env::remove_var(&key);
            }
        }
    }

    // Re-panic if the test failed
    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_app_config_production_fail_fast() {
    // We expect this to panic because the production API endpoint is not set
    let result = run_with_env(
        || {
            panic::catch_unwind(|| {
                unsafe {
                    env::set_var("APP_ENV", "production");
                    env::remove_var("PORTAL_API_URL");
                }
                AppConfig::load()
            })
        },
        vec!["APP_ENV", "PORTAL_API_URL"],
    );

    assert!(
        result.is_err(),
        "Production config loading should panic on a missing API endpoint"
    );
}

#[test]
#[serial]
fn test_app_config_local_env_defaults() {
    // Local mode should not panic, and should use hardcoded defaults
    let config = run_with_env(
        || {
            unsafe {
                env::set_var("APP_ENV", "local");
                // Clear other variables to test fallbacks
                env::remove_var("PORTAL_API_URL");
                env::remove_var("PORTAL_LOGIN_PATH");
                env::remove_var("PORTAL_REQUEST_TIMEOUT_SECS");
            }
            AppConfig::load()
        },
        vec![
            "APP_ENV",
            "PORTAL_API_URL",
            "PORTAL_LOGIN_PATH",
            "PORTAL_REQUEST_TIMEOUT_SECS",
        ],
    );

    assert_eq!(config.env, Env::Local);
    // Check dev-server default
    assert_eq!(config.api_base_url, "http://localhost:3000");
    // Check login entry point fallback
    assert_eq!(config.login_path, "/auth/login");
    assert_eq!(config.request_timeout_secs, 30);
}

#[test]
#[serial]
fn test_app_config_explicit_overrides() {
    let config = run_with_env(
        || {
            unsafe {
                env::set_var("APP_ENV", "production");
                env::set_var("PORTAL_API_URL", "https://portal.example.edu/api");
                env::set_var("PORTAL_LOGIN_PATH", "/auth/login");
                env::set_var("PORTAL_REQUEST_TIMEOUT_SECS", "5");
            }
            AppConfig::load()
        },
        vec![
            "APP_ENV",
            "PORTAL_API_URL",
            "PORTAL_LOGIN_PATH",
            "PORTAL_REQUEST_TIMEOUT_SECS",
        ],
    );

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.api_base_url, "https://portal.example.edu/api");
    assert_eq!(config.request_timeout_secs, 5);
}
