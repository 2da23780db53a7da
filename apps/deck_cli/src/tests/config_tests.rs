use super::{load_settings_with, Settings};

use std::{
    collections::HashMap,
    env, fs,
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

fn temp_settings_file(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("profile_deck_settings_{suffix}.toml"));
    fs::write(&path, contents).expect("write settings");
    path
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_request_80_profiles_from_random_user_api() {
    let settings = Settings::default();
    let config = settings.fetch_config();

    assert_eq!(
        config.endpoint,
        "https://random-data-api.com/api/users/random_user"
    );
    assert_eq!(config.batch_size, 80);
    assert_eq!(config.request_timeout, Duration::from_secs(10));
}

#[test]
fn file_values_override_defaults() {
    let path = temp_settings_file(
        "endpoint_url = \"http://127.0.0.1:9000/users\"\nbatch_size = 12\n",
    );

    let settings = load_settings_with(Some(&path), no_env).expect("load");

    assert_eq!(settings.endpoint_url, "http://127.0.0.1:9000/users");
    assert_eq!(settings.batch_size, 12);
    assert_eq!(settings.request_timeout_secs, 10);
    fs::remove_file(path).expect("cleanup");
}

#[test]
fn env_overrides_file_and_cli_overrides_env() {
    let path = temp_settings_file("batch_size = 12\nrequest_timeout_secs = 3\n");
    let env_vars: HashMap<&str, &str> = HashMap::from([
        ("APP__BATCH_SIZE", "20"),
        ("APP__ENDPOINT_URL", "http://env.example/users"),
    ]);

    let mut settings = load_settings_with(Some(&path), |key| {
        env_vars.get(key).map(|v| (*v).to_string())
    })
    .expect("load");
    assert_eq!(settings.batch_size, 20);
    assert_eq!(settings.endpoint_url, "http://env.example/users");
    assert_eq!(settings.request_timeout_secs, 3);

    settings.apply_overrides(None, Some(5));
    assert_eq!(settings.batch_size, 5);
    assert_eq!(settings.endpoint_url, "http://env.example/users");
    fs::remove_file(path).expect("cleanup");
}

#[test]
fn unparsable_env_value_is_ignored() {
    let settings = load_settings_with(None, |key| {
        (key == "APP__BATCH_SIZE").then(|| "eighty".to_string())
    })
    .expect("load");

    assert_eq!(settings.batch_size, 80);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let path = env::temp_dir().join("profile_deck_settings_does_not_exist.toml");
    let err = load_settings_with(Some(&path), no_env).expect_err("must fail");
    assert!(
        err.to_string().contains("failed to read settings file"),
        "unexpected error: {err}"
    );
}

#[test]
fn malformed_file_is_an_error() {
    let path = temp_settings_file("batch_size = \"many\"\n");
    let err = load_settings_with(Some(&path), no_env).expect_err("must fail");
    assert!(err.to_string().contains("invalid settings file"));
    fs::remove_file(path).expect("cleanup");
}

#[test]
fn zero_request_timeout_keeps_previous_value() {
    let path = temp_settings_file("request_timeout_secs = 0\n");
    let settings = load_settings_with(Some(&path), no_env).expect("load");
    assert_eq!(settings.request_timeout_secs, 10);
    fs::remove_file(path).expect("cleanup");

    let path = temp_settings_file("request_timeout_secs = 4\n");
    let settings = load_settings_with(Some(&path), |key| {
        (key == "APP__REQUEST_TIMEOUT_SECS").then(|| "0".to_string())
    })
    .expect("load");
    assert_eq!(settings.request_timeout_secs, 4);
    assert_eq!(settings.fetch_config().request_timeout, Duration::from_secs(4));
    fs::remove_file(path).expect("cleanup");
}
