use kst_bot_core::config::Config;
use std::env;
use std::sync::Mutex;

// Mutex to ensure config tests run sequentially to avoid environment variable conflicts
static CONFIG_TEST_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_config_from_env_with_all_vars() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();

    env::set_var("DATABASE_URL", "sqlite:test.db");
    env::set_var("LUNCH_SEED_GROUP", "СИП-113/25");

    let config = Config::from_env().unwrap();

    assert_eq!(config.database_url, "sqlite:test.db");
    assert_eq!(config.lunch_seed_group, Some("СИП-113/25".to_string()));

    // Clean up
    env::remove_var("DATABASE_URL");
    env::remove_var("LUNCH_SEED_GROUP");
}

#[test]
fn test_config_from_env_with_defaults() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();

    env::remove_var("DATABASE_URL");
    env::remove_var("LUNCH_SEED_GROUP");

    let config = Config::from_env().unwrap();

    assert_eq!(config.database_url, "sqlite:./data/kst_bot.db");
    assert_eq!(config.lunch_seed_group, None);
}

#[test]
fn test_config_empty_values_fall_back() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();

    env::set_var("DATABASE_URL", "");
    env::set_var("LUNCH_SEED_GROUP", "   ");

    let config = Config::from_env().unwrap();

    assert_eq!(config.database_url, "sqlite:./data/kst_bot.db");
    assert_eq!(config.lunch_seed_group, None);

    // Clean up
    env::remove_var("DATABASE_URL");
    env::remove_var("LUNCH_SEED_GROUP");
}

#[test]
fn test_config_rejects_non_sqlite_url() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();

    env::set_var("DATABASE_URL", "postgres://localhost/kst");

    let result = Config::from_env();
    assert!(result.is_err());

    let error_msg = result.unwrap_err().to_string();
    assert!(error_msg.contains("sqlite"));

    // Clean up
    env::remove_var("DATABASE_URL");
}

#[test]
fn test_config_seed_group_is_trimmed() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();

    env::remove_var("DATABASE_URL");
    env::set_var("LUNCH_SEED_GROUP", "  СИП-113/25  ");

    let config = Config::from_env().unwrap();
    assert_eq!(config.lunch_seed_group, Some("СИП-113/25".to_string()));

    // Clean up
    env::remove_var("LUNCH_SEED_GROUP");
}
