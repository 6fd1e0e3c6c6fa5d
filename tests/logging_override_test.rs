//! Tests de logging: `--log-level` sobreescribe RUST_LOG
//! tests/logging_override_test.rs

use go2web::config::Config;
use go2web::logging;
use log::LevelFilter;

#[test]
fn test_log_level_flag_overrides_rust_log() {
    std::env::set_var("RUST_LOG", "debug");

    let config = Config {
        url: "example.com".to_string(),
        log_level: Some("warn".to_string()),
        ..Config::default()
    };
    assert!(logging::init_logger(config.log_level_filter()));

    assert_eq!(log::max_level(), LevelFilter::Warn);
    assert!(!log::log_enabled!(target: "go2web::client", log::Level::Info));
}
