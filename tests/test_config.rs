use std::io::Write;
use std::time::Duration;

use pennant::config::Config;

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.listen_addr, "127.0.0.1:42069");
    assert_eq!(cfg.max_head_bytes, 8192);
    assert_eq!(cfg.upstream, "http://httpbin.org");
    assert_eq!(cfg.upstream_connect_timeout(), Duration::from_secs(5));
    assert_eq!(cfg.tracing_level(), tracing::Level::INFO);
}

#[test]
fn test_config_from_yaml_partial() {
    let cfg = Config::from_yaml("listen_addr: 0.0.0.0:3000\nmax_head_bytes: 1024\n").unwrap();

    assert_eq!(cfg.listen_addr, "0.0.0.0:3000");
    assert_eq!(cfg.max_head_bytes, 1024);
    // Unset fields keep their defaults
    assert_eq!(cfg.upstream, "http://httpbin.org");
}

#[test]
fn test_config_from_yaml_full() {
    let cfg = Config::from_yaml(
        "listen_addr: 127.0.0.1:8000
max_head_bytes: 4096
upstream: http://127.0.0.1:9000
upstream_connect_timeout_ms: 250
log_level: debug
",
    )
    .unwrap();

    assert_eq!(cfg.upstream, "http://127.0.0.1:9000");
    assert_eq!(cfg.upstream_connect_timeout(), Duration::from_millis(250));
    assert_eq!(cfg.tracing_level(), tracing::Level::DEBUG);
}

#[test]
fn test_config_rejects_zero_buffer() {
    assert!(Config::from_yaml("max_head_bytes: 0\n").is_err());
}

#[test]
fn test_config_rejects_bad_types() {
    assert!(Config::from_yaml("max_head_bytes: lots\n").is_err());
}

#[test]
fn test_config_unknown_log_level_falls_back_to_info() {
    let cfg = Config::from_yaml("log_level: shouting\n").unwrap();

    assert_eq!(cfg.tracing_level(), tracing::Level::INFO);
}

#[test]
fn test_config_from_missing_file() {
    assert!(Config::from_file("/definitely/not/here.yaml").is_err());
}

// Environment variables are process-wide, so every env-dependent case lives
// in this one test.
#[test]
fn test_config_load_from_environment() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "listen_addr: 127.0.0.1:7000").unwrap();
    writeln!(file, "max_head_bytes: 2048").unwrap();

    unsafe {
        std::env::remove_var("PENNANT_CONFIG");
        std::env::remove_var("LISTEN");
    }
    assert_eq!(Config::load().unwrap(), Config::default());

    unsafe {
        std::env::set_var("PENNANT_CONFIG", file.path());
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.listen_addr, "127.0.0.1:7000");
    assert_eq!(cfg.max_head_bytes, 2048);

    unsafe {
        std::env::set_var("LISTEN", "0.0.0.0:5000");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.listen_addr, "0.0.0.0:5000");
    assert_eq!(cfg.max_head_bytes, 2048);

    unsafe {
        std::env::remove_var("PENNANT_CONFIG");
        std::env::remove_var("LISTEN");
    }
}
