use launcher::core::config::ConfigLoader;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

const OVERRIDES: &[&str] = &[
    "LAUNCHER_PROJECTS_DIR",
    "LAUNCHER_TRAEFIK_NETWORK",
    "LAUNCHER_PROCESS_IDLE_TIMEOUT",
    "LAUNCHER_READINESS_TIMEOUT",
    "LAUNCHER_READINESS_INTERVAL",
    "LAUNCHER_EVENTS_QUEUE_SIZE",
    "LAUNCHER_EVENTS_HUB_URL",
    "LAUNCHER_EVENTS_TOPIC",
    "LAUNCHER_IMAGES_COMPOSER",
    "LAUNCHER_IMAGES_NODE_SCAFFOLD",
];

fn clear_launcher_env() {
    for name in OVERRIDES {
        env::remove_var(name);
    }
}

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("launcher.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
#[serial]
fn file_values_replace_defaults() {
    clear_launcher_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
projects_dir = "/srv/launcher"
traefik_network = "proxy"

[process]
idle_timeout = "2m"

[readiness]
timeout = "90s"
interval = "3s"

[events]
queue_size = 64
hub_url = "http://localhost:3000/.well-known/mercure"
topic = "acme"

[images]
composer = "composer:2.7"
"#,
    );

    let config = ConfigLoader::load(Some(&path)).unwrap();
    assert_eq!(config.projects_dir, PathBuf::from("/srv/launcher"));
    assert_eq!(config.traefik_network, "proxy");
    assert_eq!(config.process.idle_timeout, Duration::from_secs(120));
    assert_eq!(config.readiness.timeout, Duration::from_secs(90));
    assert_eq!(config.readiness.interval, Duration::from_secs(3));
    assert_eq!(config.events.queue_size, 64);
    assert_eq!(config.events.topic, "acme");
    assert_eq!(
        config.events.hub_url.unwrap().as_str(),
        "http://localhost:3000/.well-known/mercure"
    );
    assert_eq!(config.images.composer, "composer:2.7");
    assert_eq!(config.images.node_scaffold, "node:{version}-alpine");
}

#[test]
#[serial]
fn environment_overrides_file_values() {
    clear_launcher_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "traefik_network = \"proxy\"\n[readiness]\ntimeout = \"90s\"\n");

    env::set_var("LAUNCHER_TRAEFIK_NETWORK", "edge");
    env::set_var("LAUNCHER_READINESS_TIMEOUT", "15s");
    env::set_var("LAUNCHER_EVENTS_QUEUE_SIZE", "32");
    let config = ConfigLoader::load(Some(&path)).unwrap();
    clear_launcher_env();

    assert_eq!(config.traefik_network, "edge");
    assert_eq!(config.readiness.timeout, Duration::from_secs(15));
    assert_eq!(config.events.queue_size, 32);
}

#[test]
#[serial]
fn invalid_environment_values_are_ignored() {
    clear_launcher_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[readiness]\ninterval = \"2s\"\n");

    env::set_var("LAUNCHER_READINESS_INTERVAL", "soon");
    env::set_var("LAUNCHER_EVENTS_QUEUE_SIZE", "lots");
    env::set_var("LAUNCHER_EVENTS_HUB_URL", "not a url");
    let config = ConfigLoader::load(Some(&path)).unwrap();
    clear_launcher_env();

    assert_eq!(config.readiness.interval, Duration::from_secs(2));
    assert_eq!(config.events.queue_size, 256);
    assert!(config.events.hub_url.is_none());
}

#[test]
#[serial]
fn missing_explicit_file_is_an_error() {
    clear_launcher_env();
    let dir = TempDir::new().unwrap();
    let err = ConfigLoader::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert_eq!(err.code, "CONFIG-001");
}

#[test]
#[serial]
fn unparsable_file_is_an_error() {
    clear_launcher_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[readiness]\ntimeout = \"whenever\"\n");
    let err = ConfigLoader::load(Some(&path)).unwrap_err();
    assert_eq!(err.code, "CONFIG-002");
}

#[test]
#[serial]
fn validation_rejects_zero_interval() {
    clear_launcher_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[readiness]\ninterval = \"0s\"\n");
    let err = ConfigLoader::load(Some(&path)).unwrap_err();
    assert_eq!(err.code, "CONFIG-003");
}

#[test]
fn every_override_is_documented() {
    let documentation = ConfigLoader::env_var_documentation();
    for name in OVERRIDES {
        assert!(
            documentation.iter().any(|line| line.starts_with(name)),
            "{} is undocumented",
            name
        );
    }
}
