#[path = "../common/mod.rs"]
mod common;

use launcher::core::compose::{ComposeDocument, ComposeFile, NetworkDefinition, ServiceStanza};
use launcher::core::registrar::{RegistrarRegistry, TRAEFIK_NETWORK_KEY};
use tempfile::TempDir;

fn register_all(document: ComposeDocument) -> ComposeDocument {
    let project = common::sample_project();
    let registrars = RegistrarRegistry::with_defaults();
    project
        .containers
        .iter()
        .fold(document, |document, container| {
            registrars.apply(document, container, &project).unwrap()
        })
}

#[test]
fn registering_twice_is_idempotent() {
    let once = register_all(ComposeDocument::default());
    let twice = register_all(once.clone());
    assert_eq!(once, twice);
    assert_eq!(once.to_yaml().unwrap(), twice.to_yaml().unwrap());
}

#[test]
fn project_stanza_routes_through_traefik() {
    let document = register_all(ComposeDocument::default());
    let api = document.service("api").unwrap();
    assert_eq!(api.image.as_deref(), Some("acme-shop-api-dev"));
    assert_eq!(api.depends_on, vec!["database"]);
    assert!(api
        .labels
        .contains(&"traefik.http.routers.acme-shop-api-dev.rule=Host(`api.shop.localhost`)".to_string()));
    assert!(api
        .labels
        .contains(&"traefik.http.services.acme-shop-api-dev.loadbalancer.server.port=8000".to_string()));
    assert_eq!(api.extends.as_ref().unwrap().service, "php-dev");
}

#[test]
fn database_stanza_gets_named_volume_and_port() {
    let document = register_all(ComposeDocument::default());
    let database = document.service("database").unwrap();
    assert_eq!(database.image.as_deref(), Some("mysql:8.0"));
    assert_eq!(database.ports, vec!["3306"]);
    assert_eq!(database.volumes, vec!["acme-shop-database-data:/var/lib/mysql"]);
    assert!(document.volumes.contains_key("acme-shop-database-data"));
}

#[test]
fn unmanaged_services_and_keys_are_preserved() {
    let existing = r#"
version: "3.8"
services:
  mailer:
    image: mailhog/mailhog
    restart: always
"#;
    let document = register_all(ComposeDocument::initialize(Some(existing)).unwrap());
    let yaml = document.to_yaml().unwrap();
    assert!(document.service_exists("mailer"));
    assert!(yaml.contains("restart: always"));
    assert_eq!(document.version, "3.8");
}

#[test]
fn compose_file_round_trips_on_disk() {
    let dir = TempDir::new().unwrap();
    let file = ComposeFile::in_project(dir.path());
    assert!(!file.exists());

    let document = file
        .load()
        .unwrap()
        .set_global_network_compose_data(TRAEFIK_NETWORK_KEY, NetworkDefinition::external("traefik"))
        .add_docker_service("worker", ServiceStanza::default());
    file.save(&document).unwrap();

    let reloaded = file.load().unwrap();
    assert_eq!(reloaded, document);
    assert!(reloaded.networks[TRAEFIK_NETWORK_KEY].external);
}

#[test]
fn removing_a_service_keeps_the_others() {
    let document = register_all(ComposeDocument::default()).remove_docker_service("front");
    assert!(!document.service_exists("front"));
    assert!(document.service_exists("api"));
}

#[test]
fn invalid_yaml_is_rejected() {
    let err = ComposeDocument::initialize(Some("services: [unterminated")).unwrap_err();
    assert_eq!(err.code, "COMPOSE-002");
}
