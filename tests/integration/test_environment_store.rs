#[path = "../common/mod.rs"]
mod common;

use common::sample_project;
use launcher::core::model::Project;
use launcher::core::store::{EnvironmentStore, JsonEnvironmentStore, DESCRIPTOR_FILE};
use launcher::core::types::Environment;
use std::fs;
use tempfile::TempDir;

#[test]
fn saved_descriptor_loads_back() {
    let dir = TempDir::new().unwrap();
    let store = JsonEnvironmentStore::new(dir.path());
    let project = sample_project();

    store.save(&project).unwrap();

    assert!(dir.path().join("acme/shop").join(DESCRIPTOR_FILE).is_file());
    assert_eq!(store.load("acme", "shop").unwrap(), Some(project));
    assert_eq!(store.load("acme", "ghost").unwrap(), None);
}

#[test]
fn invalid_project_is_not_saved() {
    let dir = TempDir::new().unwrap();
    let store = JsonEnvironmentStore::new(dir.path());
    let err = store
        .save(&Project::new("acme", " ", Environment::Dev, "traefik"))
        .unwrap_err();
    assert_eq!(err.code, "MODEL-004");
    assert!(!dir.path().join("acme").exists());
}

#[test]
fn corrupt_descriptor_is_reported() {
    let dir = TempDir::new().unwrap();
    let store = JsonEnvironmentStore::new(dir.path());
    fs::create_dir_all(dir.path().join("acme/shop")).unwrap();
    fs::write(dir.path().join("acme/shop").join(DESCRIPTOR_FILE), "{ not json").unwrap();

    let err = store.load("acme", "shop").unwrap_err();
    assert_eq!(err.code, "STORE-001");
}

#[test]
fn rename_project_moves_tree_and_descriptor() {
    let dir = TempDir::new().unwrap();
    let store = JsonEnvironmentStore::new(dir.path());
    store.save(&sample_project()).unwrap();
    fs::write(dir.path().join("acme/shop/Makefile"), "build:\n").unwrap();

    let renamed = store.rename_project("acme", "shop", "store").unwrap();

    assert_eq!(renamed.project, "store");
    assert!(!dir.path().join("acme/shop").exists());
    assert!(dir.path().join("acme/store/Makefile").is_file());
    assert_eq!(store.load("acme", "store").unwrap().unwrap().project, "store");
}

#[test]
fn rename_project_refuses_existing_target() {
    let dir = TempDir::new().unwrap();
    let store = JsonEnvironmentStore::new(dir.path());
    store.save(&sample_project()).unwrap();
    let mut other = sample_project();
    other.project = "store".to_string();
    store.save(&other).unwrap();

    let err = store.rename_project("acme", "shop", "store").unwrap_err();
    assert_eq!(err.code, "STORE-002");
    assert!(dir.path().join("acme/shop").exists());
}

#[test]
fn rename_unknown_project_fails() {
    let dir = TempDir::new().unwrap();
    let store = JsonEnvironmentStore::new(dir.path());
    let err = store.rename_project("acme", "ghost", "store").unwrap_err();
    assert_eq!(err.code, "STORE-003");
}

#[test]
fn rename_client_rewrites_every_project() {
    let dir = TempDir::new().unwrap();
    let store = JsonEnvironmentStore::new(dir.path());
    store.save(&sample_project()).unwrap();
    let mut blog = sample_project();
    blog.project = "blog".to_string();
    store.save(&blog).unwrap();

    let renamed = store.rename_client("acme", "globex").unwrap();

    assert_eq!(renamed.len(), 2);
    assert!(renamed.iter().all(|project| project.client == "globex"));
    assert_eq!(store.list("globex").unwrap(), vec!["blog", "shop"]);
    assert!(store.list("acme").unwrap().is_empty());
    assert_eq!(store.load("globex", "shop").unwrap().unwrap().client, "globex");
}

#[test]
fn list_ignores_folders_without_descriptor() {
    let dir = TempDir::new().unwrap();
    let store = JsonEnvironmentStore::new(dir.path());
    store.save(&sample_project()).unwrap();
    fs::create_dir_all(dir.path().join("acme/scratch")).unwrap();

    assert_eq!(store.list("acme").unwrap(), vec!["shop"]);
}
