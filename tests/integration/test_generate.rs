#[path = "../common/mod.rs"]
mod common;

use common::{sample_project, Harness};
use launcher::core::compose::ComposeDocument;
use launcher::core::env::read_env_file;
use launcher::core::events::{EventKind, EventSeverity};
use launcher::core::model::ProjectKind;
use launcher::core::workspace::ProjectPaths;
use std::fs;

#[tokio::test]
async fn generate_materializes_the_project_tree() {
    let project = sample_project();
    let harness = Harness::new(&project);
    let paths = ProjectPaths::new(harness.project_dir(&project));

    let report = harness.launcher.generate("acme", "shop").await.unwrap();

    assert!(report.is_success(), "{:?}", report.failures);
    assert_eq!(report.summary(), "generated 3/3");

    for path in [
        paths.compose_file(),
        paths.base_compose_file(),
        paths.socle_dockerfile(ProjectKind::Php),
        paths.socle_dockerfile(ProjectKind::Node),
        paths.dockerfile("api"),
        paths.dockerfile("front"),
        paths.env_file("api"),
        paths.env_file("front"),
        paths.application_env_file("api"),
        paths.gitignore(),
        paths.makefile(),
    ] {
        assert!(path.is_file(), "{} was not written", path.display());
    }
    for dir in [paths.logs_dir(), paths.bin_dir()] {
        assert!(dir.is_dir());
    }
}

#[tokio::test]
async fn generated_compose_wires_services_to_the_proxy() {
    let project = sample_project();
    let harness = Harness::new(&project);
    let paths = ProjectPaths::new(harness.project_dir(&project));

    harness.launcher.generate("acme", "shop").await.unwrap();

    let content = fs::read_to_string(paths.compose_file()).unwrap();
    let document = ComposeDocument::initialize(Some(&content)).unwrap();
    let traefik = &document.networks["traefik"];
    assert!(traefik.external);
    assert_eq!(traefik.name.as_deref(), Some("traefik"));

    let api = document.service("api").unwrap();
    assert_eq!(api.depends_on, vec!["database"]);
    assert!(api
        .labels
        .iter()
        .any(|label| label.ends_with(".rule=Host(`api.shop.localhost`)")));
    assert_eq!(api.env_file, vec!["docker/api/.env"]);
    assert!(document.service_exists("front"));
    assert!(document.service_exists("database"));
}

#[tokio::test]
async fn generated_env_files_carry_runtime_and_application_values() {
    let project = sample_project();
    let harness = Harness::new(&project);
    let paths = ProjectPaths::new(harness.project_dir(&project));

    harness.launcher.generate("acme", "shop").await.unwrap();

    let runtime = read_env_file(&paths.env_file("api")).unwrap().unwrap();
    assert_eq!(runtime["PHP_VERSION"], "8.3");
    assert_eq!(runtime["DOCKER_ENV"], "dev");
    assert_eq!(runtime["FRAMEWORK"], "symfony");

    let application = read_env_file(&paths.application_env_file("api")).unwrap().unwrap();
    assert!(application["DATABASE_URL"].starts_with("mysql://"));

    let gitignore = fs::read_to_string(paths.gitignore()).unwrap();
    assert!(gitignore.lines().any(|line| line == "/api/vendor/"));
    assert!(gitignore.lines().any(|line| line == "/front/node_modules/"));

    let makefile = fs::read_to_string(paths.makefile()).unwrap();
    assert!(makefile.starts_with("COMPOSE = COMPOSE_PROJECT_NAME=acme-shop docker compose"));
    assert!(makefile.contains("shell-front:"));
}

#[tokio::test]
async fn generate_scaffolds_frameworks_in_ephemeral_containers() {
    let project = sample_project();
    let harness = Harness::new(&project);

    harness.launcher.generate("acme", "shop").await.unwrap();

    let lines = harness.runner.command_lines();
    assert!(lines
        .iter()
        .any(|line| line.starts_with("docker run --rm") && line.contains("symfony/skeleton:7.2.*")));
    assert!(lines
        .iter()
        .any(|line| line.starts_with("docker run --rm") && line.contains("node:22-alpine")));
}

#[tokio::test]
async fn failing_container_does_not_stop_the_others() {
    let project = sample_project();
    let harness = Harness::new(&project);
    let paths = ProjectPaths::new(harness.project_dir(&project));
    let api_scaffold = format!("docker run --rm -v {}:", paths.container_dir("api").display());
    harness.runner.respond(&api_scaffold, 1, &[]);

    let report = harness.launcher.generate("acme", "shop").await.unwrap();

    assert!(!report.is_success());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].service, "api");
    assert_eq!(report.summary(), "generated 2/3");
    assert!(paths.dockerfile("api").is_file());
    assert!(paths.dockerfile("front").is_file());

    let summary = harness
        .publisher
        .events()
        .into_iter()
        .find(|event| event.kind == Some(EventKind::Summary))
        .unwrap();
    assert_eq!(summary.severity, EventSeverity::Error);
    assert_eq!(summary.error.as_deref(), Some("failed: api"));
}

#[tokio::test]
async fn invalid_descriptor_is_rejected_before_touching_disk() {
    let project = sample_project();
    let harness = Harness::new(&project);
    let paths = ProjectPaths::new(harness.project_dir(&project));

    let mut broken = project.clone();
    if let Some(launcher::core::model::Container::Project(api)) = broken.containers.first_mut() {
        api.docker_version = Some("5.6".to_string());
    }
    let descriptor = paths.root().join("project.json");
    fs::write(&descriptor, serde_json::to_vec_pretty(&broken).unwrap()).unwrap();

    let err = harness.launcher.generate("acme", "shop").await.unwrap_err();
    assert_eq!(err.code, "MODEL-001");
    assert!(!paths.compose_file().exists());
    assert!(harness.runner.requests().is_empty());
}

#[tokio::test]
async fn failed_clone_never_falls_back_to_scaffolding() {
    let mut project = sample_project();
    if let Some(launcher::core::model::Container::Project(api)) = project.containers.first_mut() {
        api.repository = Some(launcher::core::model::GitSource {
            url: "git@example.com:acme/api.git".to_string(),
            branch: "main".to_string(),
        });
    }
    let harness = Harness::new(&project);
    let paths = ProjectPaths::new(harness.project_dir(&project));
    harness.runner.respond("git clone", 128, &[]);

    let report = harness.launcher.generate("acme", "shop").await.unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].service, "api");
    let api_container = format!("docker run --rm -v {}:", paths.container_dir("api").display());
    assert_eq!(harness.runner.count(&api_container), 0);
    assert!(!paths.container_dir("api").exists());
    assert_eq!(harness.runner.count("git clone --branch main git@example.com:acme/api.git"), 1);

    // The folder is still free, so the next run retries the clone.
    harness.launcher.generate("acme", "shop").await.unwrap();
    assert_eq!(harness.runner.count("git clone"), 2);
    assert_eq!(harness.runner.count(&api_container), 0);
}

#[tokio::test]
async fn descriptor_without_network_uses_the_configured_one() {
    let mut project = sample_project();
    project.network = String::new();
    let harness = Harness::with_config(&project, |config| config.traefik_network = "proxy".to_string());
    let paths = ProjectPaths::new(harness.project_dir(&project));

    harness.launcher.generate("acme", "shop").await.unwrap();

    let content = fs::read_to_string(paths.compose_file()).unwrap();
    let document = ComposeDocument::initialize(Some(&content)).unwrap();
    assert_eq!(document.networks["traefik"].name.as_deref(), Some("proxy"));
    let api = document.service("api").unwrap();
    assert!(api.labels.contains(&"traefik.docker.network=proxy".to_string()));
}

#[tokio::test]
async fn declared_network_wins_over_the_configured_one() {
    let project = sample_project();
    let harness = Harness::with_config(&project, |config| config.traefik_network = "proxy".to_string());

    let loaded = harness.launcher.load_project("acme", "shop").unwrap();
    assert_eq!(loaded.network, "traefik");
}

#[tokio::test]
async fn proxy_routes_to_the_port_nginx_listens_on() {
    let project = launcher::core::model::Project::new(
        "acme",
        "shop",
        launcher::core::types::Environment::Dev,
        "traefik",
    )
    .with_container(
        launcher::core::model::ProjectContainer::new(ProjectKind::Php, "api")
            .with_version("8.3")
            .with_url("api.shop.localhost")
            .with_web_server("nginx", 8080),
    )
    .with_container(
        launcher::core::model::ServiceContainer::new(launcher::core::model::ServiceKind::Nginx, "nginx")
            .with_version("1.27"),
    );
    let harness = Harness::new(&project);
    let paths = ProjectPaths::new(harness.project_dir(&project));

    let report = harness.launcher.generate("acme", "shop").await.unwrap();
    assert!(report.is_success(), "{:?}", report.failures);

    let content = fs::read_to_string(paths.compose_file()).unwrap();
    let document = ComposeDocument::initialize(Some(&content)).unwrap();
    assert!(document.service("api").unwrap().labels.is_empty());
    assert!(document
        .service("nginx")
        .unwrap()
        .labels
        .contains(&"traefik.http.services.acme-shop-nginx-dev.loadbalancer.server.port=8080".to_string()));

    let site = fs::read_to_string(paths.nginx_conf_dir("nginx").join("api.conf")).unwrap();
    assert!(site.contains("listen 8080;"));
}
