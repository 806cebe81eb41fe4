#[path = "../common/mod.rs"]
mod common;

use common::Harness;
use launcher::core::docker::COMPOSE_PROJECT_NAME;
use launcher::core::model::{Project, ProjectContainer, ProjectKind, ServiceContainer, ServiceKind};
use launcher::core::orchestrator::{Operation, StartOptions};
use launcher::core::types::Environment;
use launcher::core::workspace::ProjectPaths;
use std::fs;
use std::time::Duration;

fn write_env_files(harness: &Harness, project: &Project) {
    let paths = ProjectPaths::new(harness.project_dir(project));
    for container in project.project_containers() {
        let env_file = paths.env_file(&container.folder_name);
        fs::create_dir_all(env_file.parent().unwrap()).unwrap();
        fs::write(env_file, "PROJECT=shop\n").unwrap();
    }
}

fn position(lines: &[String], prefix: &str) -> usize {
    lines
        .iter()
        .position(|line| line.starts_with(prefix))
        .unwrap_or_else(|| panic!("no command starting with `{}` in {:#?}", prefix, lines))
}

#[tokio::test]
async fn build_creates_each_socle_once_and_skips_services() {
    let project = Project::new("acme", "shop", Environment::Dev, "traefik")
        .with_container(ProjectContainer::new(ProjectKind::Php, "api").with_version("8.3"))
        .with_container(ProjectContainer::new(ProjectKind::Php, "admin").with_version("8.3"))
        .with_container(ServiceContainer::new(ServiceKind::Redis, "cache").with_version("7.2"));
    let harness = Harness::new(&project);

    let report = harness.launcher.build("acme", "shop", &[]).await.unwrap();

    assert!(report.is_success(), "{:?}", report.failures);
    assert_eq!(report.operation, Operation::Build);
    assert_eq!(report.summary(), "built 2/2");
    assert_eq!(harness.runner.count("docker build -t socle-php-8.3-dev"), 1);
    assert_eq!(harness.runner.count("docker compose build api"), 1);
    assert_eq!(harness.runner.count("docker compose build admin"), 1);
    assert_eq!(harness.runner.count("docker compose build cache"), 0);

    let socle = harness
        .runner
        .command_lines()
        .into_iter()
        .find(|line| line.starts_with("docker build -t socle-php"))
        .unwrap();
    assert!(socle.contains("--build-arg PHP_VERSION=8.3"));
    assert!(socle.contains("--build-arg DOCKER_ENV=dev"));
}

#[tokio::test]
async fn build_reuses_existing_socle_image() {
    let project = common::sample_project();
    let harness = Harness::new(&project);
    harness
        .runner
        .respond("docker images -q socle-php-8.3-dev", 0, &["5f2c1a9e0b7d"]);

    let report = harness
        .launcher
        .build("acme", "shop", &["api".to_string()])
        .await
        .unwrap();

    assert!(report.is_success());
    assert_eq!(report.total, 1);
    assert_eq!(harness.runner.count("docker build"), 0);
    assert_eq!(harness.runner.count("docker compose build api"), 1);
    assert_eq!(harness.runner.count("docker compose build front"), 0);
}

#[tokio::test]
async fn failed_build_is_collected_and_others_continue() {
    let project = common::sample_project();
    let harness = Harness::new(&project);
    harness.runner.respond("docker images -q", 0, &["present"]);
    harness.runner.respond("docker compose build api", 1, &[]);

    let report = harness.launcher.build("acme", "shop", &[]).await.unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].service, "api");
    assert_eq!(report.succeeded, vec!["front"]);
    assert_eq!(report.summary(), "built 1/2");
}

#[tokio::test(start_paused = true)]
async fn readiness_times_out_after_bounded_attempts() {
    let project = common::sample_project();
    let harness = Harness::new(&project);
    write_env_files(&harness, &project);
    harness.runner.respond("docker images -q", 0, &["present"]);
    harness.runner.respond("docker compose ps", 1, &[]);

    let report = harness
        .launcher
        .start(
            "acme",
            "shop",
            StartOptions {
                wait: true,
                timeout: Some(Duration::from_secs(10)),
            },
        )
        .await
        .unwrap();

    assert_eq!(harness.runner.count("docker compose ps --format json api"), 2);
    assert_eq!(harness.runner.count("docker compose ps --format json front"), 2);
    assert_eq!(report.failures.len(), 2);
    assert!(report.failures.iter().all(|failure| failure.error.contains("READY-001")));
    assert_eq!(report.succeeded, vec!["database"]);
}

#[tokio::test]
async fn start_brings_services_up_before_projects() {
    let project = common::sample_project();
    let harness = Harness::new(&project);
    write_env_files(&harness, &project);
    harness.runner.respond("docker images -q", 0, &["present"]);

    let report = harness
        .launcher
        .start("acme", "shop", StartOptions { wait: true, timeout: None })
        .await
        .unwrap();

    assert!(report.is_success(), "{:?}", report.failures);
    let lines = harness.runner.command_lines();
    assert!(
        position(&lines, "docker compose up --detach database")
            < position(&lines, "docker compose up --detach api")
    );
    assert_eq!(harness.runner.count("docker compose ps --format json"), 2);

    for request in harness.runner.requests() {
        if request.args.first().map(String::as_str) == Some("compose") {
            assert_eq!(
                request.env.get(COMPOSE_PROJECT_NAME).map(String::as_str),
                Some("acme-shop")
            );
        }
    }
}

#[tokio::test]
async fn start_requires_env_file_and_image() {
    let project = common::sample_project();
    let harness = Harness::new(&project);
    let paths = ProjectPaths::new(harness.project_dir(&project));
    fs::create_dir_all(paths.container_docker_dir("front")).unwrap();
    fs::write(paths.env_file("front"), "PROJECT=shop\n").unwrap();

    let report = harness
        .launcher
        .start("acme", "shop", StartOptions::default())
        .await
        .unwrap();

    let api = report.failures.iter().find(|f| f.service == "api").unwrap();
    assert!(api.error.contains("LIFE-002"));
    let front = report.failures.iter().find(|f| f.service == "front").unwrap();
    assert!(front.error.contains("LIFE-003"));
    assert_eq!(harness.runner.count("docker compose up --detach front"), 0);
}

#[tokio::test]
async fn stop_keeps_volumes() {
    let project = common::sample_project();
    let harness = Harness::new(&project);

    let report = harness.launcher.stop("acme", "shop").await.unwrap();

    assert!(report.is_success());
    let lines = harness.runner.command_lines();
    assert_eq!(lines, vec!["docker compose down --remove-orphans"]);
    assert!(harness.runner.requests().iter().all(|request| !request.has_arg("--volumes")));
}

#[tokio::test]
async fn delete_removes_images_and_directory() {
    let project = common::sample_project();
    let harness = Harness::new(&project);
    harness.runner.respond("docker images -q", 0, &["present"]);
    let root = harness.project_dir(&project);
    assert!(root.exists());

    let report = harness.launcher.delete("acme", "shop").await.unwrap();

    assert!(report.is_success(), "{:?}", report.failures);
    assert_eq!(harness.runner.count("docker image rm acme-shop-api-dev"), 1);
    assert_eq!(harness.runner.count("docker image rm acme-shop-front-dev"), 1);
    assert!(!root.exists());
}

#[tokio::test]
async fn delete_continues_when_stop_fails() {
    let project = common::sample_project();
    let harness = Harness::new(&project);
    harness.runner.respond("docker compose down", 1, &[]);
    let root = harness.project_dir(&project);

    let report = harness.launcher.delete("acme", "shop").await.unwrap();

    assert!(!report.is_success());
    assert_eq!(report.failures[0].service, "acme-shop");
    assert_eq!(harness.runner.count("docker image rm"), 0);
    assert!(!root.exists());
}

#[tokio::test]
async fn unknown_project_is_a_configuration_error() {
    let harness = Harness::new(&common::sample_project());
    let err = harness.launcher.stop("acme", "ghost").await.unwrap_err();
    assert_eq!(err.code, "LIFE-001");
}

#[tokio::test]
async fn remove_service_rewrites_compose_and_descriptor() {
    let project = common::sample_project();
    let harness = Harness::new(&project);
    harness.launcher.generate("acme", "shop").await.unwrap();

    let report = harness
        .launcher
        .remove_service("acme", "shop", "database")
        .await
        .unwrap();
    assert!(report.is_success(), "{:?}", report.failures);

    let compose = fs::read_to_string(harness.project_dir(&project).join("docker-compose.yml")).unwrap();
    let document = launcher::core::compose::ComposeDocument::initialize(Some(&compose)).unwrap();
    assert!(!document.service_exists("database"));
    assert!(document.service("api").unwrap().depends_on.is_empty());

    let stored = harness.launcher.load_project("acme", "shop").unwrap();
    assert!(stored.find_container("database").is_none());

    let err = harness
        .launcher
        .remove_service("acme", "shop", "database")
        .await
        .unwrap_err();
    assert_eq!(err.code, "LIFE-004");
}

#[tokio::test]
async fn removing_a_bound_web_server_is_refused_without_writing() {
    let project = Project::new("acme", "shop", Environment::Dev, "traefik")
        .with_container(
            ProjectContainer::new(ProjectKind::Php, "api")
                .with_version("8.3")
                .with_url("api.shop.localhost")
                .with_web_server("nginx", 9000),
        )
        .with_container(ServiceContainer::new(ServiceKind::Nginx, "nginx").with_version("1.27"));
    let harness = Harness::new(&project);
    harness.launcher.generate("acme", "shop").await.unwrap();
    let compose_path = harness.project_dir(&project).join("docker-compose.yml");
    let before = fs::read_to_string(&compose_path).unwrap();

    let err = harness
        .launcher
        .remove_service("acme", "shop", "nginx")
        .await
        .unwrap_err();
    assert_eq!(err.code, "MODEL-006");

    assert_eq!(fs::read_to_string(&compose_path).unwrap(), before);
    let stored = harness.launcher.load_project("acme", "shop").unwrap();
    assert!(stored.find_container("nginx").is_some());
    // The descriptor still loads, so later operations keep working.
    harness.launcher.generate("acme", "shop").await.unwrap();
}

#[tokio::test]
async fn failed_socle_build_is_retried_for_each_container() {
    let project = Project::new("acme", "shop", Environment::Dev, "traefik")
        .with_container(ProjectContainer::new(ProjectKind::Php, "api").with_version("8.3"))
        .with_container(ProjectContainer::new(ProjectKind::Php, "admin").with_version("8.3"));
    let harness = Harness::new(&project);
    harness.runner.respond("docker build -t socle-php-8.3-dev", 1, &[]);

    let report = harness.launcher.build("acme", "shop", &[]).await.unwrap();

    assert_eq!(report.summary(), "built 0/2");
    assert_eq!(report.failures.len(), 2);
    assert_eq!(harness.runner.count("docker build -t socle-php-8.3-dev"), 2);
    assert_eq!(harness.runner.count("docker compose build"), 0);
}

#[tokio::test(start_paused = true)]
async fn readiness_wait_stops_at_the_deadline() {
    let project = common::sample_project();
    let harness = Harness::new(&project);
    harness.runner.respond("docker compose ps", 1, &[]);
    let root = harness.project_dir(&project);

    let started = tokio::time::Instant::now();
    let err = harness
        .launcher
        .wait_for_service_to_be_ready(&project, &root, "api", Duration::from_secs(7))
        .await
        .unwrap_err();

    assert_eq!(err.code, "READY-001");
    assert!(started.elapsed() <= Duration::from_secs(7), "{:?}", started.elapsed());
    assert_eq!(harness.runner.count("docker compose ps --format json api"), 2);
}
