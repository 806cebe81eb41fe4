#[path = "../common/mod.rs"]
mod common;

use common::{sample_project, Harness};
use launcher::core::model::Container;
use launcher::core::store::EnvironmentStore;
use launcher::core::template::{extract_custom_block, CUSTOM_BLOCK_END};
use launcher::core::workspace::ProjectPaths;
use std::fs;

const CUSTOM: &str = "RUN apt-get update && apt-get install -y vim\n# keep this line\n";

#[tokio::test]
async fn custom_block_survives_regeneration() {
    let project = sample_project();
    let harness = Harness::new(&project);
    let paths = ProjectPaths::new(harness.project_dir(&project));
    harness.launcher.generate("acme", "shop").await.unwrap();

    let dockerfile = paths.dockerfile("api");
    let generated = fs::read_to_string(&dockerfile).unwrap();
    assert_eq!(extract_custom_block(&generated).unwrap(), Some(""));
    let edited = generated.replacen(CUSTOM_BLOCK_END, &format!("{}{}", CUSTOM, CUSTOM_BLOCK_END), 1);
    fs::write(&dockerfile, &edited).unwrap();

    let mut upgraded = harness.launcher.load_project("acme", "shop").unwrap();
    if let Some(Container::Project(api)) = upgraded.containers.first_mut() {
        api.docker_version = Some("8.4".to_string());
    }
    harness.store.save(&upgraded).unwrap();

    let report = harness.launcher.generate("acme", "shop").await.unwrap();
    assert!(report.is_success(), "{:?}", report.failures);

    let regenerated = fs::read_to_string(&dockerfile).unwrap();
    assert!(regenerated.starts_with("FROM socle-php-8.4-dev"));
    assert_eq!(extract_custom_block(&regenerated).unwrap(), Some(CUSTOM));
    assert_eq!(regenerated.matches(CUSTOM_BLOCK_END).count(), 1);
}

#[tokio::test]
async fn regeneration_without_edits_is_stable() {
    let project = sample_project();
    let harness = Harness::new(&project);
    let paths = ProjectPaths::new(harness.project_dir(&project));

    harness.launcher.generate("acme", "shop").await.unwrap();
    let first = fs::read_to_string(paths.dockerfile("front")).unwrap();
    let first_compose = fs::read_to_string(paths.compose_file()).unwrap();

    harness.launcher.generate("acme", "shop").await.unwrap();
    assert_eq!(fs::read_to_string(paths.dockerfile("front")).unwrap(), first);
    assert_eq!(fs::read_to_string(paths.compose_file()).unwrap(), first_compose);
}

#[tokio::test]
async fn unterminated_custom_block_is_left_untouched() {
    let project = sample_project();
    let harness = Harness::new(&project);
    let paths = ProjectPaths::new(harness.project_dir(&project));
    harness.launcher.generate("acme", "shop").await.unwrap();

    let dockerfile = paths.dockerfile("api");
    let generated = fs::read_to_string(&dockerfile).unwrap();
    let truncated = generated.replacen(CUSTOM_BLOCK_END, CUSTOM, 1);
    fs::write(&dockerfile, &truncated).unwrap();

    let report = harness.launcher.generate("acme", "shop").await.unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].service, "api");
    assert!(report.failures[0].error.contains("TEMPLATE-001"), "{}", report.failures[0].error);
    assert_eq!(fs::read_to_string(&dockerfile).unwrap(), truncated);
    assert!(paths.dockerfile("front").is_file());
}
