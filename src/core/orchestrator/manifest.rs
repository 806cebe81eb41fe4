//! Project-level Makefile wrapping the compose commands of the project.

use crate::core::docker::COMPOSE_PROJECT_NAME;
use crate::core::model::Project;
use std::fmt::Write;

/// Render the Makefile written at the project root.
pub fn render_makefile(project: &Project) -> String {
    let mut makefile = String::new();
    let _ = writeln!(
        makefile,
        "COMPOSE = {}={} docker compose\n",
        COMPOSE_PROJECT_NAME,
        project.compose_project_name()
    );

    let mut phony = vec!["build", "start", "stop", "logs"]
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    phony.extend(
        project
            .project_containers()
            .map(|container| format!("shell-{}", container.folder_name)),
    );
    let _ = writeln!(makefile, ".PHONY: {}\n", phony.join(" "));

    makefile.push_str("build:\n\t$(COMPOSE) build\n\n");
    makefile.push_str("start:\n\t$(COMPOSE) up --detach\n\n");
    makefile.push_str("stop:\n\t$(COMPOSE) down --remove-orphans\n\n");
    makefile.push_str("logs:\n\t$(COMPOSE) logs --follow\n");

    for container in project.project_containers() {
        let _ = write!(
            makefile,
            "\nshell-{}:\n\t$(COMPOSE) exec {} sh\n",
            container.folder_name, container.docker_service_name
        );
    }
    makefile
}
