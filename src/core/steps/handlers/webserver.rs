#![allow(clippy::result_large_err)]

use super::PRIORITY_WEBSERVER;
use crate::core::error::AppError;
use crate::core::model::{ProjectKind, ServiceContainer, ServiceKind, WebServerBinding};
use crate::core::steps::{ApplicationStep, StepContext, StepHandler};
use crate::core::template::{TemplateRenderer, NGINX_PHP_SITE, NGINX_PROXY_SITE};
use crate::core::types::ErrorCategory;
use crate::utils::write_atomic;
use async_trait::async_trait;

/// Writes the site configuration of a project container into its web server.
pub trait WebserverStrategy: Send + Sync {
    fn supports(&self, kind: ServiceKind) -> bool;

    fn configure(
        &self,
        ctx: &StepContext<'_>,
        server: &ServiceContainer,
        binding: &WebServerBinding,
    ) -> Result<(), AppError>;
}

/// One `conf.d/<folder>.conf` per bound container.
pub struct NginxWebserver;

impl WebserverStrategy for NginxWebserver {
    fn supports(&self, kind: ServiceKind) -> bool {
        kind == ServiceKind::Nginx
    }

    fn configure(
        &self,
        ctx: &StepContext<'_>,
        server: &ServiceContainer,
        binding: &WebServerBinding,
    ) -> Result<(), AppError> {
        let container = ctx.container;
        let port = binding.port.to_string();
        let server_name = container.url_service.clone().unwrap_or_else(|| "_".to_string());
        let index_folder = container
            .framework
            .as_ref()
            .map(|framework| framework.public_folder.clone())
            .unwrap_or_default();
        let app_port = container.kind.default_port().to_string();

        let template = match container.kind {
            ProjectKind::Php => NGINX_PHP_SITE,
            ProjectKind::Node => NGINX_PROXY_SITE,
        };
        let content = TemplateRenderer::render_pairs(
            template,
            &[
                ("PORT", port.as_str()),
                ("SERVER_NAME", server_name.as_str()),
                ("FOLDER", container.folder_name.as_str()),
                ("INDEX_FOLDER", index_folder.as_str()),
                ("UPSTREAM", container.docker_service_name.as_str()),
                ("APP_PORT", app_port.as_str()),
            ],
        );
        let path = ctx
            .paths
            .nginx_conf_dir(&server.folder_name)
            .join(format!("{}.conf", container.folder_name));
        write_atomic(&path, content.as_bytes())
    }
}

pub struct WebserverConfiguration {
    strategies: Vec<Box<dyn WebserverStrategy>>,
}

impl Default for WebserverConfiguration {
    fn default() -> Self {
        Self {
            strategies: vec![Box::new(NginxWebserver)],
        }
    }
}

#[async_trait]
impl StepHandler for WebserverConfiguration {
    fn step(&self) -> ApplicationStep {
        ApplicationStep::ConfigurationWebserver
    }

    fn priority(&self) -> i32 {
        PRIORITY_WEBSERVER
    }

    async fn execute(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let Some(binding) = &ctx.container.web_server else {
            return Ok(());
        };
        let server = ctx
            .project
            .service_containers()
            .find(|service| service.docker_service_name == binding.service)
            .ok_or_else(|| {
                AppError::new(
                    ErrorCategory::ConfigurationError,
                    format!("web server '{}' is not part of the project", binding.service),
                )
                .with_code("WEB-001")
            })?;
        let strategy = self
            .strategies
            .iter()
            .find(|strategy| strategy.supports(server.kind))
            .ok_or_else(|| {
                AppError::new(
                    ErrorCategory::ConfigurationError,
                    format!("{} cannot be used as a web server", server.kind),
                )
                .with_code("WEB-002")
            })?;
        strategy.configure(ctx, server, binding)
    }
}
