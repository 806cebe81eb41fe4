use crate::core::error::AppError;
use crate::core::model::container::ProjectKind;
use crate::core::types::ErrorCategory;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scaffold/toolchain that can be attached to a project container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FrameworkName {
    Php,
    Symfony,
    Laravel,
    Node,
    Next,
    Nest,
    React,
}

impl FrameworkName {
    pub const ALL: [FrameworkName; 7] = [
        FrameworkName::Php,
        FrameworkName::Symfony,
        FrameworkName::Laravel,
        FrameworkName::Node,
        FrameworkName::Next,
        FrameworkName::Nest,
        FrameworkName::React,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FrameworkName::Php => "PHP",
            FrameworkName::Symfony => "SYMFONY",
            FrameworkName::Laravel => "LARAVEL",
            FrameworkName::Node => "NODE",
            FrameworkName::Next => "NEXT",
            FrameworkName::Nest => "NEST",
            FrameworkName::React => "REACT",
        }
    }

    /// Language runtime the framework runs on.
    pub fn language(&self) -> ProjectKind {
        match self {
            FrameworkName::Php | FrameworkName::Symfony | FrameworkName::Laravel => {
                ProjectKind::Php
            }
            FrameworkName::Node | FrameworkName::Next | FrameworkName::Nest | FrameworkName::React => {
                ProjectKind::Node
            }
        }
    }

    pub fn support(name: &str) -> bool {
        Self::parse(name).is_some()
    }

    pub fn parse(name: &str) -> Option<FrameworkName> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(wanted))
    }

    /// Versions offered for the framework. Bare runtimes follow the container version.
    pub fn version_supported(&self) -> &'static [&'static str] {
        match self {
            FrameworkName::Php | FrameworkName::Node => &[],
            FrameworkName::Symfony => &["7.2", "7.1", "6.4", "5.4"],
            FrameworkName::Laravel => &["11", "10"],
            FrameworkName::Next => &["15", "14"],
            FrameworkName::Nest => &["11", "10"],
            FrameworkName::React => &["19", "18"],
        }
    }

    pub fn extension_supported(&self) -> &'static [&'static str] {
        match self {
            FrameworkName::Symfony => &["intl", "opcache", "pdo_mysql", "pdo_pgsql", "zip"],
            FrameworkName::Laravel => &["bcmath", "opcache", "pdo_mysql", "pdo_pgsql", "zip"],
            _ => &[],
        }
    }

    fn default_public_folder(&self) -> &'static str {
        match self {
            FrameworkName::Symfony | FrameworkName::Laravel => "public",
            FrameworkName::Next | FrameworkName::React => "public",
            FrameworkName::Php | FrameworkName::Node | FrameworkName::Nest => "",
        }
    }

    fn default_application_environment(&self) -> &'static str {
        match self {
            FrameworkName::Symfony | FrameworkName::Laravel | FrameworkName::Php => "dev",
            _ => "development",
        }
    }
}

impl fmt::Display for FrameworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Framework attached to a project container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Framework {
    pub name: FrameworkName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub use_composer: bool,
    #[serde(default)]
    pub install_quality_tools: bool,
    pub application_environment: String,
    #[serde(default)]
    pub public_folder: String,
}

impl Framework {
    pub fn new(name: FrameworkName) -> Self {
        Self {
            name,
            version: None,
            extensions: name
                .extension_supported()
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            use_composer: name.language() == ProjectKind::Php,
            install_quality_tools: false,
            application_environment: name.default_application_environment().to_string(),
            public_folder: name.default_public_folder().to_string(),
        }
    }

    pub fn with_quality_tools(mut self, enabled: bool) -> Self {
        self.install_quality_tools = enabled;
        self
    }

    /// Assign the selected version, rejecting values outside the catalog.
    pub fn set_version(&mut self, version: &str) -> Result<(), AppError> {
        let supported = self.name.version_supported();
        if !supported.is_empty() && !supported.contains(&version) {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                format!(
                    "version '{}' is not supported by {} (supported: {})",
                    version,
                    self.name,
                    supported.join(", ")
                ),
            )
            .with_code("MODEL-003"));
        }
        self.version = Some(version.to_string());
        Ok(())
    }

    pub fn version_supported(&self) -> &'static [&'static str] {
        self.name.version_supported()
    }

    /// True when the framework scaffolds the application itself (no bare folder).
    pub fn is_scaffolded(&self) -> bool {
        !matches!(self.name, FrameworkName::Php | FrameworkName::Node)
    }
}
