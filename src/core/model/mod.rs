//! Typed descriptors for projects, containers and frameworks.

pub mod container;
pub mod credentials;
pub mod framework;
pub mod project;

pub use container::{
    Container, FormType, GitSource, ProjectContainer, ProjectKind, ServiceContainer, ServiceKind,
    WebServerBinding,
};
pub use credentials::DatabaseCredentials;
pub use framework::{Framework, FrameworkName};
pub use project::{final_tag_name, tag_name, Project};
