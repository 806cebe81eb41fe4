//! Environment variables of project containers: generators, env files and overlays.

pub mod file;
pub mod generator;
pub mod modifiers;
pub mod node;
pub mod php;

pub use file::{parse_env, read_env_file, render_env, write_env_file};
pub use generator::{
    common_variables, require_version, EnvVariableGenerator, EnvVariables, GeneratorRegistry,
};
pub use modifiers::{EnvModifier, EnvModifierChain, APPLICATION_ENV_FILE};
pub use node::NodeEnvGenerator;
pub use php::PhpEnvGenerator;
