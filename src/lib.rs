//! PrompTitecture: AI architecture framework scaffold.
//!
//! Ships the `promptitecture` / `pt` command line, an HTTP application factory
//! and the catalog of named architectures.

pub mod api;
pub mod architectures;
pub mod cli;
pub mod config;
pub mod error;
pub mod exit_codes;

use serde::Serialize;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHOR: &str = "GaboBase";
pub const LICENSE: &str = "MIT";
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
pub const REPOSITORY: &str = env!("CARGO_PKG_REPOSITORY");
pub const DOCUMENTATION: &str = "https://github.com/GaboBase/promptitecture";
pub const BUG_TRACKER: &str = "https://github.com/GaboBase/promptitecture/issues";

/// Package metadata as reported by `pt info` and `GET /version`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub author: &'static str,
    pub license: &'static str,
    pub description: &'static str,
    pub repository: &'static str,
    pub documentation: &'static str,
    pub bug_tracker: &'static str,
}

impl PackageInfo {
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: VERSION,
            author: AUTHOR,
            license: LICENSE,
            description: DESCRIPTION,
            repository: REPOSITORY,
            documentation: DOCUMENTATION,
            bug_tracker: BUG_TRACKER,
        }
    }
}

pub use api::create_app;
pub use architectures::{Architecture, ArchitectureInfo, ArchitectureStatus};
pub use cli::main as cli_main;
pub use config::Config;
pub use error::{PromptitectureError, Result};
