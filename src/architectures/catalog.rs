use crate::error::{PromptitectureError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A named architecture in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    EcRag,
    McpSwarm,
    Rcop,
    Flsin,
    Hmmaf,
}

/// Implementation status of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchitectureStatus {
    /// Registered but without an executable implementation
    Planned,
    /// Executable through the CLI and API
    Available,
}

/// Serializable descriptor returned by the CLI and the HTTP API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchitectureInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub status: ArchitectureStatus,
}

impl Architecture {
    /// Every registered architecture, in catalog order
    pub const ALL: [Architecture; 5] = [
        Architecture::EcRag,
        Architecture::McpSwarm,
        Architecture::Rcop,
        Architecture::Flsin,
        Architecture::Hmmaf,
    ];

    /// Stable kebab-case identifier used in URLs and on the command line
    pub fn id(self) -> &'static str {
        match self {
            Architecture::EcRag => "ec-rag",
            Architecture::McpSwarm => "mcp-swarm",
            Architecture::Rcop => "rcop",
            Architecture::Flsin => "flsin",
            Architecture::Hmmaf => "hmmaf",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Architecture::EcRag => "EC-RAG",
            Architecture::McpSwarm => "MCP-Swarm",
            Architecture::Rcop => "RCOP",
            Architecture::Flsin => "FLSIN",
            Architecture::Hmmaf => "HMMAF",
        }
    }

    pub fn status(self) -> ArchitectureStatus {
        ArchitectureStatus::Planned
    }

    pub fn info(self) -> ArchitectureInfo {
        ArchitectureInfo {
            id: self.id(),
            name: self.display_name(),
            status: self.status(),
        }
    }
}

/// Lowercase and drop separators so `EC_RAG`, `ec rag` and `ecrag` compare equal.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Architecture {
    type Err = PromptitectureError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = normalize(s.trim());
        if wanted.is_empty() {
            return Err(PromptitectureError::InvalidInput(
                "architecture name must not be empty".to_string(),
            ));
        }

        Architecture::ALL
            .into_iter()
            .find(|arch| normalize(arch.id()) == wanted)
            .ok_or_else(|| PromptitectureError::UnknownArchitecture(s.trim().to_string()))
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl fmt::Display for ArchitectureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchitectureStatus::Planned => f.write_str("planned"),
            ArchitectureStatus::Available => f.write_str("available"),
        }
    }
}

/// Descriptors for the whole catalog
pub fn catalog() -> Vec<ArchitectureInfo> {
    Architecture::ALL.iter().map(|arch| arch.info()).collect()
}

/// Resolve a user-supplied name to its descriptor
pub fn lookup(name: &str) -> Result<ArchitectureInfo> {
    name.parse::<Architecture>().map(Architecture::info)
}
