//! Security-tool catalog entry types.

use fuzzhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

/// Category of a security tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolKind {
    /// Static analyzer.
    #[serde(rename = "SAST")]
    Sast,
    /// Dynamic analyzer / fuzzer.
    #[serde(rename = "DAST")]
    Dast,
    /// Fuzzing-wrapper boilerplate generator.
    #[serde(rename = "WRAPPER_GEN")]
    WrapperGen,
}

/// A third-party security-analysis tool known to the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ToolKind,
    pub description: Option<String>,
    /// Shell command that installs the tool on the host.
    pub install_command: Option<String>,
    /// Shell command that runs the tool against a project.
    pub run_command: Option<String>,
    pub installed: bool,
    /// Admin user that registered the tool, if any.
    pub owner_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// Payload for registering a new tool.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTool {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ToolKind,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub install_command: Option<String>,
    #[serde(default)]
    pub run_command: Option<String>,
    #[serde(default)]
    pub installed: bool,
    #[serde(default)]
    pub owner_id: Option<DbId>,
}

/// Partial update applied by the configure action. `None` fields are left
/// untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfigUpdate {
    pub install_command: Option<String>,
    pub run_command: Option<String>,
    pub description: Option<String>,
}
