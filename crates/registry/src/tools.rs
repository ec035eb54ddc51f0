//! In-memory tool registry.
//!
//! Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
//! shared between the HTTP handlers and the job runner. Ships with the
//! default catalog of analyzers, fuzzers, and wrapper generators so a fresh
//! deployment has something to show.

use std::collections::HashMap;

use fuzzhub_core::error::CoreError;
use fuzzhub_core::types::DbId;
use tokio::sync::RwLock;

use crate::tool::{NewTool, Tool, ToolConfigUpdate, ToolKind};

struct Inner {
    tools: HashMap<DbId, Tool>,
    next_id: DbId,
}

/// Registry of known security tools, keyed by tool id.
pub struct ToolRegistry {
    inner: RwLock<Inner>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                tools: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Create a registry seeded with the default tool catalog.
    pub async fn with_default_catalog() -> Self {
        let registry = Self::new();
        for tool in default_catalog() {
            registry.create(tool).await;
        }
        registry
    }

    /// Register a new tool and return it with its assigned id.
    pub async fn create(&self, new: NewTool) -> Tool {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;

        let tool = Tool {
            id,
            name: new.name,
            kind: new.kind,
            description: new.description,
            install_command: new.install_command,
            run_command: new.run_command,
            installed: new.installed,
            owner_id: new.owner_id,
            created_at: chrono::Utc::now(),
        };
        inner.tools.insert(id, tool.clone());
        tool
    }

    /// All tools, ordered by id.
    pub async fn list(&self) -> Vec<Tool> {
        let inner = self.inner.read().await;
        let mut tools: Vec<Tool> = inner.tools.values().cloned().collect();
        tools.sort_by_key(|t| t.id);
        tools
    }

    /// Look up a tool by id.
    pub async fn get(&self, id: DbId) -> Option<Tool> {
        self.inner.read().await.tools.get(&id).cloned()
    }

    /// Flip a tool's `installed` flag. This is the one durable write the
    /// job subsystem performs (on install success).
    pub async fn set_installed(&self, id: DbId, installed: bool) -> Result<Tool, CoreError> {
        let mut inner = self.inner.write().await;
        let tool = inner
            .tools
            .get_mut(&id)
            .ok_or(CoreError::NotFound { entity: "Tool", id })?;
        tool.installed = installed;
        Ok(tool.clone())
    }

    /// Apply a partial configuration update. `None` fields keep their
    /// current value.
    pub async fn update_config(
        &self,
        id: DbId,
        update: ToolConfigUpdate,
    ) -> Result<Tool, CoreError> {
        let mut inner = self.inner.write().await;
        let tool = inner
            .tools
            .get_mut(&id)
            .ok_or(CoreError::NotFound { entity: "Tool", id })?;

        if let Some(install_command) = update.install_command {
            tool.install_command = Some(install_command);
        }
        if let Some(run_command) = update.run_command {
            tool.run_command = Some(run_command);
        }
        if let Some(description) = update.description {
            tool.description = Some(description);
        }
        Ok(tool.clone())
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The default tool catalog shipped with a fresh deployment.
fn default_catalog() -> Vec<NewTool> {
    fn entry(
        name: &str,
        kind: ToolKind,
        description: &str,
        install_command: &str,
        run_command: &str,
        installed: bool,
    ) -> NewTool {
        NewTool {
            name: name.into(),
            kind,
            description: Some(description.into()),
            install_command: Some(install_command.into()),
            run_command: Some(run_command.into()),
            installed,
            owner_id: None,
        }
    }

    vec![
        entry(
            "AFL++",
            ToolKind::Dast,
            "Advanced fuzzing for C/C++ binaries",
            "git clone https://github.com/AFLplusplus/AFLplusplus && cd AFLplusplus && make",
            "afl-fuzz -i input -o output ./target",
            false,
        ),
        entry(
            "libFuzzer",
            ToolKind::Dast,
            "Coverage-guided fuzzing engine",
            "clang -fsanitize=fuzzer,address -g -O1",
            "./fuzz_target corpus/",
            false,
        ),
        entry(
            "afl-ruby",
            ToolKind::Dast,
            "Ruby fuzzing with AFL integration",
            "gem install afl",
            "afl-fuzz -i input -o output ruby target.rb",
            false,
        ),
        entry(
            "Semgrep",
            ToolKind::Sast,
            "Multi-language static analysis",
            "pip install semgrep",
            "semgrep --config=auto .",
            true,
        ),
        entry(
            "SonarQube",
            ToolKind::Sast,
            "Code quality and security analysis",
            "docker pull sonarqube:latest",
            "sonar-scanner -Dsonar.projectKey=myproject",
            true,
        ),
        entry(
            "RubyCritic",
            ToolKind::Sast,
            "Ruby code quality analyzer",
            "gem install rubycritic",
            "rubycritic --path output lib/",
            false,
        ),
        entry(
            "RuboCop",
            ToolKind::Sast,
            "Ruby static code analyzer",
            "gem install rubocop",
            "rubocop --format json",
            false,
        ),
        entry(
            "OWASP ZAP",
            ToolKind::Dast,
            "Web application security scanner",
            "docker pull owasp/zap2docker-stable",
            "zap-baseline.py -t",
            true,
        ),
        entry(
            "dewrapper",
            ToolKind::WrapperGen,
            "Ruby fuzzing wrapper generator",
            "python3 -m pip install --user ruby-transform",
            "python3 transform.py",
            true,
        ),
        entry(
            "futage",
            ToolKind::WrapperGen,
            "C/C++ fuzzing wrapper generator",
            "git clone https://github.com/futage/futage && cd futage && make install",
            "futage",
            true,
        ),
        entry(
            "PyFuzzWrap",
            ToolKind::WrapperGen,
            "Python fuzzing wrapper generator",
            "pip install pyfuzzwrap",
            "pyfuzzwrap",
            true,
        ),
        entry(
            "Nikto",
            ToolKind::Dast,
            "Web server vulnerability scanner",
            "apt-get install nikto",
            "nikto -h",
            true,
        ),
    ]
}
