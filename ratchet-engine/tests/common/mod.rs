//! Scripted collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use ratchet_core::config::RatchetConfig;
use ratchet_core::traits::{BranchSource, CommandOutput, CommandRunner, CoverageReader, CoverageSummary};

/// Returns canned output per command string. Unknown commands exit 0 silently.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: Mutex<HashMap<String, CommandOutput>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, command: &str, exit_code: i32, stdout: &str) {
        self.responses.lock().unwrap().insert(
            command.to_string(),
            CommandOutput {
                exit_code,
                duration_ms: 1,
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        );
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, _working_dir: &Path, command: &str) -> std::io::Result<CommandOutput> {
        self.calls.lock().unwrap().push(command.to_string());
        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(command)
            .cloned()
            .unwrap_or_default())
    }
}

/// Always fails to start a process.
pub struct BrokenRunner;

impl CommandRunner for BrokenRunner {
    fn run(&self, _working_dir: &Path, _command: &str) -> std::io::Result<CommandOutput> {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no shell"))
    }
}

/// Reports a fixed coverage average for a fixed number of packages.
pub struct FixedCoverage {
    pub average: f64,
    pub packages: usize,
}

impl CoverageReader for FixedCoverage {
    fn read(&self, _root: &Path, package_dirs: &[String], _summary_path: &str) -> CoverageSummary {
        CoverageSummary {
            average: self.average,
            packages_with_summary: self.packages,
            missing: package_dirs.iter().skip(self.packages).cloned().collect(),
        }
    }
}

pub struct FixedBranch(pub Option<String>);

impl BranchSource for FixedBranch {
    fn current_branch(&self, _root: &Path) -> Option<String> {
        self.0.clone()
    }
}

pub const COMMANDS: &str = r#"
[commands]
typecheck = "tsc --noEmit"
lint = "eslint ."
test = "jest --coverage"
build = "npm run build"
"#;

/// Two packages and the four commands. `top` holds top-level keys, `tables`
/// holds extra tables such as `[verify]`.
pub fn config(top: &str, tables: &str) -> RatchetConfig {
    RatchetConfig::from_toml(&format!(
        "package_dirs = [\"packages/api\", \"packages/web\"]\n{top}\n{COMMANDS}\n{tables}"
    ))
    .unwrap()
}

pub fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}
