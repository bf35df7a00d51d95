use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::config::StageConfig;

pub struct ModuleBuilder {
    tool: String,
    args: Vec<String>,
    extension: String,
}

/// Result of building one staged module. Failures of the build tool are
/// reported here rather than as errors.
#[derive(Debug)]
pub enum BuildOutcome {
    /// No top-level file carries the source extension.
    NoSource,
    /// The build tool could not be located on PATH.
    ToolMissing { tool: String },
    /// The build tool could not be started.
    SpawnFailed { source_file: String, error: String },
    Completed {
        source_file: String,
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },
}

impl BuildOutcome {
    /// Whether the build tool was looked up for this module.
    pub fn attempted(&self) -> bool {
        !matches!(self, BuildOutcome::NoSource)
    }

    pub fn success(&self) -> bool {
        matches!(self, BuildOutcome::Completed { status, .. } if status.success())
    }
}

impl fmt::Display for BuildOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildOutcome::NoSource => write!(f, "no source file"),
            BuildOutcome::ToolMissing { tool } => write!(f, "build tool '{}' not found in PATH", tool),
            BuildOutcome::SpawnFailed { source_file, error } => {
                write!(f, "failed to run build for {}: {}", source_file, error)
            }
            BuildOutcome::Completed {
                source_file,
                status,
                stdout,
                stderr,
            } => {
                write!(f, "{} ({})", source_file, status)?;
                if !stdout.is_empty() {
                    write!(f, "\nstdout:\n{}", stdout.trim_end())?;
                }
                if !stderr.is_empty() {
                    write!(f, "\nstderr:\n{}", stderr.trim_end())?;
                }
                Ok(())
            }
        }
    }
}

impl ModuleBuilder {
    pub fn new(config: &StageConfig) -> Self {
        Self {
            tool: config.build_tool.clone(),
            args: config.build_args.clone(),
            extension: config.extension.clone(),
        }
    }

    /// Builds the first source file found at the top level of `module_dir`,
    /// running the tool with `module_dir` as its working directory.
    pub fn build(&self, module_dir: &Path) -> Result<BuildOutcome> {
        let Some(source_file) = find_source_file(module_dir, &self.extension)? else {
            log::debug!("no {} file in {}, skipping build", self.extension, module_dir.display());
            return Ok(BuildOutcome::NoSource);
        };

        let tool_path = match self.resolve_tool(module_dir) {
            Some(path) => path,
            None => {
                return Ok(BuildOutcome::ToolMissing {
                    tool: self.tool.clone(),
                });
            }
        };

        // Run from inside the module; stdin closed, output captured
        let mut cmd = Command::new(&tool_path);
        cmd.args(&self.args);
        cmd.arg(&source_file);
        cmd.current_dir(module_dir);
        cmd.stdin(Stdio::null());

        log::debug!(
            "running {} {} {} in {}",
            tool_path.display(),
            self.args.join(" "),
            source_file,
            module_dir.display()
        );

        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) => {
                return Ok(BuildOutcome::SpawnFailed {
                    source_file,
                    error: e.to_string(),
                });
            }
        };

        Ok(BuildOutcome::Completed {
            source_file,
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Looks the tool up on PATH; a relative tool path is taken from `module_dir`.
    fn resolve_tool(&self, module_dir: &Path) -> Option<PathBuf> {
        match which::which_in(&self.tool, env::var_os("PATH"), module_dir) {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("build tool '{}' not found: {}", self.tool, e);
                None
            }
        }
    }
}

/// Name of the first non-directory entry directly inside `dir` whose name ends
/// with `extension`, in directory listing order.
pub fn find_source_file(dir: &Path, extension: &str) -> Result<Option<String>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read module directory: {}", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list module directory: {}", dir.display()))?;
        if entry.path().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(extension) {
            return Ok(Some(name));
        }
    }

    Ok(None)
}
