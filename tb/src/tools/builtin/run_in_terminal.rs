//! RunInTerminal tool - execute a program with literal arguments

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::process::Stdio;
use tracing::{debug, info, warn};

use crate::tools::{Tool, ToolContext, ToolError, parse_params};

const DESCRIPTION: &str = "Run a command in the terminal. Use this tool when you need to execute a command that \
                           is not directly related to the codebase, such as running tests, building the project, \
                           or executing scripts. The command is a list: the program followed by its literal \
                           arguments. No shell is involved, so pipes, globs and variables are not expanded.";

/// Runtimes advertised by [`RunInTerminalTool::with_runtime_probe`]
const PROBED_RUNTIMES: &[&str] = &["ruby", "python", "python3", "node", "bash", "sh"];

/// Parameters for [`RunInTerminalTool`]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunInTerminalParams {
    pub command: Vec<String>,

    /// Why the command runs; recorded in logs only
    #[serde(default)]
    pub explanation: String,
}

/// Captured outcome of a command that ran to completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutput {
    pub status: String,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// A scripting runtime found on the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    pub name: String,
    pub version: String,
}

/// Execute a program directly (argv, never a shell)
pub struct RunInTerminalTool {
    description: String,
}

impl RunInTerminalTool {
    pub fn new() -> Self {
        Self {
            description: DESCRIPTION.to_string(),
        }
    }

    /// Build the tool with a description listing the runtimes installed on this host
    pub fn with_runtime_probe() -> Self {
        let runtimes = detect_runtimes();
        Self {
            description: describe_runtimes(&runtimes),
        }
    }

    /// Run the command, capturing stdout and stderr separately
    ///
    /// A non-zero exit is a normal result; only failing to start, being
    /// killed by a signal, or session cancellation are errors.
    pub async fn run(&self, params: &RunInTerminalParams, ctx: &ToolContext) -> Result<CommandOutput, ToolError> {
        debug!(command = ?params.command, "RunInTerminalTool::run: called");
        let Some((program, args)) = params.command.split_first() else {
            debug!("RunInTerminalTool::run: empty command");
            return Err(ToolError::Validation("command is required".to_string()));
        };

        info!(%program, ?args, explanation = %params.explanation, "RunInTerminalTool::run: spawning");
        let child = tokio::process::Command::new(program)
            .args(args)
            .current_dir(&ctx.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                debug!(%e, "RunInTerminalTool::run: failed to spawn");
                ToolError::Execution {
                    program: program.clone(),
                    source: e,
                }
            })?;

        // Dropping the wait future drops the child, which kills it
        let output = tokio::select! {
            output = child.wait_with_output() => output.map_err(|e| ToolError::Execution {
                program: program.clone(),
                source: e,
            })?,
            _ = ctx.cancel.cancelled() => {
                warn!(%program, "RunInTerminalTool::run: cancelled, child killed");
                return Err(ToolError::Cancelled);
            }
        };

        let Some(exit_code) = output.status.code() else {
            debug!(status = ?output.status, "RunInTerminalTool::run: no exit code");
            return Err(ToolError::Terminated {
                program: program.clone(),
            });
        };

        debug!(%exit_code, stdout_len = %output.stdout.len(), stderr_len = %output.stderr.len(), "RunInTerminalTool::run: completed");
        Ok(CommandOutput {
            status: "completed".to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code,
        })
    }
}

impl Default for RunInTerminalTool {
    fn default() -> Self {
        Self::new()
    }
}

/// Probe each known runtime with `--version`, keeping the first output line
pub fn detect_runtimes() -> Vec<RuntimeInfo> {
    PROBED_RUNTIMES
        .iter()
        .filter_map(|name| {
            let output = std::process::Command::new(name)
                .arg("--version")
                .stdin(Stdio::null())
                .output()
                .ok()?;
            if !output.status.success() {
                debug!(%name, "detect_runtimes: version probe failed");
                return None;
            }

            // Some runtimes (older python) print the version on stderr
            let text = if output.stdout.is_empty() {
                String::from_utf8_lossy(&output.stderr).into_owned()
            } else {
                String::from_utf8_lossy(&output.stdout).into_owned()
            };
            let version = text.trim().lines().next().unwrap_or_default().to_string();
            debug!(%name, %version, "detect_runtimes: found");
            Some(RuntimeInfo {
                name: name.to_string(),
                version,
            })
        })
        .collect()
}

fn describe_runtimes(runtimes: &[RuntimeInfo]) -> String {
    let mut description = format!(
        "{} You may also execute source code directly by providing the runtime and the script. Only \
         features from the language's standard library should be used; external dependencies are not \
         installed.",
        DESCRIPTION
    );

    if runtimes.is_empty() {
        description.push_str("\n\nNo supported runtimes found on the system.");
    } else {
        let list: Vec<String> = runtimes
            .iter()
            .map(|r| format!("{} ({})", r.name, r.version))
            .collect();
        description.push_str("\n\nAvailable runtimes (you MUST use one of these exact names): ");
        description.push_str(&list.join(", "));
    }
    description
}

#[async_trait]
impl Tool for RunInTerminalTool {
    fn name(&self) -> &str {
        "RunInTerminal"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "array",
                    "items": { "type": "string" },
                    "minItems": 1,
                    "description": "Command with args to run in the terminal."
                },
                "explanation": {
                    "type": "string",
                    "description": "A brief explanation of why this command needs to run."
                }
            },
            "required": ["command"]
        })
    }

    async fn call(&self, input: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let params: RunInTerminalParams = parse_params(self.name(), input)?;
        let output = self.run(&params, ctx).await?;
        Ok(serde_json::to_value(output)?)
    }
}
