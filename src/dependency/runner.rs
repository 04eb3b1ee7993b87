//! 子プロセス実行

use crate::error::{HaberError, Result};
use std::fmt;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// タイムアウト未指定時の上限
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// 実行するコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub program: String,
    pub args: Vec<String>,
    timeout: Duration,
    /// 標準入出力を端末に引き継ぐ
    interactive: bool,
}

impl ShellCommand {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            timeout: DEFAULT_COMMAND_TIMEOUT,
            interactive: false,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// 子プロセスの出力
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// コマンド実行 trait
pub trait CommandRunner {
    /// `cwd` で実行し、コマンドのタイムアウトを超えたら子プロセスを終了させる
    ///
    /// - 起動失敗: `CommandSpawn`
    /// - 非ゼロ終了: `CommandFailed`
    /// - タイムアウト: `CommandTimeout`
    fn run<'a>(
        &'a self,
        command: &'a ShellCommand,
        cwd: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + 'a>>;
}

/// tokio::process による実装
pub struct ProcessRunner;

impl ProcessRunner {
    fn build(command: &ShellCommand) -> Command {
        // Windows では npx などが .cmd のため cmd 経由で起動する
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(&command.program);
            cmd
        } else {
            Command::new(&command.program)
        };
        cmd.args(&command.args);

        if command.interactive {
            cmd.stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        } else {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
        }
        cmd.kill_on_drop(true);
        cmd
    }
}

impl CommandRunner for ProcessRunner {
    fn run<'a>(
        &'a self,
        command: &'a ShellCommand,
        cwd: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + 'a>> {
        Box::pin(async move {
            let label = command.to_string();
            let timeout = command.timeout();
            debug!(command = %label, cwd = %cwd.display(), timeout_secs = timeout.as_secs(), "spawning");

            let child = Self::build(command)
                .current_dir(cwd)
                .spawn()
                .map_err(|source| HaberError::CommandSpawn {
                    command: label.clone(),
                    source,
                })?;

            // タイムアウト時は future ごと破棄され、kill_on_drop により子プロセスも終了する
            let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
                Ok(output) => output?,
                Err(_) => {
                    return Err(HaberError::CommandTimeout {
                        command: label,
                        timeout,
                    })
                }
            };

            let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

            if !output.status.success() {
                return Err(HaberError::CommandFailed {
                    command: label,
                    code: output.status.code(),
                    stderr,
                });
            }

            debug!(command = %label, "finished");
            Ok(CommandOutput { stdout, stderr })
        })
    }
}

#[cfg(test)]
pub mod fake;

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
