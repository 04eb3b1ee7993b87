//! テスト用 CommandRunner

use super::*;
use std::collections::HashMap;
use std::sync::Mutex;

/// 事前に決めた結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Exit(i32),
    Timeout,
    SpawnError,
}

/// 実行されたコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub timeout: Duration,
}

/// コマンド文字列ごとに結果を返すフェイク（未登録は成功）
#[derive(Default)]
pub struct FakeRunner {
    outcomes: Mutex<HashMap<String, Outcome>>,
    invocations: Mutex<Vec<Invocation>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcome(self, command: &str, outcome: Outcome) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .insert(command.to_string(), outcome);
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    /// 実行されたコマンド文字列
    pub fn commands(&self) -> Vec<String> {
        self.invocations()
            .into_iter()
            .map(|invocation| invocation.command)
            .collect()
    }
}

impl CommandRunner for FakeRunner {
    fn run<'a>(
        &'a self,
        command: &'a ShellCommand,
        _cwd: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + 'a>> {
        let label = command.to_string();
        let timeout = command.timeout();
        self.invocations.lock().unwrap().push(Invocation {
            command: label.clone(),
            timeout,
        });
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .get(&label)
            .copied()
            .unwrap_or(Outcome::Success);

        Box::pin(async move {
            match outcome {
                Outcome::Success => Ok(CommandOutput::default()),
                Outcome::Exit(code) => Err(HaberError::CommandFailed {
                    command: label,
                    code: Some(code),
                    stderr: "fake failure".to_string(),
                }),
                Outcome::Timeout => Err(HaberError::CommandTimeout {
                    command: label,
                    timeout,
                }),
                Outcome::SpawnError => Err(HaberError::CommandSpawn {
                    command: label,
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                }),
            }
        })
    }
}
