//! haber 統一エラー型
//!
//! `HaberError` はパイプライン全体で `?` により伝播し、最終的に
//! `to_diagnostic()` でコードと補足情報付きの `Diagnostic` に変換して表示する。

pub mod code;
pub mod diagnostic;
pub mod formatter;

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub use code::ErrorCode;
pub use formatter::ErrorFormatter;
pub use diagnostic::Diagnostic;

/// haber 統一エラー型
#[derive(Debug, Error)]
pub enum HaberError {
    #[error("Could not find a HaberUI configuration file in {}", .0.display())]
    NotInitialized(PathBuf),

    #[error("Component {0} not found")]
    ComponentNotFound(String),

    #[error("Invalid component name '{name}': {reason}")]
    InvalidComponentName { name: String, reason: String },

    #[error("Invalid descriptor for component '{name}': {reason}")]
    InvalidDescriptor { name: String, reason: String },

    #[error("Refusing to write outside the component directory: {0}")]
    UnsafePath(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Registry request failed: {url} (status: {status})")]
    RegistryHttp {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Failed to start `{command}`: {source}")]
    CommandSpawn {
        command: String,
        source: std::io::Error,
    },

    #[error("`{command}` {}", describe_exit(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("`{command}` timed out after {}s", .timeout.as_secs())]
    CommandTimeout { command: String, timeout: Duration },

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HaberError>;

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

impl HaberError {
    /// リトライ可能なエラーかどうか
    pub fn is_retryable(&self) -> bool {
        match self {
            HaberError::Network(_) => true,
            HaberError::RegistryHttp { status, .. } => {
                // 429 と 5xx はリトライ可能
                *status == 429 || (*status >= 500 && *status < 600)
            }
            _ => false,
        }
    }

    /// 対応するエラーコード
    pub fn code(&self) -> ErrorCode {
        match self {
            HaberError::NotInitialized(_) => ErrorCode::Cfg001,
            HaberError::ComponentNotFound(_) => ErrorCode::Cmp001,
            HaberError::InvalidComponentName { .. } => ErrorCode::Cmp002,
            HaberError::InvalidDescriptor { .. } => ErrorCode::Cmp003,
            HaberError::UnsafePath(_) => ErrorCode::Io004,
            HaberError::Network(e) if e.is_timeout() => ErrorCode::Net002,
            HaberError::Network(_) => ErrorCode::Net001,
            HaberError::RegistryHttp { status: 429, .. } => ErrorCode::Api001,
            HaberError::RegistryHttp { status, .. } if *status >= 500 => ErrorCode::Api004,
            HaberError::RegistryHttp { .. } => ErrorCode::Api003,
            HaberError::CommandSpawn { .. } => ErrorCode::Cmd001,
            HaberError::CommandFailed { .. } => ErrorCode::Cmd002,
            HaberError::CommandTimeout { .. } => ErrorCode::Cmd003,
            HaberError::Prompt(_) => ErrorCode::Tty001,
            HaberError::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::Io001,
                std::io::ErrorKind::PermissionDenied => ErrorCode::Io002,
                _ => ErrorCode::Io003,
            },
            HaberError::Json(_) => ErrorCode::Cfg002,
        }
    }

    /// 表示用の Diagnostic に変換
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::new(self.code(), self.to_string());
        match self {
            HaberError::NotInitialized(dir) => {
                diagnostic.path(dir.join(crate::config::CONFIG_FILE))
            }
            HaberError::ComponentNotFound(name)
            | HaberError::InvalidComponentName { name, .. }
            | HaberError::InvalidDescriptor { name, .. } => diagnostic.component(name.clone()),
            HaberError::RegistryHttp { url, message, .. } => {
                let diagnostic = diagnostic.url(url.clone());
                match message.trim() {
                    "" => diagnostic,
                    body => diagnostic.field("response", truncate(body, 200)),
                }
            }
            HaberError::Network(e) => match e.url() {
                Some(url) => diagnostic.url(url.to_string()),
                None => diagnostic,
            },
            HaberError::CommandFailed { command, stderr, .. } => {
                let diagnostic = diagnostic.field("command", command.clone());
                match stderr.trim() {
                    "" => diagnostic,
                    stderr => diagnostic.field("stderr", truncate(stderr, 400)),
                }
            }
            HaberError::CommandSpawn { command, .. }
            | HaberError::CommandTimeout { command, .. } => {
                diagnostic.field("command", command.clone())
            }
            _ => diagnostic,
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}...", head)
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
