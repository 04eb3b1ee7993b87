//! 表示用のエラー診断情報

use super::code::ErrorCode;
use std::path::PathBuf;

/// 診断に添える補足情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    Path(PathBuf),
    Url(String),
    Component(String),
    /// `command` や `stderr` など名前付きの値
    Field(&'static str, String),
}

impl Detail {
    /// 表示順（パス → URL → コンポーネント → その他）
    fn rank(&self) -> u8 {
        match self {
            Detail::Path(_) => 0,
            Detail::Url(_) => 1,
            Detail::Component(_) => 2,
            Detail::Field(..) => 3,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Detail::Path(path) => path.display().to_string(),
            Detail::Url(url) => url.clone(),
            Detail::Component(name) => format!("component: {}", name),
            Detail::Field(key, value) => format!("{}: {}", key, value),
        }
    }
}

/// コード・メッセージ・補足情報をまとめたもの
#[derive(Debug, Clone)]
pub struct Diagnostic {
    code: ErrorCode,
    message: String,
    details: Vec<Detail>,
}

impl Diagnostic {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn path(self, path: impl Into<PathBuf>) -> Self {
        self.detail(Detail::Path(path.into()))
    }

    pub fn url(self, url: impl Into<String>) -> Self {
        self.detail(Detail::Url(url.into()))
    }

    pub fn component(self, name: impl Into<String>) -> Self {
        self.detail(Detail::Component(name.into()))
    }

    pub fn field(self, key: &'static str, value: impl Into<String>) -> Self {
        self.detail(Detail::Field(key, value.into()))
    }

    fn detail(mut self, detail: Detail) -> Self {
        self.details.push(detail);
        // 同順位は追加順を保つ
        self.details.sort_by_key(Detail::rank);
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &[Detail] {
        &self.details
    }

    /// 名前付きの値を取り出す
    #[cfg(test)]
    pub fn field_value(&self, key: &str) -> Option<&str> {
        self.details.iter().find_map(|detail| match detail {
            Detail::Field(k, v) if *k == key => Some(v.as_str()),
            _ => None,
        })
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error[{}]: {}", self.code, self.message)
    }
}
