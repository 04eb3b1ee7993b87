//! プロジェクト設定（haber.json）と HTTP 設定

use crate::error::Result;
use crate::fs::FileSystem;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// 設定ファイル名
pub const CONFIG_FILE: &str = "haber.json";
pub const DEFAULT_SCHEMA: &str = "https://haberui.com/schema.json";
pub const DEFAULT_REGISTRY: &str = "https://haberui.com/h";
pub const DEFAULT_COMPONENT_DIR: &str = "components/haber-ui";
pub const DEFAULT_IMPORT_PATH: &str = "@/components/haber-ui";

/// レジストリURLを一時的に上書きする環境変数（保存はしない）
pub const REGISTRY_ENV: &str = "HABER_REGISTRY_URL";

/// 空白のみの値は未設定として扱う
fn registry_from_env() -> Option<String> {
    std::env::var(REGISTRY_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// スタイリング方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Tailwind,
    Css,
}

impl Style {
    pub fn label(&self) -> &'static str {
        match self {
            Style::Tailwind => "Tailwind CSS",
            Style::Css => "CSS Modules",
        }
    }
}

/// haber.json の内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(rename = "$schema", default = "default_schema")]
    pub schema: String,
    #[serde(default)]
    pub style: Style,
    #[serde(default = "default_tailwind")]
    pub tailwind: bool,
    pub component_dir: String,
    pub import_path: String,
    #[serde(default = "default_registry")]
    pub registry: String,
}

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

fn default_tailwind() -> bool {
    true
}

fn default_registry() -> String {
    DEFAULT_REGISTRY.to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            schema: default_schema(),
            style: Style::Tailwind,
            tailwind: true,
            component_dir: DEFAULT_COMPONENT_DIR.to_string(),
            import_path: DEFAULT_IMPORT_PATH.to_string(),
            registry: default_registry(),
        }
    }
}

/// 部分更新（None のフィールドは変更しない）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    pub style: Option<Style>,
    pub tailwind: Option<bool>,
    pub component_dir: Option<String>,
    pub import_path: Option<String>,
    pub registry: Option<String>,
}

impl ConfigPatch {
    fn apply(self, config: &mut ProjectConfig) {
        if let Some(style) = self.style {
            config.style = style;
        }
        if let Some(tailwind) = self.tailwind {
            config.tailwind = tailwind;
        }
        if let Some(dir) = self.component_dir {
            config.component_dir = dir;
        }
        if let Some(import_path) = self.import_path {
            config.import_path = import_path;
        }
        if let Some(registry) = self.registry {
            config.registry = registry;
        }
    }
}

impl ProjectConfig {
    /// 設定ファイルのパス
    pub fn path(cwd: &Path) -> PathBuf {
        cwd.join(CONFIG_FILE)
    }

    /// haber.json を読み込む
    ///
    /// ファイルが無い場合・読めない場合・JSON として壊れている場合は None。
    /// 「未初期化」と区別せず、呼び出し側で `haber init` を案内する。
    pub fn load(fs: &dyn FileSystem, cwd: &Path) -> Option<Self> {
        let path = Self::path(cwd);
        let content = match fs.read_optional(&path) {
            Ok(Some(content)) => content,
            Ok(None) => {
                debug!(path = %path.display(), "config not found");
                return None;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read config");
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to parse config");
                None
            }
        }
    }

    /// 読み込み + 環境変数による上書き（コマンド実行用）
    pub fn resolve(fs: &dyn FileSystem, cwd: &Path) -> Option<Self> {
        Self::load(fs, cwd).map(|config| config.with_registry_override(registry_from_env()))
    }

    /// 設定が無ければ既定値を使う（レジストリ参照のみのコマンド用）
    pub fn resolve_or_default(fs: &dyn FileSystem, cwd: &Path) -> Self {
        Self::load(fs, cwd)
            .unwrap_or_default()
            .with_registry_override(registry_from_env())
    }

    fn with_registry_override(mut self, registry: Option<String>) -> Self {
        if let Some(registry) = registry {
            debug!(registry = %registry, "registry overridden by {}", REGISTRY_ENV);
            self.registry = registry;
        }
        self
    }

    /// haber.json を書き込む（2スペースインデント + 末尾改行）
    pub fn save(&self, fs: &dyn FileSystem, cwd: &Path) -> Result<PathBuf> {
        let path = Self::path(cwd);
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        fs.write(&path, content.as_bytes())?;
        Ok(path)
    }

    /// 既存設定にパッチをマージして書き戻す
    ///
    /// 既存設定が無い場合は Ok(None)。
    pub fn update(fs: &dyn FileSystem, patch: ConfigPatch, cwd: &Path) -> Result<Option<Self>> {
        let Some(mut config) = Self::load(fs, cwd) else {
            return Ok(None);
        };
        patch.apply(&mut config);
        config.save(fs, cwd)?;
        Ok(Some(config))
    }

    /// コンポーネントのインストール先ディレクトリ
    pub fn component_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.component_dir)
    }

    /// import 文で使うモジュールパス
    pub fn import_for(&self, name: &str) -> String {
        format!("{}/{}", self.import_path.trim_end_matches('/'), name)
    }
}

/// HTTP設定
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// タイムアウト
    pub timeout: Option<Duration>,
    /// User-Agent
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            user_agent: concat!("haber-cli/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    /// reqwest::Client を構築
    pub fn build_client(&self) -> Client {
        let mut builder = Client::builder().user_agent(&self.user_agent);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().unwrap_or_else(|_| Client::new())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
