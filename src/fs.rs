//! ファイルシステム抽象化
//!
//! haber.json・ローカルレジストリ・コンポーネントファイルの読み書きは
//! すべてこのトレイト経由で行う。テストでは MockFs を注入する。

use crate::error::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// 親ディレクトリを作成してから書き込む。既存ファイルは置き換える。
    fn write(&self, path: &Path, content: &[u8]) -> Result<()>;

    /// 存在しないファイルの削除は成功扱い
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// 存在すれば内容を返す
    fn read_optional(&self, path: &Path) -> Result<Option<String>> {
        if self.exists(path) {
            self.read_to_string(path).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// 本番用実装
pub struct RealFs;

impl RealFs {
    /// 書き込み途中のファイル（`<name>.haber-tmp`）
    fn staging_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".haber-tmp");
        path.with_file_name(name)
    }
}

impl FileSystem for RealFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn write(&self, path: &Path, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // 一時ファイルに書いてから置き換える
        let staging = Self::staging_path(path);
        std::fs::write(&staging, content)?;
        if let Err(e) = std::fs::rename(&staging, path) {
            let _ = std::fs::remove_file(&staging);
            return Err(e.into());
        }
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            other => Ok(other?),
        }
    }
}

#[cfg(test)]
pub mod mock;

#[cfg(test)]
#[path = "fs_test.rs"]
mod tests;
