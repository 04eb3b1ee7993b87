//! インメモリのファイルシステム

use super::FileSystem;
use crate::error::{HaberError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// ファイルだけを保持する。ディレクトリはファイルの祖先として暗黙に存在する。
#[derive(Default)]
pub struct MockFs {
    files: Mutex<BTreeMap<PathBuf, String>>,
    read_only: Mutex<BTreeSet<PathBuf>>,
}

impl MockFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: &str, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_string());
    }

    /// 指定パスへの書き込みを PermissionDenied にする
    pub fn fail_writes_to(&self, path: &str) {
        self.read_only.lock().unwrap().insert(PathBuf::from(path));
    }

    pub fn file(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }

    /// ソート済みのファイル一覧
    pub fn file_paths(&self) -> Vec<String> {
        self.files
            .lock()
            .unwrap()
            .keys()
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    }
}

fn io_error(kind: ErrorKind, path: &Path) -> HaberError {
    HaberError::Io(std::io::Error::new(kind, path.display().to_string()))
}

impl FileSystem for MockFs {
    fn exists(&self, path: &Path) -> bool {
        self.files
            .lock()
            .unwrap()
            .keys()
            .any(|file| file.starts_with(path))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io_error(ErrorKind::NotFound, path))
    }

    fn write(&self, path: &Path, content: &[u8]) -> Result<()> {
        if self.read_only.lock().unwrap().contains(path) {
            return Err(io_error(ErrorKind::PermissionDenied, path));
        }
        self.files.lock().unwrap().insert(
            path.to_path_buf(),
            String::from_utf8_lossy(content).into_owned(),
        );
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }
}
