//! コンポーネントファイルの書き込み
//!
//! 記述子のファイルをコンポーネントディレクトリ配下に配置する。
//! ディレクトリ外へのパスは書き込み前に拒否し、途中で失敗した場合は
//! それまでに書いたファイルを元に戻す。

use crate::error::{HaberError, Result};
use crate::fs::FileSystem;
use crate::registry::Component;
use std::path::{Component as PathComponent, Path, PathBuf};
use tracing::{debug, warn};

/// 書き込み予定のファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// 記述子上の相対パス
    pub relative: String,
    /// 書き込み先の絶対パス
    pub target: PathBuf,
    pub content: String,
}

/// コンポーネント1件分の書き込み計画
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WritePlan {
    pub component: String,
    pub files: Vec<PlannedFile>,
}

impl WritePlan {
    /// 既に存在する書き込み先があるか
    pub fn has_conflicts(&self, fs: &dyn FileSystem) -> bool {
        self.files.iter().any(|f| fs.exists(&f.target))
    }
}

/// 相対パスをコンポーネントディレクトリ内の絶対パスに解決
///
/// 空パス、絶対パス、`..` を含むパスは `UnsafePath`。
pub fn resolve_target(component_dir: &Path, relative: &str) -> Result<PathBuf> {
    let normalized = relative.trim().replace('\\', "/");
    let unsafe_path = || HaberError::UnsafePath(relative.to_string());

    if normalized.is_empty() || normalized.starts_with('/') || has_drive_prefix(&normalized) {
        return Err(unsafe_path());
    }

    let mut target = component_dir.to_path_buf();
    let mut depth = 0;
    for part in Path::new(&normalized).components() {
        match part {
            PathComponent::Normal(segment) => {
                target.push(segment);
                depth += 1;
            }
            PathComponent::CurDir => {}
            PathComponent::ParentDir | PathComponent::RootDir | PathComponent::Prefix(_) => {
                return Err(unsafe_path());
            }
        }
    }

    if depth == 0 {
        return Err(unsafe_path());
    }
    Ok(target)
}

/// `C:` 形式のドライブ指定
fn has_drive_prefix(path: &str) -> bool {
    let mut chars = path.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic()
    )
}

/// 記述子から書き込み計画を作成（ファイルシステムには触れない）
pub fn plan_writes(component: &Component, component_dir: &Path) -> Result<WritePlan> {
    if component.files.is_empty() {
        return Err(HaberError::InvalidDescriptor {
            name: component.name.clone(),
            reason: "descriptor lists no files".to_string(),
        });
    }

    let files = component
        .files
        .iter()
        .map(|file| {
            Ok(PlannedFile {
                relative: file.path.clone(),
                target: resolve_target(component_dir, &file.path)?,
                content: file.content.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(WritePlan {
        component: component.name.clone(),
        files,
    })
}

/// 上書き確認が必要かどうか
pub fn needs_overwrite_prompt(has_conflicts: bool, yes: bool, overwrite: bool) -> bool {
    has_conflicts && !yes && !overwrite
}

/// 書き込み前の状態
#[derive(Debug)]
struct Written {
    target: PathBuf,
    previous: Option<String>,
}

/// 書き込んだファイルの記録
///
/// `rollback` で書き込み前の状態（既存ファイルは元の内容、新規ファイルは削除）に戻す。
#[derive(Debug, Default)]
pub struct WriteJournal {
    entries: Vec<Written>,
}

impl WriteJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// 書き込んだパス（書き込み順）
    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|w| w.target.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 別の記録を後ろに連結する
    pub fn extend(&mut self, other: WriteJournal) {
        self.entries.extend(other.entries);
    }

    /// 新しい順に元へ戻す。失敗は警告のみ。
    pub fn rollback(self, fs: &dyn FileSystem) {
        for entry in self.entries.iter().rev() {
            let result = match &entry.previous {
                Some(content) => fs.write(&entry.target, content.as_bytes()),
                None => fs.remove_file(&entry.target),
            };
            if let Err(e) = result {
                warn!(path = %entry.target.display(), error = %e, "rollback failed");
            }
        }
    }
}

/// 計画を実行
///
/// 先にすべての書き込み先の現在の内容を読み、読めないものがあれば
/// 何も書かずにエラーを返す。書き込み途中で失敗した場合は
/// 書き込み済みのファイルを元に戻してからエラーを返す。
pub fn write_plan(fs: &dyn FileSystem, plan: &WritePlan) -> Result<WriteJournal> {
    let snapshots = plan
        .files
        .iter()
        .map(|file| fs.read_optional(&file.target))
        .collect::<Result<Vec<_>>>()?;

    let mut journal = WriteJournal::new();
    for (file, previous) in plan.files.iter().zip(snapshots) {
        if let Err(e) = fs.write(&file.target, file.content.as_bytes()) {
            warn!(
                component = %plan.component,
                path = %file.target.display(),
                error = %e,
                "write failed, rolling back"
            );
            journal.rollback(fs);
            return Err(e);
        }

        debug!(path = %file.target.display(), "wrote component file");
        journal.entries.push(Written {
            target: file.target.clone(),
            previous,
        });
    }

    Ok(journal)
}

#[cfg(test)]
#[path = "writer_test.rs"]
mod tests;
