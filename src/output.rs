//! 端末出力（スピナーとステータス行）

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;

/// add パイプラインの進行段階
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Fetching(String),
    InstallingDependencies(String),
    Writing(String),
}

impl Stage {
    pub fn message(&self) -> String {
        match self {
            Stage::Fetching(name) => format!("Fetching {}...", name),
            Stage::InstallingDependencies(name) => {
                format!("Installing dependencies for {}...", name)
            }
            Stage::Writing(name) => format!("Writing {}...", name),
        }
    }
}

/// スピナー
///
/// 標準エラーが端末でない場合は描画しない。ステータス行は常に出力する。
pub struct Spinner {
    bar: ProgressBar,
    visible: bool,
}

impl Spinner {
    /// 端末なら表示、そうでなければ非表示
    pub fn for_terminal() -> Self {
        if std::io::stderr().is_terminal() {
            Self::visible()
        } else {
            Self::hidden()
        }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            visible: false,
        }
    }

    fn visible() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar, visible: true }
    }

    pub fn stage(&self, stage: Stage) {
        self.bar.set_message(stage.message());
    }

    /// スピナーを一時停止して処理を実行（プロンプト・子プロセス用）
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    /// 端末を子プロセスに明け渡す（`resume` で再開）
    pub fn pause(&self) {
        self.bar.finish_and_clear();
    }

    pub fn resume(&self) {
        if self.visible {
            self.bar.reset();
            self.bar.enable_steady_tick(Duration::from_millis(80));
        }
    }

    pub fn info(&self, message: &str) {
        self.bar.suspend(|| println!("{} {}", "ℹ".blue(), message));
    }

    pub fn warn(&self, message: &str) {
        self.bar.suspend(|| eprintln!("{} {}", "⚠".yellow(), message.yellow()));
    }

    /// スピナーを消して成功行を出力
    pub fn succeed(&self, message: &str) {
        self.bar.finish_and_clear();
        println!("{} {}", "✓".green(), message);
    }

    /// スピナーを消して失敗行を出力
    pub fn fail(&self, message: &str) {
        self.bar.finish_and_clear();
        eprintln!("{} {}", "✗".red(), message);
    }

    /// スピナーを消す（メッセージなし）
    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

/// 依存インストール結果の要約行
pub struct CommandSummary {
    pub prefix: String,
    pub message: String,
}

impl CommandSummary {
    pub fn format(installed: usize, skipped: usize, failed: usize) -> Self {
        match (installed, failed) {
            (_, f) if f > 0 => Self {
                prefix: "✗".red().to_string(),
                message: format!(
                    "{} dependencies installed, {} skipped, {} failed",
                    installed.green(),
                    skipped,
                    f.red()
                ),
            },
            (i, _) if i > 0 || skipped > 0 => Self {
                prefix: "✓".green().to_string(),
                message: format!("{} dependencies installed, {} skipped", i.green(), skipped),
            },
            _ => Self {
                prefix: "•".yellow().to_string(),
                message: "No dependencies to install".to_string(),
            },
        }
    }
}

impl std::fmt::Display for CommandSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.prefix, self.message)
    }
}
