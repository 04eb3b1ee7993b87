//! 依存関係のインストール
//!
//! レジストリ依存は shadcn/ui（基盤）と自レジストリに分類し、
//! パッケージ依存はロックファイルから判定したパッケージマネージャーで入れる。

mod classify;
mod installer;
mod package_manager;
pub mod runner;

use std::time::Duration;

pub use installer::{InstallContext, InstallOptions, InstallPolicy, InstallReport, Installer};
pub use runner::{CommandRunner, ProcessRunner};

#[cfg(test)]
pub use installer::DependencyFailure;

/// `npx shadcn@latest add` の上限
pub const FOUNDATION_ADD_TIMEOUT: Duration = Duration::from_secs(120);

/// `npx shadcn@latest init` の上限
pub const FOUNDATION_INIT_TIMEOUT: Duration = Duration::from_secs(180);

/// パッケージマネージャーによるインストールの上限
pub const PACKAGE_INSTALL_TIMEOUT: Duration = Duration::from_secs(180);
