use super::classify::{foundation_add_command, foundation_init_command, partition, FOUNDATION_MARKER};
use super::package_manager::{install_commands, validate_package_spec, PackageManager};
use super::runner::{CommandRunner, ShellCommand};
use crate::config::ProjectConfig;
use crate::error::{HaberError, Result};
use crate::fs::FileSystem;
use crate::output::{Spinner, Stage};
use crate::prompt::Prompter;
use crate::registry::{normalize_name, Component, RegistryClient};
use crate::writer::{plan_writes, write_plan, WriteJournal};
use std::collections::HashSet;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use tracing::{debug, info, warn};

/// 依存インストールに必要な外部要素
pub struct InstallContext<'a> {
    pub fs: &'a dyn FileSystem,
    pub registry: &'a RegistryClient<'a>,
    pub runner: &'a dyn CommandRunner,
    pub prompter: &'a dyn Prompter,
    pub config: &'a ProjectConfig,
    pub project_dir: &'a Path,
    pub spinner: &'a Spinner,
}

/// 依存の失敗をどう扱うか
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InstallPolicy {
    /// 警告して続行
    #[default]
    Lenient,
    /// 最初の失敗でエラー
    Strict,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// 確認をすべて既定値（Yes）で進める
    pub yes: bool,
    /// 既存の依存コンポーネントも上書きする
    pub overwrite: bool,
    pub policy: InstallPolicy,
}

/// 失敗した依存と手動での復旧方法
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyFailure {
    pub dependency: String,
    pub recovery: String,
    pub reason: String,
}

/// 依存インストールの結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub installed: Vec<String>,
    pub skipped: Vec<String>,
    pub failures: Vec<DependencyFailure>,
}

impl InstallReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 基盤ツールキットの準備状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FoundationState {
    Unchecked,
    Ready,
    Unavailable,
}

/// 依存インストーラー
///
/// 順序: 基盤コンポーネント → 自レジストリのコンポーネント（再帰）→ パッケージ。
/// 訪問済み集合で循環と重複を防ぐ。
pub struct Installer<'a> {
    ctx: InstallContext<'a>,
    options: InstallOptions,
    visited: HashSet<String>,
    foundation: FoundationState,
    report: InstallReport,
    /// 書き込んだ依存コンポーネント（Strict の失敗時に戻す）
    journal: WriteJournal,
}

impl<'a> Installer<'a> {
    pub fn new(ctx: InstallContext<'a>, options: InstallOptions) -> Self {
        Self {
            ctx,
            options,
            visited: HashSet::new(),
            foundation: FoundationState::Unchecked,
            report: InstallReport::default(),
            journal: WriteJournal::new(),
        }
    }

    /// コンポーネントの依存をすべてインストール
    ///
    /// Strict では最初の失敗を返し、それまでに書き込んだ依存コンポーネントを元に戻す。
    /// Lenient では失敗を記録して続行する。
    pub async fn install_dependencies(mut self, component: &Component) -> Result<InstallReport> {
        match self.install_tree(component).await {
            Ok(()) => Ok(self.report),
            Err(e) => {
                if !self.journal.is_empty() {
                    warn!(
                        component = %component.name,
                        files = self.journal.paths().len(),
                        "dependency failed, removing installed registry components"
                    );
                }
                let fs = self.ctx.fs;
                self.journal.rollback(fs);
                Err(e)
            }
        }
    }

    async fn install_tree(&mut self, component: &Component) -> Result<()> {
        self.visited.insert(component.name.clone());

        if !component.registry_dependencies.is_empty() || component.has_package_dependencies() {
            self.ctx
                .spinner
                .stage(Stage::InstallingDependencies(component.name.clone()));
        }

        // 分類・訪問済み判定は正規化した名前で行う
        let mut names = Vec::with_capacity(component.registry_dependencies.len());
        for raw in &component.registry_dependencies {
            match normalize_name(raw) {
                Ok(name) => names.push(name),
                Err(e) => self.fail(raw, format!("haber add {}", raw), e)?,
            }
        }
        let (foundation, self_registry) = partition(&names);

        let foundation: Vec<String> = foundation
            .into_iter()
            .filter(|name| self.visited.insert(name.clone()))
            .collect();
        if !foundation.is_empty() {
            self.install_foundation(&foundation).await?;
        }

        for name in self_registry {
            if self.visited.contains(&name) {
                debug!(component = %name, "already visited");
                continue;
            }
            self.install_registry_component(name).await?;
        }

        self.install_packages(component).await
    }

    async fn install_foundation(&mut self, names: &[String]) -> Result<()> {
        if !self.ensure_foundation().await? {
            let commands: Vec<String> = names
                .iter()
                .map(|name| foundation_add_command(name).to_string())
                .collect();
            self.ctx.spinner.warn(&format!(
                "Skipped shadcn/ui components: {}. Install them manually:\n  {}\n  {}",
                names.join(", "),
                foundation_init_command(),
                commands.join("\n  ")
            ));
            self.report.skipped.extend(names.iter().cloned());
            return Ok(());
        }

        for name in names {
            let command = foundation_add_command(name);
            match self.run(&command).await {
                Ok(()) => {
                    info!(component = %name, "installed shadcn/ui component");
                    self.report.installed.push(name.clone());
                }
                Err(e) => self.fail(name, command.to_string(), e)?,
            }
        }
        Ok(())
    }

    /// `components.json` が無ければ初期化する（結果はキャッシュ）
    async fn ensure_foundation(&mut self) -> Result<bool> {
        match self.foundation {
            FoundationState::Ready => return Ok(true),
            FoundationState::Unavailable => return Ok(false),
            FoundationState::Unchecked => {}
        }

        if self.ctx.fs.exists(&self.ctx.project_dir.join(FOUNDATION_MARKER)) {
            self.foundation = FoundationState::Ready;
            return Ok(true);
        }

        let command = foundation_init_command();
        let proceed = self.options.yes
            || self.ctx.spinner.suspend(|| {
                self.ctx.prompter.confirm(
                    &format!("shadcn/ui is not initialized. Run `{}` now?", command),
                    true,
                )
            })?;

        if !proceed {
            self.foundation = FoundationState::Unavailable;
            return Ok(false);
        }

        match self.run(&command).await {
            Ok(()) => {
                self.foundation = FoundationState::Ready;
                Ok(true)
            }
            Err(e) => {
                self.foundation = FoundationState::Unavailable;
                self.fail("shadcn/ui", command.to_string(), e)?;
                Ok(false)
            }
        }
    }

    /// 自レジストリのコンポーネントを取得・依存解決・書き込み（名前は正規化済み）
    fn install_registry_component(
        &mut self,
        name: String,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + '_>> {
        Box::pin(async move {
            self.visited.insert(name.clone());
            let recovery = format!("haber add {}", name);
            self.ctx.spinner.stage(Stage::Fetching(name.clone()));

            let component = match self.ctx.registry.fetch_component(&name).await {
                Ok(Some(component)) => component,
                Ok(None) => {
                    return self.fail(&name, recovery, HaberError::ComponentNotFound(name.clone()))
                }
                Err(e) => return self.fail(&name, recovery, e),
            };

            let component_dir = self.ctx.config.component_dir(self.ctx.project_dir);
            let plan = match plan_writes(&component, &component_dir) {
                Ok(plan) => plan,
                Err(e) => return self.fail(&name, recovery, e),
            };

            if !self.options.overwrite && plan.has_conflicts(self.ctx.fs) {
                self.ctx
                    .spinner
                    .info(&format!("{} already exists, skipping", name));
                self.report.skipped.push(name);
                return Ok(());
            }

            self.install_tree(&component).await?;

            self.ctx.spinner.stage(Stage::Writing(name.clone()));
            match write_plan(self.ctx.fs, &plan) {
                Ok(journal) => {
                    info!(component = %name, "installed registry dependency");
                    self.journal.extend(journal);
                    self.report.installed.push(name);
                    Ok(())
                }
                Err(e) => self.fail(&name, recovery, e),
            }
        })
    }

    async fn install_packages(&mut self, component: &Component) -> Result<()> {
        if !component.has_package_dependencies() {
            return Ok(());
        }

        let manager = PackageManager::detect(self.ctx.fs, self.ctx.project_dir);
        debug!(manager = manager.name(), "detected package manager");

        let dependencies = self.safe_packages(component, manager, &component.dependencies, false)?;
        let dev_dependencies =
            self.safe_packages(component, manager, &component.dev_dependencies, true)?;

        for install in install_commands(manager, &dependencies, &dev_dependencies) {
            match self.run(&install.command).await {
                Ok(()) => self.report.installed.extend(install.packages),
                Err(e) => self.fail(&install.packages.join(", "), install.command.to_string(), e)?,
            }
        }
        Ok(())
    }

    /// コマンド引数にできないパッケージ指定を失敗として扱い、残りを返す
    fn safe_packages(
        &mut self,
        component: &Component,
        manager: PackageManager,
        specs: &[String],
        dev: bool,
    ) -> Result<Vec<String>> {
        let mut safe = Vec::with_capacity(specs.len());
        for spec in specs {
            match validate_package_spec(spec) {
                Ok(()) => safe.push(spec.clone()),
                Err(reason) => {
                    let recovery = manager
                        .install_command(&["<package>".to_string()], dev)
                        .map(|command| command.to_string())
                        .unwrap_or_default();
                    let error = HaberError::InvalidDescriptor {
                        name: component.name.clone(),
                        reason: format!("package '{}' {}", spec, reason),
                    };
                    self.fail(spec, recovery, error)?;
                }
            }
        }
        Ok(safe)
    }

    async fn run(&self, command: &ShellCommand) -> Result<()> {
        debug!(command = %command, "running");
        if command.is_interactive() {
            self.ctx.spinner.pause();
        }
        let result = self.ctx.runner.run(command, self.ctx.project_dir).await;
        if command.is_interactive() {
            self.ctx.spinner.resume();
        }
        result.map(|_| ())
    }

    /// 依存の失敗を処理（Strict ならエラー、Lenient なら警告して記録）
    fn fail(&mut self, dependency: &str, recovery: String, error: HaberError) -> Result<()> {
        if self.options.policy == InstallPolicy::Strict {
            return Err(error);
        }

        self.ctx.spinner.warn(&format!(
            "Failed to install {}: {}. Run `{}` manually.",
            dependency, error, recovery
        ));
        self.report.failures.push(DependencyFailure {
            dependency: dependency.to_string(),
            recovery,
            reason: error.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "installer_test.rs"]
mod tests;
