use super::runner::ShellCommand;
use super::PACKAGE_INSTALL_TIMEOUT;
use crate::fs::FileSystem;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// npm のパッケージ名の最大長
const MAX_PACKAGE_SPEC_LENGTH: usize = 214;

/// `[@scope/]name[@version]`
static PACKAGE_SPEC: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(@[a-z0-9][a-z0-9._~-]*/)?[a-z0-9][a-z0-9._~-]*(@[A-Za-z0-9~][A-Za-z0-9._~+-]*)?$")
        .ok()
});

/// シェル（Windows の cmd.exe を含む）で意味を持つ文字
const SHELL_METACHARACTERS: &[char] = &[
    '&', '|', ';', '<', '>', '^', '$', '`', '"', '\'', '(', ')', '%', '!', '*', '?', '[', ']',
    '{', '}', '\\', '#', '=', ',',
];

/// 記述子のパッケージ指定がコマンド引数として安全か検証する
///
/// 受け付けるのは npm のパッケージ名と任意の `@version` のみ。
pub fn validate_package_spec(spec: &str) -> std::result::Result<(), String> {
    if spec.starts_with('-') {
        return Err("must not start with '-'".to_string());
    }
    if let Some(c) = spec
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || SHELL_METACHARACTERS.contains(c))
    {
        return Err(format!("contains unsupported character '{}'", c.escape_debug()));
    }
    if spec.len() > MAX_PACKAGE_SPEC_LENGTH {
        return Err(format!(
            "is too long (max {} characters)",
            MAX_PACKAGE_SPEC_LENGTH
        ));
    }

    match PACKAGE_SPEC.as_ref() {
        Some(pattern) if pattern.is_match(spec) => Ok(()),
        _ => Err("is not an npm package name with an optional @version".to_string()),
    }
}

/// パッケージマネージャー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    /// ロックファイルから判定（yarn → pnpm → npm の順）
    pub fn detect(fs: &dyn FileSystem, project_dir: &Path) -> Self {
        if fs.exists(&project_dir.join("yarn.lock")) {
            PackageManager::Yarn
        } else if fs.exists(&project_dir.join("pnpm-lock.yaml")) {
            PackageManager::Pnpm
        } else {
            PackageManager::Npm
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }

    /// インストールコマンド（パッケージが空なら None）
    pub fn install_command(&self, packages: &[String], dev: bool) -> Option<ShellCommand> {
        if packages.is_empty() {
            return None;
        }

        let mut args: Vec<String> = match self {
            PackageManager::Npm => vec!["install".to_string()],
            PackageManager::Yarn | PackageManager::Pnpm => vec!["add".to_string()],
        };
        if dev {
            let flag = match self {
                PackageManager::Yarn => "--dev",
                PackageManager::Npm | PackageManager::Pnpm => "--save-dev",
            };
            args.push(flag.to_string());
        }
        args.extend(packages.iter().cloned());

        Some(ShellCommand::new(self.name(), args).with_timeout(PACKAGE_INSTALL_TIMEOUT))
    }
}

/// パッケージのインストール1回分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInstall {
    pub packages: Vec<String>,
    pub dev: bool,
    pub command: ShellCommand,
}

/// 通常依存と dev 依存のインストール（別々に実行する）
pub fn install_commands(
    manager: PackageManager,
    dependencies: &[String],
    dev_dependencies: &[String],
) -> Vec<PackageInstall> {
    [(dependencies, false), (dev_dependencies, true)]
        .into_iter()
        .filter_map(|(packages, dev)| {
            manager
                .install_command(packages, dev)
                .map(|command| PackageInstall {
                    packages: packages.to_vec(),
                    dev,
                    command,
                })
        })
        .collect()
}
