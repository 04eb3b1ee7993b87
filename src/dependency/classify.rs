use super::runner::ShellCommand;
use super::{FOUNDATION_ADD_TIMEOUT, FOUNDATION_INIT_TIMEOUT};

/// 基盤ツールキット（shadcn/ui）のコンポーネント名
pub const FOUNDATION_COMPONENTS: &[&str] = &[
    "accordion",
    "alert",
    "alert-dialog",
    "aspect-ratio",
    "avatar",
    "badge",
    "button",
    "calendar",
    "card",
    "checkbox",
    "collapsible",
    "combobox",
    "command",
    "context-menu",
    "dialog",
    "dropdown-menu",
    "form",
    "hover-card",
    "input",
    "label",
    "menubar",
    "navigation-menu",
    "popover",
    "progress",
    "radio-group",
    "scroll-area",
    "select",
    "separator",
    "sheet",
    "skeleton",
    "slider",
    "switch",
    "table",
    "tabs",
    "textarea",
    "toast",
    "toggle",
    "tooltip",
];

/// 基盤ツールキットが初期化済みかを示すファイル
pub const FOUNDATION_MARKER: &str = "components.json";

/// レジストリ依存の分類
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyClass {
    /// shadcn/ui のコンポーネント
    Foundation(String),
    /// このレジストリのコンポーネント
    SelfRegistry(String),
}

pub fn classify(name: &str) -> DependencyClass {
    if FOUNDATION_COMPONENTS.contains(&name) {
        DependencyClass::Foundation(name.to_string())
    } else {
        DependencyClass::SelfRegistry(name.to_string())
    }
}

/// (基盤, 自レジストリ) に分割（順序は保持）
pub fn partition(names: &[String]) -> (Vec<String>, Vec<String>) {
    let mut foundation = Vec::new();
    let mut self_registry = Vec::new();
    for name in names {
        match classify(name) {
            DependencyClass::Foundation(name) => foundation.push(name),
            DependencyClass::SelfRegistry(name) => self_registry.push(name),
        }
    }
    (foundation, self_registry)
}

/// `npx shadcn@latest init`
pub fn foundation_init_command() -> ShellCommand {
    ShellCommand::new("npx", ["shadcn@latest", "init"])
        .with_timeout(FOUNDATION_INIT_TIMEOUT)
        .interactive()
}

/// `npx shadcn@latest add <name> --yes`
pub fn foundation_add_command(name: &str) -> ShellCommand {
    ShellCommand::new("npx", ["shadcn@latest", "add", name, "--yes"])
        .with_timeout(FOUNDATION_ADD_TIMEOUT)
}
