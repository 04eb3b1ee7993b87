//! 対話入力
//!
//! コマンドは `Prompter` 越しに質問し、判断ロジックは対話から切り離す。

use crate::error::{HaberError, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

/// 対話入力 trait
pub trait Prompter {
    /// Yes/No を尋ねる
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;

    /// テキスト入力（空入力は default）
    fn input(&self, message: &str, default: Option<&str>) -> Result<String>;

    /// 選択肢から1つ選ぶ（インデックスを返す）
    fn select(&self, message: &str, items: &[&str], default: usize) -> Result<usize>;
}

/// 端末用実装（dialoguer）
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

fn prompt_error(e: dialoguer::Error) -> HaberError {
    HaberError::Prompt(e.to_string())
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(default)
            .interact()
            .map_err(prompt_error)
    }

    fn input(&self, message: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme).with_prompt(message);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input.interact_text().map_err(prompt_error)
    }

    fn select(&self, message: &str, items: &[&str], default: usize) -> Result<usize> {
        Select::with_theme(&self.theme)
            .with_prompt(message)
            .items(items)
            .default(default)
            .interact()
            .map_err(prompt_error)
    }
}

#[cfg(test)]
pub mod mock;
