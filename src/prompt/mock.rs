//! テスト用 Prompter

use super::*;
use std::collections::VecDeque;
use std::sync::Mutex;

/// 事前に積んだ回答
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Confirm(bool),
    Input(String),
    Select(usize),
}

/// 回答を順に返し、質問文を記録する Prompter
///
/// 回答が尽きた・種類が合わない場合は `HaberError::Prompt`。
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<Answer>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// 質問されると失敗する Prompter
    pub fn silent() -> Self {
        Self::new([])
    }

    /// 質問された文言（順序通り）
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }

    /// 未使用の回答数
    pub fn remaining(&self) -> usize {
        self.answers.lock().unwrap().len()
    }

    fn next(&self, message: &str) -> Result<Answer> {
        self.asked.lock().unwrap().push(message.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| HaberError::Prompt(format!("unexpected prompt: {}", message)))
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, message: &str, _default: bool) -> Result<bool> {
        match self.next(message)? {
            Answer::Confirm(value) => Ok(value),
            other => Err(HaberError::Prompt(format!("expected confirm, got {:?}", other))),
        }
    }

    fn input(&self, message: &str, default: Option<&str>) -> Result<String> {
        match self.next(message)? {
            Answer::Input(value) if value.is_empty() => Ok(default.unwrap_or_default().to_string()),
            Answer::Input(value) => Ok(value),
            other => Err(HaberError::Prompt(format!("expected input, got {:?}", other))),
        }
    }

    fn select(&self, message: &str, items: &[&str], _default: usize) -> Result<usize> {
        match self.next(message)? {
            Answer::Select(index) if index < items.len() => Ok(index),
            other => Err(HaberError::Prompt(format!("expected select, got {:?}", other))),
        }
    }
}
