//! 診断情報の端末表示
//!
//! ```text
//! error[CFG001]: Could not find a HaberUI configuration file in /project
//!   --> /project/haber.json
//!   = help: run `haber init` to create one
//! ```

use super::diagnostic::Diagnostic;
use owo_colors::OwoColorize;
use regex::Regex;
use std::io::IsTerminal;
use std::sync::LazyLock;

/// (パターン, 置換) の組。URL・ヘッダ・npm 出力に含まれる資格情報を伏せる。
static REDACTIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"([?&])([^=&\s]+)=([^&\s]+)", "$1$2=***"),
        (r"(?i)(Authorization:\s*(?:Bearer|Basic)\s+)\S+", "$1***"),
        (r"(https?://)[^/@\s:]+(?::[^/@\s]*)?@", "$1***@"),
        (r"(_authToken=)\S+", "$1***"),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
    .collect()
});

pub fn redact(text: &str) -> String {
    REDACTIONS
        .iter()
        .fold(text.to_string(), |acc, (re, replacement)| {
            re.replace_all(&acc, *replacement).into_owned()
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Header,
    Detail,
    Cause,
    Remediation,
    Help,
    Note,
    Plain,
}

pub struct ErrorFormatter {
    verbose: bool,
    color: bool,
}

impl ErrorFormatter {
    /// stderr が端末で NO_COLOR が無ければ色付き
    pub fn new(verbose: bool) -> Self {
        let color = std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self::with_color(verbose, color)
    }

    pub fn with_color(verbose: bool, color: bool) -> Self {
        Self { verbose, color }
    }

    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        self.lines(diagnostic)
            .into_iter()
            .map(|(kind, text)| self.paint(kind, &redact(&text)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn lines(&self, diagnostic: &Diagnostic) -> Vec<(LineKind, String)> {
        let code = diagnostic.code();
        let mut lines = vec![(
            LineKind::Header,
            format!("error[{}]: {}", code, diagnostic.message()),
        )];

        for detail in diagnostic.details() {
            lines.push((LineKind::Detail, format!("  --> {}", detail.render())));
        }

        if self.verbose {
            lines.push((LineKind::Plain, "  |".to_string()));
            lines.push((LineKind::Cause, format!("  | Cause: {}", code.cause())));
            lines.push((LineKind::Plain, "  |".to_string()));
            lines.push((LineKind::Remediation, "  | Remediation:".to_string()));
            for (i, step) in code.remediation().iter().enumerate() {
                lines.push((LineKind::Plain, format!("  |   {}. {}", i + 1, step)));
            }
            lines.push((LineKind::Plain, "  |".to_string()));
            lines.push((
                LineKind::Note,
                "  = note: use `haber --help` for more information".to_string(),
            ));
        } else if let Some(hint) = code.hint() {
            lines.push((LineKind::Help, format!("  = help: {}", hint)));
        }

        lines
    }

    fn paint(&self, kind: LineKind, line: &str) -> String {
        if !self.color {
            return line.to_string();
        }
        match kind {
            LineKind::Header => match line.find(']') {
                Some(end) => {
                    let (code, rest) = line.split_at(end + 1);
                    format!("{}{}", code.red().bold(), rest.bold())
                }
                None => line.bold().to_string(),
            },
            LineKind::Detail => line.blue().to_string(),
            LineKind::Cause => line.yellow().to_string(),
            LineKind::Remediation | LineKind::Help => line.green().to_string(),
            LineKind::Note => line.dimmed().to_string(),
            LineKind::Plain => line.to_string(),
        }
    }
}
