//! エラーコード
//!
//! `<カテゴリ><連番>` 形式。カテゴリ:
//! NET（接続）、API（レジストリの応答）、IO（ファイル操作）、CFG（haber.json）、
//! CMP（コンポーネント名・記述子）、CMD（外部コマンド）、TTY（対話入力）

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// 接続失敗
    Net001,
    /// タイムアウト
    Net002,
    /// 429
    Api001,
    /// 4xx
    Api003,
    /// 5xx
    Api004,
    Io001,
    Io002,
    Io003,
    /// コンポーネントディレクトリ外への書き込み
    Io004,
    /// haber.json が無い
    Cfg001,
    Cfg002,
    Cmp001,
    Cmp002,
    Cmp003,
    Cmd001,
    Cmd002,
    Cmd003,
    Tty001,
}

impl ErrorCode {
    #[cfg(test)]
    pub const ALL: [ErrorCode; 18] = [
        ErrorCode::Net001,
        ErrorCode::Net002,
        ErrorCode::Api001,
        ErrorCode::Api003,
        ErrorCode::Api004,
        ErrorCode::Io001,
        ErrorCode::Io002,
        ErrorCode::Io003,
        ErrorCode::Io004,
        ErrorCode::Cfg001,
        ErrorCode::Cfg002,
        ErrorCode::Cmp001,
        ErrorCode::Cmp002,
        ErrorCode::Cmp003,
        ErrorCode::Cmd001,
        ErrorCode::Cmd002,
        ErrorCode::Cmd003,
        ErrorCode::Tty001,
    ];

    fn category(self) -> &'static str {
        match self {
            ErrorCode::Net001 | ErrorCode::Net002 => "NET",
            ErrorCode::Api001 | ErrorCode::Api003 | ErrorCode::Api004 => "API",
            ErrorCode::Io001 | ErrorCode::Io002 | ErrorCode::Io003 | ErrorCode::Io004 => "IO",
            ErrorCode::Cfg001 | ErrorCode::Cfg002 => "CFG",
            ErrorCode::Cmp001 | ErrorCode::Cmp002 | ErrorCode::Cmp003 => "CMP",
            ErrorCode::Cmd001 | ErrorCode::Cmd002 | ErrorCode::Cmd003 => "CMD",
            ErrorCode::Tty001 => "TTY",
        }
    }

    fn number(self) -> u8 {
        match self {
            ErrorCode::Net001
            | ErrorCode::Api001
            | ErrorCode::Io001
            | ErrorCode::Cfg001
            | ErrorCode::Cmp001
            | ErrorCode::Cmd001
            | ErrorCode::Tty001 => 1,
            ErrorCode::Net002
            | ErrorCode::Io002
            | ErrorCode::Cfg002
            | ErrorCode::Cmp002
            | ErrorCode::Cmd002 => 2,
            ErrorCode::Api003 | ErrorCode::Io003 | ErrorCode::Cmp003 | ErrorCode::Cmd003 => 3,
            ErrorCode::Api004 | ErrorCode::Io004 => 4,
        }
    }

    /// 一般的な原因
    pub fn cause(self) -> &'static str {
        match self {
            ErrorCode::Net001 => "Unable to establish network connection to the registry",
            ErrorCode::Net002 => "The request timed out while waiting for the registry",
            ErrorCode::Api001 => "The registry is rate limiting requests",
            ErrorCode::Api003 => "The registry rejected the request",
            ErrorCode::Api004 => "The registry encountered an internal error",
            ErrorCode::Io001 => "The specified file or directory was not found",
            ErrorCode::Io002 => "Permission denied when accessing the file or directory",
            ErrorCode::Io003 => "A file system operation failed",
            ErrorCode::Io004 => "The component descriptor points outside the component directory",
            ErrorCode::Cfg001 => "This project has no haber.json configuration",
            ErrorCode::Cfg002 => "A JSON document could not be parsed",
            ErrorCode::Cmp001 => "The requested component does not exist in the registry",
            ErrorCode::Cmp002 => "The component name contains unsupported characters",
            ErrorCode::Cmp003 => "The component descriptor is malformed",
            ErrorCode::Cmd001 => "An external command could not be started",
            ErrorCode::Cmd002 => "An external command exited with a failure status",
            ErrorCode::Cmd003 => "An external command did not finish in time",
            ErrorCode::Tty001 => "Reading input from the terminal failed",
        }
    }

    /// 対処手順（--verbose 時に番号付きで表示）
    pub fn remediation(self) -> &'static [&'static str] {
        match self {
            ErrorCode::Net001 => &[
                "Check your internet connection",
                "Verify the registry URL in haber.json",
                "Try again later if the registry is down",
            ],
            ErrorCode::Net002 => &[
                "Try again later",
                "Point HABER_REGISTRY_URL at a mirror",
            ],
            ErrorCode::Api001 => &[
                "Wait a few minutes before retrying",
                "Avoid running many installs in parallel",
            ],
            ErrorCode::Api003 => &[
                "Verify the registry URL in haber.json",
                "Check that the registry is publicly reachable",
            ],
            ErrorCode::Api004 => &[
                "Wait a few minutes and retry",
                "Report the issue if it persists",
            ],
            ErrorCode::Io001 => &["Verify the path is correct"],
            ErrorCode::Io002 => &[
                "Check file and directory permissions",
                "Verify ownership of the project directory",
            ],
            ErrorCode::Io003 => &["Check available disk space", "Retry the command"],
            ErrorCode::Io004 => &[
                "Report the malformed component to the registry maintainers",
                "Do not install components from untrusted registries",
            ],
            ErrorCode::Cfg001 => &[
                "Run `haber init` in the project root",
                "Or pass the right directory with `haber init --cwd <dir>`",
            ],
            ErrorCode::Cfg002 => &[
                "Check the JSON syntax",
                "Re-create the file with `haber init`",
            ],
            ErrorCode::Cmp001 => &[
                "Check the component name for typos",
                "Run `haber list` to see available components",
            ],
            ErrorCode::Cmp002 => &[
                "Use lowercase letters, digits, '.', '_' and '-' only",
                "Run `haber list` to see available components",
            ],
            ErrorCode::Cmp003 => &[
                "Retry later in case the registry is being updated",
                "Report the component to the registry maintainers",
            ],
            ErrorCode::Cmd001 => &[
                "Make sure Node.js and npx are installed and on PATH",
                "Run the printed command manually",
            ],
            ErrorCode::Cmd002 => &[
                "Read the command output above",
                "Run the printed command manually",
            ],
            ErrorCode::Cmd003 => &[
                "Check your network connection",
                "Run the printed command manually",
            ],
            ErrorCode::Tty001 => &[
                "Run the command in an interactive terminal",
                "Pass the component name and --yes to skip prompts",
            ],
        }
    }

    /// --verbose なしでも表示する一行ヒント
    pub fn hint(self) -> Option<&'static str> {
        match self {
            ErrorCode::Cfg001 => Some("run `haber init` to create one"),
            ErrorCode::Cmp001 | ErrorCode::Cmp002 => {
                Some("run `haber list` to see available components")
            }
            ErrorCode::Tty001 => Some("pass the component name and `--yes` to skip prompts"),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category(), self.number())
    }
}
