//! 診断ログの初期化
//!
//! ユーザー向けの出力は `output` モジュールが担当し、ここでは `tracing` の
//! 診断ログ（stderr）のみを扱う。

use tracing_subscriber::EnvFilter;

/// ログレベルを上書きする環境変数
pub const LOG_ENV: &str = "HABER_LOG";

/// 既定のフィルタ指定
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "haber=debug"
    } else {
        "warn"
    }
}

/// tracing subscriber を初期化する
///
/// `HABER_LOG` が設定されていればそれを優先する。二重初期化は無視する。
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
