//! 共通HTTPヘルパー
//!
//! レジストリクライアントは `HttpClient` トレイト越しに HTTP を利用する。
//! 本番実装の reqwest クライアントは最初のリモート要求まで構築しない。

use crate::config::HttpConfig;
use crate::error::Result;
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP レスポンス（ステータスと本文のみ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP クライアント trait
pub trait HttpClient: Send + Sync {
    /// GET リクエストを送り、ステータスに関わらずレスポンスを返す
    ///
    /// 通信自体の失敗のみ Err になる。
    fn get<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse>> + Send + 'a>>;
}

/// reqwest による HttpClient 実装
pub struct ReqwestHttpClient {
    config: HttpConfig,
    client: OnceLock<Client>,
}

impl ReqwestHttpClient {
    pub fn new(config: HttpConfig) -> Self {
        Self {
            config,
            client: OnceLock::new(),
        }
    }

    /// 内部クライアントが構築済みかどうか
    #[cfg(test)]
    pub fn is_initialized(&self) -> bool {
        self.client.get().is_some()
    }

    fn client(&self) -> &Client {
        self.client.get_or_init(|| {
            debug!("building HTTP client");
            self.config.build_client()
        })
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new(HttpConfig::default())
    }
}

impl HttpClient for ReqwestHttpClient {
    fn get<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse>> + Send + 'a>> {
        Box::pin(async move {
            debug!(url, "GET");
            let response = self.client().get(url).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            debug!(url, status, bytes = body.len(), "response received");
            Ok(HttpResponse { status, body })
        })
    }
}

/// レジストリ要求のリトライ方針
///
/// 初回 + 最大 `max_retries` 回。n 回目のリトライ前に `base_delay * n` 待つ。
/// 429・5xx・通信エラー以外は即座に返す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    #[cfg(test)]
    pub const NONE: Self = Self {
        max_retries: 0,
        base_delay: Duration::ZERO,
    };

    /// 待機なしでリトライする
    #[cfg(test)]
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::ZERO,
        }
    }

    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut retries = 0;
        loop {
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };
            if retries >= self.max_retries || !error.is_retryable() {
                return Err(error);
            }
            retries += 1;
            warn!(retries, max_retries = self.max_retries, error = %error, "retrying registry request");
            tokio::time::sleep(self.base_delay * retries).await;
        }
    }
}

#[cfg(test)]
pub mod fake;

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
