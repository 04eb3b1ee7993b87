use crate::error::{HaberError, Result};
use crate::fs::FileSystem;
use crate::http::{HttpClient, RetryPolicy};
use crate::registry::{normalize_name, Component, ComponentSummary, RegistryIndex};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// プロジェクト内のローカルレジストリディレクトリ
pub const LOCAL_REGISTRY_DIR: &str = "public/h";

/// インデックスファイル名
pub const INDEX_FILE: &str = "index.json";

/// レジストリ取得クライアント
///
/// ローカル（`<project>/public/h/`）→ リモート（`<registry>/`）の順に解決する。
pub struct RegistryClient<'a> {
    fs: &'a dyn FileSystem,
    http: &'a dyn HttpClient,
    project_dir: PathBuf,
    base_url: String,
    retry: RetryPolicy,
}

impl<'a> RegistryClient<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        http: &'a dyn HttpClient,
        project_dir: &Path,
        base_url: &str,
    ) -> Self {
        Self {
            fs,
            http,
            project_dir: project_dir.to_path_buf(),
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        }
    }

    #[cfg(test)]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// コンポーネント記述子を取得
    ///
    /// 名前は検索前に検証する。どこにも存在しなければ Ok(None)。
    pub async fn fetch_component(&self, name: &str) -> Result<Option<Component>> {
        let name = normalize_name(name)?;
        let name = name.as_str();
        let file_name = format!("{}.json", name);

        if let Some(component) = self.read_local::<Component>(&file_name) {
            debug!(component = name, "resolved from local registry");
            return Ok(Some(component));
        }

        let url = self.url_for(&file_name);
        let Some(body) = self.fetch_remote(&url).await? else {
            debug!(component = name, url = %url, "component not found in registry");
            return Ok(None);
        };

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| HaberError::InvalidDescriptor {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }

    /// インデックスのコンポーネント一覧を取得
    ///
    /// インデックスが無い場合は空リスト。
    pub async fn get_components(&self) -> Result<Vec<ComponentSummary>> {
        if let Some(index) = self.read_local::<RegistryIndex>(INDEX_FILE) {
            debug!(count = index.components.len(), "index resolved from local registry");
            return Ok(index.components);
        }

        let url = self.url_for(INDEX_FILE);
        let Some(body) = self.fetch_remote(&url).await? else {
            return Ok(Vec::new());
        };

        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let index: RegistryIndex =
            serde_json::from_str(&body).map_err(|e| HaberError::InvalidDescriptor {
                name: INDEX_FILE.to_string(),
                reason: e.to_string(),
            })?;
        Ok(index.components)
    }

    fn local_path(&self, file_name: &str) -> PathBuf {
        self.project_dir.join(LOCAL_REGISTRY_DIR).join(file_name)
    }

    fn url_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.base_url, file_name)
    }

    /// ローカルファイルを読み込む
    ///
    /// 存在しない・読めない・壊れている場合は None（リモートへフォールバック）。
    fn read_local<T: DeserializeOwned>(&self, file_name: &str) -> Option<T> {
        let path = self.local_path(file_name);
        let parsed = self.fs.read_optional(&path).and_then(|content| match content {
            Some(content) => serde_json::from_str(&content).map(Some).map_err(HaberError::from),
            None => Ok(None),
        });

        match parsed {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable local registry file");
                None
            }
        }
    }

    /// リモートから本文を取得（404 は None）
    async fn fetch_remote(&self, url: &str) -> Result<Option<String>> {
        self.retry
            .run(|| async move {
                let response = self.http.get(url).await?;
                if response.status == 404 {
                    return Ok(None);
                }
                if !response.is_success() {
                    return Err(HaberError::RegistryHttp {
                        url: url.to_string(),
                        status: response.status,
                        message: response.body,
                    });
                }
                Ok(Some(response.body))
            })
            .await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
