//! テスト用 HttpClient

use super::*;
use crate::error::HaberError;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// URL ごとに応答を返すフェイク
///
/// 同じ URL に複数の応答を積むと順に返し、最後の1件は繰り返し返す。
/// 未登録の URL には 404 を返す。
pub struct FakeHttpClient {
    responses: Mutex<HashMap<String, VecDeque<Result<HttpResponse>>>>,
    requests: Mutex<Vec<String>>,
}

impl FakeHttpClient {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 応答を登録
    pub fn respond(self, url: &str, status: u16, body: &str) -> Self {
        self.push(
            url,
            Ok(HttpResponse {
                status,
                body: body.to_string(),
            }),
        );
        self
    }

    /// 通信エラーを登録
    pub fn fail(self, url: &str, error: HaberError) -> Self {
        self.push(url, Err(error));
        self
    }

    /// 受け取ったリクエストURL（順序通り）
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn push(&self, url: &str, response: Result<HttpResponse>) {
        self.responses
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    fn next_response(&self, url: &str) -> Result<HttpResponse> {
        let mut responses = self.responses.lock().unwrap();
        let Some(queue) = responses.get_mut(url) else {
            return Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            });
        };

        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().map(clone_response)
        };

        response.unwrap_or_else(|| {
            Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            })
        })
    }
}

impl Default for FakeHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

fn clone_response(response: &Result<HttpResponse>) -> Result<HttpResponse> {
    match response {
        Ok(response) => Ok(response.clone()),
        Err(HaberError::RegistryHttp {
            url,
            status,
            message,
        }) => Err(HaberError::RegistryHttp {
            url: url.clone(),
            status: *status,
            message: message.clone(),
        }),
        Err(e) => Err(HaberError::Io(std::io::Error::other(e.to_string()))),
    }
}

impl HttpClient for FakeHttpClient {
    fn get<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse>> + Send + 'a>> {
        self.requests.lock().unwrap().push(url.to_string());
        let response = self.next_response(url);
        Box::pin(async move { response })
    }
}
