//! HTTP(S) URL 소스
//!
//! 응답 본문을 청크 단위로 받으며, 누적 크기가 한도를 넘으면 즉시 중단합니다.
//! `Content-Length`가 있으면 본문을 받기 전에 먼저 검사합니다. 성공이 아닌 상태 코드는
//! `HTTP <code>: <reason>` 형식의 메시지로 보고하며 재시도하지 않습니다.

use std::time::Duration;

use tracing::debug;

use tlview_core::error::TlviewError;
use tlview_core::pipeline::ByteSource;

use super::{check_size, into_text, unavailable};

/// HTTP 소스
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
    max_bytes: usize,
}

impl HttpSource {
    /// 새 HTTP 소스를 생성합니다.
    pub fn new(url: impl Into<String>, timeout: Duration, max_bytes: usize) -> Result<Self, TlviewError> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| unavailable(&url, e))?;
        Ok(Self {
            url,
            client,
            max_bytes,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// 성공이 아닌 상태 코드의 메시지
pub fn status_message(status: reqwest::StatusCode) -> String {
    format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    )
}

impl ByteSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn kind(&self) -> &'static str {
        "http"
    }

    async fn read_text(&self) -> Result<String, TlviewError> {
        let mut response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| unavailable(&self.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(&self.url, status_message(status)));
        }

        if let Some(len) = response.content_length() {
            check_size(usize::try_from(len).unwrap_or(usize::MAX), self.max_bytes)?;
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| unavailable(&self.url, e))?
        {
            check_size(body.len() + chunk.len(), self.max_bytes)?;
            body.extend_from_slice(&chunk);
        }
        debug!(url = %self.url, bytes = body.len(), "response body received");

        into_text(body, &self.url, self.max_bytes)
    }
}
