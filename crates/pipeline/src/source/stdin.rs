//! 표준 입력 소스

use tokio::io::AsyncReadExt;

use tlview_core::error::TlviewError;
use tlview_core::pipeline::ByteSource;

use super::{into_text, unavailable};

/// 표준 입력 소스
#[derive(Debug, Clone)]
pub struct StdinSource {
    max_bytes: usize,
}

impl StdinSource {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }
}

impl ByteSource for StdinSource {
    fn describe(&self) -> String {
        "<stdin>".to_owned()
    }

    fn kind(&self) -> &'static str {
        "stdin"
    }

    async fn read_text(&self) -> Result<String, TlviewError> {
        let name = self.describe();
        let mut bytes = Vec::new();

        // 한도보다 1바이트 더 읽어 초과 여부를 판단
        let limit = u64::try_from(self.max_bytes).unwrap_or(u64::MAX).saturating_add(1);
        tokio::io::stdin()
            .take(limit)
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| unavailable(&name, e))?;

        into_text(bytes, &name, self.max_bytes)
    }
}
