//! 메모리 텍스트 소스

use tlview_core::error::TlviewError;
use tlview_core::pipeline::ByteSource;

use super::unavailable;

/// 메모리에 있는 텍스트를 그대로 제공하는 소스
///
/// `failure`가 설정되면 읽기가 항상 `SourceError::Unavailable`로 실패합니다.
#[derive(Debug, Clone)]
pub struct TextSource {
    name: String,
    text: String,
    failure: Option<String>,
}

impl TextSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            failure: None,
        }
    }

    /// 항상 실패하는 소스
    pub fn failing(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: String::new(),
            failure: Some(reason.into()),
        }
    }
}

impl ByteSource for TextSource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> &'static str {
        "text"
    }

    async fn read_text(&self) -> Result<String, TlviewError> {
        match &self.failure {
            Some(reason) => Err(unavailable(&self.name, reason)),
            None => Ok(self.text.clone()),
        }
    }
}
