//! 입력 소스
//!
//! # 소스 종류
//! - [`FileSource`]: 로컬 파일
//! - [`HttpSource`]: HTTP(S) URL 응답 본문
//! - [`StdinSource`]: 표준 입력
//! - [`TextSource`]: 메모리 텍스트 (테스트, 임베딩용)
//!
//! 모든 소스는 바이트 스트림을 끝까지 읽은 뒤 UTF-8 텍스트로 변환해 반환합니다.
//! 실패는 `SourceError::Unavailable`, 크기 초과는 `SourceError::TooLarge`로 보고합니다.

pub mod file;
pub mod http;
pub mod stdin;
pub mod text;

pub use file::FileSource;
pub use http::HttpSource;
pub use stdin::StdinSource;
pub use text::TextSource;

use tlview_core::error::{SourceError, TlviewError};
use tlview_core::pipeline::ByteSource;

use crate::config::PipelineConfig;

/// 표준 입력을 가리키는 소스 인자
pub const STDIN_ARG: &str = "-";

/// 소스 종류 레이블 (메트릭용)
pub fn source_kind(arg: &str) -> &'static str {
    if arg == STDIN_ARG {
        "stdin"
    } else if is_url(arg) {
        "http"
    } else {
        "file"
    }
}

fn is_url(arg: &str) -> bool {
    arg.starts_with("http://") || arg.starts_with("https://")
}

/// CLI 인자 하나로 결정되는 소스
///
/// `ByteSource`는 dyn 호환이 아니므로 종류별 분기를 enum으로 묶습니다.
#[derive(Debug)]
pub enum AnySource {
    File(FileSource),
    Http(HttpSource),
    Stdin(StdinSource),
    Text(TextSource),
}

impl AnySource {
    /// 인자를 해석해 소스를 만듭니다.
    ///
    /// `-`는 표준 입력, `http://`/`https://`는 URL, 그 외는 파일 경로입니다.
    pub fn from_arg(arg: &str, config: &PipelineConfig) -> Result<Self, TlviewError> {
        let max = config.max_input_bytes;
        let source = match source_kind(arg) {
            "stdin" => Self::Stdin(StdinSource::new(max)),
            "http" => Self::Http(HttpSource::new(arg, config.http_timeout(), max)?),
            _ => Self::File(FileSource::new(arg, max)),
        };
        Ok(source)
    }
}

impl ByteSource for AnySource {
    fn describe(&self) -> String {
        match self {
            Self::File(s) => s.describe(),
            Self::Http(s) => s.describe(),
            Self::Stdin(s) => s.describe(),
            Self::Text(s) => s.describe(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::File(s) => s.kind(),
            Self::Http(s) => s.kind(),
            Self::Stdin(s) => s.kind(),
            Self::Text(s) => s.kind(),
        }
    }

    async fn read_text(&self) -> Result<String, TlviewError> {
        match self {
            Self::File(s) => s.read_text().await,
            Self::Http(s) => s.read_text().await,
            Self::Stdin(s) => s.read_text().await,
            Self::Text(s) => s.read_text().await,
        }
    }
}

/// 크기 제한을 확인합니다.
pub(crate) fn check_size(size: usize, max: usize) -> Result<(), TlviewError> {
    if size > max {
        return Err(SourceError::TooLarge { size, max }.into());
    }
    Ok(())
}

/// 바이트를 UTF-8 텍스트로 변환합니다.
pub(crate) fn into_text(
    bytes: Vec<u8>,
    source_name: &str,
    max: usize,
) -> Result<String, TlviewError> {
    check_size(bytes.len(), max)?;
    String::from_utf8(bytes).map_err(|e| unavailable(source_name, format!("invalid UTF-8: {}", e)))
}

/// 소스 불가 에러
pub(crate) fn unavailable(source_name: &str, reason: impl ToString) -> TlviewError {
    SourceError::Unavailable {
        source_name: source_name.to_owned(),
        reason: reason.to_string(),
    }
    .into()
}
