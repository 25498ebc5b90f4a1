//! 파이프라인 에러 타입
//!
//! [`PipelineError`]는 로드/처리/영속화 과정에서 발생하는 모든 에러를 표현합니다.
//! `From<PipelineError> for TlviewError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use tlview_core::error::{
    ConfigError, DecodeError, SourceError, StoreError, TlviewError,
};

/// 파이프라인 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 한 라인이 유효한 JSON 객체가 아님
    #[error("malformed line {line}: {reason}")]
    MalformedLine {
        /// 원본 라인 번호 (1부터 시작)
        line: usize,
        /// 실패 사유
        reason: String,
    },

    /// 데이터 레코드가 하나도 없음
    #[error("no valid JSONL entries found")]
    EmptyInput,

    /// 입력 소스를 읽을 수 없음
    #[error("source unavailable: {source_name}: {reason}")]
    SourceUnavailable {
        /// 소스 설명 (경로, URL 등)
        source_name: String,
        /// 실패 사유
        reason: String,
    },

    /// 저장된 blob을 해석할 수 없음
    #[error("corrupted persisted state: {reason}")]
    CorruptedPersistedState {
        /// 실패 사유
        reason: String,
    },

    /// 저장소 백엔드 에러
    #[error("store error: {0}")]
    Store(String),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// 소스 불가 에러를 생성합니다.
    pub fn source_unavailable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<SourceError> for PipelineError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Unavailable {
                source_name,
                reason,
            } => Self::SourceUnavailable {
                source_name,
                reason,
            },
            SourceError::TooLarge { size, max } => Self::SourceUnavailable {
                source_name: "input".to_owned(),
                reason: format!("input too large: {} bytes (max: {})", size, max),
            },
        }
    }
}

impl From<StoreError> for PipelineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Corrupted { reason } => Self::CorruptedPersistedState { reason },
            StoreError::Backend(reason) => Self::Store(reason),
        }
    }
}

impl From<TlviewError> for PipelineError {
    fn from(err: TlviewError) -> Self {
        match err {
            TlviewError::Source(e) => e.into(),
            TlviewError::Store(e) => e.into(),
            TlviewError::Decode(DecodeError::MalformedLine { line, reason }) => {
                Self::MalformedLine { line, reason }
            }
            TlviewError::Decode(DecodeError::EmptyInput) => Self::EmptyInput,
            TlviewError::Io(e) => Self::Io(e),
            TlviewError::Config(e) => Self::Config {
                field: "config".to_owned(),
                reason: e.to_string(),
            },
        }
    }
}

impl From<PipelineError> for TlviewError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::MalformedLine { line, reason } => {
                DecodeError::MalformedLine { line, reason }.into()
            }
            PipelineError::EmptyInput => DecodeError::EmptyInput.into(),
            PipelineError::SourceUnavailable {
                source_name,
                reason,
            } => SourceError::Unavailable {
                source_name,
                reason,
            }
            .into(),
            PipelineError::CorruptedPersistedState { reason } => {
                StoreError::Corrupted { reason }.into()
            }
            PipelineError::Store(reason) => StoreError::Backend(reason).into(),
            PipelineError::Config { field, reason } => {
                ConfigError::InvalidValue { field, reason }.into()
            }
            PipelineError::Io(e) => TlviewError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_line_display() {
        let err = PipelineError::MalformedLine {
            line: 2,
            reason: "expected value at line 1 column 1".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 2"));
        assert!(msg.contains("expected value"));
    }

    #[test]
    fn source_error_maps_to_source_unavailable() {
        let err: PipelineError = SourceError::Unavailable {
            source_name: "trace.jsonl".to_owned(),
            reason: "No such file or directory".to_owned(),
        }
        .into();
        assert!(matches!(err, PipelineError::SourceUnavailable { .. }));
    }

    #[test]
    fn corrupted_store_maps_to_corrupted_state() {
        let err: PipelineError = StoreError::Corrupted {
            reason: "invalid utf-8".to_owned(),
        }
        .into();
        assert!(matches!(err, PipelineError::CorruptedPersistedState { .. }));
    }

    #[test]
    fn converts_to_tlview_error() {
        let err: TlviewError = PipelineError::EmptyInput.into();
        assert!(matches!(err, TlviewError::Decode(DecodeError::EmptyInput)));

        let err: TlviewError = PipelineError::source_unavailable("x", "boom").into();
        assert!(matches!(err, TlviewError::Source(_)));
    }
}
