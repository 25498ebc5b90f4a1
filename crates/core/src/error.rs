//! 에러 타입 -- 도메인별 에러 정의

/// tlview 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum TlviewError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 입력 소스 에러
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// 영속 저장소 에러
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// JSONL 디코딩 에러
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 입력 소스(파일, URL, stdin) 에러
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// 읽기/다운로드 실패
    #[error("source unavailable: {source_name}: {reason}")]
    Unavailable { source_name: String, reason: String },

    /// 입력 데이터 초과
    #[error("input too large: {size} bytes (max: {max})")]
    TooLarge { size: usize, max: usize },
}

/// 영속 저장소 에러
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 저장소 백엔드 실패 (파일 시스템 등)
    #[error("store backend failed: {0}")]
    Backend(String),

    /// 저장된 blob을 해석할 수 없음
    #[error("persisted state is corrupted: {reason}")]
    Corrupted { reason: String },
}

/// JSONL 디코딩 에러
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// 한 라인이 유효한 JSON 객체가 아님
    #[error("malformed line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    /// 데이터 레코드가 하나도 없음
    #[error("no valid JSONL entries found")]
    EmptyInput,
}
