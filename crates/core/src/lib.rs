//! tlview 공통 크레이트
//!
//! 구조화 트레이스 로그(JSONL) 뷰어의 모든 크레이트가 공유하는
//! 타입, 확장 trait, 에러, 설정, 메트릭 이름을 정의합니다.

pub mod config;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, DecodeError, SourceError, StoreError, TlviewError};

// 설정
pub use config::TlviewConfig;

// 확장 trait
pub use pipeline::{BlobStore, ByteSource};

// 도메인 타입
pub use types::{ProcessedRecord, RawRecord, Selection};
