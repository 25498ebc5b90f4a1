//! tlview 레코드 처리 파이프라인
//!
//! 구조화 트레이스 로그(JSONL) 텍스트를 받아 인터닝을 해제하고, 디스크립터/참조
//! 이벤트를 조인하고, 이벤트 키와 프레임으로 분류해 필터 가능한 뷰 상태를 만듭니다.
//!
//! # 모듈 구성
//!
//! - [`decoder`]: 줄 단위 JSON 디코딩, 잘못된 라인 수집
//! - [`intern`]: 문자열 테이블 추출과 인터닝 필드 해제
//! - [`correlate`]: 디스크립터 색인과 참조 이벤트 스트리밍 조인
//! - [`classify`]: 이벤트 키, 프레임 식별자, 동적 컬럼
//! - [`filter`]: 이벤트/프레임 필터와 컬럼 재계산
//! - [`process`]: 위 단계를 한 패스로 엮는 처리기
//! - [`view`]: 불변 뷰 상태와 리듀서, 표현 계층 trait
//! - [`table`]: 뷰 상태의 테이블 레이아웃
//! - [`source`]: 파일/HTTP/표준 입력 소스
//! - [`store`]: 단일 blob 영속 저장소
//! - [`session`]: 로드/복원/초기화 오케스트레이션
//! - [`schema`]: 이벤트명 → 역할 레지스트리
//! - [`config`]: 파이프라인 설정 (core 설정 평탄화)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! ByteSource -> LineDecoder -> StringTable split -> per record:
//!     event key -> EventSchema role -> intern / index / join -> ProcessedRecord
//! Dataset -> ViewState::apply(Action) -> PresentationSink
//!    |
//!  BlobStore (원본 텍스트 저장, 복원)
//! ```

pub mod classify;
pub mod config;
pub mod correlate;
pub mod decoder;
pub mod error;
pub mod filter;
pub mod intern;
pub mod process;
pub mod schema;
pub mod session;
pub mod table;
pub mod view;

pub mod source;
pub mod store;

// --- 주요 타입 re-export ---

// 세션
pub use session::{LatestState, LoadReport, RestoreOutcome, Session};

// 설정
pub use config::{PipelineConfig, PipelineConfigBuilder};

// 에러
pub use error::PipelineError;

// 처리
pub use decoder::{DecodePolicy, LineDecoder, LineFailure};
pub use process::{Dataset, ProcessStats, RecordProcessor};
pub use schema::{EventRole, EventSchema};

// 뷰
pub use filter::FilterSpec;
pub use table::{Cell, TableModel};
pub use view::{Action, PresentationSink, ViewState};

// 소스와 저장소
pub use source::{AnySource, FileSource, HttpSource, StdinSource, TextSource};
pub use store::{FileBlobStore, MemoryBlobStore};
