//! 확장 trait -- 입력 소스와 영속 저장소 경계 정의
//!
//! 처리 파이프라인 자체는 동기식이며, 아래 두 경계만 비동기로 동작합니다.
//! 각 경계는 바이트 스트림을 전부 읽어 들인 뒤에만 반환합니다.

use std::future::Future;

use bytes::Bytes;

use crate::error::TlviewError;

/// 원시 JSONL 텍스트를 제공하는 입력 소스
///
/// 로컬 파일, HTTP 응답 본문, 표준 입력 등을 UTF-8 텍스트로 변환합니다.
/// 실패는 [`SourceError`](crate::error::SourceError)로 보고합니다.
pub trait ByteSource: Send + Sync {
    /// 로그와 에러 메시지에 사용할 소스 설명 (경로, URL 등)
    fn describe(&self) -> String;

    /// 메트릭 레이블로 쓰는 소스 종류 (`file`, `http`, `stdin` 등)
    fn kind(&self) -> &'static str {
        "custom"
    }

    /// 소스 전체를 읽어 텍스트로 반환합니다.
    fn read_text(&self) -> impl Future<Output = Result<String, TlviewError>> + Send;
}

/// 단일 blob을 보관하는 영속 저장소
///
/// 마지막으로 로드에 성공한 원본 텍스트 하나만 보관합니다.
pub trait BlobStore: Send + Sync {
    /// 저장된 blob을 읽습니다. 저장된 값이 없으면 `None`.
    fn load(&self) -> impl Future<Output = Result<Option<Bytes>, TlviewError>> + Send;

    /// blob을 저장합니다. 기존 값은 교체됩니다.
    fn save(&self, blob: &[u8]) -> impl Future<Output = Result<(), TlviewError>> + Send;

    /// 저장된 blob을 삭제합니다. 값이 없어도 성공합니다.
    fn clear(&self) -> impl Future<Output = Result<(), TlviewError>> + Send;
}
