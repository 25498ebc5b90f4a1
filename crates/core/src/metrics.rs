//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`, `metrics::histogram!()`
//! 매크로를 호출합니다. 레코더가 설치되지 않은 경우 매크로는 아무 일도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `tlview_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(tlview_core::metrics::RECORDS_DECODED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

/// 입력 소스 종류 레이블 키 (file, http, stdin, text, store)
pub const LABEL_SOURCE_KIND: &str = "source_kind";

// ─── 디코더 메트릭 ─────────────────────────────────────────────────

/// 디코딩된 레코드 수 (counter)
pub const RECORDS_DECODED_TOTAL: &str = "tlview_records_decoded_total";

/// JSON 파싱에 실패한 라인 수 (counter)
pub const MALFORMED_LINES_TOTAL: &str = "tlview_malformed_lines_total";

// ─── 처리 메트릭 ───────────────────────────────────────────────────

/// 문자열 테이블로 해제된 인터닝 참조 수 (counter)
pub const INTERNED_REFS_RESOLVED_TOTAL: &str = "tlview_interned_refs_resolved_total";

/// 디스크립터와 조인된 참조 이벤트 수 (counter)
pub const REFERENCES_JOINED_TOTAL: &str = "tlview_references_joined_total";

/// 이벤트 필드 후보가 둘 이상인 레코드 수 (counter)
pub const AMBIGUOUS_EVENT_KEYS_TOTAL: &str = "tlview_ambiguous_event_keys_total";

// ─── 세션 메트릭 ───────────────────────────────────────────────────

/// 데이터셋 로드 시도 수 (counter, label: result)
pub const LOADS_TOTAL: &str = "tlview_loads_total";

/// 데이터셋 로드 소요 시간 (histogram, 초)
pub const LOAD_DURATION_SECONDS: &str = "tlview_load_duration_seconds";

/// 모든 메트릭의 설명을 등록합니다.
///
/// 레코더 설치 직후 한 번 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(RECORDS_DECODED_TOTAL, "Total JSONL records decoded");
    describe_counter!(
        MALFORMED_LINES_TOTAL,
        "Total input lines that were not valid JSON objects"
    );
    describe_counter!(
        INTERNED_REFS_RESOLVED_TOTAL,
        "Total interned string references resolved from the string table"
    );
    describe_counter!(
        REFERENCES_JOINED_TOTAL,
        "Total reference events enriched with descriptor fields"
    );
    describe_counter!(
        AMBIGUOUS_EVENT_KEYS_TOTAL,
        "Total records carrying more than one event field candidate"
    );
    describe_counter!(LOADS_TOTAL, "Total dataset load attempts by result");
    describe_histogram!(
        LOAD_DURATION_SECONDS,
        "Time spent decoding and processing one dataset"
    );
}
