//! 필터 엔진
//!
//! 이벤트 키와 프레임 식별자 두 조건을 AND로 적용해 레코드를 좁히고,
//! 좁혀진 부분 집합에서 동적 컬럼을 다시 계산합니다. 컬럼은 언제나 현재 보이는
//! 행을 반영하며 전체 데이터셋 기준으로 캐시되지 않습니다.

use serde::{Deserialize, Serialize};

use tlview_core::types::{ProcessedRecord, Selection};

use crate::classify::dynamic_columns;

/// 필터 조건
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// 이벤트 키 선택
    pub event: Selection,
    /// 프레임 식별자 선택
    pub frame: Selection,
}

impl FilterSpec {
    /// 조건을 생성합니다.
    pub fn new(event: Selection, frame: Selection) -> Self {
        Self { event, frame }
    }

    /// 레코드가 두 조건을 모두 만족하는지 확인합니다.
    pub fn matches(&self, record: &ProcessedRecord) -> bool {
        self.event.matches(record.event_key()) && self.frame.matches(Some(record.frame()))
    }
}

/// 필터 적용 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    /// 조건을 만족하는 레코드의 인덱스 (원래 순서)
    pub indices: Vec<usize>,
    /// 부분 집합에서 계산한 동적 컬럼
    pub columns: Vec<String>,
}

/// 필터를 적용합니다.
pub fn apply_filter(records: &[ProcessedRecord], spec: &FilterSpec) -> FilterOutcome {
    let indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| spec.matches(record))
        .map(|(idx, _)| idx)
        .collect();

    let columns = dynamic_columns(indices.iter().map(|&idx| &records[idx]), &spec.event);

    FilterOutcome { indices, columns }
}
