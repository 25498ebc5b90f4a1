//! 이벤트 상관 조인
//!
//! 디스크립터 이벤트를 상관 키로 색인하고, 이후에 나오는 참조 이벤트를 그 색인과
//! 조인합니다. 단일 패스 스트리밍 left-join 입니다:
//!
//! - 같은 키의 디스크립터는 나중 것이 이깁니다 (last-write-wins).
//! - 참조 이벤트는 스트림에서 **앞서** 나온 디스크립터와만 조인됩니다.
//! - 조인 실패는 에러가 아니며, 참조 이벤트는 그대로 통과합니다.
//!
//! 색인은 한 번의 처리 패스 동안만 유효하며 새 데이터셋마다 비워집니다.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::schema::EventSchema;

/// 조인 처리 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// 디스크립터를 색인에 기록함
    Indexed,
    /// 참조 이벤트에 디스크립터 필드를 병합함
    Joined,
    /// 일치하는 디스크립터가 없어 그대로 통과함
    Unmatched,
    /// 상관 키가 없거나 페이로드가 객체가 아님
    Skipped,
}

/// 상관 키 값을 색인 키로 변환합니다.
///
/// 숫자 `5`와 문자열 `"5"`는 서로 다른 키입니다.
pub fn correlation_key(value: &Value) -> String {
    value.to_string()
}

/// 상관 색인
#[derive(Debug, Default)]
pub struct Correlator {
    index: HashMap<String, Map<String, Value>>,
}

impl Correlator {
    /// 빈 색인을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 색인을 비웁니다.
    pub fn clear(&mut self) {
        self.index.clear();
    }

    /// 색인된 디스크립터 수
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// 색인이 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// 상관 키로 디스크립터를 조회합니다.
    pub fn get(&self, key: &Value) -> Option<&Map<String, Value>> {
        self.index.get(&correlation_key(key))
    }

    /// 디스크립터 페이로드를 색인에 기록합니다.
    pub fn index_descriptor(
        &mut self,
        schema: &EventSchema,
        payload: &Value,
    ) -> JoinOutcome {
        let Some(descriptor) = payload.as_object() else {
            return JoinOutcome::Skipped;
        };
        let Some(id) = descriptor.get(schema.correlation_field()) else {
            return JoinOutcome::Skipped;
        };

        self.index.insert(correlation_key(id), descriptor.clone());
        JoinOutcome::Indexed
    }

    /// 참조 페이로드를 색인과 조인합니다.
    ///
    /// 병합 결과는 참조 필드(원래 순서) 뒤에 디스크립터의 추가 필드를 붙인 것이며,
    /// 이름이 겹치면 참조 필드가 우선합니다. 디스크립터의 식별 필드는 제외됩니다.
    pub fn join_reference(&self, schema: &EventSchema, payload: &mut Value) -> JoinOutcome {
        let Some(reference) = payload.as_object_mut() else {
            return JoinOutcome::Skipped;
        };
        let Some(id) = reference.get(schema.correlation_field()) else {
            return JoinOutcome::Skipped;
        };

        let Some(descriptor) = self.index.get(&correlation_key(id)) else {
            debug!(describer_id = %id, "no preceding descriptor, passing through");
            return JoinOutcome::Unmatched;
        };

        for (name, value) in descriptor {
            if schema.is_identity_field(name) || reference.contains_key(name) {
                continue;
            }
            reference.insert(name.clone(), value.clone());
        }

        JoinOutcome::Joined
    }
}
