//! 이벤트 스키마 레지스트리
//!
//! 레코드의 이벤트 키(태그)를 역할에 대응시킵니다. 처리기는 필드 존재 여부를
//! 매번 추측하지 않고, 분류된 이벤트 키로 이 레지스트리를 조회해 동작을 고릅니다.
//!
//! | 역할 | 기본 이벤트 | 처리 |
//! |------|-------------|------|
//! | `Descriptor` | `describe_tensor` | 상관 인덱스에 upsert |
//! | `Reference` | `describe_source` | 인덱스와 조인 |
//! | `Interned` | `dynamo_start` | 문자열 테이블로 참조 해제 |
//! | `Plain` | 그 외 | 그대로 통과 |

use std::collections::HashMap;

use tlview_core::config::SchemaConfig;

/// 이벤트 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventRole {
    /// 상관 키로 엔티티 정보를 수립하는 이벤트
    Descriptor,
    /// 상관 키로 디스크립터를 참조하는 이벤트
    Reference,
    /// 인터닝된 문자열 참조를 담는 이벤트
    Interned,
    /// 특별한 처리가 없는 이벤트
    Plain,
}

/// 인터닝 필드 위치: 이벤트 페이로드의 `<list>[*].<field>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternedField {
    /// 페이로드 안의 배열 필드명
    pub list: String,
    /// 배열 원소 안의 인터닝 필드명
    pub field: String,
}

/// 이벤트 스키마 레지스트리
#[derive(Debug, Clone)]
pub struct EventSchema {
    string_table_field: String,
    descriptor_event: String,
    reference_event: String,
    correlation_field: String,
    identity_fields: Vec<String>,
    interned: HashMap<String, Vec<InternedField>>,
}

impl EventSchema {
    /// 설정에서 레지스트리를 생성합니다.
    pub fn from_config(config: &SchemaConfig) -> Self {
        let mut interned: HashMap<String, Vec<InternedField>> = HashMap::new();
        for entry in &config.interned {
            interned
                .entry(entry.event.clone())
                .or_default()
                .push(InternedField {
                    list: entry.list.clone(),
                    field: entry.field.clone(),
                });
        }

        Self {
            string_table_field: config.string_table_field.clone(),
            descriptor_event: config.descriptor_event.clone(),
            reference_event: config.reference_event.clone(),
            correlation_field: config.correlation_field.clone(),
            identity_fields: config.identity_fields.clone(),
            interned,
        }
    }

    /// 이벤트 키의 역할을 반환합니다.
    pub fn role_of(&self, event_key: &str) -> EventRole {
        if event_key == self.descriptor_event {
            EventRole::Descriptor
        } else if event_key == self.reference_event {
            EventRole::Reference
        } else if self.interned.contains_key(event_key) {
            EventRole::Interned
        } else {
            EventRole::Plain
        }
    }

    /// 이벤트의 인터닝 필드 목록을 반환합니다.
    pub fn interned_fields(&self, event_key: &str) -> &[InternedField] {
        self.interned
            .get(event_key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// 조인 시 디스크립터에서 제외할 식별 필드인지 확인합니다.
    pub fn is_identity_field(&self, name: &str) -> bool {
        self.identity_fields.iter().any(|f| f == name)
    }

    pub fn string_table_field(&self) -> &str {
        &self.string_table_field
    }

    pub fn descriptor_event(&self) -> &str {
        &self.descriptor_event
    }

    pub fn reference_event(&self) -> &str {
        &self.reference_event
    }

    pub fn correlation_field(&self) -> &str {
        &self.correlation_field
    }
}

impl Default for EventSchema {
    fn default() -> Self {
        Self::from_config(&SchemaConfig::default())
    }
}
