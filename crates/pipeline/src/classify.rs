//! 분류와 컬럼 모델
//!
//! 레코드 하나 또는 레코드 집합에 대한 순수 함수들입니다.
//!
//! - [`event_key_of`]: 관리/숨김 필드가 아닌 첫 필드명 (레코드 필드 순서 기준)
//! - [`frame_identity_of`]: `"<frame_id>/<frame_compile_id>[_<attempt>]"`
//! - [`dynamic_columns`]: 선택된 레코드들의 이벤트 페이로드 하위 필드명 합집합

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use tlview_core::types::{ATTEMPT, FRAME_COMPILE_ID, FRAME_ID, ProcessedRecord, Selection, is_reserved_field};

/// 이벤트 키 후보 필드명을 순서대로 반환합니다.
pub fn event_key_candidates(fields: &Map<String, Value>) -> impl Iterator<Item = &str> {
    fields
        .keys()
        .map(String::as_str)
        .filter(|name| !is_reserved_field(name))
}

/// 레코드의 이벤트 키를 반환합니다. 후보가 없으면 `None`.
///
/// 후보가 여럿이면 첫 번째가 선택됩니다.
pub fn event_key_of(fields: &Map<String, Value>) -> Option<&str> {
    event_key_candidates(fields).next()
}

/// 레코드의 프레임 식별자를 만듭니다.
pub fn frame_identity_of(fields: &Map<String, Value>) -> String {
    let frame_id = render_component(fields.get(FRAME_ID));
    let compile_id = render_component(fields.get(FRAME_COMPILE_ID));

    match fields.get(ATTEMPT) {
        Some(attempt) if is_positive(attempt) => {
            format!("{}/{}_{}", frame_id, compile_id, render_component(Some(attempt)))
        }
        _ => format!("{}/{}", frame_id, compile_id),
    }
}

fn render_component(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn is_positive(value: &Value) -> bool {
    value.as_f64().is_some_and(|n| n > 0.0)
}

/// 이벤트 페이로드의 하위 필드명 합집합을 정렬해 반환합니다.
///
/// 이벤트 키가 `event` 선택과 일치하는 레코드만 검사하며, 페이로드가 객체인
/// 경우에만 필드명을 모읍니다.
pub fn dynamic_columns<'a, I>(records: I, event: &Selection) -> Vec<String>
where
    I: IntoIterator<Item = &'a ProcessedRecord>,
{
    let mut columns = BTreeSet::new();
    for record in records {
        if !event.matches(record.event_key()) {
            continue;
        }
        if let Some(Value::Object(payload)) = record.event_payload() {
            columns.extend(payload.keys().cloned());
        }
    }
    columns.into_iter().collect()
}

/// 데이터셋에 등장하는 이벤트 키 목록 (정렬, 중복 제거)
pub fn available_event_keys<'a, I>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a ProcessedRecord>,
{
    records
        .into_iter()
        .filter_map(|r| r.event_key().map(str::to_owned))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 데이터셋에 등장하는 프레임 식별자 목록 (정렬, 중복 제거)
pub fn available_frames<'a, I>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a ProcessedRecord>,
{
    records
        .into_iter()
        .map(|r| r.frame().to_owned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn processed(value: Value) -> ProcessedRecord {
        let fields = fields(value);
        let key = event_key_of(&fields).map(str::to_owned);
        let frame = frame_identity_of(&fields);
        ProcessedRecord::new(fields, key, frame)
    }

    #[test]
    fn frame_identity_examples() {
        assert_eq!(
            frame_identity_of(&fields(json!({"frame_id": 0, "frame_compile_id": 0, "attempt": 0}))),
            "0/0"
        );
        assert_eq!(
            frame_identity_of(&fields(json!({"frame_id": 1, "frame_compile_id": 2, "attempt": 3}))),
            "1/2_3"
        );
        assert_eq!(frame_identity_of(&Map::new()), "/");
    }

    #[test]
    fn frame_identity_partial_components() {
        assert_eq!(frame_identity_of(&fields(json!({"frame_id": 4}))), "4/");
        assert_eq!(frame_identity_of(&fields(json!({"frame_compile_id": 2, "attempt": 1}))), "/2_1");
        assert_eq!(frame_identity_of(&fields(json!({"frame_id": "a", "frame_compile_id": "b"}))), "a/b");
        assert_eq!(frame_identity_of(&fields(json!({"frame_id": 1, "frame_compile_id": 0, "attempt": -1}))), "1/0");
    }

    #[test]
    fn event_key_skips_reserved_fields() {
        let f = fields(json!({
            "frame_id": 0, "frame_compile_id": 0, "rank": 0, "timestamp": "t",
            "has_payload": "abc", "dynamo_start": {"stack": []}
        }));
        assert_eq!(event_key_of(&f), Some("dynamo_start"));
    }

    #[test]
    fn event_key_absent() {
        let f = fields(json!({"frame_id": 0, "pathname": "x.py", "lineno": 3}));
        assert_eq!(event_key_of(&f), None);
    }

    #[test]
    fn event_key_first_candidate_wins() {
        let f = fields(json!({"rank": 0, "zeta": 1, "alpha": 2}));
        assert_eq!(event_key_of(&f), Some("zeta"));
        assert_eq!(event_key_candidates(&f).count(), 2);
    }

    #[test]
    fn dynamic_columns_union_sorted() {
        let records = vec![
            processed(json!({"describe_tensor": {"size": [1], "dtype": "f"}})),
            processed(json!({"describe_tensor": {"device": "cpu", "dtype": "f"}})),
            processed(json!({"dynamo_start": {"stack": []}})),
            processed(json!({"str": "scalar payload"})),
            processed(json!({"artifact": [1, 2]})),
        ];
        assert_eq!(
            dynamic_columns(&records, &Selection::All),
            ["device", "dtype", "size", "stack"]
        );
        assert_eq!(
            dynamic_columns(&records, &Selection::only("describe_tensor")),
            ["device", "dtype", "size"]
        );
        assert!(dynamic_columns(&records, &Selection::only("missing")).is_empty());
    }

    #[test]
    fn available_values_sorted_unique() {
        let records = vec![
            processed(json!({"frame_id": 1, "frame_compile_id": 0, "b_event": {}})),
            processed(json!({"frame_id": 0, "frame_compile_id": 0, "a_event": {}})),
            processed(json!({"frame_id": 1, "frame_compile_id": 0, "b_event": {}})),
            processed(json!({"frame_id": 2})),
        ];
        assert_eq!(available_event_keys(&records), ["a_event", "b_event"]);
        assert_eq!(available_frames(&records), ["0/0", "1/0", "2/"]);
    }
}
