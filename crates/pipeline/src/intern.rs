//! 문자열 인터닝 해제
//!
//! 입력의 첫 레코드가 문자열 테이블 필드를 가지면 그 배열을 [`StringTable`]로
//! 추출하고, 해당 레코드는 데이터에서 제외합니다. 이후 스키마가 인터닝 필드로
//! 지정한 위치(`<event>.<list>[*].<field>`)의 정수 값만 테이블 문자열로 치환합니다.
//! 다른 정수 필드는 절대 건드리지 않습니다.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use tlview_core::types::RawRecord;

use crate::schema::InternedField;

/// 인터닝 문자열 테이블
///
/// 문자열이 아닌 원소는 빈 슬롯으로 보관되어, 그 인덱스를 가리키는 참조는
/// 해제되지 않고 원래 값을 유지합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTable {
    entries: Vec<Option<String>>,
}

impl StringTable {
    /// 문자열 목록에서 테이블을 생성합니다.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|s| Some(s.into())).collect(),
        }
    }

    /// JSON 배열에서 테이블을 생성합니다. 배열이 아니면 `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let items = value.as_array()?;
        Some(Self {
            entries: items
                .iter()
                .map(|item| item.as_str().map(str::to_owned))
                .collect(),
        })
    }

    /// 테이블 길이
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 테이블이 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 인덱스의 문자열을 조회합니다.
    pub fn lookup(&self, index: u64) -> Option<&str> {
        let index = usize::try_from(index).ok()?;
        self.entries.get(index)?.as_deref()
    }

    /// 코드 값을 해제합니다.
    ///
    /// 음이 아닌 정수이고 테이블 범위 안이면 문자열을, 그 외에는 `None`을 반환합니다.
    pub fn resolve(&self, value: &Value) -> Option<&str> {
        value.as_u64().and_then(|index| self.lookup(index))
    }
}

/// 선두 문자열 테이블 레코드를 분리합니다.
///
/// 첫 레코드가 `field`를 가지면 그 레코드를 제외한 나머지 슬라이스를 반환합니다.
/// 필드 값이 배열이 아니면 테이블은 비어 있는 것으로 취급합니다.
pub fn split_string_table<'a>(
    records: &'a [RawRecord],
    field: &str,
) -> (StringTable, &'a [RawRecord]) {
    let Some((first, rest)) = records.split_first() else {
        return (StringTable::default(), records);
    };

    let Some(value) = first.get(field) else {
        return (StringTable::default(), records);
    };

    let table = StringTable::from_value(value).unwrap_or_else(|| {
        warn!(
            line = first.line(),
            field, "string table field is not an array, ignoring"
        );
        StringTable::default()
    });
    debug!(entries = table.len(), "string table extracted");

    (table, rest)
}

/// 이벤트 페이로드의 인터닝 필드를 해제합니다.
///
/// `fields`는 레코드 사본이며 원본 [`RawRecord`]는 변경되지 않습니다.
/// 해제한 참조 수를 반환합니다.
pub fn resolve_interned(
    table: &StringTable,
    fields: &mut Map<String, Value>,
    event_key: &str,
    targets: &[InternedField],
) -> usize {
    if table.is_empty() || targets.is_empty() {
        return 0;
    }

    let Some(Value::Object(payload)) = fields.get_mut(event_key) else {
        return 0;
    };

    let mut resolved = 0;
    for target in targets {
        let Some(Value::Array(items)) = payload.get_mut(&target.list) else {
            continue;
        };

        for item in items.iter_mut() {
            let Some(slot) = item.as_object_mut().and_then(|o| o.get_mut(&target.field)) else {
                continue;
            };
            if let Some(text) = table.resolve(slot) {
                *slot = Value::String(text.to_owned());
                resolved += 1;
            }
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stack_target() -> Vec<InternedField> {
        vec![InternedField {
            list: "stack".to_owned(),
            field: "filename".to_owned(),
        }]
    }

    fn record(line: usize, value: Value) -> RawRecord {
        match value {
            Value::Object(fields) => RawRecord::new(line, fields),
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn resolve_in_range_and_out_of_range() {
        let table = StringTable::new(["a.py", "b.py"]);
        assert_eq!(table.resolve(&json!(1)), Some("b.py"));
        assert_eq!(table.resolve(&json!(99)), None);
        assert_eq!(table.resolve(&json!(-1)), None);
        assert_eq!(table.resolve(&json!("1")), None);
        assert_eq!(table.resolve(&json!(1.5)), None);
    }

    #[test]
    fn non_string_entries_are_holes() {
        let table = StringTable::from_value(&json!(["a.py", 7, null, ""])).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.lookup(0), Some("a.py"));
        assert_eq!(table.lookup(1), None);
        assert_eq!(table.lookup(2), None);
        assert_eq!(table.lookup(3), Some(""));
    }

    #[test]
    fn split_removes_leading_table_record() {
        let records = vec![
            record(1, json!({"string_table": ["a.py"]})),
            record(2, json!({"frame_id": 0})),
        ];
        let (table, rest) = split_string_table(&records, "string_table");
        assert_eq!(table.len(), 1);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].line(), 2);
    }

    #[test]
    fn split_without_table_keeps_all_records() {
        let records = vec![
            record(1, json!({"frame_id": 0})),
            record(2, json!({"string_table": ["late.py"]})),
        ];
        let (table, rest) = split_string_table(&records, "string_table");
        assert!(table.is_empty());
        assert_eq!(rest.len(), 2);
    }

    #[test]
    fn split_non_array_table_still_removes_record() {
        let records = vec![
            record(1, json!({"string_table": "oops"})),
            record(2, json!({"frame_id": 0})),
        ];
        let (table, rest) = split_string_table(&records, "string_table");
        assert!(table.is_empty());
        assert_eq!(rest.len(), 1);
    }

    #[test]
    fn resolves_only_targeted_fields() {
        let table = StringTable::new(["a.py", "b.py"]);
        let mut fields = json!({
            "frame_id": 1,
            "dynamo_start": {
                "stack": [
                    {"filename": 1, "line": 0},
                    {"filename": 99, "line": 1},
                    {"line": 2}
                ]
            }
        })
        .as_object()
        .cloned()
        .unwrap();

        let n = resolve_interned(&table, &mut fields, "dynamo_start", &stack_target());
        assert_eq!(n, 1);
        let stack = &fields["dynamo_start"]["stack"];
        assert_eq!(stack[0]["filename"], json!("b.py"));
        assert_eq!(stack[0]["line"], json!(0));
        assert_eq!(stack[1]["filename"], json!(99));
        assert_eq!(fields["frame_id"], json!(1));
    }

    #[test]
    fn missing_payload_shapes_are_ignored() {
        let table = StringTable::new(["a.py"]);
        for payload in [json!(null), json!({"stack": 3}), json!({"stack": [1, 2]})] {
            let mut fields = Map::new();
            fields.insert("dynamo_start".to_owned(), payload.clone());
            let n = resolve_interned(&table, &mut fields, "dynamo_start", &stack_target());
            assert_eq!(n, 0);
            assert_eq!(fields["dynamo_start"], payload);
        }
    }
}
