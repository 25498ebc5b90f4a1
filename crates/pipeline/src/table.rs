//! 테이블 모델
//!
//! [`ViewState`]에서 표현 계층이 그대로 그릴 수 있는 컬럼/셀 구조를 만듭니다.
//!
//! 컬럼 순서:
//! 1. `frame` (프레임 필터가 `all`일 때만)
//! 2. `rank`, `process`, `thread`
//! 3. 숨김 필드 (show-all일 때만, 이미 나온 컬럼은 제외)
//! 4. `event_key` (이벤트 필터가 `all`일 때만)
//! 5. 이벤트가 선택되고 동적 컬럼이 있으면 표시 중인 동적 컬럼, 아니면 `event_content`

use serde::Serialize;
use serde_json::Value;

use tlview_core::types::{HIDDEN_FIELDS, ProcessedRecord};

use crate::view::ViewState;

/// 프레임 식별자 컬럼
pub const FRAME_COLUMN: &str = "frame";
/// 이벤트 키 컬럼
pub const EVENT_KEY_COLUMN: &str = "event_key";
/// 이벤트 페이로드 전체 컬럼
pub const EVENT_CONTENT_COLUMN: &str = "event_content";

const ALWAYS_SHOWN: [&str; 3] = ["rank", "process", "thread"];

/// 테이블 셀
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    /// 표시 텍스트
    pub text: String,
    /// 여러 줄 JSON 텍스트인지 여부
    pub is_json: bool,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_json: false,
        }
    }

    fn json(value: &Value) -> Self {
        Self {
            text: serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
            is_json: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ColumnKind {
    Frame,
    EventKey,
    EventContent,
    Dynamic,
    Field,
}

/// 테이블 모델
#[derive(Debug, Clone, Serialize)]
pub struct TableModel {
    /// 컬럼명
    pub columns: Vec<String>,
    /// 행 (각 행은 컬럼 수만큼의 셀)
    pub rows: Vec<Vec<Cell>>,
    /// 필터를 통과한 레코드 수
    pub shown: usize,
    /// 전체 레코드 수
    pub total: usize,
}

impl TableModel {
    /// 뷰 상태에서 테이블을 만듭니다. `limit`이 있으면 앞에서부터 그 수만큼만 행을 만듭니다.
    pub fn from_view(state: &ViewState, limit: Option<usize>) -> Self {
        let layout = Self::layout(state);
        let rows = state
            .filtered_records()
            .take(limit.unwrap_or(usize::MAX))
            .map(|record| {
                layout
                    .iter()
                    .map(|(name, kind)| render_cell(record, name, *kind))
                    .collect()
            })
            .collect();

        Self {
            columns: layout.into_iter().map(|(name, _)| name).collect(),
            rows,
            shown: state.filtered_len(),
            total: state.records().len(),
        }
    }

    fn layout(state: &ViewState) -> Vec<(String, ColumnKind)> {
        let mut layout: Vec<(String, ColumnKind)> = Vec::new();

        if state.frame_selection().is_all() {
            layout.push((FRAME_COLUMN.to_owned(), ColumnKind::Frame));
        }
        for name in ALWAYS_SHOWN {
            layout.push((name.to_owned(), ColumnKind::Field));
        }
        if state.show_all() {
            for name in HIDDEN_FIELDS {
                if !layout.iter().any(|(existing, _)| existing == name) {
                    layout.push((name.to_owned(), ColumnKind::Field));
                }
            }
        }

        let event_all = state.event_selection().is_all();
        if event_all {
            layout.push((EVENT_KEY_COLUMN.to_owned(), ColumnKind::EventKey));
        }

        if !event_all && !state.dynamic_columns().is_empty() {
            for name in state.visible_columns() {
                layout.push((name.to_owned(), ColumnKind::Dynamic));
            }
        } else {
            layout.push((EVENT_CONTENT_COLUMN.to_owned(), ColumnKind::EventContent));
        }

        layout
    }

    /// `"<shown> of <total> entries"` 요약
    pub fn summary(&self) -> String {
        format!("{} of {} entries", self.shown, self.total)
    }
}

fn render_cell(record: &ProcessedRecord, name: &str, kind: ColumnKind) -> Cell {
    match kind {
        ColumnKind::Frame => Cell::plain(record.frame()),
        ColumnKind::EventKey => Cell::plain(record.event_key().unwrap_or_default()),
        ColumnKind::EventContent => match record.event_payload() {
            Some(Value::String(s)) => Cell {
                text: s.clone(),
                is_json: true,
            },
            Some(value @ (Value::Object(_) | Value::Array(_))) => Cell::json(value),
            Some(other) => Cell {
                text: other.to_string(),
                is_json: true,
            },
            None => Cell {
                text: String::new(),
                is_json: true,
            },
        },
        ColumnKind::Dynamic => match record.event_payload().and_then(|p| p.get(name)) {
            Some(value @ (Value::Object(_) | Value::Array(_))) => Cell::json(value),
            Some(value) => render_scalar(value),
            None => Cell::plain(""),
        },
        ColumnKind::Field => match record.get(name) {
            Some(value) => render_scalar(value),
            None => Cell::plain(""),
        },
    }
}

fn render_scalar(value: &Value) -> Cell {
    match value {
        Value::String(s) => Cell::plain(s.clone()),
        other => Cell::plain(other.to_string()),
    }
}
