//! 뷰 상태와 리듀서
//!
//! [`ViewState`]는 불변 값입니다. 모든 상태 전이는 [`ViewState::apply`]로
//! [`Action`]을 적용해 새 값을 만드는 방식으로 이루어지며, 표현 계층은
//! [`PresentationSink`]를 통해 새 상태를 전달받습니다.
//!
//! # 전이 규칙
//! - 데이터셋 또는 필터 선택이 바뀌면 필터를 다시 적용하고 동적 컬럼을 다시
//!   계산하며, 컬럼 가시성은 "모두 표시"로 초기화됩니다.
//! - 새 데이터셋을 로드해도 필터 선택과 show-all 설정은 유지됩니다.
//! - `Clear`는 데이터셋, 필터, show-all을 모두 초기 상태로 되돌립니다.

use std::collections::BTreeSet;
use std::sync::Arc;

use tlview_core::types::{ProcessedRecord, Selection};

use crate::filter::{FilterSpec, apply_filter};
use crate::process::Dataset;

/// 상태 전이 액션
#[derive(Debug, Clone)]
pub enum Action {
    /// 새 데이터셋으로 교체
    Load(Arc<Dataset>),
    /// 이벤트 키 필터 선택
    SelectEvent(Selection),
    /// 프레임 필터 선택
    SelectFrame(Selection),
    /// 동적 컬럼 하나의 가시성 토글
    ToggleColumn(String),
    /// 모든 동적 컬럼 표시/숨김
    SetAllColumnsVisible(bool),
    /// 숨김 필드 컬럼 표시 여부
    ShowAllColumns(bool),
    /// 데이터와 선택을 모두 초기화
    Clear,
}

/// 표현 계층 경계
///
/// 세션은 상태가 바뀔 때마다 [`publish`](Self::publish)를 호출하고,
/// 소스 읽기 실패 같은 일시적 에러는 [`show_error`](Self::show_error)로 전달합니다.
pub trait PresentationSink {
    /// 새 뷰 상태를 받습니다.
    fn publish(&mut self, state: &ViewState);

    /// 사용자에게 보여줄 일시적 에러 메시지를 받습니다.
    fn show_error(&mut self, message: &str);
}

/// 불변 뷰 상태
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    dataset: Arc<Dataset>,
    filter: FilterSpec,
    show_all: bool,
    filtered: Arc<[usize]>,
    columns: Arc<[String]>,
    hidden_columns: BTreeSet<String>,
}

impl ViewState {
    /// 빈 상태
    pub fn new() -> Self {
        Self::default()
    }

    /// 데이터셋으로 초기 상태를 만듭니다.
    pub fn with_dataset(dataset: Arc<Dataset>) -> Self {
        Self::new().apply(Action::Load(dataset))
    }

    /// 액션을 적용한 새 상태를 반환합니다.
    pub fn apply(&self, action: Action) -> Self {
        match action {
            Action::Load(dataset) => Self {
                dataset,
                ..self.clone()
            }
            .refiltered(),
            Action::SelectEvent(event) => Self {
                filter: FilterSpec {
                    event,
                    frame: self.filter.frame.clone(),
                },
                ..self.clone()
            }
            .refiltered(),
            Action::SelectFrame(frame) => Self {
                filter: FilterSpec {
                    event: self.filter.event.clone(),
                    frame,
                },
                ..self.clone()
            }
            .refiltered(),
            Action::ToggleColumn(name) => {
                let mut next = self.clone();
                if next.columns.contains(&name) && !next.hidden_columns.remove(&name) {
                    next.hidden_columns.insert(name);
                }
                next
            }
            Action::SetAllColumnsVisible(visible) => {
                let mut next = self.clone();
                next.hidden_columns = if visible {
                    BTreeSet::new()
                } else {
                    next.columns.iter().cloned().collect()
                };
                next
            }
            Action::ShowAllColumns(show_all) => Self {
                show_all,
                ..self.clone()
            },
            Action::Clear => Self::default(),
        }
    }

    fn refiltered(mut self) -> Self {
        let outcome = apply_filter(self.dataset.records(), &self.filter);
        self.filtered = outcome.indices.into();
        self.columns = outcome.columns.into();
        self.hidden_columns.clear();
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// 데이터셋 공유 핸들
    pub fn dataset_handle(&self) -> Arc<Dataset> {
        Arc::clone(&self.dataset)
    }

    /// 전체 레코드
    pub fn records(&self) -> &[ProcessedRecord] {
        self.dataset.records()
    }

    /// 필터를 통과한 레코드 (원래 순서)
    pub fn filtered_records(&self) -> impl Iterator<Item = &ProcessedRecord> {
        let records = self.dataset.records();
        self.filtered.iter().map(move |&idx| &records[idx])
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn event_selection(&self) -> &Selection {
        &self.filter.event
    }

    pub fn frame_selection(&self) -> &Selection {
        &self.filter.frame
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    /// 사용 가능한 이벤트 키 (전체 데이터셋 기준)
    pub fn available_event_keys(&self) -> &[String] {
        self.dataset.event_keys()
    }

    /// 사용 가능한 프레임 식별자 (전체 데이터셋 기준)
    pub fn available_frames(&self) -> &[String] {
        self.dataset.frames()
    }

    /// 현재 동적 컬럼 (필터된 부분 집합 기준)
    pub fn dynamic_columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_column_visible(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name) && !self.hidden_columns.contains(name)
    }

    /// 표시 중인 동적 컬럼 (정렬 순서 유지)
    pub fn visible_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| !self.hidden_columns.contains(*c))
            .collect()
    }
}
