//! 세션 -- 로드, 영속화, 뷰 상태를 묶는 최상위 조립체
//!
//! # 불변 조건
//! - 새 데이터셋은 완전히 만들어진 뒤에만 현재 상태를 교체합니다. 소스 읽기나
//!   디코딩이 실패하면 직전 데이터셋이 그대로 남습니다.
//! - 로드에 성공하면 원본 텍스트를 저장소에 저장합니다. 저장 실패는 경고만 남깁니다.
//!   lenient 모드에서 건너뛴 라인은 저장하지 않으므로 저장된 blob은 strict 정책으로도
//!   그대로 복원됩니다.
//! - 저장소에서 복원할 때는 다시 저장하지 않습니다.
//! - 저장된 blob을 해석할 수 없으면 blob을 지우고 빈 상태에서 시작합니다.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{debug, info, warn};

use tlview_core::metrics::{LABEL_RESULT, LABEL_SOURCE_KIND, LOAD_DURATION_SECONDS, LOADS_TOTAL};
use tlview_core::pipeline::{BlobStore, ByteSource};

use crate::config::PipelineConfig;
use crate::decoder::LineFailure;
use crate::error::PipelineError;
use crate::process::{Dataset, RecordProcessor};
use crate::view::{Action, PresentationSink, ViewState};

/// 로드 결과 요약
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// 소스 설명
    pub source: String,
    /// 처리된 레코드 수
    pub records: usize,
    /// lenient 모드에서 건너뛴 라인 수
    pub skipped_lines: usize,
    /// 저장소에 저장되었는지 여부
    pub persisted: bool,
}

/// 저장소 복원 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// 저장된 데이터셋을 복원함
    Restored {
        /// 복원된 레코드 수
        records: usize,
    },
    /// 저장된 데이터가 없음
    NothingStored,
    /// 저장된 데이터를 해석할 수 없어 폐기함
    Discarded {
        /// 폐기 사유
        reason: String,
    },
    /// 저장소가 비활성화됨
    Disabled,
}

/// 뷰어 세션
pub struct Session<S, P> {
    processor: RecordProcessor,
    store: Option<S>,
    sink: P,
    state: ViewState,
}

impl<S, P> Session<S, P>
where
    S: BlobStore,
    P: PresentationSink,
{
    /// 세션을 생성합니다. `store`가 `None`이면 영속화하지 않습니다.
    pub fn new(config: &PipelineConfig, store: Option<S>, sink: P) -> Self {
        let store = if config.store_enabled { store } else { None };
        Self {
            processor: RecordProcessor::from_config(config),
            store,
            sink,
            state: ViewState::new(),
        }
    }

    /// 현재 뷰 상태
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub fn store(&self) -> Option<&S> {
        self.store.as_ref()
    }

    /// 액션을 적용하고 새 상태를 게시합니다.
    pub fn dispatch(&mut self, action: Action) -> &ViewState {
        self.state = self.state.apply(action);
        self.sink.publish(&self.state);
        &self.state
    }

    /// 소스에서 데이터셋을 로드합니다.
    ///
    /// 실패하면 표현 계층에 에러 메시지를 보내고 에러를 반환하며, 현재 상태는 바뀌지 않습니다.
    pub async fn load<B: ByteSource>(&mut self, source: &B) -> Result<LoadReport, PipelineError> {
        let started = Instant::now();
        let name = source.describe();
        info!(source = %name, kind = source.kind(), "loading dataset");

        let result = self.load_inner(source, &name).await;
        let label = if result.is_ok() { "ok" } else { "error" };
        counter!(LOADS_TOTAL, LABEL_RESULT => label, LABEL_SOURCE_KIND => source.kind())
            .increment(1);
        histogram!(LOAD_DURATION_SECONDS).record(started.elapsed().as_secs_f64());

        match result {
            Ok(report) => {
                info!(
                    source = %name,
                    records = report.records,
                    skipped = report.skipped_lines,
                    persisted = report.persisted,
                    "dataset loaded"
                );
                Ok(report)
            }
            Err(e) => {
                warn!(source = %name, error = %e, "load failed, keeping previous dataset");
                self.sink.show_error(&e.to_string());
                Err(e)
            }
        }
    }

    async fn load_inner<B: ByteSource>(
        &mut self,
        source: &B,
        name: &str,
    ) -> Result<LoadReport, PipelineError> {
        let text = source.read_text().await?;
        let dataset = self.processor.process_text(&text)?;

        let records = dataset.len();
        let skipped_lines = dataset.failures().len();
        let accepted = accepted_text(&text, dataset.failures());
        self.install(dataset);

        let persisted = self.persist(&accepted).await;

        Ok(LoadReport {
            source: name.to_owned(),
            records,
            skipped_lines,
            persisted,
        })
    }

    /// 저장소의 blob으로 데이터셋을 복원합니다. 복원 경로는 다시 저장하지 않습니다.
    ///
    /// 저장소 에러와 손상된 blob은 "저장된 상태 없음"으로 취급하며 에러를 반환하지 않습니다.
    pub async fn restore(&mut self) -> RestoreOutcome {
        let Some(store) = self.store.as_ref() else {
            return RestoreOutcome::Disabled;
        };

        let blob = match store.load().await {
            Ok(Some(blob)) => blob,
            Ok(None) => return RestoreOutcome::NothingStored,
            Err(e) => {
                warn!(error = %e, "failed to read persisted dataset, starting empty");
                return RestoreOutcome::NothingStored;
            }
        };

        let parsed = std::str::from_utf8(&blob)
            .map_err(|e| PipelineError::CorruptedPersistedState {
                reason: format!("invalid UTF-8: {}", e),
            })
            .and_then(|text| {
                self.processor
                    .process_text(text)
                    .map_err(|e| PipelineError::CorruptedPersistedState {
                        reason: e.to_string(),
                    })
            });

        match parsed {
            Ok(dataset) => {
                let records = dataset.len();
                self.install(dataset);
                debug!(records, "dataset restored from store");
                RestoreOutcome::Restored { records }
            }
            Err(e) => {
                let reason = e.to_string();
                warn!(error = %reason, "discarding persisted dataset");
                if let Some(store) = self.store.as_ref() {
                    if let Err(clear_err) = store.clear().await {
                        warn!(error = %clear_err, "failed to discard persisted dataset");
                    }
                }
                RestoreOutcome::Discarded { reason }
            }
        }
    }

    /// 데이터셋과 선택을 모두 초기화하고 저장소를 비웁니다.
    pub async fn clear(&mut self) -> Result<(), PipelineError> {
        self.dispatch(Action::Clear);
        if let Some(store) = self.store.as_ref() {
            store.clear().await?;
        }
        info!("dataset cleared");
        Ok(())
    }

    fn install(&mut self, dataset: Dataset) {
        self.dispatch(Action::Load(Arc::new(dataset)));
    }

    async fn persist(&self, text: &str) -> bool {
        let Some(store) = self.store.as_ref() else {
            return false;
        };
        match store.save(text.as_bytes()).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to persist dataset");
                false
            }
        }
    }
}

/// 디코딩에 실패한 라인을 뺀 텍스트
///
/// 라인 번호는 디코더와 같이 `str::lines` 기준 1부터 셉니다.
fn accepted_text<'a>(text: &'a str, failures: &[LineFailure]) -> Cow<'a, str> {
    if failures.is_empty() {
        return Cow::Borrowed(text);
    }
    let skipped: BTreeSet<usize> = failures.iter().map(|f| f.line).collect();
    let kept: Vec<&str> = text
        .lines()
        .enumerate()
        .filter(|(idx, _)| !skipped.contains(&(idx + 1)))
        .map(|(_, line)| line)
        .collect();
    Cow::Owned(kept.join("\n"))
}

/// 상태를 보관만 하는 표현 계층
///
/// CLI처럼 마지막 상태만 필요할 때 사용합니다.
#[derive(Debug, Default)]
pub struct LatestState {
    /// 마지막으로 게시된 상태
    pub state: Option<ViewState>,
    /// 받은 에러 메시지
    pub errors: Vec<String>,
    /// 게시 횟수
    pub publishes: usize,
}

impl PresentationSink for LatestState {
    fn publish(&mut self, state: &ViewState) {
        self.state = Some(state.clone());
        self.publishes += 1;
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_owned());
    }
}
