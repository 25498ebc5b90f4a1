//! 레코드 처리기
//!
//! 디코딩된 원시 레코드를 한 번의 패스로 처리해 [`Dataset`]을 만듭니다.
//!
//! ```text
//! text -> LineDecoder -> [RawRecord] -> split_string_table
//!      -> 레코드마다: 이벤트 키 판별 -> 역할별 처리(인터닝 해제 / 색인 / 조인) -> ProcessedRecord
//! ```
//!
//! 이벤트 키와 프레임 식별자는 원시 필드에서 한 번만 판별합니다. 인터닝 해제와
//! 조인은 이벤트 페이로드 내부만 바꾸므로 판별 결과에 영향이 없습니다.

use metrics::counter;
use tracing::debug;

use tlview_core::metrics::{
    AMBIGUOUS_EVENT_KEYS_TOTAL, INTERNED_REFS_RESOLVED_TOTAL, REFERENCES_JOINED_TOTAL,
};
use tlview_core::types::{ProcessedRecord, RawRecord};

use crate::classify::{
    available_event_keys, available_frames, event_key_candidates, frame_identity_of,
};
use crate::config::PipelineConfig;
use crate::correlate::{Correlator, JoinOutcome};
use crate::decoder::{DecodePolicy, LineDecoder, LineFailure};
use crate::error::PipelineError;
use crate::intern::{StringTable, resolve_interned, split_string_table};
use crate::schema::{EventRole, EventSchema};

/// 처리 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessStats {
    /// 해제한 인터닝 참조 수
    pub interned_resolved: usize,
    /// 색인된 디스크립터 수
    pub descriptors_indexed: usize,
    /// 조인된 참조 수
    pub references_joined: usize,
    /// 조인되지 않은 참조 수
    pub references_unmatched: usize,
    /// 이벤트 키 후보가 여럿인 레코드 수
    pub ambiguous_event_keys: usize,
}

/// 한 번의 로드로 만들어진 데이터셋
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<ProcessedRecord>,
    event_keys: Vec<String>,
    frames: Vec<String>,
    string_table: StringTable,
    failures: Vec<LineFailure>,
    stats: ProcessStats,
}

impl Dataset {
    fn new(
        records: Vec<ProcessedRecord>,
        string_table: StringTable,
        failures: Vec<LineFailure>,
        stats: ProcessStats,
    ) -> Self {
        let event_keys = available_event_keys(&records);
        let frames = available_frames(&records);
        Self {
            records,
            event_keys,
            frames,
            string_table,
            failures,
            stats,
        }
    }

    /// 처리된 레코드 (입력 순서)
    pub fn records(&self) -> &[ProcessedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 전체 데이터셋의 이벤트 키 목록 (정렬)
    pub fn event_keys(&self) -> &[String] {
        &self.event_keys
    }

    /// 전체 데이터셋의 프레임 식별자 목록 (정렬)
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn string_table(&self) -> &StringTable {
        &self.string_table
    }

    /// lenient 모드에서 건너뛴 라인
    pub fn failures(&self) -> &[LineFailure] {
        &self.failures
    }

    pub fn stats(&self) -> ProcessStats {
        self.stats
    }
}

/// 레코드 처리기
///
/// 상관 색인을 소유하며, 매 처리 패스 시작 시 색인을 비웁니다.
#[derive(Debug)]
pub struct RecordProcessor {
    schema: EventSchema,
    decoder: LineDecoder,
    policy: DecodePolicy,
    correlator: Correlator,
}

impl RecordProcessor {
    /// 스키마와 디코드 정책으로 처리기를 생성합니다.
    pub fn new(schema: EventSchema, policy: DecodePolicy) -> Self {
        Self {
            schema,
            decoder: LineDecoder::new(),
            policy,
            correlator: Correlator::new(),
        }
    }

    /// 파이프라인 설정에서 처리기를 생성합니다.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.event_schema(), config.decode_policy())
    }

    pub fn schema(&self) -> &EventSchema {
        &self.schema
    }

    /// 원시 텍스트를 디코딩하고 처리합니다.
    pub fn process_text(&mut self, text: &str) -> Result<Dataset, PipelineError> {
        let (raw, failures) = self.decoder.decode(text)?.finish(self.policy)?;
        let mut dataset = self.process(&raw)?;
        dataset.failures = failures;
        Ok(dataset)
    }

    /// 원시 레코드를 처리합니다.
    ///
    /// 선두 문자열 테이블 레코드를 제외한 데이터 레코드가 없으면 `EmptyInput`.
    pub fn process(&mut self, raw: &[RawRecord]) -> Result<Dataset, PipelineError> {
        self.correlator.clear();

        let (table, data) = split_string_table(raw, self.schema.string_table_field());
        if data.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let mut stats = ProcessStats::default();
        let records = data
            .iter()
            .map(|record| self.process_one(&table, record, &mut stats))
            .collect();

        counter!(INTERNED_REFS_RESOLVED_TOTAL).increment(stats.interned_resolved as u64);
        counter!(REFERENCES_JOINED_TOTAL).increment(stats.references_joined as u64);
        counter!(AMBIGUOUS_EVENT_KEYS_TOTAL).increment(stats.ambiguous_event_keys as u64);

        debug!(
            records = data.len(),
            string_table = table.len(),
            descriptors = self.correlator.len(),
            joined = stats.references_joined,
            unmatched = stats.references_unmatched,
            "processing pass complete"
        );

        Ok(Dataset::new(records, table, Vec::new(), stats))
    }

    fn process_one(
        &mut self,
        table: &StringTable,
        raw: &RawRecord,
        stats: &mut ProcessStats,
    ) -> ProcessedRecord {
        let candidates: Vec<String> = event_key_candidates(raw.fields())
            .map(str::to_owned)
            .collect();
        let event_key = candidates.first().cloned();
        if let Some(extra) = candidates.get(1) {
            stats.ambiguous_event_keys += 1;
            debug!(
                line = raw.line(),
                event_key = event_key.as_deref().unwrap_or_default(),
                ignored = %extra,
                "record has more than one event field, using the first as event key"
            );
        }

        let frame = frame_identity_of(raw.fields());
        let mut fields = raw.fields().clone();

        // 역할 처리는 표시용 이벤트 키와 무관하게 모든 후보 필드에 적용
        for key in &candidates {
            self.apply_role(table, &mut fields, key, stats);
        }

        ProcessedRecord::new(fields, event_key, frame)
    }

    fn apply_role(
        &mut self,
        table: &StringTable,
        fields: &mut serde_json::Map<String, serde_json::Value>,
        key: &str,
        stats: &mut ProcessStats,
    ) {
        match self.schema.role_of(key) {
            EventRole::Interned => {
                stats.interned_resolved +=
                    resolve_interned(table, fields, key, self.schema.interned_fields(key));
            }
            EventRole::Descriptor => {
                if let Some(payload) = fields.get(key) {
                    if self.correlator.index_descriptor(&self.schema, payload)
                        == JoinOutcome::Indexed
                    {
                        stats.descriptors_indexed += 1;
                    }
                }
            }
            EventRole::Reference => {
                if let Some(payload) = fields.get_mut(key) {
                    match self.correlator.join_reference(&self.schema, payload) {
                        JoinOutcome::Joined => stats.references_joined += 1,
                        JoinOutcome::Unmatched => stats.references_unmatched += 1,
                        JoinOutcome::Indexed | JoinOutcome::Skipped => {}
                    }
                }
            }
            EventRole::Plain => {}
        }
    }
}

impl Default for RecordProcessor {
    fn default() -> Self {
        Self::new(EventSchema::default(), DecodePolicy::default())
    }
}
