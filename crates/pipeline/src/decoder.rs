//! JSONL 라인 디코더
//!
//! 원시 텍스트를 줄 단위로 나누어 각 줄을 독립적인 JSON 객체로 파싱합니다.
//! 한 줄의 파싱 실패가 나머지 줄의 디코딩을 중단시키지 않으며, 실패는
//! [`LineFailure`]로 따로 수집됩니다. 로드 전체를 중단할지는 [`DecodePolicy`]가 결정합니다.
//!
//! # 사용 예시
//! ```ignore
//! use tlview_pipeline::decoder::{DecodePolicy, LineDecoder};
//!
//! let decoded = LineDecoder::new().decode("{\"frame_id\":0}\n\n{\"frame_id\":1}")?;
//! let (records, failures) = decoded.finish(DecodePolicy::Strict)?;
//! assert_eq!(records.len(), 2);
//! ```

use metrics::counter;
use serde_json::Value;
use tracing::warn;

use tlview_core::metrics::{MALFORMED_LINES_TOTAL, RECORDS_DECODED_TOTAL};
use tlview_core::types::RawRecord;

use crate::error::PipelineError;

/// 파싱에 실패한 라인
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFailure {
    /// 원본 라인 번호 (1부터 시작)
    pub line: usize,
    /// 실패 사유
    pub reason: String,
    /// 원본 라인 일부 (메시지 표시용)
    pub excerpt: String,
}

impl From<&LineFailure> for PipelineError {
    fn from(failure: &LineFailure) -> Self {
        PipelineError::MalformedLine {
            line: failure.line,
            reason: failure.reason.clone(),
        }
    }
}

/// 잘못된 라인 처리 정책
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodePolicy {
    /// 실패한 라인이 하나라도 있으면 첫 실패로 로드를 중단합니다.
    #[default]
    Strict,
    /// 실패한 라인을 보고하고 나머지 레코드로 로드를 계속합니다.
    Lenient,
}

impl DecodePolicy {
    /// 설정의 strict 플래그에서 정책을 만듭니다.
    pub fn from_strict(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Lenient }
    }
}

/// 디코딩 결과
#[derive(Debug, Clone, Default)]
pub struct Decoded {
    /// 성공한 레코드 (원본 순서)
    pub records: Vec<RawRecord>,
    /// 실패한 라인 (원본 순서)
    pub failures: Vec<LineFailure>,
}

impl Decoded {
    /// 실패한 라인이 없는지 확인합니다.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// 정책을 적용해 레코드와 (허용된) 실패 목록을 반환합니다.
    pub fn finish(
        self,
        policy: DecodePolicy,
    ) -> Result<(Vec<RawRecord>, Vec<LineFailure>), PipelineError> {
        if policy == DecodePolicy::Strict {
            if let Some(first) = self.failures.first() {
                return Err(first.into());
            }
        }

        for failure in &self.failures {
            warn!(
                line = failure.line,
                reason = %failure.reason,
                excerpt = %failure.excerpt,
                "skipping malformed line"
            );
        }

        Ok((self.records, self.failures))
    }
}

/// JSONL 라인 디코더
#[derive(Debug, Clone)]
pub struct LineDecoder {
    /// 실패 메시지에 담을 원본 라인의 최대 길이 (문자 수)
    excerpt_len: usize,
}

impl LineDecoder {
    /// 새 디코더를 생성합니다.
    pub fn new() -> Self {
        Self { excerpt_len: 80 }
    }

    /// 실패 메시지의 원본 라인 길이를 설정합니다.
    pub fn with_excerpt_len(mut self, len: usize) -> Self {
        self.excerpt_len = len;
        self
    }

    /// 텍스트 전체를 디코딩합니다.
    ///
    /// 빈 줄과 공백만 있는 줄은 건너뜁니다. 레코드가 하나도 없으면 에러를
    /// 반환합니다: 실패한 라인이 있으면 첫 `MalformedLine`, 없으면 `EmptyInput`.
    pub fn decode(&self, text: &str) -> Result<Decoded, PipelineError> {
        let mut decoded = Decoded::default();

        for (idx, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match Self::parse_line(trimmed) {
                Ok(fields) => decoded.records.push(RawRecord::new(idx + 1, fields)),
                Err(reason) => decoded.failures.push(LineFailure {
                    line: idx + 1,
                    reason,
                    excerpt: trimmed.chars().take(self.excerpt_len).collect(),
                }),
            }
        }

        counter!(RECORDS_DECODED_TOTAL).increment(decoded.records.len() as u64);
        counter!(MALFORMED_LINES_TOTAL).increment(decoded.failures.len() as u64);

        if decoded.records.is_empty() {
            return Err(match decoded.failures.first() {
                Some(first) => first.into(),
                None => PipelineError::EmptyInput,
            });
        }

        Ok(decoded)
    }

    /// 한 줄을 JSON 객체로 파싱합니다.
    fn parse_line(line: &str) -> Result<serde_json::Map<String, Value>, String> {
        let value: Value = serde_json::from_str(line).map_err(|e| e.to_string())?;

        // 최상위가 JSON 객체여야 합니다
        match value {
            Value::Object(fields) => Ok(fields),
            _ => Err("expected JSON object at top level".to_owned()),
        }
    }
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}
