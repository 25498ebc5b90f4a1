//! 파이프라인 설정
//!
//! [`PipelineConfig`]는 core의 [`TlviewConfig`](tlview_core::config::TlviewConfig) 중
//! 파이프라인이 사용하는 섹션(source, decode, store, schema)을 평탄화한 설정입니다.
//!
//! # 사용 예시
//! ```ignore
//! use tlview_core::config::TlviewConfig;
//! use tlview_pipeline::config::PipelineConfig;
//!
//! let core_config = TlviewConfig::default();
//! let config = PipelineConfig::from_core(&core_config);
//! ```

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use tlview_core::config::{SchemaConfig, TlviewConfig};

use crate::decoder::DecodePolicy;
use crate::error::PipelineError;
use crate::schema::EventSchema;

/// 파이프라인 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// 잘못된 라인이 있으면 로드 전체를 중단할지 여부
    pub strict: bool,
    /// 최대 입력 크기 (바이트)
    pub max_input_bytes: usize,
    /// HTTP 요청 타임아웃 (초)
    pub http_timeout_secs: u64,
    /// 영속 저장소 활성화 여부
    pub store_enabled: bool,
    /// blob 키
    pub store_key: String,
    /// 데이터 디렉토리
    pub data_dir: String,
    /// 이벤트 스키마
    pub schema: SchemaConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_core(&TlviewConfig::default())
    }
}

impl PipelineConfig {
    /// core 설정에서 파이프라인 설정을 생성합니다.
    pub fn from_core(core: &TlviewConfig) -> Self {
        Self {
            strict: core.decode.strict,
            max_input_bytes: core.source.max_input_bytes,
            http_timeout_secs: core.source.http_timeout_secs,
            store_enabled: core.store.enabled,
            store_key: core.store.key.clone(),
            data_dir: core.general.data_dir.clone(),
            schema: core.schema.clone(),
        }
    }

    /// 디코드 정책
    pub fn decode_policy(&self) -> DecodePolicy {
        DecodePolicy::from_strict(self.strict)
    }

    /// HTTP 타임아웃
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// 이벤트 스키마 레지스트리를 생성합니다.
    pub fn event_schema(&self) -> EventSchema {
        EventSchema::from_config(&self.schema)
    }

    /// blob 파일 경로 (`<data_dir>/<store_key>`)
    pub fn store_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.store_key)
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.max_input_bytes == 0 {
            return Err(PipelineError::Config {
                field: "max_input_bytes".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        if self.http_timeout_secs == 0 {
            return Err(PipelineError::Config {
                field: "http_timeout_secs".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        if self.store_enabled {
            Self::validate_store_key(&self.store_key)?;
            if self.data_dir.is_empty() {
                return Err(PipelineError::Config {
                    field: "data_dir".to_owned(),
                    reason: "must not be empty when store is enabled".to_owned(),
                });
            }
        }

        if self.schema.descriptor_event == self.schema.reference_event {
            return Err(PipelineError::Config {
                field: "schema.reference_event".to_owned(),
                reason: "must differ from schema.descriptor_event".to_owned(),
            });
        }

        Ok(())
    }

    /// blob 키가 data_dir 밖을 가리키지 않는지 검증합니다.
    fn validate_store_key(key: &str) -> Result<(), PipelineError> {
        if key.is_empty() {
            return Err(PipelineError::Config {
                field: "store_key".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        let mut components = Path::new(key).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_normal || key.starts_with('.') || key.contains('\\') {
            return Err(PipelineError::Config {
                field: "store_key".to_owned(),
                reason: format!("'{}' must be a plain file name", key),
            });
        }

        Ok(())
    }
}

/// 파이프라인 설정 빌더
#[derive(Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// strict 디코드 여부를 설정합니다.
    pub fn strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }

    /// 최대 입력 크기를 설정합니다.
    pub fn max_input_bytes(mut self, max: usize) -> Self {
        self.config.max_input_bytes = max;
        self
    }

    /// HTTP 타임아웃(초)을 설정합니다.
    pub fn http_timeout_secs(mut self, secs: u64) -> Self {
        self.config.http_timeout_secs = secs;
        self
    }

    /// 영속 저장소 사용 여부를 설정합니다.
    pub fn store_enabled(mut self, enabled: bool) -> Self {
        self.config.store_enabled = enabled;
        self
    }

    /// blob 키를 설정합니다.
    pub fn store_key(mut self, key: impl Into<String>) -> Self {
        self.config.store_key = key.into();
        self
    }

    /// 데이터 디렉토리를 설정합니다.
    pub fn data_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.data_dir = dir.into();
        self
    }

    /// 이벤트 스키마를 설정합니다.
    pub fn schema(mut self, schema: SchemaConfig) -> Self {
        self.config.schema = schema;
        self
    }

    /// 설정을 검증하고 `PipelineConfig`를 생성합니다.
    pub fn build(self) -> Result<PipelineConfig, PipelineError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        PipelineConfig::default().validate().unwrap();
    }

    #[test]
    fn from_core_preserves_values() {
        let mut core = TlviewConfig::default();
        core.decode.strict = false;
        core.source.http_timeout_secs = 5;
        core.store.key = "custom-key".to_owned();
        core.general.data_dir = "/tmp/tlview".to_owned();

        let config = PipelineConfig::from_core(&core);
        assert!(!config.strict);
        assert_eq!(config.decode_policy(), DecodePolicy::Lenient);
        assert_eq!(config.http_timeout(), Duration::from_secs(5));
        assert_eq!(config.store_path(), PathBuf::from("/tmp/tlview/custom-key"));
    }

    #[test]
    fn validate_rejects_zero_max_input() {
        let config = PipelineConfig {
            max_input_bytes: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_traversal_store_key() {
        for key in ["../escape", "a/b", ".hidden", "..", "a\\b", ""] {
            let config = PipelineConfig {
                store_key: key.to_owned(),
                ..Default::default()
            };
            assert!(config.validate().is_err(), "key {key:?} should be rejected");
        }
    }

    #[test]
    fn store_key_not_checked_when_disabled() {
        let config = PipelineConfig {
            store_enabled: false,
            store_key: String::new(),
            ..Default::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn builder_creates_valid_config() {
        let config = PipelineConfigBuilder::new()
            .strict(false)
            .store_key("trace-data")
            .data_dir("/tmp/x")
            .build()
            .unwrap();
        assert!(!config.strict);
        assert_eq!(config.store_key, "trace-data");
    }

    #[test]
    fn builder_rejects_invalid_config() {
        assert!(PipelineConfigBuilder::new().http_timeout_secs(0).build().is_err());
    }

    #[test]
    fn event_schema_uses_schema_section() {
        let schema = SchemaConfig {
            descriptor_event: "describe_storage".to_owned(),
            ..SchemaConfig::default()
        };
        let config = PipelineConfigBuilder::new().schema(schema).build().unwrap();
        assert_eq!(config.event_schema().descriptor_event(), "describe_storage");
    }
}
