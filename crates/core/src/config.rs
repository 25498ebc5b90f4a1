//! 설정 관리 -- tlview.toml 파싱 및 런타임 설정
//!
//! [`TlviewConfig`]는 모든 크레이트의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`TLVIEW_DECODE_STRICT=false` 형식)
//! 3. 설정 파일 (`tlview.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), tlview_core::error::TlviewError> {
//! use tlview_core::config::TlviewConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = TlviewConfig::load("tlview.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = TlviewConfig::parse("[decode]\nstrict = false")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, TlviewError};

/// tlview 통합 설정
///
/// `tlview.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TlviewConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 입력 소스 설정
    #[serde(default)]
    pub source: SourceConfig,
    /// 디코더 설정
    #[serde(default)]
    pub decode: DecodeConfig,
    /// 영속 저장소 설정
    #[serde(default)]
    pub store: StoreConfig,
    /// 이벤트 스키마 설정
    #[serde(default)]
    pub schema: SchemaConfig,
}

impl TlviewConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, TlviewError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 없으면 기본값에서 시작합니다.
    ///
    /// 파일이 존재하지만 파싱/검증에 실패하면 에러를 반환합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, TlviewError> {
        let path = path.as_ref();
        match Self::load(path).await {
            Err(TlviewError::Config(ConfigError::FileNotFound { .. })) => {
                debug!(path = %path.display(), "config file not found, using defaults");
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, TlviewError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TlviewError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                TlviewError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, TlviewError> {
        toml::from_str(toml_str).map_err(|e| {
            TlviewError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `TLVIEW_{SECTION}_{FIELD}`
    /// 예: `TLVIEW_SOURCE_HTTP_TIMEOUT_SECS=10`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "TLVIEW_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "TLVIEW_GENERAL_LOG_FORMAT");
        override_string(&mut self.general.data_dir, "TLVIEW_GENERAL_DATA_DIR");

        // Source
        override_u64(
            &mut self.source.http_timeout_secs,
            "TLVIEW_SOURCE_HTTP_TIMEOUT_SECS",
        );
        override_usize(
            &mut self.source.max_input_bytes,
            "TLVIEW_SOURCE_MAX_INPUT_BYTES",
        );

        // Decode
        override_bool(&mut self.decode.strict, "TLVIEW_DECODE_STRICT");

        // Store
        override_bool(&mut self.store.enabled, "TLVIEW_STORE_ENABLED");
        override_string(&mut self.store.key, "TLVIEW_STORE_KEY");

        // Schema
        override_string(
            &mut self.schema.string_table_field,
            "TLVIEW_SCHEMA_STRING_TABLE_FIELD",
        );
        override_string(
            &mut self.schema.descriptor_event,
            "TLVIEW_SCHEMA_DESCRIPTOR_EVENT",
        );
        override_string(
            &mut self.schema.reference_event,
            "TLVIEW_SCHEMA_REFERENCE_EVENT",
        );
        override_string(
            &mut self.schema.correlation_field,
            "TLVIEW_SCHEMA_CORRELATION_FIELD",
        );
        override_csv(
            &mut self.schema.identity_fields,
            "TLVIEW_SCHEMA_IDENTITY_FIELDS",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), TlviewError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        if self.source.http_timeout_secs == 0 {
            return Err(invalid(
                "source.http_timeout_secs",
                "must be greater than 0".to_owned(),
            ));
        }

        if self.source.max_input_bytes == 0 {
            return Err(invalid(
                "source.max_input_bytes",
                "must be greater than 0".to_owned(),
            ));
        }

        if self.store.enabled {
            if self.store.key.is_empty() {
                return Err(invalid(
                    "store.key",
                    "must not be empty when store is enabled".to_owned(),
                ));
            }
            // key는 파일명으로 사용됨
            if self.store.key.contains(['/', '\\']) || self.store.key.starts_with('.') {
                return Err(invalid(
                    "store.key",
                    format!("'{}' is not a plain file name", self.store.key),
                ));
            }
        }

        let names = [
            ("schema.string_table_field", &self.schema.string_table_field),
            ("schema.descriptor_event", &self.schema.descriptor_event),
            ("schema.reference_event", &self.schema.reference_event),
            ("schema.correlation_field", &self.schema.correlation_field),
        ];
        for (field, value) in names {
            if value.is_empty() {
                return Err(invalid(field, "must not be empty".to_owned()));
            }
        }

        if self.schema.descriptor_event == self.schema.reference_event {
            return Err(invalid(
                "schema.reference_event",
                "must differ from schema.descriptor_event".to_owned(),
            ));
        }

        for (i, interned) in self.schema.interned.iter().enumerate() {
            if interned.event.is_empty() || interned.list.is_empty() || interned.field.is_empty()
            {
                return Err(invalid(
                    &format!("schema.interned[{}]", i),
                    "event, list and field must not be empty".to_owned(),
                ));
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: String) -> TlviewError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason,
    }
    .into()
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
    /// 데이터 디렉토리 (영속 blob 저장 위치)
    pub data_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_owned(),
            log_format: "pretty".to_owned(),
            data_dir: ".tlview".to_owned(),
        }
    }
}

/// 입력 소스 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// HTTP 요청 타임아웃 (초)
    pub http_timeout_secs: u64,
    /// 최대 입력 크기 (바이트)
    pub max_input_bytes: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: 30,
            max_input_bytes: 256 * 1024 * 1024, // 256MB
        }
    }
}

/// 디코더 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// true면 잘못된 라인이 하나라도 있으면 로드 전체를 중단합니다.
    pub strict: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self { strict: true }
    }
}

/// 영속 저장소 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// blob 키 (data_dir 아래 파일명)
    pub key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            key: "tlparse-jsonl-data".to_owned(),
        }
    }
}

/// 이벤트 스키마 설정
///
/// 도메인 이벤트의 이름과 역할을 지정합니다. 기본값은 `torch._dynamo`
/// 구조화 트레이스 로그의 이벤트 이름입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// 첫 레코드의 문자열 테이블 필드명
    pub string_table_field: String,
    /// 디스크립터 이벤트명
    pub descriptor_event: String,
    /// 참조 이벤트명
    pub reference_event: String,
    /// 상관 키 필드명
    pub correlation_field: String,
    /// 조인 시 디스크립터에서 제외할 식별 필드
    pub identity_fields: Vec<String>,
    /// 인터닝된 문자열을 담는 필드 목록
    pub interned: Vec<InternedFieldConfig>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            string_table_field: "string_table".to_owned(),
            descriptor_event: "describe_tensor".to_owned(),
            reference_event: "describe_source".to_owned(),
            correlation_field: "describer_id".to_owned(),
            identity_fields: vec!["id".to_owned(), "describer_id".to_owned()],
            interned: vec![InternedFieldConfig::default()],
        }
    }
}

/// 인터닝 필드 위치: `<event>.<list>[*].<field>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InternedFieldConfig {
    /// 이벤트명
    pub event: String,
    /// 이벤트 페이로드 안의 배열 필드명
    pub list: String,
    /// 배열 원소 안의 인터닝 필드명
    pub field: String,
}

impl Default for InternedFieldConfig {
    fn default() -> Self {
        Self {
            event: "dynamo_start".to_owned(),
            list: "stack".to_owned(),
            field: "filename".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_has_sane_values() {
        let config = TlviewConfig::default();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.general.log_format, "pretty");
        assert!(config.decode.strict);
        assert!(config.store.enabled);
        assert_eq!(config.store.key, "tlparse-jsonl-data");
        assert_eq!(config.schema.descriptor_event, "describe_tensor");
        assert_eq!(config.schema.reference_event, "describe_source");
        assert_eq!(config.schema.interned.len(), 1);
    }

    #[test]
    fn default_config_passes_validation() {
        TlviewConfig::default().validate().unwrap();
    }

    #[test]
    fn from_str_empty_toml_uses_defaults() {
        let config = TlviewConfig::parse("").unwrap();
        assert_eq!(config.source.http_timeout_secs, 30);
        assert_eq!(config.schema.correlation_field, "describer_id");
    }

    #[test]
    fn from_str_partial_toml_merges_with_defaults() {
        let toml = r#"
[decode]
strict = false

[schema]
descriptor_event = "describe_storage"
"#;
        let config = TlviewConfig::parse(toml).unwrap();
        assert!(!config.decode.strict);
        assert_eq!(config.schema.descriptor_event, "describe_storage");
        // 지정하지 않은 필드는 기본값 유지
        assert_eq!(config.schema.reference_event, "describe_source");
        assert_eq!(config.general.log_format, "pretty");
    }

    #[test]
    fn from_str_interned_array_of_tables() {
        let toml = r#"
[[schema.interned]]
event = "dynamo_start"
list = "stack"
field = "filename"

[[schema.interned]]
event = "inductor_output_code"
list = "frames"
field = "file"
"#;
        let config = TlviewConfig::parse(toml).unwrap();
        assert_eq!(config.schema.interned.len(), 2);
        assert_eq!(config.schema.interned[1].field, "file");
    }

    #[test]
    fn from_str_invalid_toml_returns_error() {
        let err = TlviewConfig::parse("invalid = [[[toml").unwrap_err();
        assert!(matches!(
            err,
            TlviewError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = TlviewConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = TlviewConfig::default();
        config.source.http_timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http_timeout_secs"));
    }

    #[test]
    fn validate_rejects_store_key_with_path() {
        let mut config = TlviewConfig::default();
        config.store.key = "../escape".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("store.key"));
    }

    #[test]
    fn validate_accepts_empty_key_when_store_disabled() {
        let mut config = TlviewConfig::default();
        config.store.enabled = false;
        config.store.key = String::new();
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_same_descriptor_and_reference() {
        let mut config = TlviewConfig::default();
        config.schema.reference_event = config.schema.descriptor_event.clone();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("reference_event"));
    }

    #[test]
    fn validate_rejects_incomplete_interned_entry() {
        let mut config = TlviewConfig::default();
        config.schema.interned.push(InternedFieldConfig {
            event: "x".to_owned(),
            list: String::new(),
            field: "f".to_owned(),
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("schema.interned[1]"));
    }

    #[test]
    #[serial]
    fn env_override_bool_and_csv() {
        let mut config = TlviewConfig::default();
        // SAFETY: #[serial]로 환경변수를 다루는 테스트를 직렬화합니다.
        unsafe {
            std::env::set_var("TLVIEW_DECODE_STRICT", "false");
            std::env::set_var("TLVIEW_SCHEMA_IDENTITY_FIELDS", "id, describer_id, storage");
        }
        config.apply_env_overrides();
        assert!(!config.decode.strict);
        assert_eq!(
            config.schema.identity_fields,
            vec!["id", "describer_id", "storage"]
        );
        unsafe {
            std::env::remove_var("TLVIEW_DECODE_STRICT");
            std::env::remove_var("TLVIEW_SCHEMA_IDENTITY_FIELDS");
        }
    }

    #[test]
    #[serial]
    fn env_override_invalid_number_keeps_original() {
        let mut val = 30u64;
        // SAFETY: #[serial]로 환경변수를 다루는 테스트를 직렬화합니다.
        unsafe { std::env::set_var("TEST_TLVIEW_U64_BAD", "soon") };
        override_u64(&mut val, "TEST_TLVIEW_U64_BAD");
        assert_eq!(val, 30);
        unsafe { std::env::remove_var("TEST_TLVIEW_U64_BAD") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_TLVIEW_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = TlviewConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = TlviewConfig::parse(&toml_str).unwrap();
        assert_eq!(config.store.key, parsed.store.key);
        assert_eq!(config.schema.interned, parsed.schema.interned);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let err = TlviewConfig::from_file("/nonexistent/path/tlview.toml")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TlviewError::Config(ConfigError::FileNotFound { .. })
        ));
    }

    #[tokio::test]
    #[serial]
    async fn load_or_default_without_file_uses_defaults() {
        let config = TlviewConfig::load_or_default("/nonexistent/path/tlview.toml")
            .await
            .unwrap();
        assert_eq!(config.store.key, "tlparse-jsonl-data");
    }

    #[tokio::test]
    async fn load_or_default_propagates_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tlview.toml");
        tokio::fs::write(&path, "[general\nlog_level = 1").await.unwrap();
        assert!(TlviewConfig::load_or_default(&path).await.is_err());
    }
}
