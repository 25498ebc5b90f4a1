//! 도메인 타입 -- 트레이스 레코드와 필터 선택값
//!
//! [`RawRecord`]는 입력 한 줄을 그대로 담은 불변 매핑이고,
//! [`ProcessedRecord`]는 인터닝 해제와 상관 조인을 거친 사본입니다.
//! 두 타입 모두 원본 라인의 필드 순서를 유지합니다.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// 프레임 ID 필드
pub const FRAME_ID: &str = "frame_id";
/// 프레임 컴파일 ID 필드
pub const FRAME_COMPILE_ID: &str = "frame_compile_id";
/// 재시도 횟수 필드
pub const ATTEMPT: &str = "attempt";

/// 모든 레코드에 공통으로 붙는 관리(bookkeeping) 필드
pub const BOOKKEEPING_FIELDS: [&str; 6] = [
    FRAME_COMPILE_ID,
    FRAME_ID,
    ATTEMPT,
    "rank",
    "process",
    "thread",
];

/// 기본 화면에서 숨기는 진단용 필드
pub const HIDDEN_FIELDS: [&str; 8] = [
    "timestamp",
    "pathname",
    "lineno",
    "has_payload",
    "payload_filename",
    "rank",
    "process",
    "thread",
];

/// 필드 이름이 관리 필드이거나 숨김 필드인지 확인합니다.
pub fn is_reserved_field(name: &str) -> bool {
    BOOKKEEPING_FIELDS.contains(&name) || HIDDEN_FIELDS.contains(&name)
}

/// 입력 한 줄에 해당하는 원시 레코드
///
/// 생성 이후 변경되지 않습니다. 처리 단계는 항상 사본을 만듭니다.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// 원본 텍스트의 라인 번호 (1부터 시작)
    line: usize,
    /// 필드 매핑 (원본 순서 유지)
    fields: Map<String, Value>,
}

impl RawRecord {
    /// 새 원시 레코드를 생성합니다.
    pub fn new(line: usize, fields: Map<String, Value>) -> Self {
        Self { line, fields }
    }

    /// 원본 라인 번호를 반환합니다.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 필드 매핑을 반환합니다.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// 필드 값을 조회합니다.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// 처리된 레코드
///
/// 인터닝이 해제되고 상관 필드가 병합된 필드 매핑과 함께,
/// 생성 시점에 한 번 판별한 이벤트 키와 프레임 식별자를 보관합니다.
/// 원시 레코드에 대한 참조는 갖지 않습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedRecord {
    fields: Map<String, Value>,
    event_key: Option<String>,
    frame: String,
}

impl ProcessedRecord {
    /// 필드 매핑과 판별 결과로 레코드를 생성합니다.
    pub fn new(fields: Map<String, Value>, event_key: Option<String>, frame: String) -> Self {
        Self {
            fields,
            event_key,
            frame,
        }
    }

    /// 필드 매핑을 반환합니다.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// 필드 값을 조회합니다.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// 이벤트 키를 반환합니다. 이벤트 필드가 없으면 `None`.
    pub fn event_key(&self) -> Option<&str> {
        self.event_key.as_deref()
    }

    /// 이벤트 키 필드의 값(페이로드)을 반환합니다.
    pub fn event_payload(&self) -> Option<&Value> {
        self.event_key.as_deref().and_then(|key| self.fields.get(key))
    }

    /// 프레임 식별자를 반환합니다.
    pub fn frame(&self) -> &str {
        &self.frame
    }

    /// 필드 매핑의 소유권을 넘깁니다.
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

impl Serialize for ProcessedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// 필터 선택값
///
/// 문자열 표현은 `"all"`이 [`Selection::All`]에, 그 외 값은 [`Selection::Only`]에 대응합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    /// 전체 선택 (필터 없음)
    #[default]
    All,
    /// 특정 값만 선택
    Only(String),
}

impl Selection {
    /// 전체 선택을 나타내는 문자열
    pub const ALL: &'static str = "all";

    /// 특정 값 선택을 생성합니다.
    pub fn only(value: impl Into<String>) -> Self {
        Self::Only(value.into())
    }

    /// 전체 선택인지 확인합니다.
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// 값이 선택 조건을 만족하는지 확인합니다.
    ///
    /// `All`은 값이 없는 경우를 포함해 모두 통과시킵니다.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => value == Some(selected.as_str()),
        }
    }

    /// 문자열 표현을 반환합니다.
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => Self::ALL,
            Self::Only(value) => value,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        if value == Self::ALL {
            Self::All
        } else {
            Self::Only(value)
        }
    }
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<Selection> for String {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::All => Selection::ALL.to_owned(),
            Selection::Only(value) => value,
        }
    }
}

impl FromStr for Selection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}
