//! 로컬 파일 소스

use std::path::{Path, PathBuf};

use tlview_core::error::TlviewError;
use tlview_core::pipeline::ByteSource;

use super::{check_size, into_text, unavailable};

/// 로컬 파일 소스
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    max_bytes: usize,
}

impl FileSource {
    /// 새 파일 소스를 생성합니다.
    pub fn new(path: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            path: path.into(),
            max_bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn kind(&self) -> &'static str {
        "file"
    }

    async fn read_text(&self) -> Result<String, TlviewError> {
        let name = self.describe();

        // 읽기 전에 메타데이터로 크기를 먼저 확인
        let metadata = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| unavailable(&name, e))?;
        if !metadata.is_file() {
            return Err(unavailable(&name, "not a regular file"));
        }
        check_size(usize::try_from(metadata.len()).unwrap_or(usize::MAX), self.max_bytes)?;

        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| unavailable(&name, e))?;
        into_text(bytes, &name, self.max_bytes)
    }
}
