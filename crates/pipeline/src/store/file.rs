//! 파일 기반 blob 저장소
//!
//! 저장은 같은 디렉토리의 임시 파일에 쓴 뒤 rename 하므로, 중간에 실패해도
//! 기존 blob이 반쯤 덮어써진 상태로 남지 않습니다.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::debug;

use tlview_core::error::{StoreError, TlviewError};
use tlview_core::pipeline::BlobStore;

use crate::config::PipelineConfig;

/// 파일 기반 blob 저장소
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    path: PathBuf,
}

impl FileBlobStore {
    /// blob 파일 경로로 저장소를 생성합니다.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 설정의 `<data_dir>/<store_key>` 경로로 저장소를 생성합니다.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.store_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn backend(action: &str, path: &Path, err: std::io::Error) -> TlviewError {
    StoreError::Backend(format!("{} {}: {}", action, path.display(), err)).into()
}

impl BlobStore for FileBlobStore {
    async fn load(&self) -> Result<Option<Bytes>, TlviewError> {
        match tokio::fs::read(&self.path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(backend("read", &self.path, e)),
        }
    }

    async fn save(&self, blob: &[u8]) -> Result<(), TlviewError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| backend("create", parent, e))?;
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, blob)
            .await
            .map_err(|e| backend("write", &tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| backend("rename", &self.path, e))?;

        debug!(path = %self.path.display(), bytes = blob.len(), "blob saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), TlviewError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(backend("remove", &self.path, e)),
        }
    }
}
