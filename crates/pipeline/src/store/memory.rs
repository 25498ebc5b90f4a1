//! 메모리 blob 저장소

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;

use tlview_core::error::{StoreError, TlviewError};
use tlview_core::pipeline::BlobStore;

/// 메모리 blob 저장소
///
/// 저장 횟수를 기록하므로 "복원 경로는 다시 저장하지 않는다" 같은 동작을 검증할 수 있습니다.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blob: Mutex<Option<Bytes>>,
    saves: AtomicUsize,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 초기 blob을 가진 저장소
    pub fn with_blob(blob: impl Into<Bytes>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
            saves: AtomicUsize::new(0),
        }
    }

    /// 지금까지의 `save` 호출 횟수
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// 현재 blob 사본
    pub fn snapshot(&self) -> Option<Bytes> {
        self.blob.lock().ok().and_then(|guard| guard.clone())
    }

    fn poisoned() -> TlviewError {
        StoreError::Backend("memory store lock poisoned".to_owned()).into()
    }
}

impl BlobStore for MemoryBlobStore {
    async fn load(&self) -> Result<Option<Bytes>, TlviewError> {
        let guard = self.blob.lock().map_err(|_| Self::poisoned())?;
        Ok(guard.clone())
    }

    async fn save(&self, blob: &[u8]) -> Result<(), TlviewError> {
        let mut guard = self.blob.lock().map_err(|_| Self::poisoned())?;
        *guard = Some(Bytes::copy_from_slice(blob));
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn clear(&self) -> Result<(), TlviewError> {
        let mut guard = self.blob.lock().map_err(|_| Self::poisoned())?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_saves() {
        let store = MemoryBlobStore::new();
        assert!(store.load().await.unwrap().is_none());
        store.save(b"x").await.unwrap();
        store.save(b"y").await.unwrap();
        assert_eq!(store.save_count(), 2);
        assert_eq!(store.snapshot(), Some(Bytes::from_static(b"y")));
        store.clear().await.unwrap();
        assert!(store.snapshot().is_none());
    }
}
