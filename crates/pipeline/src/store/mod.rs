//! 영속 저장소
//!
//! 마지막으로 로드에 성공한 원본 JSONL 텍스트 하나를 blob으로 보관합니다.
//!
//! - [`FileBlobStore`]: `<data_dir>/<key>` 파일
//! - [`MemoryBlobStore`]: 프로세스 메모리 (테스트용, 저장 횟수 기록)

pub mod file;
pub mod memory;

pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;
