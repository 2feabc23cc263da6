use std::future::Future;
use std::io;
use std::path::PathBuf;

use chunkfetch_fs::ScratchDir;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufWriter};

/// Per-chunk temporary storage.
///
/// Every chunk gets its own entry: the fetcher [`allocate`]s a writer,
/// streams the body into it and [`seal`]s it into a handle; the assembler
/// later [`open`]s the handle to read the bytes back. An entry is written by
/// exactly one task and read by exactly one reader.
///
/// [`allocate`]: TemporaryStore::allocate
/// [`seal`]: TemporaryStore::seal
/// [`open`]: TemporaryStore::open
pub trait TemporaryStore: Send + Sync + 'static {
    type Writer: AsyncWrite + Unpin + Send + 'static;
    type Handle: Send + Sync + 'static;
    type Reader: AsyncRead + Unpin + Send;

    fn allocate(&self, index: u32) -> impl Future<Output = io::Result<Self::Writer>> + Send;

    fn seal(
        &self,
        index: u32,
        writer: Self::Writer,
    ) -> impl Future<Output = io::Result<Self::Handle>> + Send;

    fn open(&self, handle: &Self::Handle) -> impl Future<Output = io::Result<Self::Reader>> + Send;
}

/// Chunk parts stored as files in a [`ScratchDir`].
///
/// Parts are named `<session>.<index>.part`, where the session id is unique
/// per store, so concurrent downloads can share one scratch directory.
/// Parts are left on disk after assembly.
#[derive(Debug, Clone)]
pub struct DiskStore {
    scratch: ScratchDir,
    session: String,
}

/// A sealed chunk part on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskPart {
    pub index: u32,
    pub path:  PathBuf,
}

impl DiskStore {
    pub fn new(scratch: ScratchDir) -> Self {
        Self {
            scratch,
            session: uuid::Uuid::new_v4().simple().to_string(),
        }
    }

    pub fn part_path(&self, index: u32) -> PathBuf {
        self.scratch
            .entry(&format!("{}.{index}.part", self.session))
    }
}

impl TemporaryStore for DiskStore {
    type Writer = BufWriter<File>;
    type Handle = DiskPart;
    type Reader = File;

    async fn allocate(&self, index: u32) -> io::Result<Self::Writer> {
        let file = File::create(self.part_path(index)).await?;
        Ok(BufWriter::new(file))
    }

    async fn seal(&self, index: u32, mut writer: Self::Writer) -> io::Result<Self::Handle> {
        writer.flush().await?;
        writer.into_inner().sync_all().await?;
        Ok(DiskPart {
            index,
            path: self.part_path(index),
        })
    }

    async fn open(&self, handle: &Self::Handle) -> io::Result<Self::Reader> { File::open(&handle.path).await }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_disk_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = DiskStore::new(ScratchDir::new(dir.path()).unwrap());

        let mut writer = store.allocate(3).await.unwrap();
        writer.write_all(b"hello ").await.unwrap();
        writer.write_all(b"chunk").await.unwrap();
        let part = store.seal(3, writer).await.unwrap();

        assert_eq!(part.index, 3);
        assert!(part.path.starts_with(dir.path()));

        let mut buf = Vec::new();
        store.open(&part).await.unwrap().read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"hello chunk");
    }

    #[tokio::test]
    async fn test_stores_do_not_share_part_names() {
        let dir = tempdir().unwrap();
        let scratch = ScratchDir::new(dir.path()).unwrap();
        let a = DiskStore::new(scratch.clone());
        let b = DiskStore::new(scratch);
        assert_ne!(a.part_path(0), b.part_path(0));
    }

    #[tokio::test]
    async fn test_open_missing_part_fails() {
        let dir = tempdir().unwrap();
        let store = DiskStore::new(ScratchDir::new(dir.path()).unwrap());
        let part = DiskPart {
            index: 0,
            path:  store.part_path(0),
        };
        assert!(store.open(&part).await.is_err());
    }
}
