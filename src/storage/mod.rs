mod file;
mod memory;
mod persistence;
mod record;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use persistence::{Persistence, DEFAULT_STORAGE_KEY};
pub use record::{CaseRecord, GiftRecord, SavedState, TransactionRecord};

use std::io;

/// Key-value blob store the economy state is written to.
pub trait Storage {
    /// Blob stored under `key`, or None if nothing has been written yet.
    fn load(&self, key: &str) -> io::Result<Option<String>>;

    /// Write or overwrite the blob under `key`. Readers never observe a
    /// partially written blob.
    fn save(&mut self, key: &str, blob: &str) -> io::Result<()>;
}
