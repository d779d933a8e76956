//! The shared mailbox file and its scoped views.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use filebox_core::{Record, RecordState, Seq};

use crate::codec::{decode_contents, encode_record};
use crate::error::{MailboxError, MailboxResult};

/// Handle to the mailbox file shared by one client and one server.
///
/// The handle only remembers the path. Every operation opens its own
/// descriptor, so a handle can be cloned freely and handed to both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    path: PathBuf,
}

impl Mailbox {
    /// Creates a handle for the mailbox at `path`. Nothing is opened yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the mailbox path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Checks if the mailbox file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Creates the mailbox if needed and seeds an empty file with the sentinel record.
    ///
    /// The emptiness check and the sentinel write happen under the exclusive
    /// lock, so racing initializers write the sentinel at most once and an
    /// existing record is never replaced.
    pub fn initialize(&self) -> MailboxResult<()> {
        let file = open_options_create()
            .open(&self.path)
            .map_err(|e| MailboxError::access(&self.path, e))?;
        let mut locked = LockedMailbox::acquire(file, &self.path)?;

        if locked.is_empty()? {
            locked.write_record(&Record::sentinel())?;
            debug!(path = %self.path.display(), "Seeded mailbox with sentinel record");
        }

        debug!(path = %self.path.display(), "Mailbox initialized");
        Ok(())
    }

    /// Opens a read-only view without taking the lock.
    ///
    /// The view may observe a record that is being rewritten; callers must
    /// tolerate parse failures and stale sequence numbers.
    pub fn open_read(&self) -> MailboxResult<MailboxReader> {
        let file = File::open(&self.path).map_err(|e| MailboxError::open(&self.path, e))?;
        Ok(MailboxReader {
            file,
            path: self.path.clone(),
        })
    }

    /// Opens the mailbox for reading and writing and takes the exclusive lock.
    ///
    /// The lock and the descriptor are released when the returned guard is
    /// dropped, on every exit path.
    pub fn open_read_write_locked(&self) -> MailboxResult<LockedMailbox> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| MailboxError::open(&self.path, e))?;
        LockedMailbox::acquire(file, &self.path)
    }

    /// Reads the current record through an unlocked view.
    pub fn snapshot(&self) -> MailboxResult<Record> {
        self.open_read()?.read()
    }
}

#[cfg(unix)]
fn open_options_create() -> OpenOptions {
    use std::os::unix::fs::OpenOptionsExt;

    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true).mode(0o666);
    options
}

#[cfg(not(unix))]
fn open_options_create() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true);
    options
}

/// Unlocked read-only view of the mailbox.
#[derive(Debug)]
pub struct MailboxReader {
    file: File,
    path: PathBuf,
}

impl MailboxReader {
    /// Reads and parses the first line of the file.
    pub fn read(&mut self) -> MailboxResult<Record> {
        read_record(&mut self.file, &self.path)
    }
}

/// Read-write view holding the exclusive advisory lock.
///
/// Dropping the guard unlocks and closes the descriptor. If the process
/// dies instead, the kernel releases the lock together with the descriptor.
#[derive(Debug)]
pub struct LockedMailbox {
    file: File,
    path: PathBuf,
}

impl LockedMailbox {
    fn acquire(file: File, path: &Path) -> MailboxResult<Self> {
        flock(&file, LockOp::Exclusive).map_err(|e| MailboxError::access(path, e))?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Reads and parses the first line of the file.
    pub fn read(&mut self) -> MailboxResult<Record> {
        read_record(&mut self.file, &self.path)
    }

    /// Replaces the file content with a single record.
    ///
    /// The file is truncated, rewritten and synced to stable storage before
    /// this returns.
    pub fn write(&mut self, state: RecordState, seq: Seq, payload: &str) -> MailboxResult<()> {
        self.write_record(&Record::new(state, seq, payload))
    }

    /// Same as [`write`](Self::write) for an already built record.
    pub fn write_record(&mut self, record: &Record) -> MailboxResult<()> {
        if record.payload.contains(['\n', '\r']) {
            return Err(MailboxError::InvalidPayload);
        }

        let line = encode_record(record);
        rewrite(&mut self.file, line.as_bytes())
            .map_err(|e| MailboxError::access(&self.path, e))?;

        debug!(
            path = %self.path.display(),
            record = %line.trim_end(),
            "Wrote mailbox record"
        );
        Ok(())
    }

    fn is_empty(&self) -> MailboxResult<bool> {
        let metadata = self
            .file
            .metadata()
            .map_err(|e| MailboxError::access(&self.path, e))?;
        Ok(metadata.len() == 0)
    }
}

impl Drop for LockedMailbox {
    fn drop(&mut self) {
        if let Err(e) = flock(&self.file, LockOp::Unlock) {
            debug!(
                path = %self.path.display(),
                error = %e,
                "Failed to release mailbox lock; closing the descriptor releases it"
            );
        }
    }
}

fn rewrite(file: &mut File, bytes: &[u8]) -> std::io::Result<()> {
    file.seek(SeekFrom::Start(0))?;
    file.set_len(0)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.sync_all()
}

fn read_record(file: &mut File, path: &Path) -> MailboxResult<Record> {
    let mut data = Vec::new();
    file.seek(SeekFrom::Start(0))
        .and_then(|_| file.read_to_end(&mut data))
        .map_err(|e| MailboxError::access(path, e))?;
    decode_contents(&data)
}

#[derive(Debug, Clone, Copy)]
enum LockOp {
    Exclusive,
    Unlock,
}

/// Applies `flock(2)` to the file, retrying when interrupted by a signal.
#[cfg(unix)]
fn flock(file: &File, op: LockOp) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;

    let operation = match op {
        LockOp::Exclusive => libc::LOCK_EX,
        LockOp::Unlock => libc::LOCK_UN,
    };

    loop {
        // SAFETY: the descriptor is owned by `file` and stays open for the call.
        let rc = unsafe { libc::flock(file.as_raw_fd(), operation) };
        if rc == 0 {
            return Ok(());
        }
        let err = std::io::Error::last_os_error();
        if err.kind() != std::io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

#[cfg(not(unix))]
fn flock(file: &File, op: LockOp) -> std::io::Result<()> {
    match op {
        LockOp::Exclusive => file.lock(),
        LockOp::Unlock => file.unlock(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    use crate::ParseError;

    #[test]
    fn initialize_creates_sentinel() {
        let dir = tempdir().unwrap();
        let mailbox = Mailbox::new(dir.path().join("mailbox"));

        mailbox.initialize().unwrap();

        assert_eq!(fs::read_to_string(mailbox.path()).unwrap(), "0;0;\n");
        assert_eq!(mailbox.snapshot().unwrap(), Record::sentinel());
    }

    #[test]
    fn initialize_is_idempotent() {
        let dir = tempdir().unwrap();
        let mailbox = Mailbox::new(dir.path().join("mailbox"));

        mailbox.initialize().unwrap();
        mailbox.initialize().unwrap();

        assert_eq!(fs::read_to_string(mailbox.path()).unwrap(), "0;0;\n");
    }

    #[test]
    fn initialize_keeps_existing_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mailbox");
        fs::write(&path, "0;41;pong\n").unwrap();

        Mailbox::new(&path).initialize().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "0;41;pong\n");
    }

    #[test]
    fn racing_initializers_write_one_record() {
        let dir = tempdir().unwrap();
        let mailbox = Mailbox::new(dir.path().join("mailbox"));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let mailbox = mailbox.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    mailbox.initialize().unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(fs::read_to_string(mailbox.path()).unwrap(), "0;0;\n");
    }

    #[test]
    fn initialize_fails_without_parent_dir() {
        let dir = tempdir().unwrap();
        let mailbox = Mailbox::new(dir.path().join("missing").join("mailbox"));

        assert!(matches!(
            mailbox.initialize(),
            Err(MailboxError::Access { .. })
        ));
    }

    #[test]
    fn open_missing_file_reports_file_missing() {
        let dir = tempdir().unwrap();
        let mailbox = Mailbox::new(dir.path().join("mailbox"));

        assert!(matches!(
            mailbox.open_read(),
            Err(MailboxError::FileMissing { .. })
        ));
        assert!(matches!(
            mailbox.open_read_write_locked(),
            Err(MailboxError::FileMissing { .. })
        ));
    }

    #[test]
    fn write_replaces_previous_content() {
        let dir = tempdir().unwrap();
        let mailbox = Mailbox::new(dir.path().join("mailbox"));
        fs::write(mailbox.path(), "1;1;a much longer payload than the next one\n").unwrap();

        {
            let mut locked = mailbox.open_read_write_locked().unwrap();
            locked.write(RecordState::Response, 1, "pong").unwrap();
        }

        assert_eq!(fs::read_to_string(mailbox.path()).unwrap(), "0;1;pong\n");
    }

    #[test]
    fn write_rejects_multiline_payload() {
        let dir = tempdir().unwrap();
        let mailbox = Mailbox::new(dir.path().join("mailbox"));
        mailbox.initialize().unwrap();

        let mut locked = mailbox.open_read_write_locked().unwrap();
        let result = locked.write(RecordState::Request, 1, "two\nlines");

        assert!(matches!(result, Err(MailboxError::InvalidPayload)));
        drop(locked);
        assert_eq!(mailbox.snapshot().unwrap(), Record::sentinel());
    }

    #[test]
    fn read_reports_empty_and_malformed() {
        let dir = tempdir().unwrap();
        let mailbox = Mailbox::new(dir.path().join("mailbox"));

        fs::write(mailbox.path(), "").unwrap();
        assert!(matches!(mailbox.snapshot(), Err(MailboxError::EmptyFile)));

        fs::write(mailbox.path(), "1;x;ping\n").unwrap();
        assert!(matches!(
            mailbox.snapshot(),
            Err(MailboxError::Malformed(ParseError::BadSeq))
        ));
    }

    #[test]
    fn locked_view_reads_what_it_wrote() {
        let dir = tempdir().unwrap();
        let mailbox = Mailbox::new(dir.path().join("mailbox"));
        mailbox.initialize().unwrap();

        let mut locked = mailbox.open_read_write_locked().unwrap();
        locked.write_record(&Record::request(1, "ping;now")).unwrap();
        assert_eq!(locked.read().unwrap(), Record::request(1, "ping;now"));
    }

    #[test]
    fn lock_is_exclusive_until_guard_drops() {
        let dir = tempdir().unwrap();
        let mailbox = Mailbox::new(dir.path().join("mailbox"));
        mailbox.initialize().unwrap();

        let guard = mailbox.open_read_write_locked().unwrap();
        let contender = mailbox.clone();
        let started = Instant::now();
        let handle = thread::spawn(move || {
            let _locked = contender.open_read_write_locked().unwrap();
            started.elapsed()
        });

        thread::sleep(Duration::from_millis(200));
        drop(guard);

        let waited = handle.join().unwrap();
        assert!(waited >= Duration::from_millis(150), "waited {waited:?}");
    }

    #[test]
    fn unlocked_reader_does_not_block_on_lock() {
        let dir = tempdir().unwrap();
        let mailbox = Mailbox::new(dir.path().join("mailbox"));
        mailbox.initialize().unwrap();

        let _guard = mailbox.open_read_write_locked().unwrap();
        let started = Instant::now();
        assert_eq!(mailbox.snapshot().unwrap(), Record::sentinel());
        assert!(started.elapsed() < Duration::from_millis(100));
    }
}
