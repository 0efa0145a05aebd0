// Cache store for the per-user LOC cache file.
// Handles header preservation, lenient record parsing, atomic rewrites, and run locking.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt;
use tracing::{debug, warn};

use crate::error::Result;

use super::paths;
use super::record::CacheRecord;

/// Header line written when a cache file is first created.
pub const PLACEHOLDER_COMMENT: &str =
    "This line is a comment block. Write whatever you want here.";

/// In-memory form of a cache file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheFile {
    /// Opaque leading lines, preserved verbatim.
    pub header: Vec<String>,
    /// One record per repository.
    pub records: Vec<CacheRecord>,
}

impl CacheFile {
    /// A file with placeholder header lines and no records.
    pub fn empty(comment_size: usize) -> Self {
        Self {
            header: vec![PLACEHOLDER_COMMENT.to_string(); comment_size],
            records: Vec::new(),
        }
    }

    /// Parse file contents. Lines after the header that fail to parse
    /// become zeroed records so they are recomputed instead of aborting.
    pub fn parse(text: &str, comment_size: usize) -> Self {
        let mut lines = text.lines();

        let mut header: Vec<String> = lines
            .by_ref()
            .take(comment_size)
            .map(str::to_string)
            .collect();
        header.resize(comment_size, PLACEHOLDER_COMMENT.to_string());

        let records = lines
            .enumerate()
            .map(|(index, line)| match line.parse::<CacheRecord>() {
                Ok(record) => record,
                Err(err) => {
                    warn!(line = comment_size + index + 1, %err, "resetting malformed cache record");
                    CacheRecord::parse_lenient(line)
                }
            })
            .collect();

        Self { header, records }
    }

    /// Serialize back to the line-oriented text format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.header {
            out.push_str(line);
            out.push('\n');
        }
        for record in &self.records {
            out.push_str(&record.to_string());
            out.push('\n');
        }
        out
    }
}

/// Whether a loaded file holds the record count a run expects.
///
/// The header is already normalized by [`CacheFile::parse`], and hashes are
/// matched per record by the reconciler.
pub fn validate_shape(file: &CacheFile, expected_records: usize) -> bool {
    file.records.len() == expected_records
}

/// Exclusive lock over a cache file, released when dropped.
#[derive(Debug)]
pub struct CacheLock {
    _file: File,
}

/// Reads and writes one user's cache file.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
    comment_size: usize,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>, comment_size: usize) -> Self {
        Self {
            path: path.into(),
            comment_size,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cache file, or `None` if it does not exist.
    pub fn load(&self) -> Result<Option<CacheFile>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        Ok(Some(CacheFile::parse(&contents, self.comment_size)))
    }

    /// Load the cache file, creating an empty one first if absent.
    pub fn load_or_create(&self) -> Result<CacheFile> {
        if let Some(file) = self.load()? {
            return Ok(file);
        }

        debug!(path = %self.path.display(), "creating empty cache file");
        let file = CacheFile::empty(self.comment_size);
        self.write(&file)?;
        Ok(file)
    }

    /// Rewrite the whole file.
    pub fn write(&self, file: &CacheFile) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically via temp file so the header survives a crash mid-write
        let temp_path = self.path.with_extension("tmp");
        let mut out = File::create(&temp_path)?;
        out.write_all(file.render().as_bytes())?;
        out.sync_all()?;
        fs::rename(&temp_path, &self.path)?;

        debug!(
            path = %self.path.display(),
            records = file.records.len(),
            "wrote cache file"
        );
        Ok(())
    }

    /// Take the run lock, waiting for any other holder to finish.
    pub fn lock(&self) -> Result<CacheLock> {
        let lock_path = paths::lock_path(&self.path);
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        file.lock_exclusive()?;

        Ok(CacheLock { _file: file })
    }
}
