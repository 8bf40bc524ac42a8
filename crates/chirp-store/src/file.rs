use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chirp_types::{Tweet, TweetId};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::TweetStore;

/// Snapshot file magic.
const MAGIC: [u8; 4] = *b"CHRP";
/// Snapshot format version.
const VERSION: u32 = 1;
/// Header size: 4 bytes magic + 4 bytes version + 4 bytes CRC.
const HEADER_SIZE: usize = 12;

/// File-backed tweet store.
///
/// The whole map is held in memory and rewritten to disk after every
/// mutation. The rewrite goes to a temporary file in the same directory which
/// is then renamed over the snapshot, so a crash leaves either the old or the
/// new snapshot on disk.
///
/// On-disk format:
/// ```text
/// [4 bytes: magic "CHRP"]
/// [4 bytes: format version (little-endian u32)]
/// [4 bytes: CRC32 of payload (little-endian u32)]
/// [N bytes: payload (bincode-serialized Vec<Tweet>, ascending by id)]
/// ```
pub struct FileTweetStore {
    path: PathBuf,
    tweets: RwLock<BTreeMap<TweetId, Tweet>>,
}

impl FileTweetStore {
    /// Open the snapshot at `path`, or start empty if it does not exist.
    ///
    /// Nothing touches the disk until the first mutation, which also creates
    /// any missing parent directories.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let tweets = match fs::read(&path) {
            Ok(bytes) => decode_snapshot(&path, &bytes)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), tweets = tweets.len(), "opened tweet snapshot");

        Ok(Self {
            path,
            tweets: RwLock::new(tweets),
        })
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, tweets: &BTreeMap<TweetId, Tweet>) -> StoreResult<()> {
        let bytes = encode_snapshot(tweets)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "wrote tweet snapshot");
        Ok(())
    }
}

impl TweetStore for FileTweetStore {
    fn get(&self, id: &TweetId) -> StoreResult<Option<Tweet>> {
        Ok(self.tweets.read()?.get(id).cloned())
    }

    fn list(&self) -> StoreResult<Vec<Tweet>> {
        Ok(self.tweets.read()?.values().cloned().collect())
    }

    fn put(&self, tweet: &Tweet) -> StoreResult<()> {
        let mut tweets = self.tweets.write()?;
        let previous = tweets.insert(tweet.id.clone(), tweet.clone());
        if let Err(e) = self.persist(&tweets) {
            // Roll back so memory keeps matching the file.
            match previous {
                Some(old) => tweets.insert(old.id.clone(), old),
                None => tweets.remove(&tweet.id),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, id: &TweetId) -> StoreResult<Option<Tweet>> {
        let mut tweets = self.tweets.write()?;
        let Some(removed) = tweets.remove(id) else {
            return Ok(None);
        };
        if let Err(e) = self.persist(&tweets) {
            tweets.insert(removed.id.clone(), removed);
            return Err(e);
        }
        Ok(Some(removed))
    }

    fn contains(&self, id: &TweetId) -> StoreResult<bool> {
        Ok(self.tweets.read()?.contains_key(id))
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.tweets.read()?.len())
    }
}

impl std::fmt::Debug for FileTweetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.tweets.read().map(|m| m.len()).unwrap_or(0);
        f.debug_struct("FileTweetStore")
            .field("path", &self.path)
            .field("tweet_count", &count)
            .finish()
    }
}

fn encode_snapshot(tweets: &BTreeMap<TweetId, Tweet>) -> StoreResult<Vec<u8>> {
    let records: Vec<&Tweet> = tweets.values().collect();
    let payload =
        bincode::serialize(&records).map_err(|e| StoreError::Serialization(e.to_string()))?;
    let crc = crc32fast::hash(&payload);

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.extend_from_slice(&MAGIC);
    buf.extend_from_slice(&VERSION.to_le_bytes());
    buf.extend_from_slice(&crc.to_le_bytes());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

fn decode_snapshot(path: &Path, bytes: &[u8]) -> StoreResult<BTreeMap<TweetId, Tweet>> {
    let corrupt = |reason: String| StoreError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };

    if bytes.len() < HEADER_SIZE {
        return Err(corrupt(format!("truncated header ({} bytes)", bytes.len())));
    }
    let (header, payload) = bytes.split_at(HEADER_SIZE);
    if header[0..4] != MAGIC {
        return Err(corrupt("bad magic".into()));
    }
    let version = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    if version != VERSION {
        return Err(corrupt(format!("unsupported version {version}")));
    }
    let expected_crc = u32::from_le_bytes([header[8], header[9], header[10], header[11]]);
    let computed_crc = crc32fast::hash(payload);
    if expected_crc != computed_crc {
        return Err(corrupt(format!(
            "checksum mismatch: expected {expected_crc:08x}, computed {computed_crc:08x}"
        )));
    }

    let records: Vec<Tweet> =
        bincode::deserialize(payload).map_err(|e| corrupt(e.to_string()))?;
    let mut tweets = BTreeMap::new();
    for tweet in records {
        let id = tweet.id.clone();
        if tweets.insert(id.clone(), tweet).is_some() {
            return Err(corrupt(format!("duplicate tweet id {id}")));
        }
    }
    Ok(tweets)
}
