//! On-disk cache for listing API responses.
//!
//! One JSON file per request signature; the file's modification time is
//! the entry's stored-at timestamp. Every I/O failure is absorbed: a read
//! error is a miss and a write error is dropped.

use crate::entities::{RoomQuery, RoomsResponse};
use serde_json::json;
use std::{
    io,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

/// Entries younger than this are served.
pub const TTL: Duration = Duration::from_secs(60);

/// Entries older than this are deleted by [`CacheStore::sweep`].
pub const RETENTION: Duration = Duration::from_secs(300);

/// Chance that a page render triggers a sweep.
pub const SWEEP_PROBABILITY: f64 = 0.01;

/// Deterministic key for the cache-relevant parts of a query.
///
/// The caller's address is never part of it, so every visitor asking for
/// the same filters shares one entry. Tags are bounded to the forwarded
/// five and sorted, so their order does not split entries.
pub fn signature(query: &RoomQuery) -> String {
    let mut tags: Vec<&str> = query.forwarded_tags().iter().map(String::as_str).collect();
    tags.sort_unstable();

    let normalized = json!({
        "limit": query.limit,
        "offset": query.offset,
        "gender": query.gender.map(|g| g.code()),
        "region": query.region.map(|r| r.code()),
        "tags": tags,
        "hd": query.hd,
    });

    sha256::digest(normalized.to_string())
}

#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
    ttl: Duration,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ttl: TTL,
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, signature: &str) -> PathBuf {
        self.dir.join(format!("{signature}.json"))
    }

    /// Returns the stored response if it is younger than the TTL and still
    /// parses.
    pub async fn get(&self, signature: &str) -> Option<RoomsResponse> {
        let path = self.path(signature);
        let modified = fs::metadata(&path).await.ok()?.modified().ok()?;
        if age(modified) >= self.ttl {
            return None;
        }

        let content = fs::read(&path).await.ok()?;
        match serde_json::from_slice(&content) {
            Ok(response) => Some(response),
            Err(err) => {
                debug!("ignoring unreadable cache entry {}: {err}", path.display());
                None
            }
        }
    }

    pub async fn put(&self, signature: &str, response: &RoomsResponse) {
        if let Err(err) = self.try_put(signature, response).await {
            debug!("cache write for {signature} failed: {err}");
        }
    }

    async fn try_put(&self, signature: &str, response: &RoomsResponse) -> io::Result<()> {
        let payload = serde_json::to_vec(response)?;
        fs::create_dir_all(&self.dir).await?;

        // readers only ever see a complete file
        let tmp = self
            .dir
            .join(format!("{signature}.{}.tmp", Uuid::new_v4().simple()));
        if let Err(err) = fs::write(&tmp, &payload).await {
            fs::remove_file(&tmp).await.ok();
            return Err(err);
        }
        if let Err(err) = fs::rename(&tmp, self.path(signature)).await {
            fs::remove_file(&tmp).await.ok();
            return Err(err);
        }
        Ok(())
    }

    /// Deletes entries (and leftover temp files) older than `max_age`.
    /// Returns how many files were removed.
    pub async fn sweep(&self, max_age: Duration) -> usize {
        let Ok(mut entries) = fs::read_dir(&self.dir).await else {
            return 0;
        };

        let mut removed = 0;
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            let is_cache_file = path
                .extension()
                .is_some_and(|ext| ext == "json" || ext == "tmp");
            if !is_cache_file {
                continue;
            }

            let Ok(modified) = entry.metadata().await.and_then(|m| m.modified()) else {
                continue;
            };
            if age(modified) > max_age && fs::remove_file(&path).await.is_ok() {
                removed += 1;
            }
        }

        debug!("cache sweep removed {removed} files");
        removed
    }
}

fn age(modified: SystemTime) -> Duration {
    SystemTime::now()
        .duration_since(modified)
        .unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{tests::room, Gender, Region};
    use std::fs::File;
    use tempfile::TempDir;

    fn create_test_cache() -> (CacheStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = CacheStore::new(temp_dir.path());
        (cache, temp_dir)
    }

    fn response() -> RoomsResponse {
        RoomsResponse {
            count: 100,
            results: vec![room("alice"), room("bob")],
        }
    }

    fn backdate(path: &Path, by: Duration) {
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(SystemTime::now() - by)
            .unwrap();
    }

    #[tokio::test]
    async fn put_then_get_returns_the_payload() {
        let (cache, _temp_dir) = create_test_cache();
        cache.put("sig", &response()).await;

        assert_eq!(cache.get("sig").await, Some(response()));
    }

    #[tokio::test]
    async fn missing_entry_is_a_miss() {
        let (cache, _temp_dir) = create_test_cache();
        assert_eq!(cache.get("nothing").await, None);
    }

    #[tokio::test]
    async fn entry_at_ttl_is_a_miss() {
        let (cache, temp_dir) = create_test_cache();
        cache.put("sig", &response()).await;
        backdate(&temp_dir.path().join("sig.json"), TTL);

        assert_eq!(cache.get("sig").await, None);
    }

    #[tokio::test]
    async fn zero_ttl_never_hits() {
        let (cache, _temp_dir) = create_test_cache();
        let cache = cache.with_ttl(Duration::ZERO);
        cache.put("sig", &response()).await;

        assert_eq!(cache.get("sig").await, None);
    }

    #[tokio::test]
    async fn corrupt_entry_is_a_miss() {
        let (cache, temp_dir) = create_test_cache();
        std::fs::write(temp_dir.path().join("sig.json"), b"{\"count\": 3, \"res").unwrap();

        assert_eq!(cache.get("sig").await, None);
    }

    #[tokio::test]
    async fn put_creates_the_directory_and_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("cache");
        let cache = CacheStore::new(&nested);
        cache.put("sig", &response()).await;

        let names: Vec<_> = std::fs::read_dir(&nested)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, ["sig.json"]);
    }

    #[tokio::test]
    async fn write_failure_is_silent() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        std::fs::write(&blocker, b"").unwrap();
        // the cache directory would have to live under a regular file
        let cache = CacheStore::new(blocker.join("cache"));
        cache.put("sig", &response()).await;

        assert_eq!(cache.get("sig").await, None);
    }

    #[tokio::test]
    async fn sweep_removes_only_old_entries() {
        let (cache, temp_dir) = create_test_cache();
        cache.put("old", &response()).await;
        cache.put("fresh", &response()).await;
        std::fs::write(temp_dir.path().join("old.abc.tmp"), b"{").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), b"keep").unwrap();
        backdate(&temp_dir.path().join("old.json"), Duration::from_secs(600));
        backdate(&temp_dir.path().join("old.abc.tmp"), Duration::from_secs(600));
        backdate(&temp_dir.path().join("notes.txt"), Duration::from_secs(600));

        assert_eq!(cache.sweep(RETENTION).await, 2);
        assert!(!temp_dir.path().join("old.json").exists());
        assert!(temp_dir.path().join("fresh.json").exists());
        assert!(temp_dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn sweep_of_missing_directory_is_a_no_op() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheStore::new(temp_dir.path().join("absent"));
        assert_eq!(cache.sweep(RETENTION).await, 0);
    }

    #[test]
    fn signature_is_stable_and_tag_order_insensitive() {
        let query = RoomQuery {
            gender: Some(Gender::Female),
            region: Some(Region::Asia),
            tags: vec!["milf".into(), "asian".into()],
            ..RoomQuery::first_page(36)
        };
        let reordered = RoomQuery {
            tags: vec!["asian".into(), "milf".into()],
            ..query.clone()
        };

        assert_eq!(signature(&query), signature(&query));
        assert_eq!(signature(&query), signature(&reordered));
        assert_eq!(signature(&query).len(), 64);
    }

    #[test]
    fn signature_ignores_tags_past_the_fifth() {
        let five: Vec<String> = ["a", "b", "c", "d", "e"].map(String::from).to_vec();
        let mut seven = five.clone();
        seven.extend(["f".to_string(), "g".to_string()]);

        let base = RoomQuery::first_page(36);
        assert_eq!(
            signature(&RoomQuery {
                tags: five,
                ..base.clone()
            }),
            signature(&RoomQuery {
                tags: seven,
                ..base
            })
        );
    }

    #[test]
    fn signature_separates_filters() {
        let base = RoomQuery::first_page(36);
        let girls = RoomQuery {
            gender: Some(Gender::Female),
            ..base.clone()
        };
        let next_page = RoomQuery {
            offset: 36,
            ..base.clone()
        };
        let hd = RoomQuery {
            hd: true,
            ..base.clone()
        };

        assert_ne!(signature(&base), signature(&girls));
        assert_ne!(signature(&base), signature(&next_page));
        assert_ne!(signature(&base), signature(&hd));
    }
}
