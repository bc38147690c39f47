//! Category-scoped rating cache stores.
//!
//! [`RatingCache`] owns one [`CacheStore`] per [`MediaCategory`], each backed
//! by its own SQLite file beneath a shared cache root. A store that fails to
//! open stays usable: every operation returns [`Error::CacheUnavailable`]
//! instead of touching disk, so callers fall back to resolving fresh and
//! skipping persistence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mediascore_common::{ContentKey, Error, MediaCategory, RatingRecord, Result};
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::pool::{self, DbPool};
use crate::queries::ratings;

/// Permissions for the cache root directory.
#[cfg(unix)]
const CACHE_DIR_MODE: u32 = 0o700;

/// A single category's rating store.
///
/// Lookups may run concurrently from many tasks; writes are serialized by
/// SQLite itself.
pub struct CacheStore {
    category: MediaCategory,
    pool: RwLock<Option<DbPool>>,
    unavailable_reason: Option<String>,
}

impl CacheStore {
    /// Open (or create) the store file for `category` inside `root`.
    ///
    /// Never fails: on error the returned store is in degraded mode.
    pub fn open(root: &Path, category: MediaCategory) -> Self {
        Self::open_with_pool_size(root, category, pool::DEFAULT_POOL_SIZE)
    }

    /// Like [`CacheStore::open`], holding up to `pool_size` connections.
    pub fn open_with_pool_size(root: &Path, category: MediaCategory, pool_size: u32) -> Self {
        let path = store_path(root, category);
        match pool::init_pool_with_size(&path.to_string_lossy(), pool_size) {
            Ok(pool) => {
                debug!(
                    category = %category,
                    path = %path.display(),
                    connections = pool.max_size(),
                    "Opened rating cache"
                );
                Self::from_pool(category, pool)
            }
            Err(e) => Self::unavailable(category, e.to_string()),
        }
    }

    /// Wrap an already-initialized pool.
    pub fn from_pool(category: MediaCategory, pool: DbPool) -> Self {
        Self {
            category,
            pool: RwLock::new(Some(pool)),
            unavailable_reason: None,
        }
    }

    /// Create an in-memory store, mostly useful for tests.
    pub fn in_memory(category: MediaCategory) -> Result<Self> {
        Ok(Self::from_pool(category, pool::init_memory_pool()?))
    }

    /// Create a degraded store whose operations all report unavailability.
    pub fn unavailable(category: MediaCategory, reason: impl Into<String>) -> Self {
        Self {
            category,
            pool: RwLock::new(None),
            unavailable_reason: Some(reason.into()),
        }
    }

    pub fn category(&self) -> MediaCategory {
        self.category
    }

    /// Whether the store is open and backed by a database.
    pub fn is_available(&self) -> bool {
        self.pool.read().is_some()
    }

    /// Connection limit of the open pool.
    pub fn max_connections(&self) -> Option<u32> {
        self.pool.read().as_ref().map(|pool| pool.max_size())
    }

    /// Why the store could not be opened, if it could not.
    pub fn unavailable_reason(&self) -> Option<&str> {
        self.unavailable_reason.as_deref()
    }

    /// Look up a record by its content-addressed primary key.
    pub fn get_by_primary(&self, key: &ContentKey) -> Result<Option<RatingRecord>> {
        let pool = self.pool()?;
        let conn = pool::get_conn(&pool)?;
        ratings::get_by_id(&conn, key)
    }

    /// Look up the first record whose file-name hash matches.
    pub fn get_by_secondary_index(
        &self,
        base_name_hash: &ContentKey,
    ) -> Result<Option<RatingRecord>> {
        let pool = self.pool()?;
        let conn = pool::get_conn(&pool)?;
        ratings::get_by_base_name_hash(&conn, base_name_hash)
    }

    /// Insert or replace `record`, keyed by its primary key.
    pub fn put(&self, record: &RatingRecord) -> Result<()> {
        if record.category() != self.category {
            return Err(Error::invalid_input(format!(
                "{} record cannot be stored in the {} cache",
                record.category(),
                self.category
            )));
        }

        let pool = self.pool()?;
        let conn = pool::get_conn(&pool)?;
        ratings::upsert(&conn, record)
    }

    /// Release the underlying connections. Safe to call on a degraded store
    /// and safe to call more than once.
    pub fn close(&self) {
        if self.pool.write().take().is_some() {
            debug!(category = %self.category, "Closed rating cache");
        }
    }

    fn pool(&self) -> Result<DbPool> {
        self.pool.read().clone().ok_or_else(|| {
            Error::cache_unavailable(format!(
                "{} cache: {}",
                self.category,
                self.unavailable_reason.as_deref().unwrap_or("closed")
            ))
        })
    }
}

/// The pair of per-category stores used for a run.
pub struct RatingCache {
    movie: CacheStore,
    tv: CacheStore,
}

impl RatingCache {
    /// Open both stores beneath `root`, creating the directory if needed.
    ///
    /// If the directory cannot be created both stores come back degraded.
    /// Unavailability is logged once here rather than on every lookup.
    pub fn open(root: &Path) -> Self {
        Self::open_with_pool_size(root, pool::DEFAULT_POOL_SIZE)
    }

    /// Like [`RatingCache::open`], sizing each store's pool for `pool_size`
    /// concurrent users.
    pub fn open_with_pool_size(root: &Path, pool_size: u32) -> Self {
        let cache = match prepare_root(root) {
            Ok(()) => Self {
                movie: CacheStore::open_with_pool_size(root, MediaCategory::Movie, pool_size),
                tv: CacheStore::open_with_pool_size(root, MediaCategory::Tv, pool_size),
            },
            Err(e) => {
                let reason = format!("cannot create {}: {}", root.display(), e);
                Self::unavailable(reason)
            }
        };

        for store in [&cache.movie, &cache.tv] {
            if let Some(reason) = store.unavailable_reason() {
                warn!(
                    category = %store.category(),
                    reason = reason,
                    "Rating cache unavailable; results will not be cached"
                );
            }
        }

        cache
    }

    /// In-memory stores for both categories.
    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            movie: CacheStore::in_memory(MediaCategory::Movie)?,
            tv: CacheStore::in_memory(MediaCategory::Tv)?,
        })
    }

    /// Both stores degraded, for running without any cache.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            movie: CacheStore::unavailable(MediaCategory::Movie, reason.clone()),
            tv: CacheStore::unavailable(MediaCategory::Tv, reason),
        }
    }

    pub fn store(&self, category: MediaCategory) -> &CacheStore {
        match category {
            MediaCategory::Movie => &self.movie,
            MediaCategory::Tv => &self.tv,
        }
    }

    pub fn close(&self) {
        self.tv.close();
        self.movie.close();
    }
}

/// Create the cache root with owner-only permissions.
pub fn prepare_root(root: &Path) -> io::Result<()> {
    fs::create_dir_all(root)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(root, fs::Permissions::from_mode(CACHE_DIR_MODE))?;
    }

    Ok(())
}

/// Delete the whole cache root. A missing directory is not an error.
pub fn clean(root: &Path) -> Result<()> {
    match fs::remove_dir_all(root) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Path of a category's store file beneath `root`.
fn store_path(root: &Path, category: MediaCategory) -> PathBuf {
    root.join(category.store_file_name())
}
