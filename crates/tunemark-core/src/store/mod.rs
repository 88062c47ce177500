//! Read-only access to a Firefox `places.sqlite` bookmark store.
//!
//! Bookmarks and folders live in `moz_bookmarks` (folders are rows of type 2,
//! links rows of type 1 whose `fk` points into `moz_places` for the URL).

mod types;

pub use types::{Bookmark, BookmarkFolder, FolderId};

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Pool, Row, Sqlite};
use std::path::{Path, PathBuf};

/// `moz_bookmarks.type` value for folder rows.
const TYPE_FOLDER: i64 = 2;
/// `moz_bookmarks.type` value for bookmark (link) rows.
const TYPE_BOOKMARK: i64 = 1;
/// Parent id of the top-level folders (toolbar, menu, ...).
const ROOT_PARENT_ID: FolderId = 1;

/// Errors from the bookmark store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The places database file does not exist.
    #[error("places database not found at {0}")]
    Missing(PathBuf),

    /// A segment of the configured root folder path has no matching child
    /// folder. Fatal: reported before any bookmark is processed.
    #[error("bookmark folder {segment:?} not found (root path {path:?})")]
    FolderNotFound { segment: String, path: String },

    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Handle to an open places database. Queries are read-only; the connection
/// is released when the value is dropped (or via [`PlacesStore::close`]).
#[derive(Debug)]
pub struct PlacesStore {
    pub(crate) pool: Pool<Sqlite>,
}

impl PlacesStore {
    /// Open an existing places database read-only.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StoreError::Missing(path.to_path_buf()));
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true);
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(PlacesStore { pool })
    }

    /// Close the underlying connection pool. Dropping the store has the same
    /// effect; this makes the release explicit on the happy path.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Resolve a root folder path (folder titles from the store's top level
    /// downwards) to a folder id by sequential unique-child lookup.
    pub async fn resolve_root(&self, path: &[String]) -> Result<FolderId, StoreError> {
        let mut parent = ROOT_PARENT_ID;
        for segment in path {
            let row = sqlx::query(
                r#"
                SELECT id FROM moz_bookmarks
                WHERE title = ? AND parent = ? AND type = ?
                "#,
            )
            .bind(segment)
            .bind(parent)
            .bind(TYPE_FOLDER)
            .fetch_optional(&self.pool)
            .await?;

            parent = match row {
                Some(row) => row.get("id"),
                None => {
                    return Err(StoreError::FolderNotFound {
                        segment: segment.clone(),
                        path: path.join("/"),
                    })
                }
            };
        }
        Ok(parent)
    }

    /// Immediate child folders of `parent`, in store order.
    pub async fn child_folders(&self, parent: FolderId) -> Result<Vec<BookmarkFolder>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title FROM moz_bookmarks
            WHERE parent = ? AND type = ? AND title IS NOT NULL
            ORDER BY position, id
            "#,
        )
        .bind(parent)
        .bind(TYPE_FOLDER)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(BookmarkFolder {
                id: row.get("id"),
                title: row.get("title"),
            });
        }
        Ok(out)
    }

    /// Bookmarks directly under `parent`, in store order. Rows with a NULL
    /// title or URL are skipped.
    pub async fn bookmarks(&self, parent: FolderId) -> Result<Vec<Bookmark>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT moz_bookmarks.title AS title, moz_places.url AS url
            FROM moz_bookmarks JOIN moz_places
            ON moz_bookmarks.fk = moz_places.id
            WHERE moz_bookmarks.parent = ? AND moz_bookmarks.type = ?
              AND moz_bookmarks.title IS NOT NULL AND moz_places.url IS NOT NULL
            ORDER BY moz_bookmarks.position, moz_bookmarks.id
            "#,
        )
        .bind(parent)
        .bind(TYPE_BOOKMARK)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(Bookmark {
                title: row.get("title"),
                url: row.get("url"),
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    //! In-memory places databases for tests (no disk I/O).

    use super::*;

    /// Minimal slice of the Firefox places schema that the store queries.
    const PLACES_SCHEMA: [&str; 2] = [
        r#"
        CREATE TABLE moz_bookmarks (
            id INTEGER PRIMARY KEY,
            type INTEGER NOT NULL,
            fk INTEGER,
            parent INTEGER,
            position INTEGER NOT NULL DEFAULT 0,
            title TEXT
        )
        "#,
        r#"
        CREATE TABLE moz_places (
            id INTEGER PRIMARY KEY,
            url TEXT
        )
        "#,
    ];

    pub(crate) async fn open_memory() -> PlacesStore {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        for stmt in PLACES_SCHEMA {
            sqlx::query(stmt).execute(&pool).await.unwrap();
        }
        // places.sqlite reserves id 1 for the root folder row; seeding it
        // keeps every later folder at id >= 2 like the real schema.
        sqlx::query(
            "INSERT INTO moz_bookmarks (id, type, parent, position, title) VALUES (1, 2, 0, 0, 'root')",
        )
        .execute(&pool)
        .await
        .unwrap();
        PlacesStore { pool }
    }

    pub(crate) async fn seed_folder(store: &PlacesStore, parent: FolderId, title: &str) -> FolderId {
        let result = sqlx::query(
            "INSERT INTO moz_bookmarks (type, parent, position, title) VALUES (2, ?, 0, ?)",
        )
        .bind(parent)
        .bind(title)
        .execute(&store.pool)
        .await
        .unwrap();
        result.last_insert_rowid()
    }

    pub(crate) async fn seed_bookmark(store: &PlacesStore, parent: FolderId, title: &str, url: &str) {
        let place = sqlx::query("INSERT INTO moz_places (url) VALUES (?)")
            .bind(url)
            .execute(&store.pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO moz_bookmarks (type, fk, parent, position, title) VALUES (1, ?, ?, 0, ?)",
        )
        .bind(place.last_insert_rowid())
        .bind(parent)
        .bind(title)
        .execute(&store.pool)
        .await
        .unwrap();
    }
}
