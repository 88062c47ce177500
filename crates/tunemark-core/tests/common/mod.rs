//! Shared fixtures: an on-disk places database and fake downloader/tagger
//! executables standing in for yt-dlp and ffmpeg.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::fs;
use std::path::{Path, PathBuf};

/// Builder for a places.sqlite file with the schema slice tunemark reads.
pub struct PlacesFixture {
    pool: Pool<Sqlite>,
}

impl PlacesFixture {
    pub async fn create(path: &Path) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::query(
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
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("CREATE TABLE moz_places (id INTEGER PRIMARY KEY, url TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        // places.sqlite reserves id 1 for the root folder row; seeding it
        // keeps every later folder at id >= 2 like the real schema.
        sqlx::query(
            "INSERT INTO moz_bookmarks (id, type, parent, title) VALUES (1, 2, 0, 'root')",
        )
        .execute(&pool)
        .await
        .unwrap();
        Self { pool }
    }

    pub async fn folder(&self, parent: i64, title: &str) -> i64 {
        sqlx::query("INSERT INTO moz_bookmarks (type, parent, title) VALUES (2, ?, ?)")
            .bind(parent)
            .bind(title)
            .execute(&self.pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    pub async fn bookmark(&self, parent: i64, title: &str, url: &str) {
        let place = sqlx::query("INSERT INTO moz_places (url) VALUES (?)")
            .bind(url)
            .execute(&self.pool)
            .await
            .unwrap()
            .last_insert_rowid();
        sqlx::query("INSERT INTO moz_bookmarks (type, fk, parent, title) VALUES (1, ?, ?, ?)")
            .bind(place)
            .bind(parent)
            .bind(title)
            .execute(&self.pool)
            .await
            .unwrap();
    }

    /// Release the write handle so the store can open the file read-only.
    pub async fn finish(self) {
        self.pool.close().await;
    }
}

/// Writes an executable shell script and returns its path.
pub fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A downloader stand-in writing a payload to its `-o` argument.
pub fn ok_downloader(dir: &Path) -> PathBuf {
    fake_tool(
        dir,
        "fake-yt-dlp",
        r#"out=""; prev=""
for a in "$@"; do
  [ "$prev" = "-o" ] && out="$a"
  prev="$a"
done
printf 'raw audio' > "$out""#,
    )
}

/// A tagger stand-in writing its last argument; logs argv to `<dir>/argv.log`
/// (appending, one line per invocation).
pub fn logging_tagger(dir: &Path) -> PathBuf {
    fake_tool(
        dir,
        "fake-ffmpeg",
        &format!(
            r#"echo "$@" >> {}
for a in "$@"; do last="$a"; done
printf 'tagged audio' > "$last""#,
            dir.join("argv.log").display()
        ),
    )
}

/// A tagger that fails (both codec modes) whenever the output path contains
/// `Bad`, and succeeds otherwise.
pub fn bad_title_tagger(dir: &Path) -> PathBuf {
    fake_tool(
        dir,
        "fake-ffmpeg-picky",
        r#"for a in "$@"; do last="$a"; done
case "$last" in
  *Bad*) echo "unsupported stream" >&2; exit 1 ;;
esac
printf 'tagged audio' > "$last""#,
    )
}
