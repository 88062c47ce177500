//! Per-bookmark acquisition: download to scratch, tag with fallback, place.
//!
//! Each bookmark moves through the steps strictly in order: clean the title,
//! download into a fresh scratch directory, derive the tag, try a stream-copy
//! tag into the destination, fall back to a re-encode, and clean up scratch
//! on every exit path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::TunemarkConfig;
use crate::error::AcquireError;
use crate::sanitize::sanitize_component;
use crate::store::Bookmark;
use crate::tag::{self, SongTag};
use crate::tools::{CodecMode, Downloader, Tagger};

/// Container extension of the raw download and the stream-copy output.
pub const AUDIO_EXT: &str = "m4a";
/// Extension of the re-encode fallback output.
pub const FALLBACK_EXT: &str = "mp3";

/// Where a successfully acquired song ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placed {
    pub path: PathBuf,
    /// True when stream copy was rejected and the file was re-encoded.
    pub recoded: bool,
}

pub struct SongPipeline {
    downloader: Downloader,
    tagger: Tagger,
    scratch_root: PathBuf,
    salvage_untagged: bool,
}

impl SongPipeline {
    pub fn new(
        downloader: Downloader,
        tagger: Tagger,
        scratch_root: PathBuf,
        salvage_untagged: bool,
    ) -> Self {
        Self {
            downloader,
            tagger,
            scratch_root,
            salvage_untagged,
        }
    }

    pub fn from_config(cfg: &TunemarkConfig) -> Self {
        let timeout = cfg.tool_timeout_secs.map(Duration::from_secs);
        Self::new(
            Downloader::new(cfg.downloader.clone(), timeout),
            Tagger::new(cfg.tagger.clone(), timeout),
            cfg.scratch_dir.clone().unwrap_or_else(std::env::temp_dir),
            cfg.salvage_untagged,
        )
    }

    /// Acquires one bookmark into `dest_dir`, which must already exist.
    ///
    /// `relative_path` is the bookmark's folder path below the traversal
    /// root; its first segment becomes the genre tag. The scratch directory
    /// is unique per call and removed on every exit path, including early
    /// failures.
    pub async fn acquire(
        &self,
        bookmark: &Bookmark,
        relative_path: &[String],
        dest_dir: &Path,
    ) -> Result<Placed, AcquireError> {
        let song_name = tag::clean_songname(&bookmark.title);
        let file_stem = sanitize_component(&song_name);

        tokio::fs::create_dir_all(&self.scratch_root).await?;
        let scratch_dir = tempfile::Builder::new()
            .prefix("tunemark-")
            .tempdir_in(&self.scratch_root)?;
        let scratch_file = scratch_dir.path().join(format!("{file_stem}.{AUDIO_EXT}"));

        self.downloader.fetch_audio(&bookmark.url, &scratch_file).await?;

        let (artist, title) = tag::guess_artist_title(&song_name);
        let song_tag = SongTag {
            title,
            artist,
            genre: relative_path.first().cloned(),
            comment: Some(tag::parse_authority(&bookmark.url)?),
        };

        let placed = self
            .tag_with_fallback(&scratch_file, dest_dir, &file_stem, &song_tag)
            .await;

        if placed.is_err() && self.salvage_untagged && scratch_file.exists() {
            let untagged = dest_dir.join(format!("{file_stem}.{AUDIO_EXT}"));
            match tokio::fs::copy(&scratch_file, &untagged).await {
                Ok(_) => tracing::info!(path = %untagged.display(), "salvaged untagged download"),
                Err(e) => tracing::warn!(error = %e, "could not salvage untagged download"),
            }
        }

        // scratch_dir drops here, deleting the raw download.
        placed
    }

    /// Two-stage tagging: stream copy first, re-encode only if it fails.
    async fn tag_with_fallback(
        &self,
        input: &Path,
        dest_dir: &Path,
        file_stem: &str,
        song_tag: &SongTag,
    ) -> Result<Placed, AcquireError> {
        let copy_dest = dest_dir.join(format!("{file_stem}.{AUDIO_EXT}"));
        match self
            .tagger
            .write_tags(input, &copy_dest, CodecMode::StreamCopy, song_tag)
            .await
        {
            Ok(()) => {
                return Ok(Placed {
                    path: copy_dest,
                    recoded: false,
                })
            }
            Err(e) => {
                tracing::debug!(error = %e, "stream copy rejected, falling back to re-encode");
                // The tagger may have left a partial file at the target.
                if copy_dest.exists() {
                    let _ = tokio::fs::remove_file(&copy_dest).await;
                }
            }
        }

        let recode_dest = dest_dir.join(format!("{file_stem}.{FALLBACK_EXT}"));
        match self
            .tagger
            .write_tags(input, &recode_dest, CodecMode::Reencode, song_tag)
            .await
        {
            Ok(()) => Ok(Placed {
                path: recode_dest,
                recoded: true,
            }),
            Err(e) => {
                // No corrupt partial output left behind.
                if recode_dest.exists() {
                    let _ = tokio::fs::remove_file(&recode_dest).await;
                }
                Err(e.into())
            }
        }
    }
}
