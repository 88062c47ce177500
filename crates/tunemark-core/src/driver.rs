//! Sequential run loop: resolve the root, walk the tree, create directories,
//! push every bookmark through the pipeline and collect failures.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::{ErrorPolicy, TunemarkConfig};
use crate::pipeline::SongPipeline;
use crate::report::{FailureDetail, FailureRecord, RunReport};
use crate::sanitize::sanitize_component;
use crate::store::PlacesStore;
use crate::walk::{self, FolderNode};

/// Per-bookmark progress, sent to the caller for operator-facing output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// Acquisition of one bookmark started.
    Fetching { folder_path: String, title: String },
    /// The bookmark's file was placed.
    Done { folder_path: String, title: String },
    /// The bookmark failed; details land in the run report.
    Failed { folder_path: String, title: String },
}

/// Destination directory for a node: every relative-path segment sanitized
/// once, joined below the output root.
fn dest_dir_for(out_root: &Path, node: &FolderNode) -> PathBuf {
    let mut dir = out_root.to_path_buf();
    for segment in &node.relative_path {
        dir.push(sanitize_component(segment));
    }
    dir
}

/// Mirrors the configured bookmark folder into `out_root`.
///
/// Fatal errors (root folder missing in the store, output root not
/// creatable) abort before or during processing with `Err`. Per-bookmark and
/// per-folder failures are recorded in the returned report; whether a
/// failure stops the run is decided here, by the configured policy, and
/// nowhere else.
///
/// If `progress_tx` is `Some`, one [`Progress`] event is sent as each
/// bookmark starts and finishes.
pub async fn mirror_run(
    store: &PlacesStore,
    cfg: &TunemarkConfig,
    out_root: &Path,
    progress_tx: Option<&tokio::sync::mpsc::Sender<Progress>>,
) -> Result<RunReport> {
    let root_id = store
        .resolve_root(&cfg.root_folder)
        .await
        .context("resolving bookmark root folder")?;
    let nodes = walk::walk(store, root_id).await?;
    tracing::info!(folders = nodes.len(), "walked bookmark tree");

    tokio::fs::create_dir_all(out_root)
        .await
        .with_context(|| format!("creating output root {}", out_root.display()))?;

    let pipeline = SongPipeline::from_config(cfg);
    let mut report = RunReport::default();

    'nodes: for node in &nodes {
        let folder_path = node.relative_path.join("/");
        let dest_dir = dest_dir_for(out_root, node);

        if let Err(e) = tokio::fs::create_dir_all(&dest_dir).await {
            tracing::warn!(dir = %dest_dir.display(), error = %e, "cannot create folder");
            report.failures.push(FailureRecord {
                folder_path,
                bookmark: None,
                detail: FailureDetail::Internal {
                    message: format!("create directory {}: {e}", dest_dir.display()),
                },
            });
            match cfg.on_error {
                ErrorPolicy::Abort => break 'nodes,
                ErrorPolicy::Continue => continue 'nodes,
            }
        }

        for bookmark in &node.bookmarks {
            tracing::info!(folder = %folder_path, title = %bookmark.title, "fetching song");
            if let Some(tx) = progress_tx {
                let _ = tx
                    .send(Progress::Fetching {
                        folder_path: folder_path.clone(),
                        title: bookmark.title.clone(),
                    })
                    .await;
            }
            match pipeline.acquire(bookmark, &node.relative_path, &dest_dir).await {
                Ok(placed) => {
                    tracing::info!(path = %placed.path.display(), recoded = placed.recoded, "placed");
                    if let Some(tx) = progress_tx {
                        let _ = tx
                            .send(Progress::Done {
                                folder_path: folder_path.clone(),
                                title: bookmark.title.clone(),
                            })
                            .await;
                    }
                    report.placed += 1;
                }
                Err(e) => {
                    tracing::warn!(folder = %folder_path, title = %bookmark.title, error = %e, "failed");
                    if let Some(tx) = progress_tx {
                        let _ = tx
                            .send(Progress::Failed {
                                folder_path: folder_path.clone(),
                                title: bookmark.title.clone(),
                            })
                            .await;
                    }
                    report.failures.push(FailureRecord {
                        folder_path: folder_path.clone(),
                        bookmark: Some(bookmark.clone()),
                        detail: e.into(),
                    });
                    if cfg.on_error == ErrorPolicy::Abort {
                        break 'nodes;
                    }
                }
            }
        }
    }

    Ok(report)
}
