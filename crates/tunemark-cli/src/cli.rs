//! CLI for the tunemark bookmark-to-music mirror.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::Write as _;
use std::path::PathBuf;
use tunemark_core::config::{self, ErrorPolicy};
use tunemark_core::driver::{self, Progress};
use tunemark_core::store::PlacesStore;

/// Mirror a bookmark folder tree into a directory of tagged audio files.
#[derive(Debug, Parser)]
#[command(name = "tunemark")]
#[command(about = "Mirror bookmarked songs into a tagged local music tree", long_about = None)]
pub struct Cli {
    /// Output root directory; the mirrored folder tree is created below it.
    #[arg(value_name = "OUT_ROOT")]
    pub out_root: PathBuf,

    /// Override the configured places.sqlite path.
    #[arg(long, value_name = "PATH")]
    pub places: Option<PathBuf>,

    /// Override the configured bookmark root folder path (repeat per segment,
    /// top level first).
    #[arg(long = "root-folder", value_name = "TITLE")]
    pub root_folder: Vec<String>,

    /// Stop at the first failed bookmark instead of continuing.
    #[arg(long)]
    pub abort_on_error: bool,
}

pub async fn run_from_args() -> Result<()> {
    run(Cli::parse()).await
}

async fn run(cli: Cli) -> Result<()> {
    let mut cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);

    if let Some(places) = cli.places {
        cfg.places_db = Some(places);
    }
    if !cli.root_folder.is_empty() {
        cfg.root_folder = cli.root_folder;
    }
    if cli.abort_on_error {
        cfg.on_error = ErrorPolicy::Abort;
    }

    let Some(places_db) = cfg.places_db.clone() else {
        bail!(
            "no places database configured; set places_db in {} or pass --places",
            config::config_path()?.display()
        );
    };

    let store = PlacesStore::open(&places_db)
        .await
        .with_context(|| format!("opening bookmark store {}", places_db.display()))?;

    // Per-bookmark progress on stdout, one line per song.
    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<Progress>(16);
    let printer = tokio::spawn(async move {
        while let Some(event) = progress_rx.recv().await {
            match event {
                Progress::Fetching { folder_path, title } => {
                    if folder_path.is_empty() {
                        print!("Fetching {title} ... ");
                    } else {
                        print!("Fetching {folder_path}/{title} ... ");
                    }
                    let _ = std::io::stdout().flush();
                }
                Progress::Done { .. } => println!("done"),
                Progress::Failed { .. } => println!("error"),
            }
        }
    });

    let report = driver::mirror_run(&store, &cfg, &cli.out_root, Some(&progress_tx)).await;
    store.close().await;
    drop(progress_tx);
    let _ = printer.await;
    let report = report?;

    println!(
        "{} song(s) placed, {} failure(s).",
        report.placed,
        report.failures.len()
    );
    if !report.is_clean() {
        print!("{}", report.render());
    }
    Ok(())
}
