//! Invocation of the external downloader and tagger as black-box subprocesses.

use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::tag::SongTag;

/// A downloader or tagger invocation that exited abnormally or timed out.
///
/// Carries the full command line and the captured combined stdout/stderr so
/// the end-of-run report gives the operator enough to retry by hand.
#[derive(Debug)]
pub struct ToolError {
    pub command: String,
    pub output: String,
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` failed: {}", self.command, self.output.trim_end())
    }
}

impl std::error::Error for ToolError {}

fn render_command(program: &str, args: &[OsString]) -> String {
    let mut out = String::from(program);
    for arg in args {
        out.push(' ');
        out.push_str(&arg.to_string_lossy());
    }
    out
}

/// Runs a tool to completion, capturing stdout and stderr.
///
/// A `timeout` of `None` lets the tool run for the full duration of the
/// network transfer or transcode; with `Some`, the child is killed when the
/// deadline passes and the failure is reported like any other abnormal exit.
async fn run_tool(
    program: &str,
    args: Vec<OsString>,
    timeout: Option<Duration>,
) -> Result<(), ToolError> {
    let command = render_command(program, &args);
    tracing::debug!(%command, "running tool");

    let mut cmd = Command::new(program);
    cmd.args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
            Ok(result) => result,
            Err(_) => {
                return Err(ToolError {
                    command,
                    output: format!("timed out after {}s", limit.as_secs()),
                })
            }
        },
        None => cmd.output().await,
    };

    let output = result.map_err(|e| ToolError {
        command: command.clone(),
        output: format!("failed to start: {e}"),
    })?;

    if output.status.success() {
        return Ok(());
    }

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    Err(ToolError {
        command,
        output: combined,
    })
}

/// Wrapper around a yt-dlp compatible downloader.
pub struct Downloader {
    program: String,
    timeout: Option<Duration>,
}

impl Downloader {
    pub fn new(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Downloads the best available audio for `url` into `scratch_path`.
    ///
    /// `--no-playlist` ensures a bookmark whose URL is a playlist container
    /// still resolves to exactly one file.
    pub async fn fetch_audio(&self, url: &str, scratch_path: &Path) -> Result<(), ToolError> {
        let args = vec![
            OsString::from("-f"),
            OsString::from("bestaudio"),
            OsString::from("--no-playlist"),
            OsString::from("-o"),
            scratch_path.as_os_str().to_os_string(),
            OsString::from(url),
        ];
        run_tool(&self.program, args, self.timeout).await
    }
}

/// How the tagger treats the audio payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecMode {
    /// Embed metadata without re-encoding. Fast, but the container may
    /// reject the requested metadata.
    StreamCopy,
    /// Transcode to MP3 (libmp3lame), which accepts all four tag fields.
    Reencode,
}

/// Wrapper around an ffmpeg compatible tagger/transcoder.
pub struct Tagger {
    program: String,
    timeout: Option<Duration>,
}

impl Tagger {
    pub fn new(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Tags `input` into `output`, overwriting any pre-existing file there.
    /// Only the set fields of `tag` are embedded.
    pub async fn write_tags(
        &self,
        input: &Path,
        output: &Path,
        mode: CodecMode,
        tag: &SongTag,
    ) -> Result<(), ToolError> {
        let mut args = vec![
            OsString::from("-y"),
            OsString::from("-i"),
            input.as_os_str().to_os_string(),
        ];
        match mode {
            CodecMode::StreamCopy => {
                args.push(OsString::from("-codec"));
                args.push(OsString::from("copy"));
            }
            CodecMode::Reencode => {
                args.push(OsString::from("-codec:a"));
                args.push(OsString::from("libmp3lame"));
                args.push(OsString::from("-q:a"));
                args.push(OsString::from("2"));
            }
        }
        for (key, value) in tag.fields() {
            args.push(OsString::from("-metadata"));
            args.push(OsString::from(format!("{key}={value}")));
        }
        args.push(output.as_os_str().to_os_string());
        run_tool(&self.program, args, self.timeout).await
    }
}
