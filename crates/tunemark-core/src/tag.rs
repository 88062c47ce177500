//! Song tag derivation from bookmark titles, folder paths and URLs.

use crate::error::AcquireError;

/// Metadata embedded into the placed audio file.
///
/// Unset fields are omitted from the tagger invocation entirely; they are
/// never written as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongTag {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub genre: Option<String>,
    pub comment: Option<String>,
}

impl SongTag {
    /// The set fields as `(key, value)` pairs, in embed order.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut out = Vec::with_capacity(4);
        if let Some(v) = self.title.as_deref() {
            out.push(("title", v));
        }
        if let Some(v) = self.artist.as_deref() {
            out.push(("artist", v));
        }
        if let Some(v) = self.genre.as_deref() {
            out.push(("genre", v));
        }
        if let Some(v) = self.comment.as_deref() {
            out.push(("comment", v));
        }
        out
    }
}

/// Strips known noise from a bookmark title, leaving the song name.
///
/// Removes the " - YouTube" tab-title suffix, maps em dashes to plain `-`
/// (so artist/title guessing still works) and drops the play triangle some
/// pages prepend.
pub fn clean_songname(title: &str) -> String {
    title
        .replace(" - YouTube", "")
        .replace('\u{2014}', "-")
        .replace('\u{25b6}', "")
        .trim()
        .to_string()
}

/// Guesses `(artist, title)` by splitting the song name on its first `-`.
///
/// A name with no separator yields `(None, None)`; nothing is guessed from
/// a name with no discernible structure.
pub fn guess_artist_title(songname: &str) -> (Option<String>, Option<String>) {
    match songname.split_once('-') {
        Some((artist, title)) => (
            Some(artist.trim().to_string()),
            Some(title.trim().to_string()),
        ),
        None => (None, None),
    }
}

/// The network authority (host) of a bookmark URL, used as the comment tag.
pub fn parse_authority(raw: &str) -> Result<String, AcquireError> {
    let parsed =
        url::Url::parse(raw).map_err(|e| AcquireError::Parse(format!("{raw}: {e}")))?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(host.to_string()),
        _ => Err(AcquireError::Parse(format!("{raw}: no authority segment"))),
    }
}
