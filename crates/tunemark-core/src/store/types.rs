//! Row types read from the places database.

/// Folder row identifier in `moz_bookmarks`.
pub type FolderId = i64;

/// One child folder of a folder node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkFolder {
    pub id: FolderId,
    pub title: String,
}

/// One saved link: the bookmark title joined with its place URL.
/// A read-only snapshot of store content; never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub title: String,
    pub url: String,
}
