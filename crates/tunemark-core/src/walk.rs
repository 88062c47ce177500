//! Breadth-first traversal of a bookmark folder subtree.

use std::collections::{HashSet, VecDeque};

use crate::store::{Bookmark, BookmarkFolder, FolderId, PlacesStore, StoreError};

/// One flattened traversal entry: a folder's root-relative path together
/// with its immediate child folders and bookmarks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderNode {
    /// Folder titles from the traversal root down to this folder; empty for
    /// the root itself. Unsanitized store titles.
    pub relative_path: Vec<String>,
    pub folder_id: FolderId,
    pub child_folders: Vec<BookmarkFolder>,
    pub bookmarks: Vec<Bookmark>,
}

async fn load_node(
    store: &PlacesStore,
    relative_path: Vec<String>,
    folder_id: FolderId,
) -> Result<FolderNode, StoreError> {
    Ok(FolderNode {
        child_folders: store.child_folders(folder_id).await?,
        bookmarks: store.bookmarks(folder_id).await?,
        relative_path,
        folder_id,
    })
}

/// Walks the subtree under `root_id` breadth-first.
///
/// Yields the root node first (`relative_path` empty), then every reachable
/// subfolder exactly once in discovery order. Children are visited in store
/// order, which is not guaranteed alphabetical. Order only affects directory
/// creation and report ordering, never correctness.
pub async fn walk(store: &PlacesStore, root_id: FolderId) -> Result<Vec<FolderNode>, StoreError> {
    let mut nodes = vec![load_node(store, Vec::new(), root_id).await?];
    let mut queue: VecDeque<usize> = VecDeque::from([0]);
    let mut seen: HashSet<FolderId> = HashSet::from([root_id]);

    while let Some(ix) = queue.pop_front() {
        let children = nodes[ix].child_folders.clone();
        let base = nodes[ix].relative_path.clone();
        for child in children {
            // A corrupt store can list a folder under itself; never visit
            // the same folder id twice.
            if !seen.insert(child.id) {
                tracing::warn!(folder_id = child.id, title = %child.title, "folder listed twice, skipping");
                continue;
            }
            let mut relative_path = base.clone();
            relative_path.push(child.title);
            nodes.push(load_node(store, relative_path, child.id).await?);
            queue.push_back(nodes.len() - 1);
        }
    }

    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testutil::{open_memory, seed_bookmark, seed_folder};

    #[tokio::test]
    async fn yields_root_first_with_empty_path() {
        let store = open_memory().await;
        let music = seed_folder(&store, 1, "music").await;
        seed_bookmark(&store, music, "Solo - Track", "http://youtube.com/s").await;

        let nodes = walk(&store, music).await.unwrap();
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].relative_path.is_empty());
        assert_eq!(nodes[0].folder_id, music);
        assert_eq!(nodes[0].bookmarks.len(), 1);
    }

    #[tokio::test]
    async fn breadth_first_each_folder_exactly_once() {
        let store = open_memory().await;
        let music = seed_folder(&store, 1, "music").await;
        let rock = seed_folder(&store, music, "rock").await;
        let jazz = seed_folder(&store, music, "jazz").await;
        let punk = seed_folder(&store, rock, "punk").await;
        let cool = seed_folder(&store, jazz, "cool").await;

        let nodes = walk(&store, music).await.unwrap();
        let paths: Vec<Vec<String>> = nodes.iter().map(|n| n.relative_path.clone()).collect();

        // Root first, then depth 1 in store order, then depth 2.
        assert_eq!(
            paths,
            vec![
                vec![],
                vec!["rock".to_string()],
                vec!["jazz".to_string()],
                vec!["rock".to_string(), "punk".to_string()],
                vec!["jazz".to_string(), "cool".to_string()],
            ]
        );
        let ids: Vec<_> = nodes.iter().map(|n| n.folder_id).collect();
        assert_eq!(ids, vec![music, rock, jazz, punk, cool]);
    }

    #[tokio::test]
    async fn bookmarks_attach_to_their_folder_node() {
        let store = open_memory().await;
        let music = seed_folder(&store, 1, "music").await;
        let rock = seed_folder(&store, music, "rock").await;
        seed_bookmark(&store, rock, "Artist - Song - YouTube", "http://youtube.com/x").await;

        let nodes = walk(&store, music).await.unwrap();
        assert_eq!(nodes[1].relative_path, vec!["rock".to_string()]);
        assert_eq!(nodes[1].bookmarks[0].title, "Artist - Song - YouTube");
        assert!(nodes[0].bookmarks.is_empty());
    }

    #[tokio::test]
    async fn self_parented_folder_terminates() {
        let store = open_memory().await;
        // Corrupt row: a folder recorded as its own parent.
        sqlx::query(
            "INSERT INTO moz_bookmarks (id, type, parent, position, title) VALUES (99, 2, 99, 0, 'loop')",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let nodes = walk(&store, 99).await.unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].folder_id, 99);
    }
}
