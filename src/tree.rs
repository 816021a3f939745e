//! Folder trees and the traversal that builds them
//!
//! A mirrored hierarchy is a tree of [`Node`]s: folder nodes carry their
//! children in provider enumeration order, file nodes are leaves. The tree is
//! materialized in full before any downstream use; there is no lazy
//! traversal. Serde representation matches the persisted snapshot shape:
//!
//! ```json
//! {
//!   "type": "FOLDER",
//!   "object": { "id": "...", "name": "..." },
//!   "content": [ { "type": "FILE", "object": { ... } } ]
//! }
//! ```
//!
//! [`build`] walks the provider with an explicit work-stack rather than
//! call-stack recursion, so hierarchies hundreds of levels deep cannot
//! overflow the stack.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::provider::{DriveProvider, FileHandle, FolderHandle};

/// One storage object in a mirrored hierarchy. Files have no children by
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    #[serde(rename = "FOLDER")]
    Folder {
        #[serde(rename = "object")]
        handle: FolderHandle,
        #[serde(rename = "content")]
        children: Vec<Node>,
    },
    #[serde(rename = "FILE")]
    File {
        #[serde(rename = "object")]
        handle: FileHandle,
    },
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Folder { handle, .. } => &handle.name,
            Node::File { handle } => &handle.name,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Folder { .. })
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Folder { children, .. } => children,
            Node::File { .. } => &[],
        }
    }
}

/// A folder whose enumerations have been fetched but whose `Node` has not
/// been assembled yet.
struct PendingFolder {
    handle: FolderHandle,
    subfolder_indices: Vec<usize>,
    files: Vec<FileHandle>,
}

/// Mirror the hierarchy under `root` into a [`Node`] tree.
///
/// Within each folder, sub-folders come first (in enumeration order), then
/// files. With `drive_only` set, only provider-native documents are admitted;
/// sub-folders are never filtered. The build is all-or-nothing: the first
/// provider error aborts it, and no partial tree is returned.
pub fn build<P: DriveProvider>(
    provider: &P,
    root: &FolderHandle,
    drive_only: bool,
) -> Result<Node> {
    let mut arena = vec![PendingFolder {
        handle: root.clone(),
        subfolder_indices: Vec::new(),
        files: Vec::new(),
    }];
    let mut work = vec![0usize];

    while let Some(idx) = work.pop() {
        let handle = arena[idx].handle.clone();
        let subfolders = provider.list_folders(&handle)?;
        let files = provider.list_files(&handle)?;
        log::debug!(
            "folder {} listed: {} folder(s), {} file(s)",
            handle.name,
            subfolders.len(),
            files.len()
        );

        let mut indices = Vec::with_capacity(subfolders.len());
        for subfolder in subfolders {
            let child = arena.len();
            arena.push(PendingFolder {
                handle: subfolder,
                subfolder_indices: Vec::new(),
                files: Vec::new(),
            });
            indices.push(child);
            work.push(child);
        }
        arena[idx].subfolder_indices = indices;
        arena[idx].files = files
            .into_iter()
            .filter(|file| !drive_only || file.is_native_document())
            .collect();
    }

    // Children always sit at higher arena indices than their parent, so
    // popping from the end assembles every child before its parent asks for
    // it.
    let mut built: Vec<Option<Node>> = Vec::new();
    built.resize_with(arena.len(), || None);
    while let Some(entry) = arena.pop() {
        let idx = arena.len();
        let mut children =
            Vec::with_capacity(entry.subfolder_indices.len() + entry.files.len());
        for child in entry.subfolder_indices {
            let node = built[child]
                .take()
                .expect("child folder assembled before its parent");
            children.push(node);
        }
        children.extend(entry.files.into_iter().map(|handle| Node::File { handle }));
        built[idx] = Some(Node::Folder {
            handle: entry.handle,
            children,
        });
    }
    Ok(built[0]
        .take()
        .expect("root folder assembled last"))
}
