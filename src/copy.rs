//! Subtree replication
//!
//! Recreates a mirrored tree inside a destination folder: folders are
//! created, files are duplicated under their original names, children in
//! tree order. The walk is fail-fast (the first provider error propagates
//! and aborts the remaining work) and deliberately not idempotent; running
//! it twice against the same destination yields duplicate folders and files,
//! matching storage providers that allow same-named siblings.

use crate::error::Result;
use crate::provider::{DriveProvider, FolderHandle};
use crate::tree::Node;

/// Replicate `node` into `dest`.
///
/// Uses an explicit work-stack, so trees of any depth copy without
/// exhausting the call stack. Sibling order is preserved.
pub fn copy<P: DriveProvider>(provider: &mut P, dest: &FolderHandle, node: &Node) -> Result<()> {
    let mut stack: Vec<(FolderHandle, &Node)> = vec![(dest.clone(), node)];
    while let Some((parent, node)) = stack.pop() {
        match node {
            Node::Folder { handle, children } => {
                let created = provider.create_folder(&parent, &handle.name)?;
                log::debug!("folder {} created under {}", created.name, parent.name);
                for child in children.iter().rev() {
                    stack.push((created.clone(), child));
                }
            }
            Node::File { handle } => {
                provider.copy_file(handle, &handle.name, &parent)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDrive;
    use crate::tree;

    #[test]
    fn test_copy_fidelity() {
        let mut drive = MemoryDrive::new();
        let root = drive.root_folder().unwrap();
        let f = drive.add_folder(&root.id, "F").unwrap();
        drive.add_file(&f.id, "X", "text/plain").unwrap();
        drive.add_folder(&f.id, "G").unwrap();
        let dest = drive.add_folder(&root.id, "D").unwrap();

        let mirrored = tree::build(&drive, &f, false).unwrap();
        copy(&mut drive, &dest, &mirrored).unwrap();

        let copied = drive.list_folders(&dest).unwrap();
        assert_eq!(copied.len(), 1);
        assert_eq!(copied[0].name, "F");

        let inner_folders = drive.list_folders(&copied[0]).unwrap();
        assert_eq!(inner_folders.len(), 1);
        assert_eq!(inner_folders[0].name, "G");
        assert!(drive.list_folders(&inner_folders[0]).unwrap().is_empty());
        assert!(drive.list_files(&inner_folders[0]).unwrap().is_empty());

        let inner_files = drive.list_files(&copied[0]).unwrap();
        assert_eq!(inner_files.len(), 1);
        assert_eq!(inner_files[0].name, "X");
        assert_eq!(inner_files[0].mime_type, "text/plain");
    }

    #[test]
    fn test_recopy_duplicates_rather_than_merges() {
        let mut drive = MemoryDrive::new();
        let root = drive.root_folder().unwrap();
        let f = drive.add_folder(&root.id, "F").unwrap();
        let dest = drive.add_folder(&root.id, "D").unwrap();

        let mirrored = tree::build(&drive, &f, false).unwrap();
        copy(&mut drive, &dest, &mirrored).unwrap();
        copy(&mut drive, &dest, &mirrored).unwrap();

        let copied = drive.list_folders(&dest).unwrap();
        assert_eq!(copied.len(), 2);
        assert!(copied.iter().all(|folder| folder.name == "F"));
    }

    #[test]
    fn test_failure_aborts_remaining_siblings() {
        let mut drive = MemoryDrive::new();
        let root = drive.root_folder().unwrap();
        let f = drive.add_folder(&root.id, "F").unwrap();
        let poisoned = drive.add_file(&f.id, "first", "text/plain").unwrap();
        drive.add_file(&f.id, "second", "text/plain").unwrap();
        let dest = drive.add_folder(&root.id, "D").unwrap();

        let mirrored = tree::build(&drive, &f, false).unwrap();
        drive.deny(&poisoned.id);
        assert!(copy(&mut drive, &dest, &mirrored).is_err());

        // The created F exists but nothing after the failing file does.
        let copied = drive.list_folders(&dest).unwrap();
        assert_eq!(copied.len(), 1);
        assert!(drive.list_files(&copied[0]).unwrap().is_empty());
    }

    #[test]
    fn test_deep_tree_copies_without_recursion() {
        let mut drive = MemoryDrive::new();
        let root = drive.root_folder().unwrap();
        let top = drive.add_folder(&root.id, "level-0").unwrap();
        let mut parent = top.clone();
        for level in 1..300 {
            parent = drive
                .add_folder(&parent.id, &format!("level-{level}"))
                .unwrap();
        }
        let dest = drive.add_folder(&root.id, "D").unwrap();

        let mirrored = tree::build(&drive, &top, false).unwrap();
        copy(&mut drive, &dest, &mirrored).unwrap();

        let mut cursor = dest;
        let mut depth = 0;
        loop {
            let subfolders = drive.list_folders(&cursor).unwrap();
            match subfolders.into_iter().next() {
                Some(next) => {
                    cursor = next;
                    depth += 1;
                }
                None => break,
            }
        }
        assert_eq!(depth, 300);
    }
}
