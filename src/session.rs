//! Copy-session orchestration
//!
//! Ties the pieces together the way the host surface drives them: a user
//! picks a source folder (optionally with the `driveOnly` filter), the tree
//! is mirrored and either copied straight to a target or persisted as a
//! chunked snapshot and projected to rows for review; later, a target is
//! picked and the persisted snapshot is replicated into it.
//!
//! The property keys written here (`sourceFolderId`, `targetFolderId`,
//! `driveOnly`, the `driveObject-*` chunk family) are the session's durable
//! state; any [`PropertyStore`] works, including [`JsonFileStore`] for state
//! that outlives the process.
//!
//! [`JsonFileStore`]: crate::store::JsonFileStore

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chunk::ChunkedStore;
use crate::copy;
use crate::error::{Error, Result};
use crate::flatten::{flatten, Row};
use crate::provider::{DriveProvider, FolderHandle};
use crate::store::PropertyStore;
use crate::tree::{self, Node};

pub const KEY_SOURCE_FOLDER_ID: &str = "sourceFolderId";
pub const KEY_TARGET_FOLDER_ID: &str = "targetFolderId";
pub const KEY_DRIVE_ONLY: &str = "driveOnly";
pub const KEY_DRIVE_OBJECT: &str = "driveObject";

/// Current snapshot schema. Bumped whenever the serialized shape changes, so
/// a snapshot written by an incompatible version reads as unsupported rather
/// than as silently wrong data.
pub const SNAPSHOT_VERSION: u32 = 1;

/// The persisted form of a mirrored tree: the tree plus a schema version and
/// the time it was taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub version: u32,
    #[serde(rename = "savedAt")]
    pub saved_at: DateTime<Utc>,
    pub tree: Node,
}

/// One user-facing copy session over a provider and a property store. Both
/// are injected; the session holds no ambient state.
pub struct Session<P, S> {
    provider: P,
    props: S,
}

impl<P: DriveProvider, S: PropertyStore> Session<P, S> {
    pub fn new(provider: P, props: S) -> Self {
        Session { provider, props }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Select and mirror a source folder.
    ///
    /// Persists `sourceFolderId` and `driveOnly`, then builds the tree. With
    /// a `target_id` the tree is copied immediately (one-shot mode) and no
    /// rows are produced. Without one, the tree is persisted as a chunked
    /// snapshot under `driveObject` and the flattened `(rows, max_level)`
    /// projection is returned for display.
    pub fn save_source_folder(
        &mut self,
        source_id: &str,
        drive_only: bool,
        target_id: Option<&str>,
    ) -> Result<Option<(Vec<Row>, usize)>> {
        if source_id.is_empty() {
            return Err(Error::ValidationError("Invalid folder ID".to_string()));
        }
        let source = self.provider.folder_by_id(source_id)?;
        self.props.set_property(KEY_SOURCE_FOLDER_ID, source_id)?;
        self.props
            .set_property(KEY_DRIVE_ONLY, if drive_only { "true" } else { "false" })?;
        log::info!("Folder ID {} saved", source_id);

        let root = tree::build(&self.provider, &source, drive_only)?;
        match target_id {
            Some(target_id) => {
                self.copy_tree(target_id, &root)?;
                Ok(None)
            }
            None => {
                let snapshot = TreeSnapshot {
                    version: SNAPSHOT_VERSION,
                    saved_at: Utc::now(),
                    tree: root,
                };
                ChunkedStore::new(&mut self.props).put(KEY_DRIVE_OBJECT, &snapshot)?;
                log::info!("DriveObject saved");
                Ok(Some(flatten(&snapshot.tree)))
            }
        }
    }

    /// Replicate the persisted snapshot into the target folder. An empty
    /// `target_id` means the provider's root folder.
    pub fn copy_to_target(&mut self, target_id: &str) -> Result<()> {
        let target = self.resolve_target(target_id)?;
        let snapshot: TreeSnapshot = ChunkedStore::new(&mut self.props)
            .get(KEY_DRIVE_OBJECT)?
            .ok_or_else(|| {
                Error::ValidationError(
                    "DriveObject was not created - please select a source folder".to_string(),
                )
            })?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(Error::Corrupt(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        copy::copy(&mut self.provider, &target, &snapshot.tree)
    }

    /// A stored property's value, or the empty string when absent.
    pub fn stored_property(&self, key: &str) -> Result<String> {
        Ok(self.props.get_property(key)?.unwrap_or_default())
    }

    fn copy_tree(&mut self, target_id: &str, root: &Node) -> Result<()> {
        let target = self.resolve_target(target_id)?;
        copy::copy(&mut self.provider, &target, root)
    }

    fn resolve_target(&mut self, target_id: &str) -> Result<FolderHandle> {
        let target = if target_id.is_empty() {
            self.provider.root_folder()?
        } else {
            self.provider.folder_by_id(target_id)?
        };
        log::info!("Target folder {} opened", target.name);
        self.props.set_property(KEY_TARGET_FOLDER_ID, target_id)?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDrive;
    use crate::store::MemoryPropertyStore;

    fn seeded_session() -> (Session<MemoryDrive, MemoryPropertyStore>, String, String) {
        let mut drive = MemoryDrive::new();
        let root = drive.root_folder().unwrap();
        let src = drive.add_folder(&root.id, "project").unwrap();
        drive
            .add_file(&src.id, "plan", "application/vnd.google-apps.spreadsheet")
            .unwrap();
        drive.add_file(&src.id, "raw.bin", "application/octet-stream").unwrap();
        let dest = drive.add_folder(&root.id, "archive").unwrap();
        (
            Session::new(drive, MemoryPropertyStore::new()),
            src.id,
            dest.id,
        )
    }

    #[test]
    fn test_empty_source_id_is_invalid() {
        let (mut session, _, _) = seeded_session();
        match session.save_source_folder("", false, None) {
            Err(Error::ValidationError(msg)) => assert_eq!(msg, "Invalid folder ID"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_source_id_is_not_found() {
        let (mut session, _, _) = seeded_session();
        assert!(matches!(
            session.save_source_folder("nope", false, None),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_save_persists_state_and_returns_rows() {
        let (mut session, src_id, _) = seeded_session();
        let (rows, max_level) = session
            .save_source_folder(&src_id, false, None)
            .unwrap()
            .unwrap();

        assert_eq!(max_level, 1);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].label(), Some("project"));

        assert_eq!(
            session.stored_property(KEY_SOURCE_FOLDER_ID).unwrap(),
            src_id
        );
        assert_eq!(session.stored_property(KEY_DRIVE_ONLY).unwrap(), "false");
        assert_ne!(
            session.stored_property("driveObject-num").unwrap(),
            String::new()
        );
    }

    #[test]
    fn test_drive_only_is_applied_and_persisted() {
        let (mut session, src_id, _) = seeded_session();
        let (rows, _) = session
            .save_source_folder(&src_id, true, None)
            .unwrap()
            .unwrap();

        // Root row plus the native spreadsheet only.
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].label(), Some("plan"));
        assert_eq!(session.stored_property(KEY_DRIVE_ONLY).unwrap(), "true");
    }

    #[test]
    fn test_copy_without_snapshot_is_rejected() {
        let (mut session, _, dest_id) = seeded_session();
        match session.copy_to_target(&dest_id) {
            Err(Error::ValidationError(msg)) => {
                assert_eq!(msg, "DriveObject was not created - please select a source folder")
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn test_save_then_copy_roundtrip() {
        let (mut session, src_id, dest_id) = seeded_session();
        session.save_source_folder(&src_id, false, None).unwrap();
        session.copy_to_target(&dest_id).unwrap();

        let dest = session.provider().folder_by_id(&dest_id).unwrap();
        let copied = session.provider().list_folders(&dest).unwrap();
        assert_eq!(copied.len(), 1);
        assert_eq!(copied[0].name, "project");

        let files = session.provider().list_files(&copied[0]).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["plan", "raw.bin"]);
        assert_eq!(
            session.stored_property(KEY_TARGET_FOLDER_ID).unwrap(),
            dest_id
        );
    }

    #[test]
    fn test_one_shot_copy_skips_snapshot() {
        let (mut session, src_id, dest_id) = seeded_session();
        let rows = session
            .save_source_folder(&src_id, false, Some(&dest_id))
            .unwrap();
        assert!(rows.is_none());

        assert_eq!(session.stored_property("driveObject-num").unwrap(), "");
        let dest = session.provider().folder_by_id(&dest_id).unwrap();
        assert_eq!(session.provider().list_folders(&dest).unwrap().len(), 1);
    }

    #[test]
    fn test_empty_target_id_copies_to_root() {
        let (mut session, src_id, _) = seeded_session();
        session.save_source_folder(&src_id, false, None).unwrap();
        session.copy_to_target("").unwrap();

        let root = session.provider().root_folder().unwrap();
        let names: Vec<String> = session
            .provider()
            .list_folders(&root)
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        // Seeded "project" and "archive", plus the copy of "project".
        assert_eq!(names, vec!["project", "archive", "project"]);
    }

    #[test]
    fn test_future_snapshot_version_is_unsupported() {
        let (mut session, src_id, dest_id) = seeded_session();
        session.save_source_folder(&src_id, false, None).unwrap();

        // Rewrite the snapshot with a version from the future.
        let mut snapshot: TreeSnapshot = ChunkedStore::new(&mut session.props)
            .get(KEY_DRIVE_OBJECT)
            .unwrap()
            .unwrap();
        snapshot.version = SNAPSHOT_VERSION + 1;
        ChunkedStore::new(&mut session.props)
            .put(KEY_DRIVE_OBJECT, &snapshot)
            .unwrap();

        assert!(matches!(
            session.copy_to_target(&dest_id),
            Err(Error::Corrupt(_))
        ));
    }
}
