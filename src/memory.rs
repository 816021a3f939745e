//! In-memory drive
//!
//! A [`DriveProvider`] backed by hash maps, with deterministic (insertion
//! order) enumeration. Used by the test suite and handy for demos; it is not
//! a production backend.

use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::provider::{DriveProvider, FileHandle, FolderHandle};

const ROOT_ID: &str = "root";

#[derive(Debug)]
struct FolderRecord {
    handle: FolderHandle,
    subfolder_ids: Vec<String>,
    file_ids: Vec<String>,
}

#[derive(Debug, Default)]
pub struct MemoryDrive {
    folders: HashMap<String, FolderRecord>,
    files: HashMap<String, FileHandle>,
    denied: HashSet<String>,
    next_id: u64,
}

impl MemoryDrive {
    pub fn new() -> Self {
        let mut drive = MemoryDrive::default();
        drive.folders.insert(
            ROOT_ID.to_string(),
            FolderRecord {
                handle: FolderHandle::new(ROOT_ID, "My Drive"),
                subfolder_ids: Vec::new(),
                file_ids: Vec::new(),
            },
        );
        drive
    }

    fn mint_id(&mut self) -> String {
        self.next_id += 1;
        format!("obj-{}", self.next_id)
    }

    fn folder_record(&self, id: &str) -> Result<&FolderRecord> {
        self.folders
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("no folder with id {id}")))
    }

    fn check_access(&self, id: &str) -> Result<()> {
        if self.denied.contains(id) {
            return Err(Error::PermissionDenied(format!("object {id} is denied")));
        }
        Ok(())
    }

    /// Seed a folder under `parent_id`.
    pub fn add_folder(&mut self, parent_id: &str, name: &str) -> Result<FolderHandle> {
        self.folder_record(parent_id)?;
        let id = self.mint_id();
        let handle = FolderHandle::new(id.clone(), name);
        self.folders.insert(
            id.clone(),
            FolderRecord {
                handle: handle.clone(),
                subfolder_ids: Vec::new(),
                file_ids: Vec::new(),
            },
        );
        if let Some(parent) = self.folders.get_mut(parent_id) {
            parent.subfolder_ids.push(id);
        }
        Ok(handle)
    }

    /// Seed a file under `parent_id`.
    pub fn add_file(&mut self, parent_id: &str, name: &str, mime_type: &str) -> Result<FileHandle> {
        self.folder_record(parent_id)?;
        let id = self.mint_id();
        let handle = FileHandle::new(id.clone(), name, mime_type);
        self.files.insert(id.clone(), handle.clone());
        if let Some(parent) = self.folders.get_mut(parent_id) {
            parent.file_ids.push(id);
        }
        Ok(handle)
    }

    /// Mark an object so that further operations on it fail with
    /// `PermissionDenied`. Lets tests exercise fail-fast propagation.
    pub fn deny(&mut self, id: &str) {
        self.denied.insert(id.to_string());
    }
}

impl DriveProvider for MemoryDrive {
    fn root_folder(&self) -> Result<FolderHandle> {
        Ok(self.folder_record(ROOT_ID)?.handle.clone())
    }

    fn folder_by_id(&self, id: &str) -> Result<FolderHandle> {
        self.check_access(id)?;
        Ok(self.folder_record(id)?.handle.clone())
    }

    fn list_folders(&self, folder: &FolderHandle) -> Result<Vec<FolderHandle>> {
        self.check_access(&folder.id)?;
        let record = self.folder_record(&folder.id)?;
        record
            .subfolder_ids
            .iter()
            .map(|id| Ok(self.folder_record(id)?.handle.clone()))
            .collect()
    }

    fn list_files(&self, folder: &FolderHandle) -> Result<Vec<FileHandle>> {
        self.check_access(&folder.id)?;
        let record = self.folder_record(&folder.id)?;
        record
            .file_ids
            .iter()
            .map(|id| {
                self.files
                    .get(id)
                    .cloned()
                    .ok_or_else(|| Error::NotFound(format!("no file with id {id}")))
            })
            .collect()
    }

    fn create_folder(&mut self, parent: &FolderHandle, name: &str) -> Result<FolderHandle> {
        self.check_access(&parent.id)?;
        self.add_folder(&parent.id, name)
    }

    fn copy_file(
        &mut self,
        file: &FileHandle,
        name: &str,
        dest: &FolderHandle,
    ) -> Result<FileHandle> {
        self.check_access(&file.id)?;
        self.check_access(&dest.id)?;
        self.folder_record(&dest.id)?;
        if !self.files.contains_key(&file.id) {
            return Err(Error::NotFound(format!("no file with id {}", file.id)));
        }
        self.add_file(&dest.id, name, &file.mime_type)
    }
}
