//! Abstract storage provider capability
//!
//! The rest of the crate never talks to a concrete storage backend directly.
//! Everything goes through [`DriveProvider`], which models the four primitives
//! the system needs: list sub-folders, list files, create a folder, copy a
//! file. Handles are plain serializable records rather than opaque pointers
//! because a mirrored tree has to survive a round trip through the chunked
//! property store and still name the objects it refers to.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Reference to a provider-managed folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderHandle {
    pub id: String,
    pub name: String,
}

impl FolderHandle {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        FolderHandle {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Reference to a provider-managed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub id: String,
    pub name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

impl FileHandle {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        FileHandle {
            id: id.into(),
            name: name.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Whether this file is a provider-native document (e.g. an
    /// `application/vnd.google-apps.*` type) as opposed to an arbitrary
    /// uploaded blob. The `drive_only` traversal filter admits only these.
    pub fn is_native_document(&self) -> bool {
        self.mime_type.contains("google")
    }
}

/// The storage capability the tree builder and copy engine are written
/// against.
///
/// Enumeration order of [`list_folders`](DriveProvider::list_folders) and
/// [`list_files`](DriveProvider::list_files) is provider-defined but must be
/// stable for a given folder; child order in the mirrored tree is exactly
/// this order. Implementations that talk to a remote service should bound
/// each call with a deadline and surface [`Error::Timeout`] when it expires.
///
/// [`Error::Timeout`]: crate::error::Error::Timeout
pub trait DriveProvider {
    /// The provider's root folder (the target of a copy when no target id is
    /// given).
    fn root_folder(&self) -> Result<FolderHandle>;

    /// Resolve a folder id. Fails with `NotFound` for an unknown id.
    fn folder_by_id(&self, id: &str) -> Result<FolderHandle>;

    fn list_folders(&self, folder: &FolderHandle) -> Result<Vec<FolderHandle>>;

    fn list_files(&self, folder: &FolderHandle) -> Result<Vec<FileHandle>>;

    fn create_folder(&mut self, parent: &FolderHandle, name: &str) -> Result<FolderHandle>;

    fn copy_file(
        &mut self,
        file: &FileHandle,
        name: &str,
        dest: &FolderHandle,
    ) -> Result<FileHandle>;
}

impl<D: DriveProvider + ?Sized> DriveProvider for &mut D {
    fn root_folder(&self) -> Result<FolderHandle> {
        (**self).root_folder()
    }

    fn folder_by_id(&self, id: &str) -> Result<FolderHandle> {
        (**self).folder_by_id(id)
    }

    fn list_folders(&self, folder: &FolderHandle) -> Result<Vec<FolderHandle>> {
        (**self).list_folders(folder)
    }

    fn list_files(&self, folder: &FolderHandle) -> Result<Vec<FileHandle>> {
        (**self).list_files(folder)
    }

    fn create_folder(&mut self, parent: &FolderHandle, name: &str) -> Result<FolderHandle> {
        (**self).create_folder(parent, name)
    }

    fn copy_file(
        &mut self,
        file: &FileHandle,
        name: &str,
        dest: &FolderHandle,
    ) -> Result<FileHandle> {
        (**self).copy_file(file, name, dest)
    }
}
