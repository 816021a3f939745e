//! drivecopy
//! ---------
//!
//! Mirror a Drive-style folder hierarchy into memory, persist it across
//! sessions despite a per-value size ceiling on the backing key-value store,
//! project it into a rectangular row grid for review in a sheet-like
//! surface, and replicate a selected subtree into a new location.
//!
//! The pieces, bottom-up:
//!
//! - [`tree::build`] walks a [`provider::DriveProvider`] and materializes a
//!   [`tree::Node`] tree (iteratively, so depth is not bounded by the call
//!   stack).
//! - [`chunk::ChunkedStore`] splits the serialized tree into bounded slices
//!   under a [`store::PropertyStore`] and reassembles it byte-exactly.
//! - [`flatten::flatten`] projects the tree into toggle/indent/label rows;
//!   [`flatten::range_for_row`] maps a toggled row back to its subtree's row
//!   block for show/hide.
//! - [`copy::copy`] recreates the folder structure and duplicates each file
//!   into a destination folder.
//! - [`session::Session`] drives the whole flow with the persisted keys the
//!   host surface expects (`sourceFolderId`, `driveOnly`, `driveObject-*`,
//!   `targetFolderId`).
//!
//! ```rust
//! use drivecopy::memory::MemoryDrive;
//! use drivecopy::provider::DriveProvider;
//! use drivecopy::session::Session;
//! use drivecopy::store::MemoryPropertyStore;
//!
//! fn main() -> drivecopy::Result<()> {
//!     let mut drive = MemoryDrive::new();
//!     let root = drive.root_folder()?;
//!     let source = drive.add_folder(&root.id, "reports")?;
//!     drive.add_file(&source.id, "q3", "application/vnd.google-apps.document")?;
//!     let target = drive.add_folder(&root.id, "backup")?;
//!
//!     let mut session = Session::new(drive, MemoryPropertyStore::new());
//!     let (rows, max_level) = session
//!         .save_source_folder(&source.id, false, None)?
//!         .expect("no one-shot target given, so rows are returned");
//!     assert_eq!(rows.len(), 2);
//!     assert_eq!(max_level, 1);
//!
//!     session.copy_to_target(&target.id)?;
//!     Ok(())
//! }
//! ```

pub mod chunk;
pub mod copy;
pub mod error;
pub mod flatten;
pub mod memory;
pub mod provider;
pub mod session;
pub mod store;
pub mod tree;

pub use chunk::{ChunkedStore, MAX_CHUNK};
pub use error::{Error, Result};
pub use flatten::{flatten, range_for_row, Cell, Row, RowRange};
pub use provider::{DriveProvider, FileHandle, FolderHandle};
pub use session::{Session, TreeSnapshot};
pub use store::{JsonFileStore, MemoryPropertyStore, PropertyStore};
pub use tree::{build, Node};
