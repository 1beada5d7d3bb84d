//! Fragment files: naming scheme and discovery of fragment sets.

pub mod name;
pub mod set;

use std::path::PathBuf;

pub use name::ParsedName;
pub use set::FragmentSet;

/// One fragment file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// 1-based position in the original file.
    pub order: u32,
    /// Base name of the file this fragment was cut from.
    pub origin_name: String,
    pub path: PathBuf,
    pub size: u64,
}

impl Fragment {
    /// File name component of the fragment path.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
