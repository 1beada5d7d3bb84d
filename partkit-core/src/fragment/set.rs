use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::FragmentConfig;
use crate::error::{PartKitError, Result};
use crate::fragment::name::{has_fragment_extension, parse};
use crate::fragment::Fragment;

/// Validated, numerically ordered fragments of one origin file.
#[derive(Debug, Clone)]
pub struct FragmentSet {
    directory: PathBuf,
    origin_name: String,
    fragments: Vec<Fragment>,
}

impl FragmentSet {
    /// Find every fragment directly inside `directory`.
    ///
    /// Only regular files (after following symlinks) ending in the fragment
    /// extension are considered. The result is sorted by parsed order and
    /// checked to be one complete set: a single origin name and orders
    /// `1..=n` with no duplicates.
    pub fn discover(directory: &Path, config: &FragmentConfig) -> Result<Self> {
        let is_dir = fs::metadata(directory).map(|m| m.is_dir()).unwrap_or(false);
        if !is_dir {
            return Err(PartKitError::DirectoryNotFound(directory.to_path_buf()));
        }

        let entries = fs::read_dir(directory).map_err(|e| {
            PartKitError::Io(format!("read directory {} failed: {e}", directory.display()))
        })?;

        let mut fragments = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                PartKitError::Io(format!("read entry in {} failed: {e}", directory.display()))
            })?;

            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!("Skipping non UTF-8 file name {:?}", raw);
                    continue;
                }
            };
            if !has_fragment_extension(&name, config) {
                continue;
            }

            let path = entry.path();
            let metadata = match fs::metadata(&path) {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) => {
                    warn!("Skipping {}: {e}", path.display());
                    continue;
                }
            };

            let parsed = parse(&name, config)?;
            fragments.push(Fragment {
                order: parsed.order,
                origin_name: parsed.origin_name,
                path,
                size: metadata.len(),
            });
        }

        if fragments.is_empty() {
            return Err(PartKitError::NoFragmentsFound(directory.to_path_buf()));
        }

        fragments.sort_by_key(|f| f.order);
        let origin_name = validate(&fragments)?;

        debug!(
            "Discovered {} fragments of {} in {}",
            fragments.len(),
            origin_name,
            directory.display()
        );

        Ok(Self {
            directory: directory.to_path_buf(),
            origin_name,
            fragments,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Base name of the file the fragments were cut from.
    pub fn origin_name(&self) -> &str {
        &self.origin_name
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Sum of all fragment sizes, i.e. the size of the merged file.
    pub fn total_size(&self) -> u64 {
        self.fragments.iter().map(|f| f.size).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.fragments.iter()
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }
}

impl<'a> IntoIterator for &'a FragmentSet {
    type Item = &'a Fragment;
    type IntoIter = std::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.iter()
    }
}

/// Check a sorted, non-empty fragment list and return its shared origin name.
fn validate(sorted: &[Fragment]) -> Result<String> {
    let expected = sorted[0].origin_name.clone();

    if let Some(other) = sorted.iter().find(|f| f.origin_name != expected) {
        return Err(PartKitError::MixedFragments {
            expected,
            found: other.origin_name.clone(),
        });
    }

    if let Some(pair) = sorted.windows(2).find(|w| w[0].order == w[1].order) {
        return Err(PartKitError::DuplicateFragment(pair[0].order));
    }

    for (i, fragment) in sorted.iter().enumerate() {
        let want = i as u32 + 1;
        if fragment.order != want {
            return Err(PartKitError::MissingFragment(want));
        }
    }

    Ok(expected)
}
