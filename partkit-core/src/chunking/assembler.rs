use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::chunking::stream::copy_through;
use crate::config::FragmentConfig;
use crate::error::{PartKitError, Result};
use crate::fragment::FragmentSet;
use crate::traits::progress::{NoProgress, Progress};

/// Outcome of a successful merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub fragments_merged: usize,
    /// Fragments actually deleted afterwards; lower than `fragments_merged`
    /// only if some deletions failed.
    pub fragments_removed: usize,
}

/// Reassembles a fragment directory into the original file.
pub struct Merger {
    config: FragmentConfig,
}

impl Merger {
    pub fn new(config: FragmentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FragmentConfig {
        &self.config
    }

    /// Find and validate the fragment set in `directory` without touching it.
    pub fn discover(&self, directory: &Path) -> Result<FragmentSet> {
        FragmentSet::discover(directory, &self.config)
    }

    /// Merge the fragments in `directory` into one file in the same
    /// directory, then delete the fragments.
    ///
    /// Without `output_name` the origin name recorded in the fragment names
    /// is used.
    pub fn merge(&self, directory: &Path, output_name: Option<&str>) -> Result<MergedFile> {
        self.merge_with_progress(directory, output_name, &NoProgress)
    }

    /// Merge, reporting every copied byte and each consumed fragment.
    ///
    /// If copying fails, the partial output and every fragment stay on disk.
    pub fn merge_with_progress(
        &self,
        directory: &Path,
        output_name: Option<&str>,
        progress: &dyn Progress,
    ) -> Result<MergedFile> {
        let set = self.discover(directory)?;
        let name = match output_name {
            Some(name) => name.to_string(),
            None => set.origin_name().to_string(),
        };
        check_output_name(&name, &set)?;

        let path = directory.join(&name);
        let size = self.concatenate(&set, &path, progress)?;
        info!("Merge of {} fragments into {} complete", set.len(), path.display());

        let mut removed = 0;
        for fragment in &set {
            match fs::remove_file(&fragment.path) {
                Ok(()) => removed += 1,
                Err(e) => warn!("Failed to delete {}: {e}", fragment.path.display()),
            }
        }
        info!("Deleted {removed}/{} fragment files", set.len());
        info!("Target merge file name is {name}");

        Ok(MergedFile {
            name,
            path,
            size,
            fragments_merged: set.len(),
            fragments_removed: removed,
        })
    }

    /// Stream every fragment, in order, into `destination`.
    fn concatenate(
        &self,
        set: &FragmentSet,
        destination: &Path,
        progress: &dyn Progress,
    ) -> Result<u64> {
        let write_err = |e: std::io::Error| {
            PartKitError::Io(format!("write {} failed: {e}", destination.display()))
        };

        let mut output = File::create(destination).map_err(write_err)?;
        let mut buffer = vec![0u8; self.config.buffer_size];
        let mut total = 0u64;

        for fragment in set {
            let mut input = File::open(&fragment.path).map_err(|e| {
                PartKitError::Io(format!("open {} failed: {e}", fragment.path.display()))
            })?;
            total += copy_through(&mut input, &mut output, &mut buffer, progress).map_err(|e| {
                PartKitError::Io(format!(
                    "copy {} into {} failed: {e}",
                    fragment.path.display(),
                    destination.display()
                ))
            })?;
            output.flush().map_err(write_err)?;

            info!("{} is merged", fragment.file_name());
            progress.fragment_done(fragment);
        }

        Ok(total)
    }
}

/// The output must be a plain file name that does not overwrite a fragment.
fn check_output_name(name: &str, set: &FragmentSet) -> Result<()> {
    let invalid = |why: &str| PartKitError::InvalidOutputName(format!("{name:?}: {why}"));

    if name.is_empty() {
        return Err(invalid("empty"));
    }
    if name == "." || name == ".." {
        return Err(invalid("not a file name"));
    }
    if name.contains(std::path::is_separator) || name.contains('/') {
        return Err(invalid("must not contain a path separator"));
    }
    if set.iter().any(|f| f.file_name() == name) {
        return Err(invalid("would overwrite a fragment"));
    }
    Ok(())
}
