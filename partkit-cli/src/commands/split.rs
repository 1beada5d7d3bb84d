use std::path::Path;

use tracing::info;

use partkit_core::{FragmentConfig, Splitter};

use crate::platform::TerminalProgress;

/// Split a file into `.part` fragments next to it.
pub fn run_split(
    file_path: &str,
    chunk_size: u64,
    config: FragmentConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    let total = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    info!("Splitting {file_path} into {chunk_size} byte fragments");
    let splitter = Splitter::new(config);
    let progress = TerminalProgress::new(total)?;
    let result = splitter.split_with_progress(path, chunk_size, &progress);
    progress.finish();
    let fragments = result?;

    println!();
    println!("Split complete:");
    println!("  File:      {file_path}");
    println!("  Size:      {total} bytes");
    println!("  Fragments: {}", fragments.len());
    for fragment in &fragments {
        println!("    {} ({} bytes)", fragment.file_name(), fragment.size);
    }

    Ok(())
}
