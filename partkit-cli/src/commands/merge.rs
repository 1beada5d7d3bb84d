use std::path::Path;

use tracing::info;

use partkit_core::{FragmentConfig, Merger};

use crate::platform::TerminalProgress;

/// Merge the fragments in a directory and delete them afterwards.
pub fn run_merge(
    directory: &str,
    output: Option<&str>,
    config: FragmentConfig,
    skip_confirm: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = Path::new(directory);
    let merger = Merger::new(config);

    // Discover up front so the prompt can name what is about to be merged.
    let set = merger.discover(dir)?;
    let target = output.unwrap_or(set.origin_name());
    info!(
        "Found {} fragments of {} ({} bytes)",
        set.len(),
        set.origin_name(),
        set.total_size()
    );

    if !skip_confirm {
        eprintln!("The fragment files will be deleted after a successful merge.");
        eprint!("Merge {} fragments into \"{}\"? [y/N] ", set.len(), target);
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    let progress = TerminalProgress::new(set.total_size())?;
    let result = merger.merge_with_progress(dir, output, &progress);
    progress.finish();
    let merged = result?;

    println!();
    println!("Merge complete:");
    println!("  Output:    {}", merged.path.display());
    println!("  Size:      {} bytes", merged.size);
    println!("  Fragments: {} merged, {} deleted", merged.fragments_merged, merged.fragments_removed);

    Ok(())
}
