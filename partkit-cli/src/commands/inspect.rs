use std::path::Path;

use partkit_core::{FragmentConfig, Merger};

/// Show the fragment set in a directory without modifying anything.
pub fn run_inspect(
    directory: &str,
    config: FragmentConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let set = Merger::new(config).discover(Path::new(directory))?;

    println!("Fragment set in {directory}");
    println!("====================");
    println!("  Origin:    {}", set.origin_name());
    println!("  Fragments: {}", set.len());
    println!("  Total:     {} bytes", set.total_size());
    println!();
    for fragment in &set {
        println!("  {:>5}  {:>12}  {}", fragment.order, fragment.size, fragment.file_name());
    }

    Ok(())
}
