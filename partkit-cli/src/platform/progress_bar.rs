use indicatif::{ProgressBar, ProgressStyle};

use partkit_core::traits::progress::Progress;
use partkit_core::Fragment;

/// Byte-based terminal progress bar backed by indicatif.
pub struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    pub fn new(total_bytes: u64) -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(total_bytes);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg} ({eta})")
                .map_err(|e| format!("progress bar template error: {e}"))?
                .progress_chars("#>-"),
        );
        Ok(Self { bar })
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Progress for TerminalProgress {
    fn advance(&self, bytes: u64) {
        self.bar.inc(bytes);
    }

    fn fragment_done(&self, fragment: &Fragment) {
        self.bar.set_message(fragment.file_name());
    }
}
