use crate::fragment::Fragment;

/// Receives progress events while bytes are streamed.
///
/// Both methods default to no-ops so implementors only pick what they show.
pub trait Progress {
    /// `bytes` more bytes have been copied.
    fn advance(&self, _bytes: u64) {}

    /// A fragment has been fully written (split) or fully consumed (merge).
    fn fragment_done(&self, _fragment: &Fragment) {}
}

/// Progress sink that ignores every event.
pub struct NoProgress;

impl Progress for NoProgress {}
