use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::chunking::stream::{read_some, window};
use crate::config::FragmentConfig;
use crate::constants::DEFAULT_CHUNK_SIZE;
use crate::error::{PartKitError, Result};
use crate::fragment::name::{has_fragment_extension, parse, render};
use crate::fragment::Fragment;
use crate::traits::progress::{NoProgress, Progress};

/// Cuts a file into ordered fragment files beside it.
///
/// Memory use is bounded by the configured buffer size, independent of both
/// the file size and the chunk size.
pub struct Splitter {
    config: FragmentConfig,
}

impl Splitter {
    pub fn new(config: FragmentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FragmentConfig {
        &self.config
    }

    /// Split `source` into fragments of `chunk_size` bytes (the last one may
    /// be shorter). An empty source produces no fragments.
    pub fn split(&self, source: &Path, chunk_size: u64) -> Result<Vec<Fragment>> {
        self.split_with_progress(source, chunk_size, &NoProgress)
    }

    /// Split with the default 1 MiB chunk size.
    pub fn split_default(&self, source: &Path) -> Result<Vec<Fragment>> {
        self.split(source, DEFAULT_CHUNK_SIZE)
    }

    /// Split `source`, reporting every copied byte and finished fragment.
    ///
    /// On an I/O error the fragments written so far are left on disk.
    pub fn split_with_progress(
        &self,
        source: &Path,
        chunk_size: u64,
        progress: &dyn Progress,
    ) -> Result<Vec<Fragment>> {
        if chunk_size == 0 {
            return Err(PartKitError::InvalidChunkSize(chunk_size));
        }

        let source_len = fs::metadata(source)
            .ok()
            .filter(|m| m.is_file())
            .map(|m| m.len())
            .ok_or_else(|| PartKitError::SourceNotFound(source.to_path_buf()))?;

        let origin_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| PartKitError::InvalidFileName(source.display().to_string()))?
            .to_string();

        let directory = match source.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        debug!(
            "Splitting {} ({} bytes) into {} byte chunks, buffer {} bytes",
            source.display(),
            source_len,
            chunk_size,
            self.config.buffer_size
        );

        let mut input = File::open(source)
            .map_err(|e| PartKitError::Io(format!("open {} failed: {e}", source.display())))?;
        let mut buffer = vec![0u8; self.config.buffer_size];
        let mut fragments: Vec<Fragment> = Vec::new();

        loop {
            let want = window(buffer.len(), chunk_size);
            let read = read_some(&mut input, &mut buffer[..want])
                .map_err(|e| PartKitError::Io(format!("read {} failed: {e}", source.display())))?;
            if read == 0 {
                break;
            }

            let order = next_order(fragments.len())?;
            let name = render(order, &origin_name, &self.config);
            let path = directory.join(&name);

            let size = write_fragment(
                &mut input,
                &mut buffer,
                read,
                chunk_size,
                source,
                &path,
                progress,
            )?;

            info!("{name} is created ({size} bytes)");
            let fragment = Fragment {
                order,
                origin_name: origin_name.clone(),
                path,
                size,
            };
            progress.fragment_done(&fragment);
            fragments.push(fragment);
        }

        self.remove_stale(&directory, &origin_name, &fragments)?;

        info!(
            "Split {} complete, {} fragments",
            origin_name,
            fragments.len()
        );
        Ok(fragments)
    }

    /// Delete fragments of `origin_name` left in `directory` by an earlier
    /// split that are not part of `current`, so a later merge only sees the
    /// new set.
    fn remove_stale(
        &self,
        directory: &Path,
        origin_name: &str,
        current: &[Fragment],
    ) -> Result<()> {
        let list_err = |e: std::io::Error| {
            PartKitError::Io(format!("read directory {} failed: {e}", directory.display()))
        };

        for entry in fs::read_dir(directory).map_err(list_err)? {
            let entry = entry.map_err(list_err)?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !has_fragment_extension(&name, &self.config) {
                continue;
            }
            let Ok(parsed) = parse(&name, &self.config) else {
                continue;
            };
            if parsed.origin_name != origin_name || current.iter().any(|f| f.file_name() == name) {
                continue;
            }

            let path = entry.path();
            if !fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false) {
                continue;
            }
            warn!("Removing stale fragment {name} from an earlier split");
            fs::remove_file(&path).map_err(|e| {
                PartKitError::Io(format!("remove stale fragment {} failed: {e}", path.display()))
            })?;
        }
        Ok(())
    }
}

/// 1-based order of the fragment following `written` finished ones.
fn next_order(written: usize) -> Result<u32> {
    written
        .checked_add(1)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(PartKitError::TooManyFragments)
}

/// Write one fragment: the `first` bytes already sitting in `buffer`, then
/// more of `input` until the fragment holds `chunk_size` bytes or the input
/// ends. The output handle is closed when this returns.
fn write_fragment(
    input: &mut File,
    buffer: &mut [u8],
    first: usize,
    chunk_size: u64,
    source: &Path,
    path: &Path,
    progress: &dyn Progress,
) -> Result<u64> {
    let write_err =
        |e: std::io::Error| PartKitError::Io(format!("write {} failed: {e}", path.display()));
    let read_err =
        |e: std::io::Error| PartKitError::Io(format!("read {} failed: {e}", source.display()));

    let mut output = File::create(path).map_err(write_err)?;
    output.write_all(&buffer[..first]).map_err(write_err)?;
    let mut written = first as u64;
    progress.advance(first as u64);

    while written < chunk_size {
        let want = window(buffer.len(), chunk_size - written);
        let read = read_some(input, &mut buffer[..want]).map_err(read_err)?;
        if read == 0 {
            break;
        }
        output.write_all(&buffer[..read]).map_err(write_err)?;
        written += read as u64;
        progress.advance(read as u64);
    }

    output.flush().map_err(write_err)?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    fn tiny(buffer_size: usize) -> Splitter {
        Splitter::new(FragmentConfig::with_buffer_size(buffer_size).unwrap())
    }

    #[test]
    fn test_split_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("empty.dat");
        fs::write(&source, b"").unwrap();

        let fragments = tiny(4).split(&source, 10).unwrap();
        assert!(fragments.is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_split_small_file_single_fragment() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("small.txt");
        fs::write(&source, b"hello").unwrap();

        let fragments = tiny(3).split(&source, 100).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].file_name(), "001.small.txt.part");
        assert_eq!(fragments[0].size, 5);
        assert_eq!(fs::read(&fragments[0].path).unwrap(), b"hello");
    }

    #[test]
    fn test_split_exact_multiple() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("even.bin");
        let data = pattern(30);
        fs::write(&source, &data).unwrap();

        let fragments = tiny(4).split(&source, 10).unwrap();
        assert_eq!(fragments.len(), 3);
        for (i, fragment) in fragments.iter().enumerate() {
            assert_eq!(fragment.order, i as u32 + 1);
            assert_eq!(fragment.size, 10);
            assert_eq!(fs::read(&fragment.path).unwrap(), &data[i * 10..(i + 1) * 10]);
        }
    }

    #[test]
    fn test_split_with_remainder() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("odd.bin");
        let data = pattern(23);
        fs::write(&source, &data).unwrap();

        let fragments = tiny(7).split(&source, 10).unwrap();
        let sizes: Vec<u64> = fragments.iter().map(|f| f.size).collect();
        assert_eq!(sizes, vec![10, 10, 3]);
        assert_eq!(fs::read(&fragments[2].path).unwrap(), &data[20..]);
    }

    #[test]
    fn test_split_chunk_smaller_than_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("c.bin");
        fs::write(&source, pattern(9)).unwrap();

        let fragments = tiny(64).split(&source, 2).unwrap();
        assert_eq!(fragments.len(), 5);
        assert_eq!(fragments[4].size, 1);
        assert_eq!(fragments[4].file_name(), "005.c.bin.part");
    }

    #[test]
    fn test_split_keeps_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("keep.me");
        fs::write(&source, b"0123456789").unwrap();

        tiny(2).split(&source, 4).unwrap();
        assert_eq!(fs::read(&source).unwrap(), b"0123456789");
    }

    #[test]
    fn test_split_concrete_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("data.bin");
        fs::write(&source, pattern(2_500_000)).unwrap();

        let splitter = Splitter::new(FragmentConfig::default());
        let fragments = splitter.split(&source, 1_000_000).unwrap();
        let summary: Vec<(String, u64)> =
            fragments.iter().map(|f| (f.file_name(), f.size)).collect();
        assert_eq!(
            summary,
            vec![
                ("001.data.bin.part".to_string(), 1_000_000),
                ("002.data.bin.part".to_string(), 1_000_000),
                ("003.data.bin.part".to_string(), 500_000),
            ]
        );
    }

    #[test]
    fn test_split_missing_source() {
        let err = tiny(4).split(Path::new("/no/such/file"), 1024).unwrap_err();
        assert!(matches!(err, PartKitError::SourceNotFound(_)));
    }

    #[test]
    fn test_split_directory_is_not_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = tiny(4).split(dir.path(), 1024).unwrap_err();
        assert!(matches!(err, PartKitError::SourceNotFound(_)));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_split_zero_chunk_size() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.txt");
        fs::write(&source, b"abc").unwrap();

        let err = tiny(4).split(&source, 0).unwrap_err();
        assert!(matches!(err, PartKitError::InvalidChunkSize(0)));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[derive(Default)]
    struct Recorder {
        bytes: RefCell<u64>,
        done: RefCell<Vec<u32>>,
    }

    impl Progress for Recorder {
        fn advance(&self, bytes: u64) {
            *self.bytes.borrow_mut() += bytes;
        }

        fn fragment_done(&self, fragment: &Fragment) {
            self.done.borrow_mut().push(fragment.order);
        }
    }

    #[test]
    fn test_split_reports_progress() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("p.bin");
        fs::write(&source, pattern(25)).unwrap();

        let recorder = Recorder::default();
        tiny(3).split_with_progress(&source, 10, &recorder).unwrap();
        assert_eq!(*recorder.bytes.borrow(), 25);
        assert_eq!(*recorder.done.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_resplit_replaces_earlier_fragments() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("x.bin");
        let data = pattern(50);
        fs::write(&source, &data).unwrap();
        fs::write(dir.path().join("001.other.bin.part"), b"keep").unwrap();

        let first = tiny(4).split(&source, 10).unwrap();
        assert_eq!(first.len(), 5);
        let second = tiny(4).split(&source, 25).unwrap();
        assert_eq!(second.len(), 2);

        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec!["001.other.bin.part", "001.x.bin.part", "002.x.bin.part", "x.bin"]
        );

        fs::remove_file(&source).unwrap();
        fs::remove_file(dir.path().join("001.other.bin.part")).unwrap();
        let merged = crate::Merger::new(FragmentConfig::default())
            .merge(dir.path(), None)
            .unwrap();
        assert_eq!(fs::read(&merged.path).unwrap(), data);
    }

    #[test]
    fn test_resplit_removes_differently_padded_fragments() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("y.bin");
        fs::write(&source, pattern(8)).unwrap();
        fs::write(dir.path().join("1.y.bin.part"), b"old").unwrap();

        tiny(4).split(&source, 8).unwrap();
        assert!(!dir.path().join("1.y.bin.part").exists());
        assert!(dir.path().join("001.y.bin.part").exists());
    }

    #[test]
    fn test_empty_resplit_clears_earlier_fragments() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("z.bin");
        fs::write(&source, pattern(20)).unwrap();
        tiny(4).split(&source, 10).unwrap();

        fs::write(&source, b"").unwrap();
        assert!(tiny(4).split(&source, 10).unwrap().is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failure_midway_keeps_written_fragments() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("x.bin");
        fs::write(&source, pattern(25)).unwrap();
        // A directory in place of the second fragment makes its creation fail.
        fs::create_dir(dir.path().join("002.x.bin.part")).unwrap();

        let err = tiny(4).split(&source, 10).unwrap_err();
        assert!(matches!(err, PartKitError::Io(_)));
        let first = dir.path().join("001.x.bin.part");
        assert_eq!(fs::metadata(&first).unwrap().len(), 10);
    }

    #[test]
    fn test_next_order() {
        assert_eq!(next_order(0).unwrap(), 1);
        assert_eq!(next_order(41).unwrap(), 42);
        assert_eq!(next_order(u32::MAX as usize - 1).unwrap(), u32::MAX);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_next_order_past_limit() {
        assert!(matches!(
            next_order(u32::MAX as usize),
            Err(PartKitError::TooManyFragments)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_split_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join(OsStr::from_bytes(b"bad\xffname.bin"));
        fs::write(&source, b"abc").unwrap();

        let err = tiny(4).split(&source, 2).unwrap_err();
        assert!(matches!(err, PartKitError::InvalidFileName(_)));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
