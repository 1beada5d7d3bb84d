//! Property-based tests for the split/merge engine.
//!
//! - Merging what was split reproduces the source byte for byte
//! - Fragment count and sizes follow from file length and chunk size
//! - Fragment names parse back to the order and origin they were built from

use std::fs;

use proptest::prelude::*;

use crate::fragment::name::{parse, render};
use crate::{FragmentConfig, Merger, Splitter};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn split_then_merge_roundtrips(
        data in proptest::collection::vec(any::<u8>(), 0..2048),
        chunk_size in 1u64..300,
        split_buffer in 1usize..64,
        merge_buffer in 1usize..64,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("blob.bin");
        fs::write(&source, &data).unwrap();

        let splitter = Splitter::new(FragmentConfig::with_buffer_size(split_buffer).unwrap());
        let fragments = splitter.split(&source, chunk_size).unwrap();
        fs::remove_file(&source).unwrap();

        if data.is_empty() {
            prop_assert!(fragments.is_empty());
            return Ok(());
        }

        let merger = Merger::new(FragmentConfig::with_buffer_size(merge_buffer).unwrap());
        let merged = merger.merge(dir.path(), None).unwrap();
        prop_assert_eq!(merged.name.as_str(), "blob.bin");
        prop_assert_eq!(merged.size, data.len() as u64);
        prop_assert_eq!(fs::read(&merged.path).unwrap(), data);
        prop_assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn fragment_sizes_follow_chunk_arithmetic(
        len in 0usize..3000,
        chunk_size in 1u64..500,
        buffer in 1usize..97,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("sized");
        fs::write(&source, vec![0x5A; len]).unwrap();

        let splitter = Splitter::new(FragmentConfig::with_buffer_size(buffer).unwrap());
        let fragments = splitter.split(&source, chunk_size).unwrap();

        let len = len as u64;
        prop_assert_eq!(fragments.len() as u64, len.div_ceil(chunk_size));
        if let Some((last, full)) = fragments.split_last() {
            for fragment in full {
                prop_assert_eq!(fragment.size, chunk_size);
            }
            let tail = if len % chunk_size == 0 { chunk_size } else { len % chunk_size };
            prop_assert_eq!(last.size, tail);
        }
    }

    #[test]
    fn rendered_names_parse_back(
        order in 1u32..100_000,
        origin in "[A-Za-z0-9_-]{1,12}(\\.[A-Za-z0-9]{1,4}){0,3}",
        width in 1usize..6,
    ) {
        let config = FragmentConfig::new(8, '.', "part", width).unwrap();
        let name = render(order, &origin, &config);
        let parsed = parse(&name, &config).unwrap();
        prop_assert_eq!(parsed.order, order);
        prop_assert_eq!(parsed.origin_name, origin);
    }
}
