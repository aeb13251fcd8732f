//! Tests for corrupt, truncated and mislabelled sources.
//!
//! A source that fails to decode must produce a `DecompressionError` and
//! leave the destination exactly as it was.

#![cfg(all(feature = "gzip", feature = "bzip2", feature = "xz"))]

use std::fs;

use tempfile::TempDir;
use uncompress::{CompressionFormat, Error, Uncompress, UncompressOptions};

mod common;
use common::{PanicFetcher, compress, s, sample_payload};

fn run_file(src: &std::path::Path, dest: &std::path::Path) -> uncompress::Result<uncompress::TaskResult> {
    Uncompress::new(UncompressOptions::new(s(src), s(dest)))
        .with_fetcher(PanicFetcher)
        .run()
}

fn expect_decompression_error(name: &str, data: &[u8], format: CompressionFormat) {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join(name);
    fs::write(&src, data).unwrap();
    let dest = tmp.path().join("dest");

    match run_file(&src, &dest) {
        Err(Error::DecompressionError {
            path,
            format: actual,
            ..
        }) => {
            assert_eq!(path, src);
            assert_eq!(actual, format);
        }
        other => panic!("{}: expected DecompressionError, got {:?}", name, other),
    }
    assert!(!dest.exists(), "{}: destination must not be created", name);
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
}

#[test]
fn test_garbage_in_every_format() {
    let garbage = b"this is definitely not compressed data";
    expect_decompression_error("g.gz", garbage, CompressionFormat::Gzip);
    expect_decompression_error("b.bz2", garbage, CompressionFormat::Bzip2);
    expect_decompression_error("x.xz", garbage, CompressionFormat::Xz);
    // 0xFF is not a valid lc/lp/pb properties byte
    expect_decompression_error("l.lzma", &[0xFF; 64], CompressionFormat::Lzma);
}

#[test]
fn test_truncated_streams() {
    let payload = sample_payload(50_000);
    for (name, format) in [
        ("t.gz", CompressionFormat::Gzip),
        ("t.bz2", CompressionFormat::Bzip2),
        ("t.xz", CompressionFormat::Xz),
    ] {
        let mut data = compress(format, &payload);
        data.truncate(data.len() / 2);
        expect_decompression_error(name, &data, format);
    }
}

#[test]
fn test_mislabelled_source() {
    let bzip2_data = compress(CompressionFormat::Bzip2, b"bzip2 inside");
    expect_decompression_error("wrong.gz", &bzip2_data, CompressionFormat::Gzip);

    let gzip_data = compress(CompressionFormat::Gzip, b"gzip inside");
    expect_decompression_error("wrong.xz", &gzip_data, CompressionFormat::Xz);

    let lzma_data = compress(CompressionFormat::Lzma, b"lzma alone inside");
    expect_decompression_error("legacy.xz", &lzma_data, CompressionFormat::Xz);
}

#[test]
fn test_corrupt_source_keeps_existing_destination() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("update.gz");
    let mut data = compress(CompressionFormat::Gzip, &sample_payload(10_000));
    let middle = data.len() / 2;
    data[middle] ^= 0xFF;
    data.truncate(middle + 1);
    fs::write(&src, data).unwrap();

    let dest = tmp.path().join("current");
    fs::write(&dest, b"known good").unwrap();

    assert!(matches!(
        run_file(&src, &dest),
        Err(Error::DecompressionError { .. })
    ));
    assert_eq!(fs::read(&dest).unwrap(), b"known good");
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 2);
}
