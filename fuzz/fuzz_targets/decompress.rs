//! Fuzz target feeding arbitrary bytes to every decoder.
//!
//! Run with: cargo +nightly fuzz run decompress
//!
//! Decoders must reject malformed input with an error, never a panic. Output
//! is capped so that highly compressible inputs cannot exhaust memory.

#![no_main]

use std::io::{self, Write};

use libfuzzer_sys::fuzz_target;
use uncompress::CompressionFormat;
use uncompress::codec::decompress;

const OUTPUT_LIMIT: u64 = 16 * 1024 * 1024;

/// Discards output and fails once the limit is exceeded.
struct CappedSink(u64);

impl Write for CappedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0 += buf.len() as u64;
        if self.0 > OUTPUT_LIMIT {
            return Err(io::Error::other("output limit exceeded"));
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&selector, input)) = data.split_first() else {
        return;
    };
    let format = CompressionFormat::ALL[selector as usize % CompressionFormat::ALL.len()];
    let _ = decompress(input, format, &mut CappedSink(0));
});
