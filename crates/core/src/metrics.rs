//! Metrics for a compression run.
//!
//! Tracks sizes, code statistics and timing so the effect of entropy coding
//! on a pixel buffer is visible. Single-threaded: fields are updated
//! explicitly at each stage by the caller.

use std::time::{Duration, Instant};

use crate::huffman::{histogram, HuffmanTree};

/// Counters and timings for one compress/decompress cycle.
#[derive(Debug, Clone)]
pub struct CodecMetrics {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    /// Time spent compressing
    pub compress_time: Duration,

    /// Time spent decompressing
    pub decompress_time: Duration,

    // === Sizes ===
    /// Pixel bytes before compression
    pub raw_bytes: u64,

    /// Packed code bytes after compression
    pub compressed_bytes: u64,

    /// Bytes produced by decompression, padding artifacts included
    pub decoded_bytes: u64,

    // === Code ===
    /// Distinct symbols in the tree
    pub distinct_symbols: u64,

    /// Longest code length in bits (1 for a single-symbol tree)
    pub max_code_length: u64,

    /// Mean code length in bits, weighted by symbol frequency
    pub average_code_length: f64,

    // === Verification ===
    /// Whether the first `raw_bytes` decoded bytes match the input
    pub prefix_matches: bool,
}

impl CodecMetrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            compress_time: Duration::ZERO,
            decompress_time: Duration::ZERO,
            raw_bytes: 0,
            compressed_bytes: 0,
            decoded_bytes: 0,
            distinct_symbols: 0,
            max_code_length: 0,
            average_code_length: 0.0,
            prefix_matches: false,
        }
    }

    /// Record the input buffer and the tree built for it.
    pub fn record_tree(&mut self, raw: &[u8], tree: &HuffmanTree) {
        let freqs = histogram(raw);
        let table = tree.code_table();
        self.raw_bytes = raw.len() as u64;
        self.distinct_symbols = tree.leaf_count() as u64;
        self.max_code_length = table
            .iter()
            .map(|(_, code)| code.len() as u64)
            .max()
            .unwrap_or(0);
        self.average_code_length = table.average_code_length(&freqs);
    }

    /// Compare decoded output against the original on its meaningful prefix.
    pub fn record_decoded(&mut self, raw: &[u8], decoded: &[u8]) {
        self.decoded_bytes = decoded.len() as u64;
        self.prefix_matches = decoded.len() >= raw.len() && decoded[..raw.len()] == *raw;
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Compute compression ratio (compressed / raw).
    ///
    /// Returns 0.0 if nothing was compressed.
    pub fn compression_ratio(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.compressed_bytes as f64 / self.raw_bytes as f64
        }
    }

    /// Bytes decoded from padding bits beyond the original length.
    pub fn spurious_bytes(&self) -> u64 {
        self.decoded_bytes.saturating_sub(self.raw_bytes)
    }

    /// Compression throughput in bytes/second.
    pub fn throughput_bps(&self) -> f64 {
        let secs = self.compress_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.raw_bytes as f64 / secs
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Compression ===");
        println!("Raw bytes: {} ({:.2} KiB)", self.raw_bytes, self.raw_bytes as f64 / 1024.0);
        println!(
            "Compressed: {} ({:.2} KiB)",
            self.compressed_bytes,
            self.compressed_bytes as f64 / 1024.0
        );
        println!("Ratio: {:.1}%", self.compression_ratio() * 100.0);
        println!();

        println!("=== Code ===");
        println!("Distinct symbols: {}", self.distinct_symbols);
        println!("Longest code: {} bits", self.max_code_length);
        println!("Average code length: {:.3} bits", self.average_code_length);
        println!();

        println!("=== Decoding ===");
        println!("Decoded bytes: {}", self.decoded_bytes);
        println!("Spurious trailing bytes: {}", self.spurious_bytes());
        if self.prefix_matches {
            println!("Verification: PASSED ✓");
        } else {
            println!("Verification: FAILED ✗");
        }
        println!();

        println!("=== Performance ===");
        println!("Compress: {} ms", self.compress_time.as_millis());
        println!("Decompress: {} ms", self.decompress_time.as_millis());
        println!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
        println!("Total: {} ms", self.duration().as_millis());
        println!();
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             raw_bytes={}\n\
             compressed_bytes={}\n\
             compression_ratio={:.4}\n\
             distinct_symbols={}\n\
             max_code_length={}\n\
             average_code_length={:.4}\n\
             decoded_bytes={}\n\
             spurious_bytes={}\n\
             prefix_matches={}\n",
            self.duration().as_millis(),
            self.raw_bytes,
            self.compressed_bytes,
            self.compression_ratio(),
            self.distinct_symbols,
            self.max_code_length,
            self.average_code_length,
            self.decoded_bytes,
            self.spurious_bytes(),
            self.prefix_matches,
        )
    }
}

impl Default for CodecMetrics {
    fn default() -> Self {
        Self::new()
    }
}
