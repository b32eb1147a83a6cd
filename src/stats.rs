//! Size figures for an encoded message.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    pub input_bytes: u64,
    pub encoded_bits: u64,
    pub distinct_symbols: usize,
}

impl CompressionStats {
    /// Bits the input occupies at one byte per symbol.
    pub fn original_bits(&self) -> u64 {
        self.input_bytes * 8
    }

    /// Encoded bits over original bits; 0.0 for empty input.
    pub fn ratio(&self) -> f64 {
        match self.original_bits() {
            0 => 0.0,
            original => self.encoded_bits as f64 / original as f64,
        }
    }

    /// Fraction of the original bits saved by encoding.
    pub fn space_saving(&self) -> f64 {
        match self.original_bits() {
            0 => 0.0,
            _ => 1.0 - self.ratio(),
        }
    }

    /// Mean code length in bits per input byte.
    pub fn bits_per_symbol(&self) -> f64 {
        match self.input_bytes {
            0 => 0.0,
            n => self.encoded_bits as f64 / n as f64,
        }
    }
}

/// Format bytes into human-readable string (e.g. 1024 -> "1.00 KB")
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", size, UNITS[unit])
}
