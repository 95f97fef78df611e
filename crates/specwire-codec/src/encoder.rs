use std::fmt::Write as _;

use serde_json::Value;

use crate::document::Scalar;
use crate::symbols::SymbolTable;

/// Minimum number of binary digits in an encoded number.
pub const WORD_WIDTH: usize = 8;

/// Numbers are divided by this before binary formatting.
const QUANTUM: i128 = 10;

/// Upper bound under [`Overflow::Clamp`]. 0xFF is the frame sentinel.
pub const MAX_CLAMPED_WORD: i128 = 0xFE;

/// What to do with a quantized number that does not fit in one word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Overflow {
    /// Emit as many binary digits as the value needs.
    #[default]
    Widen,
    /// Clamp into `0..=MAX_CLAMPED_WORD` so the result is exactly one word.
    Clamp,
}

/// Encoder settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncoderConfig {
    pub overflow: Overflow,
}

/// Converts scalars into their wire representation.
///
/// Encoding never fails. A leaf that cannot be quantized falls back to its
/// plain text form.
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'a> {
    symbols: &'a SymbolTable,
    config: EncoderConfig,
}

impl<'a> Encoder<'a> {
    /// Create an encoder with default config.
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self::with_config(symbols, EncoderConfig::default())
    }

    /// Create an encoder with explicit config.
    pub fn with_config(symbols: &'a SymbolTable, config: EncoderConfig) -> Self {
        Self { symbols, config }
    }

    /// Encode one scalar.
    pub fn encode_scalar(&self, value: &Scalar) -> String {
        match value {
            Scalar::String(s) => self.encode_str(s),
            Scalar::Integer(n) => self.format_word(n / QUANTUM),
            Scalar::Float(f) => match quantize_float(*f) {
                Some(scaled) => self.format_word(scaled),
                None => f.to_string(),
            },
            // Booleans quantize as 0 and 1.
            Scalar::Other(Value::Bool(flag)) => self.format_word(i128::from(*flag) / QUANTUM),
            Scalar::Other(value) => value.to_string(),
        }
    }

    /// Encode a string: symbol pattern if known, UTF-8 hex otherwise.
    pub fn encode_str(&self, value: &str) -> String {
        match self.symbols.get(value) {
            Some(pattern) => pattern.to_owned(),
            None => hex_lower(value.as_bytes()),
        }
    }

    pub fn symbols(&self) -> &'a SymbolTable {
        self.symbols
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    fn format_word(&self, scaled: i128) -> String {
        let scaled = match self.config.overflow {
            Overflow::Widen => scaled,
            Overflow::Clamp => scaled.clamp(0, MAX_CLAMPED_WORD),
        };

        if scaled < 0 {
            // Sign counts toward the minimum width.
            format!(
                "-{:0width$b}",
                scaled.unsigned_abs(),
                width = WORD_WIDTH - 1
            )
        } else {
            format!("{:0width$b}", scaled, width = WORD_WIDTH)
        }
    }
}

/// Encode one scalar against `symbols` with default config.
pub fn encode_scalar(value: &Scalar, symbols: &SymbolTable) -> String {
    Encoder::new(symbols).encode_scalar(value)
}

fn quantize_float(value: f64) -> Option<i128> {
    if !value.is_finite() {
        return None;
    }
    let scaled = (value / QUANTUM as f64).trunc();
    if scaled < i128::MIN as f64 || scaled >= i128::MAX as f64 {
        return None;
    }
    Some(scaled as i128)
}

fn hex_lower(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
