use bytes::{BufMut, Bytes, BytesMut};

use crate::error::FieldError;

/// Bits per packed word.
pub const WORD_BITS: usize = 8;

/// Pack a string of binary digits into bytes.
///
/// Surrounding whitespace is ignored. If the digit count is not a multiple of
/// eight, zeros are prepended to the whole string (not to each group), so
/// `"0101"` packs to `[0x05]` and `"100101100"` to `[0x01, 0x2C]`.
pub fn pack(bits: &str) -> Result<Bytes, FieldError> {
    let mut dst = BytesMut::new();
    pack_into(bits, &mut dst)?;
    Ok(dst.freeze())
}

/// Pack into an existing buffer, returning the number of words appended.
///
/// Nothing is appended when the input is rejected.
pub fn pack_into(bits: &str, dst: &mut BytesMut) -> Result<usize, FieldError> {
    let bits = bits.trim();

    if let Some((position, found)) = bits
        .chars()
        .enumerate()
        .find(|(_, c)| !matches!(c, '0' | '1'))
    {
        return Err(FieldError::InvalidBit { position, found });
    }

    let words = bits.len().div_ceil(WORD_BITS);
    dst.reserve(words);

    let mut word = 0u8;
    let mut filled = (WORD_BITS - bits.len() % WORD_BITS) % WORD_BITS;
    for bit in bits.bytes() {
        word = (word << 1) | (bit - b'0');
        filled += 1;
        if filled == WORD_BITS {
            dst.put_u8(word);
            word = 0;
            filled = 0;
        }
    }

    Ok(words)
}
