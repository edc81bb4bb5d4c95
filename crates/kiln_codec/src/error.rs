use thiserror::Error;

/// A codec failure.
///
/// Encoding fails only on a tree that does not conform to the type, which
/// validation rules out beforehand; decoding fails on any byte stream that
/// the type cannot have produced, rather than silently misreading it.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The input ended before the type was fully decoded.
    #[error("unexpected end of input at byte {offset}")]
    UnexpectedEof {
        /// Byte offset at which more input was needed.
        offset: usize,
    },
    /// A decoded variant index does not address any declared variant.
    #[error("variant index {index} out of range for enum with {count} variants")]
    InvalidVariant {
        /// The decoded index.
        index: u64,
        /// The number of declared variants.
        count: usize,
    },
    /// Decoded string bytes are not valid UTF-8.
    #[error("string bytes are not valid UTF-8")]
    InvalidUtf8,
    /// Input remained after the root value was fully decoded.
    #[error("{count} trailing byte(s) after the root value")]
    TrailingBytes {
        /// How many bytes were left over.
        count: usize,
    },
    /// A value too large for its count or length field.
    #[error("{what} exceeds the u32 count limit")]
    CountOverflow {
        /// What overflowed: a list, map, or string length.
        what: &'static str,
    },
    /// The tree handed to the encoder does not conform to the type.
    /// Validation prevents this for user input; hitting it means the caller
    /// skipped validation.
    #[error("value does not conform to the schema: {0}")]
    Nonconforming(String),
}
