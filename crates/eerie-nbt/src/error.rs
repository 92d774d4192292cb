//! Failures while decoding or encoding a record file.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NbtError {
    #[error("record truncated: {missing} more bytes expected")]
    Truncated { missing: usize },

    #[error("record root is tag type {0}, expected a compound")]
    RootNotCompound(u8),

    #[error("tag type {0} is not an NBT tag")]
    BadTagType(u8),

    #[error("string is not UTF-8")]
    BadUtf8(#[from] std::string::FromUtf8Error),

    #[error("tags nested deeper than {0} levels")]
    TooDeep(usize),

    #[error("negative length prefix {0}")]
    NegativeLength(i32),

    #[error("string of {0} bytes does not fit a u16 length prefix")]
    StringTooLong(usize),
}
