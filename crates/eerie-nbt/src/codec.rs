//! Little-endian NBT reader and writer.
//!
//! Lengths of strings are `u16_le`, array and list lengths are `i32_le`, every
//! number is little-endian. This is the on-disk layout used for entity records.

use bytes::{Buf, BufMut};

use crate::error::NbtError;
use crate::tag::{NbtCompound, NbtRoot, NbtTag};

/// Maximum nesting depth accepted when reading.
const MAX_DEPTH: usize = 512;

const TAG_END: u8 = 0;
const TAG_COMPOUND: u8 = 10;

pub(crate) fn read_root(buf: &mut impl Buf) -> Result<NbtRoot, NbtError> {
    need(buf, 1)?;
    let tag_type = buf.get_u8();
    if tag_type != TAG_COMPOUND {
        return Err(NbtError::RootNotCompound(tag_type));
    }
    let name = read_string(buf)?;
    let compound = read_compound(buf, 0)?;
    Ok(NbtRoot { name, compound })
}

pub(crate) fn write_root(buf: &mut impl BufMut, root: &NbtRoot) -> Result<(), NbtError> {
    buf.put_u8(TAG_COMPOUND);
    write_string(buf, &root.name)?;
    write_compound(buf, &root.compound)
}

fn read_payload(buf: &mut impl Buf, tag_type: u8, depth: usize) -> Result<NbtTag, NbtError> {
    if depth > MAX_DEPTH {
        return Err(NbtError::TooDeep(MAX_DEPTH));
    }

    let tag = match tag_type {
        1 => {
            need(buf, 1)?;
            NbtTag::Byte(buf.get_i8())
        }
        2 => {
            need(buf, 2)?;
            NbtTag::Short(buf.get_i16_le())
        }
        3 => {
            need(buf, 4)?;
            NbtTag::Int(buf.get_i32_le())
        }
        4 => {
            need(buf, 8)?;
            NbtTag::Long(buf.get_i64_le())
        }
        5 => {
            need(buf, 4)?;
            NbtTag::Float(buf.get_f32_le())
        }
        6 => {
            need(buf, 8)?;
            NbtTag::Double(buf.get_f64_le())
        }
        7 => {
            let len = read_len(buf)?;
            need(buf, len)?;
            NbtTag::ByteArray((0..len).map(|_| buf.get_i8()).collect())
        }
        8 => NbtTag::String(read_string(buf)?),
        9 => {
            need(buf, 1)?;
            let element_type = buf.get_u8();
            let len = read_len(buf)?;
            let mut list = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                list.push(read_payload(buf, element_type, depth + 1)?);
            }
            NbtTag::List(list)
        }
        10 => NbtTag::Compound(read_compound(buf, depth + 1)?),
        11 => {
            let len = read_len(buf)?;
            need(buf, len.saturating_mul(4))?;
            NbtTag::IntArray((0..len).map(|_| buf.get_i32_le()).collect())
        }
        12 => {
            let len = read_len(buf)?;
            need(buf, len.saturating_mul(8))?;
            NbtTag::LongArray((0..len).map(|_| buf.get_i64_le()).collect())
        }
        other => return Err(NbtError::BadTagType(other)),
    };
    Ok(tag)
}

fn read_compound(buf: &mut impl Buf, depth: usize) -> Result<NbtCompound, NbtError> {
    if depth > MAX_DEPTH {
        return Err(NbtError::TooDeep(MAX_DEPTH));
    }
    let mut map = NbtCompound::new();
    loop {
        need(buf, 1)?;
        let tag_type = buf.get_u8();
        if tag_type == TAG_END {
            return Ok(map);
        }
        let name = read_string(buf)?;
        let tag = read_payload(buf, tag_type, depth)?;
        map.insert(name, tag);
    }
}

fn read_len(buf: &mut impl Buf) -> Result<usize, NbtError> {
    need(buf, 4)?;
    let len = buf.get_i32_le();
    usize::try_from(len).map_err(|_| NbtError::NegativeLength(len))
}

fn read_string(buf: &mut impl Buf) -> Result<String, NbtError> {
    need(buf, 2)?;
    let len = buf.get_u16_le() as usize;
    need(buf, len)?;
    let data = buf.copy_to_bytes(len);
    Ok(String::from_utf8(data.to_vec())?)
}

fn need(buf: &impl Buf, n: usize) -> Result<(), NbtError> {
    match n.checked_sub(buf.remaining()) {
        Some(missing) if missing > 0 => Err(NbtError::Truncated { missing }),
        _ => Ok(()),
    }
}

fn write_payload(buf: &mut impl BufMut, tag: &NbtTag) -> Result<(), NbtError> {
    match tag {
        NbtTag::Byte(v) => buf.put_i8(*v),
        NbtTag::Short(v) => buf.put_i16_le(*v),
        NbtTag::Int(v) => buf.put_i32_le(*v),
        NbtTag::Long(v) => buf.put_i64_le(*v),
        NbtTag::Float(v) => buf.put_f32_le(*v),
        NbtTag::Double(v) => buf.put_f64_le(*v),
        NbtTag::ByteArray(arr) => {
            buf.put_i32_le(arr.len() as i32);
            arr.iter().for_each(|b| buf.put_i8(*b));
        }
        NbtTag::String(s) => write_string(buf, s)?,
        NbtTag::List(list) => {
            // Empty lists are written with element type TAG_End.
            buf.put_u8(list.first().map_or(TAG_END, NbtTag::type_id));
            buf.put_i32_le(list.len() as i32);
            for item in list {
                write_payload(buf, item)?;
            }
        }
        NbtTag::Compound(map) => write_compound(buf, map)?,
        NbtTag::IntArray(arr) => {
            buf.put_i32_le(arr.len() as i32);
            arr.iter().for_each(|v| buf.put_i32_le(*v));
        }
        NbtTag::LongArray(arr) => {
            buf.put_i32_le(arr.len() as i32);
            arr.iter().for_each(|v| buf.put_i64_le(*v));
        }
    }
    Ok(())
}

fn write_compound(buf: &mut impl BufMut, map: &NbtCompound) -> Result<(), NbtError> {
    for (name, tag) in map {
        buf.put_u8(tag.type_id());
        write_string(buf, name)?;
        write_payload(buf, tag)?;
    }
    buf.put_u8(TAG_END);
    Ok(())
}

fn write_string(buf: &mut impl BufMut, s: &str) -> Result<(), NbtError> {
    let len = u16::try_from(s.len()).map_err(|_| NbtError::StringTooLong(s.len()))?;
    buf.put_u16_le(len);
    buf.put_slice(s.as_bytes());
    Ok(())
}
