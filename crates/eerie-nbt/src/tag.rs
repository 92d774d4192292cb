//! NBT tag model and typed compound accessors.

use std::collections::HashMap;
use std::fmt;

use uuid::Uuid;

/// A compound tag: map of name -> tag.
pub type NbtCompound = HashMap<String, NbtTag>;

/// A named root compound.
#[derive(Debug, Clone, PartialEq)]
pub struct NbtRoot {
    pub name: String,
    pub compound: NbtCompound,
}

impl NbtRoot {
    pub fn new(name: impl Into<String>, compound: NbtCompound) -> Self {
        Self {
            name: name.into(),
            compound,
        }
    }
}

/// Any NBT value.
#[derive(Debug, Clone, PartialEq)]
pub enum NbtTag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<NbtTag>),
    Compound(NbtCompound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl NbtTag {
    /// Wire type ID (1-12). TAG_End (0) has no value form.
    pub fn type_id(&self) -> u8 {
        match self {
            NbtTag::Byte(_) => 1,
            NbtTag::Short(_) => 2,
            NbtTag::Int(_) => 3,
            NbtTag::Long(_) => 4,
            NbtTag::Float(_) => 5,
            NbtTag::Double(_) => 6,
            NbtTag::ByteArray(_) => 7,
            NbtTag::String(_) => 8,
            NbtTag::List(_) => 9,
            NbtTag::Compound(_) => 10,
            NbtTag::IntArray(_) => 11,
            NbtTag::LongArray(_) => 12,
        }
    }

    /// Integer view of any whole-number tag (Byte, Short, Int).
    pub fn as_int(&self) -> Option<i32> {
        match self {
            NbtTag::Byte(v) => Some(i32::from(*v)),
            NbtTag::Short(v) => Some(i32::from(*v)),
            NbtTag::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            NbtTag::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Float view of Float or Double tags.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            NbtTag::Float(v) => Some(*v),
            NbtTag::Double(v) => Some(*v as f32),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            NbtTag::Double(v) => Some(*v),
            NbtTag::Float(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            NbtTag::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&NbtCompound> {
        match self {
            NbtTag::Compound(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[NbtTag]> {
        match self {
            NbtTag::List(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for NbtTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NbtTag::Byte(v) => write!(f, "{v}b"),
            NbtTag::Short(v) => write!(f, "{v}s"),
            NbtTag::Int(v) => write!(f, "{v}"),
            NbtTag::Long(v) => write!(f, "{v}L"),
            NbtTag::Float(v) => write!(f, "{v}f"),
            NbtTag::Double(v) => write!(f, "{v}d"),
            NbtTag::ByteArray(v) => write!(f, "[B; {} elements]", v.len()),
            NbtTag::String(v) => write!(f, "\"{v}\""),
            NbtTag::List(v) => write!(f, "[{} elements]", v.len()),
            NbtTag::Compound(v) => write!(f, "{{{} entries}}", v.len()),
            NbtTag::IntArray(v) => write!(f, "[I; {} elements]", v.len()),
            NbtTag::LongArray(v) => write!(f, "[L; {} elements]", v.len()),
        }
    }
}

/// Typed getters and setters for entity records.
///
/// Getters never fail: an absent key or a tag of the wrong type yields the
/// type's default, the same contract entity save data has always had.
pub trait CompoundExt {
    fn get_bool(&self, key: &str) -> bool;
    fn get_int(&self, key: &str) -> i32;
    fn get_float(&self, key: &str) -> f32;
    fn get_double(&self, key: &str) -> f64;
    fn get_str(&self, key: &str) -> &str;
    /// Reads a UUID stored as `<key>Most` / `<key>Least` longs.
    fn get_uuid(&self, key: &str) -> Option<Uuid>;
    fn has_uuid(&self, key: &str) -> bool;

    fn put_bool(&mut self, key: &str, value: bool);
    fn put_int(&mut self, key: &str, value: i32);
    fn put_float(&mut self, key: &str, value: f32);
    fn put_double(&mut self, key: &str, value: f64);
    fn put_str(&mut self, key: &str, value: &str);
    fn put_uuid(&mut self, key: &str, value: Uuid);
}

impl CompoundExt for NbtCompound {
    fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(NbtTag::as_int).unwrap_or(0) != 0
    }

    fn get_int(&self, key: &str) -> i32 {
        self.get(key).and_then(NbtTag::as_int).unwrap_or(0)
    }

    fn get_float(&self, key: &str) -> f32 {
        self.get(key).and_then(NbtTag::as_float).unwrap_or(0.0)
    }

    fn get_double(&self, key: &str) -> f64 {
        self.get(key).and_then(NbtTag::as_double).unwrap_or(0.0)
    }

    fn get_str(&self, key: &str) -> &str {
        self.get(key).and_then(NbtTag::as_string).unwrap_or("")
    }

    fn get_uuid(&self, key: &str) -> Option<Uuid> {
        let most = self.get(&format!("{key}Most")).and_then(NbtTag::as_long)?;
        let least = self.get(&format!("{key}Least")).and_then(NbtTag::as_long)?;
        Some(Uuid::from_u64_pair(most as u64, least as u64))
    }

    fn has_uuid(&self, key: &str) -> bool {
        self.get_uuid(key).is_some()
    }

    fn put_bool(&mut self, key: &str, value: bool) {
        self.insert(key.into(), NbtTag::Byte(i8::from(value)));
    }

    fn put_int(&mut self, key: &str, value: i32) {
        self.insert(key.into(), NbtTag::Int(value));
    }

    fn put_float(&mut self, key: &str, value: f32) {
        self.insert(key.into(), NbtTag::Float(value));
    }

    fn put_double(&mut self, key: &str, value: f64) {
        self.insert(key.into(), NbtTag::Double(value));
    }

    fn put_str(&mut self, key: &str, value: &str) {
        self.insert(key.into(), NbtTag::String(value.into()));
    }

    fn put_uuid(&mut self, key: &str, value: Uuid) {
        let (most, least) = value.as_u64_pair();
        self.insert(format!("{key}Most"), NbtTag::Long(most as i64));
        self.insert(format!("{key}Least"), NbtTag::Long(least as i64));
    }
}
