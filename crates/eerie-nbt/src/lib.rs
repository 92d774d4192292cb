//! NBT (Named Binary Tag) records for persisted entity data.
//!
//! Only the little-endian disk layout is supported: entity records are written
//! to and read from save files, never sent over the wire.

mod codec;
pub mod error;
pub mod tag;

pub use error::NbtError;
pub use tag::{CompoundExt, NbtCompound, NbtRoot, NbtTag};

use bytes::{Buf, BufMut};

/// Read a little-endian NBT root compound.
pub fn read_nbt(buf: &mut impl Buf) -> Result<NbtRoot, NbtError> {
    codec::read_root(buf)
}

/// Write a little-endian NBT root compound.
pub fn write_nbt(buf: &mut impl BufMut, root: &NbtRoot) -> Result<(), NbtError> {
    codec::write_root(buf, root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    fn roundtrip(root: &NbtRoot) -> NbtRoot {
        let mut buf = BytesMut::new();
        write_nbt(&mut buf, root).unwrap();
        read_nbt(&mut buf.freeze()).unwrap()
    }

    #[test]
    fn entity_record_survives_disk_layout() {
        let mut c = NbtCompound::new();
        c.put_str("identifier", "eerie:pumpkin_slime");
        c.put_bool("IsBlockForm", true);
        c.put_int("Type", 4);
        c.put_float("LookRotation", 270.0);
        c.insert(
            "Pos".into(),
            NbtTag::List(vec![
                NbtTag::Float(0.5),
                NbtTag::Float(5.0),
                NbtTag::Float(-3.5),
            ]),
        );
        let root = NbtRoot::new("", c);
        assert_eq!(roundtrip(&root), root);
    }

    #[test]
    fn nested_list_of_compounds() {
        let mut mob = NbtCompound::new();
        mob.put_int("RuneWord", 2);
        let mut c = NbtCompound::new();
        c.insert(
            "Mobs".into(),
            NbtTag::List(vec![NbtTag::Compound(mob.clone()), NbtTag::Compound(mob)]),
        );
        let root = NbtRoot::new("world", c);
        assert_eq!(roundtrip(&root), root);
    }

    #[test]
    fn empty_list_roundtrips() {
        let mut c = NbtCompound::new();
        c.insert("Mobs".into(), NbtTag::List(vec![]));
        let root = NbtRoot::new("", c);
        assert_eq!(roundtrip(&root), root);
    }

    #[test]
    fn int_is_four_bytes_le() {
        let mut c = NbtCompound::new();
        c.put_int("v", 1);
        let mut buf = BytesMut::new();
        write_nbt(&mut buf, &NbtRoot::new("", c)).unwrap();
        // 0x0A, name len (2), type 3, key len (2), 'v', 1i32 LE, TAG_End
        assert_eq!(
            &buf[..],
            &[10, 0, 0, 3, 1, 0, b'v', 1, 0, 0, 0, 0][..]
        );
    }

    #[test]
    fn empty_buffer_is_eof() {
        let data = bytes::Bytes::new();
        assert!(matches!(
            read_nbt(&mut data.clone()),
            Err(NbtError::Truncated { .. })
        ));
    }

    #[test]
    fn non_compound_root_rejected() {
        let data = bytes::Bytes::from_static(&[3]);
        assert!(matches!(
            read_nbt(&mut data.clone()),
            Err(NbtError::RootNotCompound(3))
        ));
    }

    #[test]
    fn truncated_record_is_eof() {
        let mut c = NbtCompound::new();
        c.put_int("RuneWord", 3);
        let mut buf = BytesMut::new();
        write_nbt(&mut buf, &NbtRoot::new("", c)).unwrap();
        let cut = buf.freeze().slice(..6);
        // The length of "RuneWord" survives, its 8 bytes do not.
        assert!(matches!(
            read_nbt(&mut cut.clone()),
            Err(NbtError::Truncated { missing: 8 })
        ));
    }

    #[test]
    fn non_utf8_key_rejected() {
        let data = bytes::Bytes::from_static(&[10, 0, 0, 1, 2, 0, 0xff, 0xfe, 1, 0]);
        assert!(matches!(read_nbt(&mut data.clone()), Err(NbtError::BadUtf8(_))));
    }
}
