//! Fully decoded field values, for generic access to a struct.

use crate::error::{RangeError, Result};
use crate::list::GffList;
use crate::locstring::LocString;
use crate::structure::GffStruct;
use crate::types::{decode_ascii, Field, FieldType};

/// The decoded value of a field of any type
#[derive(Debug, Clone)]
pub enum FieldValue<'a> {
    /// Unknown type tag
    None(u32),
    Byte(u8),
    Char(i8),
    Uint16(u16),
    Sint16(i16),
    Uint32(u32),
    Sint32(i32),
    Uint64(u64),
    Sint64(i64),
    Float(f32),
    Double(f64),
    ExoString(String),
    ResRef(String),
    LocString(LocString),
    Void(&'a [u8]),
    Struct(GffStruct<'a>),
    List(GffList<'a>),
    Orientation([f32; 4]),
    Vector([f32; 3]),
}

impl FieldValue<'_> {
    /// The type tag this value was decoded from
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::None(_) => FieldType::None,
            FieldValue::Byte(_) => FieldType::Byte,
            FieldValue::Char(_) => FieldType::Char,
            FieldValue::Uint16(_) => FieldType::Uint16,
            FieldValue::Sint16(_) => FieldType::Sint16,
            FieldValue::Uint32(_) => FieldType::Uint32,
            FieldValue::Sint32(_) => FieldType::Sint32,
            FieldValue::Uint64(_) => FieldType::Uint64,
            FieldValue::Sint64(_) => FieldType::Sint64,
            FieldValue::Float(_) => FieldType::Float,
            FieldValue::Double(_) => FieldType::Double,
            FieldValue::ExoString(_) => FieldType::ExoString,
            FieldValue::ResRef(_) => FieldType::ResRef,
            FieldValue::LocString(_) => FieldType::LocString,
            FieldValue::Void(_) => FieldType::Void,
            FieldValue::Struct(_) => FieldType::Struct,
            FieldValue::List(_) => FieldType::List,
            FieldValue::Orientation(_) => FieldType::Orientation,
            FieldValue::Vector(_) => FieldType::Vector,
        }
    }
}

impl<'a> GffStruct<'a> {
    /// Decode the field stored under a label, whatever its type.
    pub fn value(&self, label: &str) -> Result<Option<FieldValue<'a>>> {
        self.field(label).map(|field| self.decode(field)).transpose()
    }

    /// Decode every field of this struct, in file order.
    pub fn values(&self) -> impl Iterator<Item = (&'a str, Result<FieldValue<'a>>)> + 'a {
        let this = *self;
        self.fields()
            .map(move |(label, field)| (label, this.decode(field)))
    }

    fn decode(&self, field: &Field) -> Result<FieldValue<'a>> {
        let file = self.file();

        Ok(match *field {
            Field::None(tag) => FieldValue::None(tag),
            Field::Byte(v) => FieldValue::Byte(v),
            Field::Char(v) => FieldValue::Char(v),
            Field::Uint16(v) => FieldValue::Uint16(v),
            Field::Sint16(v) => FieldValue::Sint16(v),
            Field::Uint32(v) => FieldValue::Uint32(v),
            Field::Sint32(v) => FieldValue::Sint32(v),
            Field::Float(v) => FieldValue::Float(v),
            Field::Uint64(offset) => FieldValue::Uint64(file.read_u64(offset)?),
            Field::Sint64(offset) => FieldValue::Sint64(file.read_u64(offset)? as i64),
            Field::Double(offset) => FieldValue::Double(f64::from_bits(file.read_u64(offset)?)),
            Field::ExoString(offset) => {
                FieldValue::ExoString(decode_ascii(file.length_prefixed(offset, 4)?))
            }
            Field::ResRef(offset) => {
                FieldValue::ResRef(decode_ascii(file.length_prefixed(offset, 1)?))
            }
            Field::LocString(offset) => {
                FieldValue::LocString(LocString::read(file.length_prefixed(offset, 4)?)?)
            }
            Field::Void(offset) => FieldValue::Void(file.length_prefixed(offset, 4)?),
            Field::Orientation(offset) => FieldValue::Orientation(file.read_floats(offset)?),
            Field::Vector(offset) => FieldValue::Vector(file.read_floats(offset)?),
            Field::Struct(index) => FieldValue::Struct(file.get_struct(index).ok_or(
                RangeError::StructIndex {
                    index,
                    count: file.struct_count(),
                },
            )?),
            Field::List(offset) => FieldValue::List(
                file.get_list(offset / 4)
                    .filter(|_| offset % 4 == 0)
                    .ok_or(RangeError::ListOffset { offset })?,
            ),
        })
    }
}
