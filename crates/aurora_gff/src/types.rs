//! Base types for structure of GFF file.

use binrw::BinRead;
use derive_more::derive::Display;

/// Version tag used by most Aurora titles
pub const VERSION_32: [u8; 4] = *b"V3.2";

/// Version tag found in The Witcher, which uses a different language table
pub const VERSION_33: [u8; 4] = *b"V3.3";

/// Size of the header table following the type and version tags
pub const HEADER_SIZE: u64 = 48;

/// Size of a single entry in the struct table
pub const STRUCT_ENTRY_SIZE: u64 = 12;

/// Size of a single entry in the field table
pub const FIELD_ENTRY_SIZE: u64 = 12;

/// Size of a single entry in the label table
pub const LABEL_SIZE: u64 = 16;

/// GFF file header
///
/// Twelve little endian words following the resource type and version tags, in pairs of
/// offset (from the start of the file) and size for each table.
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[br(little)]
pub struct GffHeader {
    /// Offset of the struct table
    pub struct_offset: u32,

    /// Number of 12 byte entries in the struct table
    pub struct_count: u32,

    /// Offset of the field table
    pub field_offset: u32,

    /// Number of 12 byte entries in the field table
    pub field_count: u32,

    /// Offset of the label table
    pub label_offset: u32,

    /// Number of 16 byte entries in the label table
    pub label_count: u32,

    /// Offset of the field data block
    pub field_data_offset: u32,

    /// Size of the field data block in bytes
    pub field_data_count: u32,

    /// Offset of the field indices table
    pub field_indices_offset: u32,

    /// Size of the field indices table in bytes
    pub field_indices_count: u32,

    /// Offset of the list indices table
    pub list_indices_offset: u32,

    /// Size of the list indices table in bytes
    pub list_indices_count: u32,
}

impl GffHeader {
    /// Absolute offset and size in bytes of one of the tables this header describes
    pub fn extent(&self, table: Table) -> (u64, u64) {
        match table {
            Table::Structs => (
                self.struct_offset as u64,
                self.struct_count as u64 * STRUCT_ENTRY_SIZE,
            ),
            Table::Fields => (
                self.field_offset as u64,
                self.field_count as u64 * FIELD_ENTRY_SIZE,
            ),
            Table::Labels => (
                self.label_offset as u64,
                self.label_count as u64 * LABEL_SIZE,
            ),
            Table::FieldData => (
                self.field_data_offset as u64,
                self.field_data_count as u64,
            ),
            Table::FieldIndices => (
                self.field_indices_offset as u64,
                self.field_indices_count as u64,
            ),
            Table::ListIndices => (
                self.list_indices_offset as u64,
                self.list_indices_count as u64,
            ),
        }
    }
}

/// The tables making up a GFF file
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq)]
pub enum Table {
    #[display("struct table")]
    Structs,
    #[display("field table")]
    Fields,
    #[display("label table")]
    Labels,
    #[display("field data")]
    FieldData,
    #[display("field indices")]
    FieldIndices,
    #[display("list indices")]
    ListIndices,
}

/// Type tag of a field, as stored in the field table
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Any tag this library does not know about
    #[display("none")]
    None,
    #[display("byte")]
    Byte,
    #[display("char")]
    Char,
    #[display("uint16")]
    Uint16,
    #[display("sint16")]
    Sint16,
    #[display("uint32")]
    Uint32,
    #[display("sint32")]
    Sint32,
    #[display("uint64")]
    Uint64,
    #[display("sint64")]
    Sint64,
    #[display("float")]
    Float,
    #[display("double")]
    Double,
    #[display("string")]
    ExoString,
    #[display("resref")]
    ResRef,
    #[display("localized string")]
    LocString,
    #[display("void")]
    Void,
    #[display("struct")]
    Struct,
    #[display("list")]
    List,
    #[display("orientation")]
    Orientation,
    #[display("vector")]
    Vector,
}

impl FieldType {
    /// Whether the payload of this type lives in the field data block rather than inline
    pub fn is_extended(&self) -> bool {
        matches!(
            self,
            FieldType::Uint64
                | FieldType::Sint64
                | FieldType::Double
                | FieldType::ExoString
                | FieldType::ResRef
                | FieldType::LocString
                | FieldType::Void
                | FieldType::Orientation
                | FieldType::Vector
        )
    }
}

impl From<u32> for FieldType {
    fn from(value: u32) -> Self {
        match value {
            0 => FieldType::Byte,
            1 => FieldType::Char,
            2 => FieldType::Uint16,
            3 => FieldType::Sint16,
            4 => FieldType::Uint32,
            5 => FieldType::Sint32,
            6 => FieldType::Uint64,
            7 => FieldType::Sint64,
            8 => FieldType::Float,
            9 => FieldType::Double,
            10 => FieldType::ExoString,
            11 => FieldType::ResRef,
            12 => FieldType::LocString,
            13 => FieldType::Void,
            14 => FieldType::Struct,
            15 => FieldType::List,
            16 => FieldType::Orientation,
            17 => FieldType::Vector,
            _ => FieldType::None,
        }
    }
}

/// A single field of a struct
///
/// Inline types carry their decoded value. Extended types carry the byte offset of their
/// payload inside the field data block, struct fields carry an index into the struct table and
/// list fields carry a byte offset into the list indices table.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Field {
    /// Unknown type tag, kept as the raw tag
    None(u32),
    Byte(u8),
    Char(i8),
    Uint16(u16),
    Sint16(i16),
    Uint32(u32),
    Sint32(i32),
    Float(f32),
    Struct(u32),
    List(u32),
    Uint64(u32),
    Sint64(u32),
    Double(u32),
    ExoString(u32),
    ResRef(u32),
    LocString(u32),
    Void(u32),
    Orientation(u32),
    Vector(u32),
}

impl Field {
    /// Build a field from the raw type tag and data word of a field table entry
    pub fn new(tag: u32, data: u32) -> Field {
        match FieldType::from(tag) {
            FieldType::None => Field::None(tag),
            FieldType::Byte => Field::Byte(data as u8),
            FieldType::Char => Field::Char(data as u8 as i8),
            FieldType::Uint16 => Field::Uint16(data as u16),
            FieldType::Sint16 => Field::Sint16(data as u16 as i16),
            FieldType::Uint32 => Field::Uint32(data),
            FieldType::Sint32 => Field::Sint32(data as i32),
            FieldType::Float => Field::Float(f32::from_bits(data)),
            FieldType::Struct => Field::Struct(data),
            FieldType::List => Field::List(data),
            FieldType::Uint64 => Field::Uint64(data),
            FieldType::Sint64 => Field::Sint64(data),
            FieldType::Double => Field::Double(data),
            FieldType::ExoString => Field::ExoString(data),
            FieldType::ResRef => Field::ResRef(data),
            FieldType::LocString => Field::LocString(data),
            FieldType::Void => Field::Void(data),
            FieldType::Orientation => Field::Orientation(data),
            FieldType::Vector => Field::Vector(data),
        }
    }

    /// The type tag of this field
    pub fn field_type(&self) -> FieldType {
        match self {
            Field::None(_) => FieldType::None,
            Field::Byte(_) => FieldType::Byte,
            Field::Char(_) => FieldType::Char,
            Field::Uint16(_) => FieldType::Uint16,
            Field::Sint16(_) => FieldType::Sint16,
            Field::Uint32(_) => FieldType::Uint32,
            Field::Sint32(_) => FieldType::Sint32,
            Field::Float(_) => FieldType::Float,
            Field::Struct(_) => FieldType::Struct,
            Field::List(_) => FieldType::List,
            Field::Uint64(_) => FieldType::Uint64,
            Field::Sint64(_) => FieldType::Sint64,
            Field::Double(_) => FieldType::Double,
            Field::ExoString(_) => FieldType::ExoString,
            Field::ResRef(_) => FieldType::ResRef,
            Field::LocString(_) => FieldType::LocString,
            Field::Void(_) => FieldType::Void,
            Field::Orientation(_) => FieldType::Orientation,
            Field::Vector(_) => FieldType::Vector,
        }
    }

    /// Offset into the field data block, for extended types
    pub fn data_offset(&self) -> Option<u32> {
        match *self {
            Field::Uint64(offset)
            | Field::Sint64(offset)
            | Field::Double(offset)
            | Field::ExoString(offset)
            | Field::ResRef(offset)
            | Field::LocString(offset)
            | Field::Void(offset)
            | Field::Orientation(offset)
            | Field::Vector(offset) => Some(offset),
            _ => None,
        }
    }
}

/// Decode a run of single byte characters into a string
///
/// Aurora strings are single byte encoded, so every byte maps straight onto the matching
/// Latin-1 code point and decoding never fails.
pub(crate) fn decode_ascii(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
