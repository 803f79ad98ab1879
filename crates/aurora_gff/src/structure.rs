//! Structs and their typed field accessors.

use byteorder::{ByteOrder, LittleEndian};
use indexmap::IndexMap;
use std::fmt::{self, Debug};
use tracing::trace;

use crate::error::{Error, RangeError, Result};
use crate::list::GffList;
use crate::locstring::LocString;
use crate::read::GffFile;
use crate::types::{decode_ascii, Field, GffHeader, FIELD_ENTRY_SIZE, LABEL_SIZE};

/// The tables a struct needs while it is being built
pub(crate) struct FieldTables<'t> {
    pub header: &'t GffHeader,
    pub fields: &'t [u8],
    pub labels: &'t [u8],
    pub field_indices: &'t [u8],
}

impl FieldTables<'_> {
    fn read_label(&self, index: u32) -> Result<String> {
        if index >= self.header.label_count {
            return Err(RangeError::LabelIndex {
                index,
                count: self.header.label_count,
            }
            .into());
        }

        let start = index as usize * LABEL_SIZE as usize;
        let raw = &self.labels[start..start + LABEL_SIZE as usize];

        // Anything after the terminator is padding
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        Ok(decode_ascii(&raw[..end]))
    }

    fn read_field(&self, index: u32) -> Result<(String, Field)> {
        if index >= self.header.field_count {
            return Err(RangeError::FieldIndex {
                index,
                count: self.header.field_count,
            }
            .into());
        }

        let start = index as usize * FIELD_ENTRY_SIZE as usize;
        let entry = &self.fields[start..start + FIELD_ENTRY_SIZE as usize];

        let tag = LittleEndian::read_u32(&entry[0..4]);
        let label = LittleEndian::read_u32(&entry[4..8]);
        let data = LittleEndian::read_u32(&entry[8..12]);

        Ok((self.read_label(label)?, Field::new(tag, data)))
    }

    fn read_field_indices(&self, offset: u32, count: u32) -> Result<Vec<u32>> {
        let end = offset as u64 + count as u64 * 4;
        if end > self.field_indices.len() as u64 {
            return Err(RangeError::FieldIndices {
                offset,
                count,
                size: self.header.field_indices_count,
            }
            .into());
        }

        Ok(self.field_indices[offset as usize..end as usize]
            .chunks_exact(4)
            .map(LittleEndian::read_u32)
            .collect())
    }
}

/// A struct as stored in the file: its id and its fields by label
#[derive(Debug, Clone, Default)]
pub(crate) struct StructData {
    pub id: u32,
    pub fields: IndexMap<String, Field>,
}

impl StructData {
    /// Build a struct from its struct table entry.
    ///
    /// A single field is referenced directly by its field table index, more than one through a
    /// byte offset into the field indices table.
    pub fn read(tables: &FieldTables, id: u32, index: u32, count: u32) -> Result<StructData> {
        let indices = match count {
            0 => Vec::new(),
            1 => vec![index],
            _ => tables.read_field_indices(index, count)?,
        };

        let mut fields = IndexMap::with_capacity(indices.len());
        for i in indices {
            let (label, field) = tables.read_field(i)?;
            trace!(%label, ?field, "field");
            fields.insert(label, field);
        }

        Ok(StructData { id, fields })
    }
}

/// A struct inside a [`GffFile`]
///
/// Every accessor takes the label of a field and a default. An absent field yields the
/// default, a field of a type the accessor can not read yields [`Error::TypeMismatch`].
#[derive(Clone, Copy)]
pub struct GffStruct<'a> {
    file: &'a GffFile,
    index: u32,
    data: &'a StructData,
}

impl Debug for GffStruct<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("GffStruct")
            .field("index", &self.index)
            .field("id", &self.data.id)
            .field("fields", &self.data.fields)
            .finish()
    }
}

impl<'a> GffStruct<'a> {
    pub(crate) fn new(file: &'a GffFile, index: u32, data: &'a StructData) -> Self {
        GffStruct { file, index, data }
    }

    /// The id of this struct. Its meaning is up to the game.
    pub fn id(&self) -> u32 {
        self.data.id
    }

    /// Position of this struct in the struct table
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The file this struct belongs to
    pub fn file(&self) -> &'a GffFile {
        self.file
    }

    /// Number of fields in this struct
    pub fn field_count(&self) -> usize {
        self.data.fields.len()
    }

    /// Whether a field is stored under `label`
    pub fn has_field(&self, label: &str) -> bool {
        self.data.fields.contains_key(label)
    }

    /// The raw field stored under a label
    pub fn field(&self, label: &str) -> Option<&'a Field> {
        let data = self.data;
        data.fields.get(label)
    }

    /// Labels of all fields, in file order
    pub fn labels(&self) -> impl Iterator<Item = &'a str> + 'a {
        let data = self.data;
        data.fields.keys().map(|k| k.as_str())
    }

    /// All raw fields, in file order
    pub fn fields(&self) -> impl Iterator<Item = (&'a str, &'a Field)> + 'a {
        let data = self.data;
        data.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn mismatch(label: &str, expected: &'static str, field: &Field) -> Error {
        Error::TypeMismatch {
            label: label.to_owned(),
            expected,
            found: field.field_type(),
        }
    }

    /// Read an unsigned integer, sign extending signed types.
    pub fn get_uint(&self, label: &str, default: u64) -> Result<u64> {
        let Some(field) = self.field(label) else {
            return Ok(default);
        };

        Ok(match *field {
            Field::Byte(v) => v as u64,
            Field::Uint16(v) => v as u64,
            Field::Uint32(v) => v as u64,
            Field::Char(v) => v as i64 as u64,
            Field::Sint16(v) => v as i64 as u64,
            Field::Sint32(v) => v as i64 as u64,
            Field::Uint64(offset) | Field::Sint64(offset) => self.file.read_u64(offset)?,
            _ => return Err(Self::mismatch(label, "integer", field)),
        })
    }

    /// Read a signed integer, zero extending unsigned types.
    pub fn get_sint(&self, label: &str, default: i64) -> Result<i64> {
        let Some(field) = self.field(label) else {
            return Ok(default);
        };

        Ok(match *field {
            Field::Byte(v) => v as i64,
            Field::Uint16(v) => v as i64,
            Field::Uint32(v) => v as i64,
            Field::Char(v) => v as i64,
            Field::Sint16(v) => v as i64,
            Field::Sint32(v) => v as i64,
            Field::Uint64(offset) | Field::Sint64(offset) => self.file.read_u64(offset)? as i64,
            _ => return Err(Self::mismatch(label, "integer", field)),
        })
    }

    /// Read any integer field as a boolean, true when non-zero.
    pub fn get_bool(&self, label: &str, default: bool) -> Result<bool> {
        Ok(self.get_uint(label, default as u64)? != 0)
    }

    /// Read a char field. Only valid on char fields.
    pub fn get_char(&self, label: &str, default: i8) -> Result<i8> {
        match self.field(label) {
            None => Ok(default),
            Some(Field::Char(v)) => Ok(*v),
            Some(field) => Err(Self::mismatch(label, "char", field)),
        }
    }

    /// Read a float or double field.
    pub fn get_double(&self, label: &str, default: f64) -> Result<f64> {
        let Some(field) = self.field(label) else {
            return Ok(default);
        };

        match *field {
            Field::Float(v) => Ok(v as f64),
            Field::Double(offset) => Ok(f64::from_bits(self.file.read_u64(offset)?)),
            _ => Err(Self::mismatch(label, "float", field)),
        }
    }

    /// Read a string or resref, or format a number or vector as text.
    pub fn get_string(&self, label: &str, default: &str) -> Result<String> {
        let Some(field) = self.field(label) else {
            return Ok(default.to_owned());
        };

        Ok(match *field {
            Field::ExoString(offset) => decode_ascii(self.file.length_prefixed(offset, 4)?),
            Field::ResRef(offset) => decode_ascii(self.file.length_prefixed(offset, 1)?),
            Field::Byte(_) | Field::Uint16(_) | Field::Uint32(_) | Field::Uint64(_) => {
                self.get_uint(label, 0)?.to_string()
            }
            Field::Char(_) | Field::Sint16(_) | Field::Sint32(_) | Field::Sint64(_) => {
                self.get_sint(label, 0)?.to_string()
            }
            Field::Float(_) | Field::Double(_) => format_fixed(self.get_double(label, 0.0)?),
            Field::Vector(offset) => join_floats(&self.file.read_floats::<3>(offset)?),
            Field::Orientation(offset) => join_floats(&self.file.read_floats::<4>(offset)?),
            _ => return Err(Self::mismatch(label, "string", field)),
        })
    }

    /// Read a localized string field.
    pub fn get_loc_string(&self, label: &str, default: LocString) -> Result<LocString> {
        match self.field(label) {
            None => Ok(default),
            Some(Field::LocString(offset)) => {
                LocString::read(self.file.length_prefixed(*offset, 4)?)
            }
            Some(field) => Err(Self::mismatch(label, "localized string", field)),
        }
    }

    /// Read the bytes of a void field, without their length prefix.
    pub fn get_data(&self, label: &str, default: &'a [u8]) -> Result<&'a [u8]> {
        let file = self.file;
        match self.field(label) {
            None => Ok(default),
            Some(Field::Void(offset)) => file.length_prefixed(*offset, 4),
            Some(field) => Err(Self::mismatch(label, "void", field)),
        }
    }

    /// Read a vector field as `[x, y, z]`.
    pub fn get_vector(&self, label: &str, default: [f32; 3]) -> Result<[f32; 3]> {
        match self.field(label) {
            None => Ok(default),
            Some(Field::Vector(offset)) => self.file.read_floats(*offset),
            Some(field) => Err(Self::mismatch(label, "vector", field)),
        }
    }

    /// Read a vector field, widened to double precision.
    pub fn get_vector_f64(&self, label: &str, default: [f64; 3]) -> Result<[f64; 3]> {
        if !self.has_field(label) {
            return Ok(default);
        }
        Ok(self.get_vector(label, [0.0; 3])?.map(f64::from))
    }

    /// Read an orientation field as `[a, b, c, d]`.
    pub fn get_orientation(&self, label: &str, default: [f32; 4]) -> Result<[f32; 4]> {
        match self.field(label) {
            None => Ok(default),
            Some(Field::Orientation(offset)) => self.file.read_floats(*offset),
            Some(field) => Err(Self::mismatch(label, "orientation", field)),
        }
    }

    /// Read an orientation field, widened to double precision.
    pub fn get_orientation_f64(&self, label: &str, default: [f64; 4]) -> Result<[f64; 4]> {
        if !self.has_field(label) {
            return Ok(default);
        }
        Ok(self.get_orientation(label, [0.0; 4])?.map(f64::from))
    }

    /// Get the struct a struct field refers to, or `None` if there is no such field.
    pub fn get_struct(&self, label: &str) -> Result<Option<GffStruct<'a>>> {
        let file = self.file;
        match self.field(label) {
            None => Ok(None),
            Some(Field::Struct(index)) => file
                .get_struct(*index)
                .map(Some)
                .ok_or_else(|| {
                    RangeError::StructIndex {
                        index: *index,
                        count: file.struct_count(),
                    }
                    .into()
                }),
            Some(field) => Err(Self::mismatch(label, "struct", field)),
        }
    }

    /// Get the list a list field refers to, or `None` if there is no such field.
    pub fn get_list(&self, label: &str) -> Result<Option<GffList<'a>>> {
        let file = self.file;
        match self.field(label) {
            None => Ok(None),
            // Stored as a byte offset into a table of words
            Some(Field::List(offset)) => file
                .get_list(*offset / 4)
                .filter(|_| *offset % 4 == 0)
                .map(Some)
                .ok_or_else(|| RangeError::ListOffset { offset: *offset }.into()),
            Some(field) => Err(Self::mismatch(label, "list", field)),
        }
    }
}

fn join_floats(values: &[f32]) -> String {
    values
        .iter()
        .map(|&v| format_fixed(v as f64))
        .collect::<Vec<_>>()
        .join("/")
}

/// Fixed notation with six decimals, spelling out non-finite values as `printf("%f")` does
pub fn format_fixed(value: f64) -> String {
    match value {
        v if v.is_nan() && v.is_sign_negative() => "-nan".to_owned(),
        v if v.is_nan() => "nan".to_owned(),
        v if v.is_infinite() && v.is_sign_negative() => "-inf".to_owned(),
        v if v.is_infinite() => "inf".to_owned(),
        v => format!("{v:.6}"),
    }
}
