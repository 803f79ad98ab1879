//! Types for reading GFF files
//!

use binrw::BinRead;
use byteorder::{ByteOrder, LittleEndian};
use std::{
    fmt::{self, Debug},
    io::{Read, Seek, SeekFrom},
};
use tracing::{debug, instrument, trace};

use crate::{
    error::{Error, RangeError, Result},
    list::{expand_lists, GffList, ListTable},
    structure::{FieldTables, GffStruct, StructData},
    types::{decode_ascii, Field, GffHeader, Table, STRUCT_ENTRY_SIZE, VERSION_32, VERSION_33},
};

/// A loaded GFF file
///
/// Owns every struct and list of the file along with the field data block. Structs and lists
/// refer to each other by index, so the handles returned from here simply borrow the file.
///
/// ```no_run
/// use std::io::prelude::*;
///
/// fn module_name(reader: impl Read + Seek) -> aurora_gff::error::Result<String> {
///     let ifo = aurora_gff::GffFile::load_with_type(reader, b"IFO ")?;
///
///     ifo.top_level().get_string("Mod_Name", "")
/// }
/// ```
pub struct GffFile {
    file_type: [u8; 4],
    version: [u8; 4],
    header: GffHeader,
    structs: Vec<StructData>,
    lists: ListTable,
    field_data: Vec<u8>,
}

impl Debug for GffFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("GffFile")
            .field("file_type", &decode_ascii(&self.file_type))
            .field("version", &decode_ascii(&self.version))
            .field("structs", &self.structs.len())
            .field("lists", &self.lists.lists.len())
            .field("field_data", &self.field_data.len())
            .finish()
    }
}

impl GffFile {
    /// Read a GFF file of any resource type.
    ///
    /// Table offsets are taken relative to the position of the reader when this is called.
    pub fn load<R: Read + Seek>(mut reader: R) -> Result<GffFile> {
        let base = reader.stream_position()?;

        let mut file_type = [0u8; 4];
        reader.read_exact(&mut file_type)?;

        let mut version = [0u8; 4];
        reader.read_exact(&mut version)?;

        if version != VERSION_32 && version != VERSION_33 {
            return Err(Error::UnsupportedVersion(decode_ascii(&version)));
        }

        let header = GffHeader::read(&mut reader)?;
        debug!(
            file_type = %decode_ascii(&file_type),
            version = %decode_ascii(&version),
            ?header,
            "read header"
        );

        Self::read_tables(&mut reader, base, &header)
            .map(|(structs, lists, field_data)| GffFile {
                file_type,
                version,
                header,
                structs,
                lists,
                field_data,
            })
            .map_err(|e| e.context("failed reading GFF file"))
    }

    /// Read a GFF file, failing unless its resource type is `file_type`.
    pub fn load_with_type<R: Read + Seek>(mut reader: R, file_type: &[u8; 4]) -> Result<GffFile> {
        let start = reader.stream_position()?;

        let mut found = [0u8; 4];
        reader.read_exact(&mut found)?;
        if &found != file_type {
            return Err(Error::InvalidFileType {
                expected: decode_ascii(file_type),
                found: decode_ascii(&found),
            });
        }

        reader
            .seek(SeekFrom::Start(start))
            .map_err(|source| Error::Seek {
                offset: start,
                source,
            })?;
        Self::load(reader)
    }

    /// The resource type tag, such as `IFO ` or `UTC `
    pub fn file_type(&self) -> &[u8; 4] {
        &self.file_type
    }

    /// The version tag, `V3.2` or `V3.3`
    pub fn version(&self) -> &[u8; 4] {
        &self.version
    }

    /// The table offsets and counts as read from the file
    pub fn header(&self) -> &GffHeader {
        &self.header
    }

    /// Number of structs in the file
    pub fn struct_count(&self) -> u32 {
        self.structs.len() as u32
    }

    /// Number of lists in the file
    pub fn list_count(&self) -> usize {
        self.lists.lists.len()
    }

    /// The root struct of the file
    pub fn top_level(&self) -> GffStruct<'_> {
        // Loading fails on an empty struct table
        GffStruct::new(self, 0, &self.structs[0])
    }

    /// A struct that load validation guarantees to exist
    pub(crate) fn struct_at(&self, index: u32) -> GffStruct<'_> {
        GffStruct::new(self, index, &self.structs[index as usize])
    }

    /// Get a struct by its index in the struct table
    pub fn get_struct(&self, index: u32) -> Option<GffStruct<'_>> {
        self.structs
            .get(index as usize)
            .map(|data| GffStruct::new(self, index, data))
    }

    /// Get a list by the word offset of its count in the list indices table.
    ///
    /// Offsets pointing inside a list rather than at its start resolve to nothing.
    pub fn get_list(&self, word_offset: u32) -> Option<GffList<'_>> {
        self.lists
            .index_for_offset(word_offset)
            .and_then(|i| self.lists.lists.get(i as usize))
            .map(|data| GffList::new(self, data))
    }

    /// View of the field data block from `offset` to its end
    pub fn get_field_data(&self, offset: u32) -> Result<&[u8]> {
        self.field_data.get(offset as usize..).filter(|d| !d.is_empty()).ok_or(
            RangeError::FieldData {
                offset,
                size: self.field_data.len() as u32,
            }
            .into(),
        )
    }

    /// Exactly `len` bytes of field data starting at `offset`
    pub(crate) fn field_data_exact(&self, offset: u32, len: u64) -> Result<&[u8]> {
        let data = self.get_field_data(offset)?;
        if len > data.len() as u64 {
            return Err(RangeError::FieldDataExtent {
                offset,
                need: len,
                have: data.len() as u64,
            }
            .into());
        }
        Ok(&data[..len as usize])
    }

    /// The bytes following a `width` byte little endian length prefix at `offset`
    pub(crate) fn length_prefixed(&self, offset: u32, width: usize) -> Result<&[u8]> {
        let prefix = self.field_data_exact(offset, width as u64)?;
        let length = LittleEndian::read_uint(prefix, width);

        let body = &self.get_field_data(offset)?[width..];
        if length > body.len() as u64 {
            return Err(RangeError::FieldDataExtent {
                offset,
                need: width as u64 + length,
                have: width as u64 + body.len() as u64,
            }
            .into());
        }
        Ok(&body[..length as usize])
    }

    pub(crate) fn read_u64(&self, offset: u32) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.field_data_exact(offset, 8)?))
    }

    pub(crate) fn read_floats<const N: usize>(&self, offset: u32) -> Result<[f32; N]> {
        let data = self.field_data_exact(offset, N as u64 * 4)?;
        Ok(std::array::from_fn(|i| {
            f32::from_bits(LittleEndian::read_u32(&data[i * 4..]))
        }))
    }

    #[instrument(skip(reader, header), err)]
    fn read_tables<R: Read + Seek>(
        reader: &mut R,
        base: u64,
        header: &GffHeader,
    ) -> Result<(Vec<StructData>, ListTable, Vec<u8>)> {
        let end = reader.seek(SeekFrom::End(0))?;
        let available = end.saturating_sub(base);

        let structs = Self::read_structs(reader, base, available, header)?;
        if structs.is_empty() {
            return Err(Error::MissingTopLevel);
        }

        let raw_lists = Self::read_table(reader, base, available, header, Table::ListIndices)?;
        let words = raw_lists
            .chunks_exact(4)
            .map(LittleEndian::read_u32)
            .collect::<Vec<_>>();
        let lists = expand_lists(&words, structs.len() as u32)?;

        let field_data = Self::read_table(reader, base, available, header, Table::FieldData)?;

        Self::check_references(&structs, &lists)?;

        Ok((structs, lists, field_data))
    }

    fn read_structs<R: Read + Seek>(
        reader: &mut R,
        base: u64,
        available: u64,
        header: &GffHeader,
    ) -> Result<Vec<StructData>> {
        let entries = Self::read_table(reader, base, available, header, Table::Structs)?;
        let fields = Self::read_table(reader, base, available, header, Table::Fields)?;
        let labels = Self::read_table(reader, base, available, header, Table::Labels)?;
        let field_indices =
            Self::read_table(reader, base, available, header, Table::FieldIndices)?;

        let tables = FieldTables {
            header,
            fields: &fields,
            labels: &labels,
            field_indices: &field_indices,
        };

        let structs = entries
            .chunks_exact(STRUCT_ENTRY_SIZE as usize)
            .enumerate()
            .map(|(i, entry)| {
                let id = LittleEndian::read_u32(&entry[0..4]);
                let index = LittleEndian::read_u32(&entry[4..8]);
                let count = LittleEndian::read_u32(&entry[8..12]);

                trace!(struct_index = i, id, index, count, "struct");
                StructData::read(&tables, id, index, count)
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(structs = structs.len(), "read structs");

        Ok(structs)
    }

    /// Read a whole table, after checking it lies within the stream
    fn read_table<R: Read + Seek>(
        reader: &mut R,
        base: u64,
        available: u64,
        header: &GffHeader,
        table: Table,
    ) -> Result<Vec<u8>> {
        let (offset, size) = header.extent(table);

        if offset + size > available {
            return Err(Error::UnexpectedEof {
                table,
                offset,
                need: size,
                have: available.saturating_sub(offset),
            });
        }

        reader
            .seek(SeekFrom::Start(base + offset))
            .map_err(|source| Error::Seek {
                offset: base + offset,
                source,
            })?;

        let mut buffer = vec![0u8; size as usize];
        reader.read_exact(&mut buffer)?;

        trace!(%table, offset, size, "read table");

        Ok(buffer)
    }

    /// Every struct and list field has to point at something that exists
    fn check_references(structs: &[StructData], lists: &ListTable) -> Result<()> {
        let count = structs.len() as u32;

        for field in structs.iter().flat_map(|s| s.fields.values()) {
            match *field {
                Field::Struct(index) if index >= count => {
                    return Err(RangeError::StructIndex { index, count }.into());
                }
                Field::List(offset)
                    if offset % 4 != 0 || lists.index_for_offset(offset / 4).is_none() =>
                {
                    return Err(RangeError::ListOffset { offset }.into());
                }
                _ => {}
            }
        }

        Self::check_acyclic(structs, lists)
    }

    /// No struct may contain itself, directly or through lists
    fn check_acyclic(structs: &[StructData], lists: &ListTable) -> Result<()> {
        #[derive(Copy, Clone, PartialEq, Eq)]
        enum Mark {
            New,
            Open,
            Done,
        }

        // References were already checked, so every lookup here resolves
        let children = |index: usize| -> Vec<u32> {
            let mut children = Vec::new();
            for field in structs[index].fields.values() {
                match *field {
                    Field::Struct(child) => children.push(child),
                    Field::List(offset) => {
                        if let Some(list) = lists
                            .index_for_offset(offset / 4)
                            .and_then(|i| lists.lists.get(i as usize))
                        {
                            children.extend_from_slice(list);
                        }
                    }
                    _ => {}
                }
            }
            children
        };

        let mut marks = vec![Mark::New; structs.len()];
        for root in 0..structs.len() {
            if marks[root] != Mark::New {
                continue;
            }

            marks[root] = Mark::Open;
            let mut stack = vec![(root, children(root), 0usize)];

            while let Some((index, edges, next)) = stack.last_mut() {
                let Some(&child) = edges.get(*next) else {
                    marks[*index] = Mark::Done;
                    stack.pop();
                    continue;
                };
                *next += 1;

                match marks[child as usize] {
                    Mark::Open => {
                        return Err(RangeError::CyclicStruct { index: child }.into());
                    }
                    Mark::New => {
                        marks[child as usize] = Mark::Open;
                        stack.push((child as usize, children(child as usize), 0));
                    }
                    Mark::Done => {}
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use crate::error::Error;
    use crate::read::GffFile;

    #[test]
    fn read_invalid_version() {
        #[rustfmt::skip]
        let input = [
            b'G', b'F', b'F', b' ', b'V', b'4', b'.', b'0',
        ];

        let result = GffFile::load(Cursor::new(input));
        assert!(matches!(result, Err(Error::UnsupportedVersion(v)) if v == "V4.0"));
    }

    #[test]
    fn read_short_preamble() {
        let result = GffFile::load(Cursor::new([b'G', b'F', b'F']));
        assert!(matches!(result, Err(Error::IOError(_))));
    }

    #[test]
    fn read_wrong_file_type() {
        #[rustfmt::skip]
        let input = [
            b'U', b'T', b'C', b' ', b'V', b'3', b'.', b'2',
        ];

        let result = GffFile::load_with_type(Cursor::new(input), b"IFO ");
        assert!(matches!(
            result,
            Err(Error::InvalidFileType { expected, found }) if expected == "IFO " && found == "UTC "
        ));
    }

    #[test]
    fn read_empty_struct_table() {
        #[rustfmt::skip]
        let input = [
            b'G', b'F', b'F', b' ', b'V', b'3', b'.', b'2',
            0x38, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x38, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x38, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x38, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x38, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x38, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];

        let result = GffFile::load(Cursor::new(input));
        assert!(matches!(
            result.map_err(|e| matches!(e.root(), Error::MissingTopLevel)),
            Err(true)
        ));
    }

    #[test]
    fn read_minimal_file() {
        #[rustfmt::skip]
        let input = [
            b'G', b'F', b'F', b' ', b'V', b'3', b'.', b'3',
            // Header
            0x38, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
            0x44, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x44, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x44, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x44, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x44, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            // Struct table
            0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];

        let gff = GffFile::load(Cursor::new(input)).unwrap();
        assert_eq!(gff.version(), b"V3.3");
        assert_eq!(gff.struct_count(), 1);
        assert_eq!(gff.list_count(), 0);

        let top = gff.top_level();
        assert_eq!(top.id(), 0xFFFF_FFFF);
        assert_eq!(top.field_count(), 0);
        assert!(gff.get_struct(1).is_none());
        assert!(gff.get_list(0).is_none());
        assert!(gff.get_field_data(0).is_err());
    }
}
