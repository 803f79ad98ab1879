//! This library handles reading **GFF** files used by BioWare's *Aurora* engine games.
//!
//! # GFF Format Documentation
//!
//! The Generic File Format is a self describing binary container holding a tree of typed key/value
//! records. Module info (`.ifo`), creatures (`.utc`), items (`.uti`), dialogues (`.dlg`) and many
//! other resources share it, telling each other apart by the resource type tag at the start of the
//! file.
//!
//! ## File Structure
//!
//! A GFF file consists of a header followed by six tables, each located by an offset from the start
//! of the file.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | File Type              | 4 bytes: Resource type, e.g. "IFO " or "UTC "              |
//! | 0x0004         | Version                | 4 bytes: "V3.2", or "V3.3" in The Witcher                  |
//! | 0x0008         | Struct Offset          | 4 bytes: Offset of the struct table                        |
//! | 0x000C         | Struct Count           | 4 bytes: Number of 12 byte struct entries                  |
//! | 0x0010         | Field Offset           | 4 bytes: Offset of the field table                         |
//! | 0x0014         | Field Count            | 4 bytes: Number of 12 byte field entries                   |
//! | 0x0018         | Label Offset           | 4 bytes: Offset of the label table                         |
//! | 0x001C         | Label Count            | 4 bytes: Number of 16 byte labels                          |
//! | 0x0020         | Field Data Offset      | 4 bytes: Offset of the field data block                    |
//! | 0x0024         | Field Data Count       | 4 bytes: Size of the field data block in bytes             |
//! | 0x0028         | Field Indices Offset   | 4 bytes: Offset of the field indices table                 |
//! | 0x002C         | Field Indices Count    | 4 bytes: Size of the field indices table in bytes          |
//! | 0x0030         | List Indices Offset    | 4 bytes: Offset of the list indices table                  |
//! | 0x0034         | List Indices Count     | 4 bytes: Size of the list indices table in bytes           |
//!
//! ### Struct Table
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | ID                     | 4 bytes: Game defined struct type                       |
//! | 0x0004         | Field Index            | 4 bytes: See below                                      |
//! | 0x0008         | Field Count            | 4 bytes: Number of fields in this struct                |
//!
//! With a single field, **Field Index** is an index into the field table. With more than one it is
//! a byte offset into the field indices table, where **Field Count** field table indices follow.
//! Struct 0 is the top level struct.
//!
//! ### Field Table
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Type                   | 4 bytes: Field type, see [`FieldType`]                  |
//! | 0x0004         | Label Index            | 4 bytes: Index into the label table                     |
//! | 0x0008         | Data                   | 4 bytes: Inline value or offset, see below              |
//!
//! - Byte, char, 16 and 32 bit integers and floats are stored inline in **Data**.
//! - 64 bit integers, doubles, strings, resrefs, localized strings, void data, vectors and
//!   orientations are *extended*: **Data** is a byte offset into the field data block.
//! - Struct fields hold an index into the struct table.
//! - List fields hold a byte offset into the list indices table.
//!
//! ### Label Table
//!
//! Fixed 16 byte ASCII names, zero padded.
//!
//! ### List Indices
//!
//! Runs of 4 byte words: a count followed by that many struct table indices, one run per list.
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Strings**: single byte encoded. Strings carry a 4 byte length prefix, resrefs a 1 byte one.
//!

pub mod error;
pub mod list;
pub mod locstring;
pub mod read;
pub mod structure;
pub mod types;
pub mod value;

#[cfg(feature = "serde")]
mod ser;

pub use list::GffList;
pub use locstring::LocString;
pub use read::GffFile;
pub use structure::GffStruct;
pub use types::{Field, FieldType};
pub use value::FieldValue;
