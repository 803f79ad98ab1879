//! Localized strings stored in `CExoLocString` fields.
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | String Reference       | 4 bytes: Index into the talk table, 0xFFFFFFFF for none |
//! | 0x0004         | String Count           | 4 bytes: Number of embedded strings                     |
//! | 0x0008         | Strings                | String Count entries, see below                         |
//!
//! Each embedded string is a 4 byte id (`language * 2 + gender`), a 4 byte length and that many
//! bytes of text. The 4 byte total length prefix that precedes this structure in the field data
//! block is consumed by [`crate::GffStruct::get_loc_string`].

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Read;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::Result;
use crate::types::decode_ascii;

/// String reference value meaning "no talk table entry"
pub const NO_STRING_REF: u32 = 0xFFFF_FFFF;

/// Language of an embedded string
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Language {
    English,
    French,
    German,
    Italian,
    Spanish,
    Polish,
    Korean,
    ChineseTraditional,
    ChineseSimplified,
    Japanese,
    Unknown(u32),
}

impl From<u32> for Language {
    fn from(value: u32) -> Self {
        match value {
            0 => Language::English,
            1 => Language::French,
            2 => Language::German,
            3 => Language::Italian,
            4 => Language::Spanish,
            5 => Language::Polish,
            128 => Language::Korean,
            129 => Language::ChineseTraditional,
            130 => Language::ChineseSimplified,
            131 => Language::Japanese,
            other => Language::Unknown(other),
        }
    }
}

impl From<Language> for u32 {
    fn from(value: Language) -> Self {
        match value {
            Language::English => 0,
            Language::French => 1,
            Language::German => 2,
            Language::Italian => 3,
            Language::Spanish => 4,
            Language::Polish => 5,
            Language::Korean => 128,
            Language::ChineseTraditional => 129,
            Language::ChineseSimplified => 130,
            Language::Japanese => 131,
            Language::Unknown(other) => other,
        }
    }
}

/// Grammatical gender of an embedded string
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Gender {
    #[default]
    Masculine,
    Feminine,
}

/// One translation inside a [`LocString`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LocSubString {
    pub language: Language,
    pub gender: Gender,
    pub text: String,
}

impl LocSubString {
    fn new(id: u32, text: String) -> Self {
        LocSubString {
            language: Language::from(id / 2),
            gender: if id % 2 == 0 {
                Gender::Masculine
            } else {
                Gender::Feminine
            },
            text,
        }
    }
}

/// A localized string: an optional talk table reference plus any number of embedded translations
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LocString {
    string_ref: u32,
    strings: Vec<LocSubString>,
}

impl Default for LocString {
    fn default() -> Self {
        LocString {
            string_ref: NO_STRING_REF,
            strings: Vec::new(),
        }
    }
}

impl LocString {
    /// Decode a localized string from the bytes following its length prefix.
    pub fn read(data: &[u8]) -> Result<LocString> {
        let mut reader = data;

        let string_ref = reader.read_u32::<LittleEndian>()?;
        let count = reader.read_u32::<LittleEndian>()?;

        // Every entry needs at least 8 bytes, do not trust the count for the allocation
        let mut strings = Vec::with_capacity((count as usize).min(reader.len() / 8));
        for _ in 0..count {
            let id = reader.read_u32::<LittleEndian>()?;
            let length = reader.read_u32::<LittleEndian>()? as usize;

            if length > reader.len() {
                return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
            }

            let mut buffer = vec![0u8; length];
            reader.read_exact(&mut buffer)?;

            strings.push(LocSubString::new(id, decode_ascii(&buffer)));
        }

        Ok(LocString {
            string_ref,
            strings,
        })
    }

    /// The talk table reference, if this string has one
    pub fn string_ref(&self) -> Option<u32> {
        (self.string_ref != NO_STRING_REF).then_some(self.string_ref)
    }

    /// The embedded translation for a language and gender
    pub fn get(&self, language: Language, gender: Gender) -> Option<&str> {
        self.strings
            .iter()
            .find(|s| s.language == language && s.gender == gender)
            .map(|s| s.text.as_str())
    }

    /// The first embedded translation, whatever its language
    pub fn first(&self) -> Option<&str> {
        self.strings.first().map(|s| s.text.as_str())
    }

    /// All embedded translations, in file order
    pub fn iter(&self) -> impl Iterator<Item = &LocSubString> {
        self.strings.iter()
    }

    /// Number of embedded translations
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether there are no embedded translations
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
