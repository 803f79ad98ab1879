//! Lists of structs, expanded from the list indices table.
//!
//! The raw table is a flat run of words in the shape `[count, index_0 .. index_count-1]`
//! repeated until the end of the table. List fields refer to a list by the byte offset of its
//! count word.

use derive_more::derive::Deref;
use std::fmt::{self, Debug};
use tracing::{debug, instrument, trace};

use crate::error::{RangeError, Result};
use crate::read::GffFile;
use crate::structure::GffStruct;

/// A list as stored in the file: indices into the struct table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub(crate) struct ListData(Vec<u32>);

/// Every list of a file plus the lookup from word offset to list
#[derive(Debug, Default)]
pub(crate) struct ListTable {
    pub lists: Vec<ListData>,

    /// One entry per raw word: the list starting there, or `None` inside a run
    pub offset_to_index: Vec<Option<u32>>,
}

impl ListTable {
    /// Resolve a word offset into the raw table to the list whose count word sits there
    pub fn index_for_offset(&self, word_offset: u32) -> Option<u32> {
        self.offset_to_index
            .get(word_offset as usize)
            .copied()
            .flatten()
    }
}

/// Split the raw list indices into lists, validating every struct reference.
#[instrument(skip(raw))]
pub(crate) fn expand_lists(raw: &[u32], struct_count: u32) -> Result<ListTable> {
    let mut table = ListTable {
        lists: Vec::new(),
        offset_to_index: Vec::with_capacity(raw.len()),
    };

    let mut position = 0usize;
    while position < raw.len() {
        let count = raw[position];

        let end = position as u64 + 1 + count as u64;
        if end > raw.len() as u64 {
            return Err(RangeError::ListIndices {
                position: position as u32,
                count,
                len: raw.len() as u32,
            }
            .into());
        }

        let indices = &raw[position + 1..end as usize];
        if let Some(&index) = indices.iter().find(|&&index| index >= struct_count) {
            return Err(RangeError::StructIndex {
                index,
                count: struct_count,
            }
            .into());
        }

        trace!(position, count, "list");

        table.offset_to_index.push(Some(table.lists.len() as u32));
        table
            .offset_to_index
            .extend(std::iter::repeat(None).take(indices.len()));
        table.lists.push(ListData(indices.to_vec()));

        position = end as usize;
    }

    debug!(lists = table.lists.len(), words = raw.len(), "expanded lists");

    Ok(table)
}

/// A list of structs inside a [`GffFile`]
#[derive(Clone, Copy)]
pub struct GffList<'a> {
    file: &'a GffFile,
    data: &'a ListData,
}

impl Debug for GffList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> GffList<'a> {
    pub(crate) fn new(file: &'a GffFile, data: &'a ListData) -> Self {
        GffList { file, data }
    }

    /// Number of structs in this list
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether this list holds no structs
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the struct at a position in this list
    pub fn get(&self, index: usize) -> Option<GffStruct<'a>> {
        let (file, data) = (self.file, self.data);
        data.get(index).map(|&i| file.struct_at(i))
    }

    /// Indices into the struct table of the structs in this list
    pub fn struct_indices(&self) -> &'a [u32] {
        let data = self.data;
        data.as_slice()
    }

    /// Iterate over the structs in this list, in order
    ///
    /// Yields exactly [`GffList::len`] structs, loading rejects lists naming missing structs.
    pub fn iter(&self) -> impl Iterator<Item = GffStruct<'a>> + 'a {
        let (file, data) = (self.file, self.data);
        data.iter().map(move |&i| file.struct_at(i))
    }
}

impl<'a> IntoIterator for GffList<'a> {
    type Item = GffStruct<'a>;
    type IntoIter = Box<dyn Iterator<Item = GffStruct<'a>> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
