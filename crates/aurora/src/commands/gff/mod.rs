pub mod check;
pub mod dump;
pub mod get;

use aurora_gff::{structure::format_fixed, FieldValue, GffFile};
use itertools::Itertools;
use miette::{miette, Context, IntoDiagnostic, Result};
use std::{fs::File, io::BufReader, path::Path};

#[derive(clap::Subcommand)]
pub enum GffCommands {
    /// Print the whole tree of a GFF file
    Dump(dump::DumpArgs),
    /// Print a single field of a GFF file
    Get(get::GetArgs),
    /// Try to load every GFF file in a directory
    Check(check::CheckArgs),
}

impl GffCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            GffCommands::Dump(dump) => dump.handle(),
            GffCommands::Get(get) => get.handle(),
            GffCommands::Check(check) => check.handle(),
        }
    }
}

/// Open and load a GFF file, checking its resource type when one is given
pub(crate) fn open(path: &Path, file_type: Option<&str>) -> Result<GffFile> {
    let f = File::open(path)
        .into_diagnostic()
        .context(format!("path: {}", path.display()))?;
    let reader = BufReader::new(f);

    let gff = match file_type {
        Some(t) => GffFile::load_with_type(reader, &parse_file_type(t)?),
        None => GffFile::load(reader),
    };

    gff.context(format!("loading {}", path.display()))
}

/// Resource types are four characters, shorter ones are padded with spaces
fn parse_file_type(value: &str) -> Result<[u8; 4]> {
    if value.len() > 4 || !value.is_ascii() {
        return Err(miette!("invalid resource type {value:?}"));
    }

    let mut tag = [b' '; 4];
    tag[..value.len()].copy_from_slice(value.to_ascii_uppercase().as_bytes());
    Ok(tag)
}

/// One line rendering of a field value
pub(crate) fn format_value(value: &FieldValue<'_>) -> String {
    match value {
        FieldValue::None(tag) => format!("<unknown type {tag}>"),
        FieldValue::Byte(v) => v.to_string(),
        FieldValue::Char(v) => v.to_string(),
        FieldValue::Uint16(v) => v.to_string(),
        FieldValue::Sint16(v) => v.to_string(),
        FieldValue::Uint32(v) => v.to_string(),
        FieldValue::Sint32(v) => v.to_string(),
        FieldValue::Uint64(v) => v.to_string(),
        FieldValue::Sint64(v) => v.to_string(),
        FieldValue::Float(v) => format_fixed(*v as f64),
        FieldValue::Double(v) => format_fixed(*v),
        FieldValue::ExoString(v) | FieldValue::ResRef(v) => format!("{v:?}"),
        FieldValue::LocString(v) => {
            let text = v
                .iter()
                .map(|s| format!("{:?}: {:?}", s.language, s.text))
                .join(", ");
            match v.string_ref() {
                Some(r) => format!("strref {r} [{text}]"),
                None => format!("[{text}]"),
            }
        }
        FieldValue::Void(v) => format!("<{} bytes>", v.len()),
        FieldValue::Struct(v) => format!("struct {} (id {})", v.index(), v.id()),
        FieldValue::List(v) => format!("list of {}", v.len()),
        FieldValue::Orientation(v) => v.iter().map(|&f| format_fixed(f as f64)).join("/"),
        FieldValue::Vector(v) => v.iter().map(|&f| format_fixed(f as f64)).join("/"),
    }
}
