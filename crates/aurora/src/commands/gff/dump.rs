use aurora_gff::{FieldValue, GffStruct};
use clap::{Args, ValueEnum};
use miette::{IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use std::path::PathBuf;

use super::{format_value, open};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    #[default]
    Tree,
    Json,
}

#[derive(Args)]
pub struct DumpArgs {
    /// An input GFF file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: Format,

    /// Expected resource type, such as IFO or UTC
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    file_type: Option<String>,
}

impl DumpArgs {
    pub fn handle(&self) -> Result<()> {
        let gff = open(&self.file, self.file_type.as_deref())?;

        match self.format {
            Format::Json => {
                let json = serde_json::to_string_pretty(&gff.top_level()).into_diagnostic()?;
                println!("{json}");
            }
            Format::Tree => {
                println!(
                    "{} {} ({} structs, {} lists)",
                    String::from_utf8_lossy(gff.file_type()).bold(),
                    String::from_utf8_lossy(gff.version()),
                    gff.struct_count(),
                    gff.list_count()
                );
                print_struct(gff.top_level(), 1)?;
            }
        }

        Ok(())
    }
}

fn print_struct(strct: GffStruct<'_>, depth: usize) -> Result<()> {
    let indent = "  ".repeat(depth);

    for (label, value) in strct.values() {
        let value = value?;
        let kind = value.field_type().to_string();

        match value {
            FieldValue::Struct(child) => {
                println!(
                    "{indent}{} {}: id {}",
                    label.cyan(),
                    kind.dimmed(),
                    child.id()
                );
                print_struct(child, depth + 1)?;
            }
            FieldValue::List(list) => {
                println!("{indent}{} {}: {}", label.cyan(), kind.dimmed(), list.len());
                for (i, item) in list.iter().enumerate() {
                    println!("{indent}  [{}] id {}", i.yellow(), item.id());
                    print_struct(item, depth + 2)?;
                }
            }
            other => {
                println!(
                    "{indent}{} {}: {}",
                    label.cyan(),
                    kind.dimmed(),
                    format_value(&other)
                );
            }
        }
    }

    Ok(())
}
