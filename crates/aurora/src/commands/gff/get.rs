use aurora_gff::{FieldValue, GffList, GffStruct};
use clap::Args;
use miette::{miette, IntoDiagnostic, Result};
use std::path::PathBuf;

use super::{format_value, open};

#[derive(Args)]
pub struct GetArgs {
    /// An input GFF file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Path to the field, labels and list positions separated by '/', e.g. Mod_Area_list/0/Area_Name
    #[arg(short, long, value_name = "PATH")]
    path: String,

    /// Expected resource type, such as IFO or UTC
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    file_type: Option<String>,
}

enum Node<'a> {
    Struct(GffStruct<'a>),
    List(GffList<'a>),
    Value(FieldValue<'a>),
}

impl<'a> From<FieldValue<'a>> for Node<'a> {
    fn from(value: FieldValue<'a>) -> Self {
        match value {
            FieldValue::Struct(s) => Node::Struct(s),
            FieldValue::List(l) => Node::List(l),
            other => Node::Value(other),
        }
    }
}

impl GetArgs {
    pub fn handle(&self) -> Result<()> {
        let gff = open(&self.file, self.file_type.as_deref())?;

        let mut node = Node::Struct(gff.top_level());
        for segment in self.path.split('/').filter(|s| !s.is_empty()) {
            node = match node {
                Node::Struct(s) => s
                    .value(segment)?
                    .ok_or_else(|| miette!("struct {} has no field {segment:?}", s.index()))?
                    .into(),
                Node::List(l) => {
                    let index = segment.parse::<usize>().into_diagnostic()?;
                    let item = l
                        .get(index)
                        .ok_or_else(|| miette!("list has no element {index}, it holds {}", l.len()))?;
                    Node::Struct(item)
                }
                Node::Value(v) => {
                    return Err(miette!(
                        "can not look up {segment:?} inside a {} field",
                        v.field_type()
                    ))
                }
            };
        }

        match node {
            Node::Struct(s) => println!(
                "struct {} (id {}): {}",
                s.index(),
                s.id(),
                s.labels().collect::<Vec<_>>().join(", ")
            ),
            Node::List(l) => println!("list of {}", l.len()),
            Node::Value(v) => println!("{}", format_value(&v)),
        }

        Ok(())
    }
}
