use clap::Args;
use miette::{miette, Result};
use std::path::PathBuf;
use tracing::{error, info};
use walkdir::WalkDir;

use super::open;

/// Extensions of resources stored as GFF
const GFF_EXTENSIONS: &[&str] = &[
    "are", "bic", "dlg", "fac", "gff", "gic", "git", "ifo", "itp", "jrl", "utc", "utd", "ute",
    "uti", "utm", "utp", "uts", "utt", "utw",
];

#[derive(Args)]
pub struct CheckArgs {
    /// A directory to search
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Only check files with these extensions
    #[arg(short, long, value_name = "EXT")]
    extension: Vec<String>,
}

impl CheckArgs {
    fn matches(&self, path: &std::path::Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let ext = ext.to_ascii_lowercase();

        if self.extension.is_empty() {
            GFF_EXTENSIONS.contains(&ext.as_str())
        } else {
            self.extension.iter().any(|e| e.eq_ignore_ascii_case(&ext))
        }
    }

    pub fn handle(&self) -> Result<()> {
        let files = WalkDir::new(&self.directory)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && self.matches(e.path()))
            .collect::<Vec<_>>();

        let mut failed = 0usize;
        for entry in &files {
            match open(entry.path(), None) {
                Ok(gff) => info!(
                    "{}: {} structs, {} lists",
                    entry.path().display(),
                    gff.struct_count(),
                    gff.list_count()
                ),
                Err(e) => {
                    failed += 1;
                    error!("{:?}", e);
                }
            }
        }

        info!("checked {} files, {} failed", files.len(), failed);

        if failed > 0 {
            return Err(miette!("{failed} of {} files failed to load", files.len()));
        }
        Ok(())
    }
}
