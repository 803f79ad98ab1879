pub mod gff;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle GFF files
    Gff {
        #[command(subcommand)]
        command: gff::GffCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Gff { command } => command.handle(),
        }
    }
}
