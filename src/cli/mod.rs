use clap::{Parser, Subcommand};

mod io;
pub mod wrap;

#[derive(Debug, Parser)]
#[command(name = "tuck")]
#[command(version)]
#[command(about = "Cursor-driven wrapping of Python constructs")]
#[command(
    long_about = "Expands the Python construct under each cursor position into its canonical multi-line form: one element per line, consistent indentation and a trailing comma where the construct allows one."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Wrap the constructs at one or more cursor positions")]
    Wrap(wrap::WrapArgs),
}
