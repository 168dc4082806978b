use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tsr_reflect::{NewLine, PackageLayout};

use crate::config::{OutputFormat, Overrides};

/// CLI arguments for the tsr binary.
#[derive(Parser, Debug)]
#[command(
    name = "tsr",
    version,
    about = "Emit and inspect static type reflection metadata"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the reflection pass over a program and write its metadata table.
    Emit(EmitArgs),
    /// Load a JSON metadata table and print one type record.
    Query(QueryArgs),
}

#[derive(Args, Debug)]
pub struct EmitArgs {
    /// Program file (JSON) to reflect over.
    pub program: PathBuf,

    /// Path to tsrconfig.json. Defaults to ./tsrconfig.json when present.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Output file. Writes to stdout when neither this nor `outFile` is set.
    #[arg(short = 'o', long = "out", alias = "outFile")]
    pub out: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<Format>,

    /// Library name the table is published under.
    #[arg(long = "library", alias = "libraryName")]
    pub library: Option<String>,

    /// Package table layout.
    #[arg(long = "layout", alias = "packageLayout", value_enum, ignore_case = true)]
    pub layout: Option<Layout>,

    /// Package names are file paths relative to this directory.
    #[arg(long = "rootDir", alias = "root-dir")]
    pub root_dir: Option<PathBuf>,

    /// Line ending for script output.
    #[arg(long = "newLine", alias = "new-line", value_enum, ignore_case = true)]
    pub new_line: Option<NewLineArg>,
}

impl EmitArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            library_name: self.library.clone(),
            package_layout: self.layout.map(Into::into),
            root_dir: self.root_dir.clone(),
            out_file: self.out.clone(),
            format: self.format.map(Into::into),
            new_line: self.new_line.map(Into::into),
        }
    }
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Metadata table emitted with `--format json`.
    pub table: PathBuf,

    /// Qualified name, `package#Type`.
    pub name: String,

    /// Look the name up as an interface instead of a class.
    #[arg(long)]
    pub interface: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Script,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(value: Format) -> Self {
        match value {
            Format::Script => Self::Script,
            Format::Json => Self::Json,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    Nested,
    Flat,
}

impl From<Layout> for PackageLayout {
    fn from(value: Layout) -> Self {
        match value {
            Layout::Nested => Self::Nested,
            Layout::Flat => Self::Flat,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum NewLineArg {
    Lf,
    Crlf,
}

impl From<NewLineArg> for NewLine {
    fn from(value: NewLineArg) -> Self {
        match value {
            NewLineArg::Lf => Self::Lf,
            NewLineArg::Crlf => Self::Crlf,
        }
    }
}
