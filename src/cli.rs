use clap::Parser;
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Examples:
  copyright-code /path/to/source -o output.docx
  copyright-code /path/to/source -o output.docx -n \"MyApp\" -v \"V2.0\"

This tool will:
  1. Scan the source directory for code files
  2. Collect and format the code (50 lines per page)
  3. Generate a DOCX with the first 30 and last 30 pages (or all if 60 pages or fewer)
  4. Add the header and page-numbered footer required by copyright applications";

/// The automatic `--version` flag is disabled: `-v/--version` sets the software
/// version printed in the page header.
#[derive(Parser, Debug)]
#[clap(about, disable_version_flag = true, after_help = AFTER_HELP)]
pub struct Cli {
    /// Path to the source code directory
    pub source_dir: PathBuf,

    /// Output DOCX file path [default: copyright_code.docx]
    #[clap(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Software name for the page header [default: 软件名称]
    #[clap(short, long)]
    pub name: Option<String>,

    /// Software version for the page header [default: V1.0]
    #[clap(short = 'v', long)]
    pub version: Option<String>,

    /// TOML configuration file with document, layout and source settings
    #[clap(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Leave out files and directories matching this glob (relative to the source directory)
    #[clap(short, long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Log debug information, such as the encoding each file was read with
    #[clap(long)]
    pub verbose: bool,

    /// Only report errors
    #[clap(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
