//! Run configuration: command-line flags layered over an optional TOML file.
//!
//! A flag always wins over the file, and the file over the built-in defaults.
//! The pagination policy itself is not configurable.

use crate::cli::Cli;
use crate::sinks::{Docx, LayoutBuilder, LayoutOverrides};
use crate::source::{CollectOptions, ExclusionSet};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTFILE: &str = "copyright_code.docx";
pub const DEFAULT_NAME: &str = "软件名称";
pub const DEFAULT_VERSION: &str = "V1.0";

/// Contents of a configuration file.
#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    #[serde(default)]
    pub document: DocumentConfig,
    #[serde(default)]
    pub layout: LayoutOverrides,
    #[serde(default)]
    pub source: SourceConfig,
}

#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentConfig {
    /// Software name shown in the page header
    pub name: Option<String>,
    /// Software version shown in the page header
    pub version: Option<String>,
    pub outfile: Option<PathBuf>,
}

#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Globs of root-relative paths to leave out, on top of the built-in rules
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Configuration {
    pub fn load(path: &Path) -> Result<Configuration> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load {} contents", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML in {}", path.display()))
    }
}

/// Everything a run needs, resolved from flags, file and defaults
#[derive(Debug)]
pub struct Settings {
    pub source_dir: PathBuf,
    pub docx: Docx,
    pub collect: CollectOptions,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Settings> {
        let configuration = match &cli.config {
            Some(path) => Configuration::load(path)?,
            None => Configuration::default(),
        };
        Settings::resolve(cli, configuration)
    }

    fn resolve(cli: &Cli, configuration: Configuration) -> Result<Settings> {
        let Configuration {
            document,
            layout,
            source,
        } = configuration;

        let name = cli
            .name
            .clone()
            .or(document.name)
            .unwrap_or_else(|| DEFAULT_NAME.to_string());
        let version = cli
            .version
            .clone()
            .or(document.version)
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());
        let outfile = cli
            .output
            .clone()
            .or(document.outfile)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTFILE));

        let mut builder = LayoutBuilder::default();
        builder.header_text(format!("{name} {version}"));
        layout.apply(&mut builder);
        let layout = builder
            .build()
            .with_context(|| "Failed to build page layout")?;

        let mut exclude = source.exclude;
        exclude.extend(cli.exclude.iter().cloned());
        let exclude = ExclusionSet::new(&exclude)?;

        Ok(Settings {
            source_dir: cli.source_dir.clone(),
            docx: Docx::new(outfile, layout),
            collect: CollectOptions {
                exclude,
                ..CollectOptions::default()
            },
        })
    }
}
