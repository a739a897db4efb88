use std::path::PathBuf;

use clap::{
    ArgAction, Parser,
    builder::{PossibleValuesParser, TypedValueParser},
};

use crate::{config::Format, timezone::TimeZone};

#[derive(Parser, Debug)]
#[command(rename_all = "kebab-case", version, about)]
pub struct Opts {
    /// Pod manifests to convert, as JSON or YAML. A `Pod`, `PodList` or `List`
    /// is accepted per document. Reads stdin when no path, or `-`, is given.
    pub paths: Vec<PathBuf>,

    /// Read the parser configuration from a TOML, YAML or JSON file.
    #[arg(short, long, env = "MESH_PODS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Format of the manifests, instead of guessing it from the file extension.
    #[arg(long, value_parser = input_format_parser())]
    pub input_format: Option<Format>,

    /// Timezone used to render creation timestamps, e.g. `UTC` or `Europe/Moscow`.
    #[arg(long)]
    pub timezone: Option<TimeZone>,

    /// Pretty print the JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Enable more detailed internal logging. Repeat to increase level.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Reduce detail of internal logging. Repeat to reduce further.
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Set the logging format.
    #[arg(long, default_value = "text", env = "MESH_PODS_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Control when ANSI terminal formatting is used.
    #[arg(long, default_value = "auto", env = "MESH_PODS_COLOR")]
    pub color: Color,
}

impl Opts {
    pub fn get_matches() -> Self {
        Self::parse()
    }

    pub const fn log_level(&self) -> &'static str {
        match self.quiet {
            0 => match self.verbose {
                0 => "info",
                1 => "debug",
                2..=255 => "trace",
            },
            1 => "warn",
            2 => "error",
            3..=255 => "off",
        }
    }
}

/// Manifests are JSON or YAML only.
fn input_format_parser() -> impl TypedValueParser<Value = Format> {
    PossibleValuesParser::new(["json", "yaml"]).try_map(|format| format.parse::<Format>())
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Auto,
    Always,
    Never,
}

impl Color {
    pub fn use_color(self) -> bool {
        match self {
            Color::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
            Color::Always => true,
            Color::Never => false,
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}
