use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the vitae binary.
#[derive(Debug, Parser)]
#[command(
    name = "vitae",
    version,
    about = "Assemble a personal academic homepage"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "VITAE_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Fill the page's publications, blog and contact elements and write the result.
    Render(Box<RenderArgs>),
    /// Print the blog index newest-first, one `date<TAB>title` line per post.
    Posts(PostsArgs),
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub overrides: SourceOverrides,

    /// HTML page to assemble.
    #[arg(value_name = "PAGE", value_hint = ValueHint::FilePath)]
    pub page: PathBuf,

    /// Write the assembled page to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct PostsArgs {
    #[command(flatten)]
    pub overrides: SourceOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct SourceOverrides {
    /// Fetch resources relative to this base URL.
    #[arg(long = "source-url", value_name = "URL", conflicts_with = "source_dir")]
    pub source_url: Option<String>,

    /// Read resources from this directory.
    #[arg(long = "source-dir", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub source_dir: Option<PathBuf>,

    /// Override the blog index path.
    #[arg(long = "blog-index", value_name = "PATH")]
    pub blog_index: Option<String>,

    /// Override the publications fragment path.
    #[arg(long = "publications", value_name = "PATH")]
    pub publications: Option<String>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}
