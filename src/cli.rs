use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "infinizip")]
#[command(version)]
#[command(about = "Extracts the custom archives from Cars 3: Driven to Win", long_about = None)]
#[command(after_help = "Examples:\n  \
  infinizip Global.zip            extract into the current directory\n  \
  infinizip -d out Global.zip     extract into out/\n  \
  infinizip -l Global.zip         list entries with their hashes")]
pub struct Cli {
    /// Archive path
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Extract files into exdir
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<String>,

    /// List files instead of extracting
    #[arg(short = 'l')]
    pub list: bool,

    /// Verbose logging
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Quiet mode
    #[arg(short = 'q')]
    pub quiet: bool,
}

impl Cli {
    /// Default log level when `RUST_LOG` is not set.
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Error
        } else {
            LevelFilter::Info
        }
    }

    pub fn output_dir(&self) -> &str {
        self.extract_dir.as_deref().unwrap_or(".")
    }
}
