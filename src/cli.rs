use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mediascore")]
#[command(
    author,
    version,
    about = "Look up IMDB, Rotten Tomatoes and Metacritic ratings for the video files in a folder"
)]
pub struct Cli {
    /// Path to config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Delete the rating cache before scanning
    #[arg(short = 'c', long)]
    pub clean: bool,

    /// Directories to scan
    pub dirs: Vec<PathBuf>,
}
