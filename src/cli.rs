use clap::Parser;
use std::path::PathBuf;
use tohls_ladder::{FormatDescriptor, QualityLevel, DEFAULT_QUALITY_FACTOR};

const FORMAT_GRAMMAR: &str = "\
Format into which input files will be converted. Repeat -f for every rendition.

    FORMAT    = SIZE:FRAMERATE:QUALITY
    SIZE      = WxH | Hp
    FRAMERATE = <frame rate, may be fractional> | EMPTY
    QUALITY   = <quality factor> | EMPTY

With Hp the width is derived from the source aspect ratio (and made even).
An empty FRAMERATE keeps the source frame rate.";

/// Long help for `--format`, listing the conventional quality factors.
fn format_help() -> String {
    let mut help = format!("{FORMAT_GRAMMAR}\n\nQuality factors:\n");
    for level in QualityLevel::ALL {
        let factor = level.factor();
        let marker = if factor == DEFAULT_QUALITY_FACTOR {
            " (default for an empty QUALITY)"
        } else {
            ""
        };
        help.push_str(&format!("    {:<9} {factor}{marker}\n", level.name()));
    }
    help.push_str(
        "\nExamples:
    -f 1920x1080::   1920x1080, source frame rate, default quality
    -f 1080p:30:     1080p (1920 wide for 16:9 sources) at 30 fps
    -f 360p::0.07    360p with a low quality factor",
    );
    help
}

#[derive(Parser)]
#[command(name = "tohls")]
#[command(author, version, about = "Convert media files into HLS adaptive bitrate ladders")]
pub struct Cli {
    /// Rendition format (SIZE:FRAMERATE:QUALITY); may be repeated
    #[arg(short = 'f', long = "format", value_name = "FORMAT", required_unless_present = "check_tools", long_help = format_help())]
    pub formats: Vec<FormatDescriptor>,

    /// Input media files
    #[arg(value_name = "FILES", required_unless_present = "check_tools")]
    pub files: Vec<PathBuf>,

    /// Path to config file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for playlists and segments (default: current directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Number of renditions of a file to encode concurrently
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Probe and print the planned ladder without encoding
    #[arg(long)]
    pub dry_run: bool,

    /// Check that ffmpeg and ffprobe are available, then exit
    #[arg(long)]
    pub check_tools: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
