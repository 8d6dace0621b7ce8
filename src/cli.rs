//! CLI definition and parsing.
//! Global logging flags plus one subcommand per primitive.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug.
//! - Option flags only ever turn a behavior on; config.xml supplies the
//!   defaults they override.

use clap::{Args as ClapArgs, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use fileprim::LogLevel;

/// Exercise the fileprim file primitives from the command line.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Safe file primitives: copy, read, write, remove, preallocate")]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct GlobalArgs {
    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        global = true,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Also write logs to this file.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON.
    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Copy SRC to DEST.
    Copy {
        #[arg(value_hint = ValueHint::FilePath)]
        src: PathBuf,
        #[arg(value_hint = ValueHint::FilePath)]
        dest: PathBuf,
        /// Write to a temporary file and rename it over DEST.
        #[arg(long)]
        via_tmp_file: bool,
    },
    /// Print the content of a file.
    Cat {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
        /// Expected size in bytes (0 = stat the file).
        #[arg(long, default_value_t = 0)]
        size_hint: u64,
        /// Emit raw bytes instead of validated text.
        #[arg(long)]
        binary: bool,
    },
    /// Print COUNT bytes of a file starting at POS.
    Part {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
        pos: u64,
        count: usize,
        /// Emit raw bytes instead of validated text.
        #[arg(long)]
        binary: bool,
    },
    /// Replace a file's content with stdin.
    Write {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
        /// Rewrite the existing file so hard links see the new content.
        #[arg(long)]
        in_place: bool,
    },
    /// Remove a file.
    Rm {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
        /// Rename to a private name before unlinking.
        #[arg(long)]
        nfs_safe: bool,
        /// Do not log a warning when removal fails.
        #[arg(long)]
        no_log_failure: bool,
    },
    /// Create CACHEDIR.TAG in an existing directory.
    Tag {
        #[arg(value_hint = ValueHint::DirPath)]
        dir: PathBuf,
    },
    /// Grow a file to at least SIZE bytes, reserving the space.
    Alloc {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
        size: u64,
    },
    /// Set modification and access times (Unix seconds; default now).
    Touch {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
        #[arg(long)]
        mtime: Option<u64>,
        #[arg(long)]
        atime: Option<u64>,
    },
    /// Print the estimated on-disk size for SIZE bytes.
    SizeOnDisk { size: u64 },
    /// Print the config file location, or create a template with --init.
    Config {
        #[arg(long)]
        init: bool,
    },
}

impl GlobalArgs {
    /// Effective log level: --debug wins, then --log-level, then `fallback`.
    pub fn effective_log_level(&self, fallback: LogLevel) -> Result<LogLevel, String> {
        if self.debug {
            return Ok(LogLevel::Debug);
        }
        match self.log_level.as_deref() {
            Some(s) => s.parse(),
            None => Ok(fallback),
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
