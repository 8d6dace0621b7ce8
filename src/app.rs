//! Application orchestrator.
//! Loads config, merges CLI overrides, initializes logging, and dispatches
//! each subcommand to its primitive.

use anyhow::{Context, Result, anyhow};
use std::fs::OpenOptions;
use std::io::{self, Read, Write};
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};
use tracing::debug;

use fileprim::output as out;
use fileprim::{
    Config, InPlace, LogFailure, ViaTmpFile, copy_file, create_cachedir_tag, create_template_config,
    default_config_path, fallocate, likely_size_on_disk, load_config, read_file, read_file_part,
    remove, remove_nfs_safe, set_timestamps, write_file,
};

use crate::cli::{Args, Command};
use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handled before config loading so a broken config can still be located/replaced.
    if let Command::Config { init } = &args.command {
        return run_config(*init);
    }

    let (cfg_path, cfg) = load_config()?;
    let log_level = args
        .global
        .effective_log_level(cfg.log_level)
        .map_err(|e| anyhow!(e))?;
    let log_file = args.global.log_file.as_deref().or(cfg.log_file.as_deref());
    let json = args.global.json || cfg.json_logs;

    // Held until exit so the file appender flushes.
    let _guard = init_tracing(log_level, log_file, json).inspect_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
    })?;
    if let Some(p) = &cfg_path {
        debug!(config = %p.display(), %log_level, "configuration resolved");
    }

    dispatch(args.command, &cfg)
}

fn dispatch(command: Command, cfg: &Config) -> Result<()> {
    match command {
        Command::Copy { src, dest, via_tmp_file } => {
            let via = if via_tmp_file { ViaTmpFile::Yes } else { cfg.copy_via_tmp_file };
            copy_file(&src, &dest, via)?;
        }
        Command::Cat { path, size_hint, binary } => {
            let data = if binary {
                read_file::<Vec<u8>>(&path, size_hint)?
            } else {
                read_file::<String>(&path, size_hint)?.into_bytes()
            };
            emit(&data)?;
        }
        Command::Part { path, pos, count, binary } => {
            let data = if binary {
                read_file_part::<Vec<u8>>(&path, pos, count)?
            } else {
                read_file_part::<String>(&path, pos, count)?.into_bytes()
            };
            emit(&data)?;
        }
        Command::Write { path, in_place } => {
            let mut data = Vec::new();
            io::stdin().lock().read_to_end(&mut data).context("read stdin")?;
            let mode = if in_place { InPlace::Yes } else { cfg.write_in_place };
            write_file(&path, data, mode)?;
        }
        Command::Rm { path, nfs_safe, no_log_failure } => {
            let log_failure = if no_log_failure { LogFailure::No } else { cfg.log_remove_failures };
            let removed = if nfs_safe || cfg.nfs_safe_remove {
                remove_nfs_safe(&path, log_failure)
            } else {
                remove(&path, log_failure)
            }
            .with_context(|| format!("remove '{}'", path.display()))?;
            out::print_user(if removed { "removed" } else { "absent" });
        }
        Command::Tag { dir } => {
            create_cachedir_tag(&dir)?;
        }
        Command::Alloc { path, size } => run_alloc(&path, size)?,
        Command::Touch { path, mtime, atime } => {
            let to_time = |secs: u64| UNIX_EPOCH + Duration::from_secs(secs);
            set_timestamps(&path, mtime.map(to_time), atime.map(to_time));
        }
        Command::SizeOnDisk { size } => out::print_user(&likely_size_on_disk(size).to_string()),
        Command::Config { init } => run_config(init)?,
    }
    Ok(())
}

fn emit(data: &[u8]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(data).context("write stdout")?;
    stdout.flush().context("flush stdout")
}

fn run_alloc(path: &Path, size: u64) -> Result<()> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .with_context(|| format!("open '{}'", path.display()))?;
    let how = fallocate(&file, size)?;
    out::print_user(&how.to_string());
    Ok(())
}

fn run_config(init: bool) -> Result<()> {
    let path = default_config_path()
        .ok_or_else(|| anyhow!("could not determine a config path; set FILEPRIM_CONFIG"))?;
    if init {
        create_template_config(&path)?;
        out::print_success(&format!("Template config written to {}", path.display()));
        return Ok(());
    }
    out::print_user(&path.display().to_string());
    if !path.exists() {
        out::print_info("No config file there yet; run `fileprim config --init` to create one.");
    }
    Ok(())
}
