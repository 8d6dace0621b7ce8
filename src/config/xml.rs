//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Writes a commented template on request (`fileprim config --init`).
//!
//! A missing file yields defaults. Anything unparsable, including unknown
//! elements and bad values, is an error so misconfigurations surface early.

use anyhow::{Context, Result, anyhow, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::{default_config_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel};
use crate::fs_ops::write_fd;
use crate::platform::set_file_mode_0600;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    log_level: Option<String>,
    log_file: Option<String>,
    json_logs: Option<bool>,
    copy_via_tmp_file: Option<bool>,
    write_in_place: Option<bool>,
    log_remove_failures: Option<bool>,
    nfs_safe_remove: Option<bool>,
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

// Map XmlConfig -> Config; absent fields keep their defaults.
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();
    if let Some(s) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = s.parse::<LogLevel>().map_err(|e| anyhow!(e))?;
    }
    cfg.log_file = non_empty(parsed.log_file.as_deref()).map(PathBuf::from);
    cfg.json_logs = parsed.json_logs.unwrap_or(false);
    if let Some(b) = parsed.copy_via_tmp_file {
        cfg.copy_via_tmp_file = b.into();
    }
    if let Some(b) = parsed.write_in_place {
        cfg.write_in_place = b.into();
    }
    if let Some(b) = parsed.log_remove_failures {
        cfg.log_remove_failures = b.into();
    }
    cfg.nfs_safe_remove = parsed.nfs_safe_remove.unwrap_or(false);
    Ok(cfg)
}

/// Parse config XML text.
pub fn parse_config(contents: &str) -> Result<Config> {
    let parsed: XmlConfig = from_xml_str(contents)?;
    xml_to_config(parsed)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    parse_config(&contents).with_context(|| format!("parse config xml '{}'", path.display()))
}

/// Resolve the config path and load it. Returns the path that was consulted
/// (if one could be determined) along with the effective Config.
pub fn load_config() -> Result<(Option<PathBuf>, Config)> {
    let Some(path) = default_config_path() else {
        debug!("no config location could be determined; using defaults");
        return Ok((None, Config::default()));
    };
    match fs::metadata(&path) {
        Ok(_) => {
            let cfg = load_config_from_path(&path)?;
            debug!(path = %path.display(), "loaded config");
            Ok((Some(path), cfg))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found; using defaults");
            Ok((Some(path), Config::default()))
        }
        Err(e) => Err(e).with_context(|| format!("stat config xml '{}'", path.display())),
    }
}

const TEMPLATE: &str = "<!--
  fileprim configuration (XML)

  log_level            -> quiet | normal | info | debug
  log_file             -> path to a log file (optional; stderr is always used)
  json_logs            -> true to emit logs as JSON
  copy_via_tmp_file    -> default for `copy --via-tmp-file`
  write_in_place       -> default for `write --in-place`
  log_remove_failures  -> log a warning when `rm` fails
  nfs_safe_remove      -> default for `rm --nfs-safe`

  CLI flags override these values.
-->
<config>
  <log_level>normal</log_level>
  <log_file></log_file>
  <json_logs>false</json_logs>
  <copy_via_tmp_file>false</copy_via_tmp_file>
  <write_in_place>false</write_in_place>
  <log_remove_failures>true</log_remove_failures>
  <nfs_safe_remove>false</nfs_safe_remove>
</config>
";

/// Create the commented template config at `path`.
///
/// Refuses when the file already exists or any existing ancestor is a
/// symlink. Parent directories are created as needed.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory '{}'", parent.display()))?;
    }

    let file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            bail!("Config already exists at {}", path.display())
        }
        Err(e) => {
            return Err(e).with_context(|| format!("create config '{}'", path.display()));
        }
    };
    restrict_permissions(path);
    write_fd(&file, TEMPLATE.as_bytes())
        .with_context(|| format!("write config '{}'", path.display()))?;

    info!("Created template config at {}", path.display());
    Ok(())
}

/// Best effort: the template is still usable with the umask's mode.
fn restrict_permissions(path: &Path) {
    if let Err(e) = set_file_mode_0600(path) {
        debug!(path = %path.display(), error = %e, "could not restrict config permissions");
    }
}
