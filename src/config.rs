// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Service configuration.
//!
//! Values are resolved from built-in defaults, then an optional JSON file, then command-line
//! flags. Later sources win field by field.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::export::{ExportOptions, PageSpec};
use crate::store::WriteDurability;

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_OUTPUT_DIR: &str = "./temp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub archive: bool,
    pub durable_writes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_owned(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            archive: true,
            durable_writes: false,
        }
    }
}

impl Config {
    /// Resolves the final configuration for a parsed command line.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = cli.config.as_deref() {
            config.apply_file(ConfigFile::load(path)?);
        }
        config.apply_cli(cli);
        Ok(config)
    }

    pub fn apply_file(&mut self, file: ConfigFile) {
        if let Some(bind) = file.bind {
            self.bind = bind;
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(data_dir) = file.data_dir {
            self.data_dir = data_dir;
        }
        if let Some(output_dir) = file.output_dir {
            self.output_dir = output_dir;
        }
        if let Some(archive) = file.archive {
            self.archive = archive;
        }
        if let Some(durable_writes) = file.durable_writes {
            self.durable_writes = durable_writes;
        }
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(bind) = &cli.bind {
            self.bind = bind.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(data_dir) = &cli.data_dir {
            self.data_dir = data_dir.clone();
        }
        if let Some(output_dir) = &cli.output_dir {
            self.output_dir = output_dir.clone();
        }
        if let Some(archive) = cli.archive_override() {
            self.archive = archive;
        }
        if cli.durable_writes {
            self.durable_writes = true;
        }
    }

    pub fn write_durability(&self) -> WriteDurability {
        if self.durable_writes {
            WriteDurability::Durable
        } else {
            WriteDurability::BestEffort
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            output_dir: self.output_dir.clone(),
            page: PageSpec::A4,
            archive: self.archive,
        }
    }
}

/// On-disk configuration. Every field is optional; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub archive: Option<bool>,
    pub durable_writes: Option<bool>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Meeting-minutes form service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Parser)]
#[command(name = "ata", version, about)]
pub struct Cli {
    /// JSON config file; flags given here override its values.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Address to listen on [default: 127.0.0.1]
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to listen on [default: 3001]
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory holding forms and the form index [default: ./data]
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory receiving exported PDFs and archives [default: ./temp]
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Bundle each exported PDF into a zip archive.
    #[arg(long, overrides_with = "no_archive")]
    pub archive: bool,

    /// Serve the bare PDF instead of a zip archive.
    #[arg(long, overrides_with = "archive")]
    pub no_archive: bool,

    /// Opt into slower, best-effort durable persistence (fsync where supported).
    #[arg(long)]
    pub durable_writes: bool,
}

impl Cli {
    fn archive_override(&self) -> Option<bool> {
        match (self.archive, self.no_archive) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;

    use super::{Cli, Config, ConfigError, ConfigFile};
    use crate::store::WriteDurability;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ata").chain(args.iter().copied()))
            .expect("parse args")
    }

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn defaults_without_flags() {
        let config = Config::resolve(&parse(&[])).expect("resolve");
        assert_eq!(config, Config::default());
        assert_eq!(config.bind, "127.0.0.1");
        assert_eq!(config.port, 3001);
        assert!(config.archive);
        assert_eq!(config.write_durability(), WriteDurability::BestEffort);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::resolve(&parse(&[
            "--bind",
            "0.0.0.0",
            "--port",
            "8080",
            "--data-dir",
            "/srv/ata",
            "--output-dir",
            "/tmp/out",
            "--no-archive",
            "--durable-writes",
        ]))
        .expect("resolve");

        assert_eq!(config.bind, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir.to_str(), Some("/srv/ata"));
        assert_eq!(config.output_dir.to_str(), Some("/tmp/out"));
        assert!(!config.archive);
        assert_eq!(config.write_durability(), WriteDurability::Durable);
        assert_eq!(config.export_options().output_dir.to_str(), Some("/tmp/out"));
    }

    #[test]
    fn file_values_sit_between_defaults_and_flags() {
        let file = config_file(r#"{ "port": 4000, "archive": false, "dataDir": "forms", "extra": 1 }"#);
        let path = file.path().to_str().expect("utf-8 path");

        let config = Config::resolve(&parse(&["--config", path])).expect("resolve");
        assert_eq!(config.port, 4000);
        assert!(!config.archive);
        assert_eq!(config.data_dir.to_str(), Some("forms"));
        assert_eq!(config.bind, "127.0.0.1");

        let config = Config::resolve(&parse(&["--config", path, "--port", "5000", "--archive"]))
            .expect("resolve");
        assert_eq!(config.port, 5000);
        assert!(config.archive);
    }

    #[test]
    fn last_archive_flag_wins() {
        assert!(!Config::resolve(&parse(&["--archive", "--no-archive"])).expect("resolve").archive);
        assert!(Config::resolve(&parse(&["--no-archive", "--archive"])).expect("resolve").archive);
    }

    #[test]
    fn bad_config_files_are_reported_with_their_path() {
        let file = config_file("{ port: nope");
        match ConfigFile::load(file.path()) {
            Err(ConfigError::Json { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("expected json error, got {other:?}"),
        }

        let missing = file.path().with_extension("missing");
        match ConfigFile::load(&missing) {
            Err(ConfigError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_port() {
        assert!(Cli::try_parse_from(["ata", "--port", "70000"]).is_err());
    }
}
