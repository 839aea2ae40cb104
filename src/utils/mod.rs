// Shared helpers for the CLI: config loading, summary tables, log setup.
pub mod table {
    fn border(widths: &[usize]) -> String {
        let mut s = String::from("+");
        for w in widths {
            s.push_str(&"-".repeat(w + 2));
            s.push('+');
        }
        s
    }

    fn row(cells: &[&str], widths: &[usize]) -> String {
        let mut s = String::from("|");
        for (cell, &w) in cells.iter().zip(widths) {
            s.push_str(&format!(" {cell:<w$} |"));
        }
        s
    }

    /// Render an ASCII table. Missing cells render empty; extra cells are dropped.
    #[must_use]
    pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for r in rows {
            for (w, cell) in widths.iter_mut().zip(r) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let rule = border(&widths);
        let mut lines = vec![rule.clone(), row(headers, &widths), rule.clone()];
        for r in rows {
            let cells: Vec<&str> =
                (0..headers.len()).map(|i| r.get(i).map_or("", String::as_str)).collect();
            lines.push(row(&cells, &widths));
        }
        lines.push(rule);
        lines.join("\n")
    }
}

pub mod config {
    use serde::Deserialize;
    use std::fs;
    use std::path::{Path, PathBuf};

    use crate::errors::ConfigError;
    use crate::graph::Depth;

    pub const CONFIG_FILE_NAME: &str = "social-extract.toml";

    #[derive(Debug, Clone, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    pub struct ExtractConfig {
        pub depth: Option<Depth>,
        pub max_follow: Option<usize>,
        pub parallel: Option<bool>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    pub struct SourceConfig {
        pub users: Option<PathBuf>,
        pub edges: Option<PathBuf>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    pub struct Config {
        pub extract: Option<ExtractConfig>,
        pub source: Option<SourceConfig>,
    }

    impl Config {
        #[must_use]
        pub fn depth(&self) -> Option<Depth> {
            self.extract.as_ref().and_then(|e| e.depth)
        }

        #[must_use]
        pub fn max_follow(&self) -> Option<usize> {
            self.extract.as_ref().and_then(|e| e.max_follow)
        }

        #[must_use]
        pub fn parallel(&self) -> Option<bool> {
            self.extract.as_ref().and_then(|e| e.parallel)
        }

        #[must_use]
        pub fn source_users(&self) -> Option<&Path> {
            self.source.as_ref().and_then(|s| s.users.as_deref())
        }

        #[must_use]
        pub fn source_edges(&self) -> Option<&Path> {
            self.source.as_ref().and_then(|s| s.edges.as_deref())
        }
    }

    /// Parse the TOML file at `path`.
    ///
    /// # Errors
    /// `ConfigError` when the file is unreadable or not valid for the schema
    /// (including an invalid `depth`).
    pub fn load_config_at(path: &Path) -> Result<Config, ConfigError> {
        let data = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { file: path.to_path_buf(), source })?;
        toml::from_str::<Config>(&data)
            .map_err(|source| ConfigError::Toml { file: path.to_path_buf(), source })
    }

    /// Look for `social-extract.toml` directly inside `dir`.
    ///
    /// # Errors
    /// As `load_config_at`, when the file exists but cannot be used.
    pub fn load_config_near(dir: &Path) -> Result<Option<Config>, ConfigError> {
        let p = dir.join(CONFIG_FILE_NAME);
        if p.exists() {
            load_config_at(&p).map(Some)
        } else {
            Ok(None)
        }
    }
}

pub mod logging {
    use std::sync::Once;
    use tracing_subscriber::EnvFilter;

    pub const LOG_ENV: &str = "SOCIAL_EXTRACT_LOG";

    static INIT: Once = Once::new();

    /// Install the stderr subscriber once per process.
    ///
    /// `SOCIAL_EXTRACT_LOG` wins when set; otherwise `verbose` selects debug,
    /// `quiet` selects warn, and the default is info.
    pub fn init(quiet: bool, verbose: bool) {
        INIT.call_once(|| {
            let fallback = if verbose {
                "social_extract=debug"
            } else if quiet {
                "social_extract=warn"
            } else {
                "social_extract=info"
            };
            let filter =
                EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
            // try_init: a test harness may already own the global subscriber
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::table;

    #[test]
    fn table_pads_columns() {
        let out = table::render(&["Metric", "Value"], &[vec!["users".into(), "21".into()]]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "| Metric | Value |");
        assert_eq!(lines[3], "| users  | 21    |");
    }
}
