use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::parser::articles::ArticleFilter;

pub const DEFAULT_URL: &str = "http://www.secretariasenado.gov.co/senado/basedoc/estatuto_tributario.html";
pub const DEFAULT_ARTICLE_FILTER: &str = "div.articulo";
pub const ENV_PREFIX: &str = "ESTATUTO";

/// Run settings. Layered as defaults → optional TOML file → `ESTATUTO_*` env.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub url: String,
    pub article_filter: String,
    pub out_dir: PathBuf,
    /// Fail instead of writing an empty aggregate when no article matches.
    pub require_matches: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            url: DEFAULT_URL.to_string(),
            article_filter: DEFAULT_ARTICLE_FILTER.to_string(),
            out_dir: PathBuf::from("."),
            require_matches: false,
        }
    }
}

impl Settings {
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("url", DEFAULT_URL)?
            .set_default("article_filter", DEFAULT_ARTICLE_FILTER)?
            .set_default("out_dir", ".")?
            .set_default("require_matches", false)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        debug!(?settings, "settings loaded");
        Ok(settings)
    }

    /// Command-line values win over the file and env layers. The
    /// `--require-matches` flag can switch the check on but never off.
    pub fn apply_overrides(
        &mut self,
        url: Option<String>,
        out_dir: Option<PathBuf>,
        article_filter: Option<String>,
        require_matches: bool,
    ) {
        if let Some(url) = url {
            self.url = url;
        }
        if let Some(out_dir) = out_dir {
            self.out_dir = out_dir;
        }
        if let Some(filter) = article_filter {
            self.article_filter = filter;
        }
        self.require_matches |= require_matches;
    }

    pub fn filter(&self) -> Result<ArticleFilter> {
        self.article_filter.parse()
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    const VARS: [&str; 4] = [
        "ESTATUTO_URL",
        "ESTATUTO_ARTICLE_FILTER",
        "ESTATUTO_OUT_DIR",
        "ESTATUTO_REQUIRE_MATCHES",
    ];

    #[test]
    #[serial]
    fn defaults_match_hard_coded_run() {
        temp_env::with_vars_unset(VARS, || {
            let settings = Settings::load(None).unwrap();
            assert_eq!(settings.url, DEFAULT_URL);
            assert_eq!(settings.filter().unwrap(), ArticleFilter::default());
            assert_eq!(settings.out_dir, PathBuf::from("."));
            assert!(!settings.require_matches);
        });
    }

    #[test]
    #[serial]
    fn file_overrides_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("estatuto.toml");
        fs::write(
            &path,
            "article_filter = \"section.norma\"\nout_dir = \"salida\"\nrequire_matches = true\n",
        )
        .unwrap();

        temp_env::with_vars_unset(VARS, || {
            let settings = Settings::load(Some(&path)).unwrap();
            assert_eq!(settings.url, DEFAULT_URL);
            assert_eq!(settings.article_filter, "section.norma");
            assert_eq!(settings.out_dir, PathBuf::from("salida"));
            assert!(settings.require_matches);
        });
    }

    #[test]
    #[serial]
    fn env_overrides_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("estatuto.toml");
        fs::write(&path, "out_dir = \"desde_archivo\"\n").unwrap();

        temp_env::with_vars(
            [
                ("ESTATUTO_OUT_DIR", Some("desde_env")),
                ("ESTATUTO_URL", Some("http://localhost:8080/estatuto.html")),
                ("ESTATUTO_REQUIRE_MATCHES", Some("true")),
                ("ESTATUTO_ARTICLE_FILTER", None),
            ],
            || {
                let settings = Settings::load(Some(&path)).unwrap();
                assert_eq!(settings.out_dir, PathBuf::from("desde_env"));
                assert_eq!(settings.url, "http://localhost:8080/estatuto.html");
                assert!(settings.require_matches);
            },
        );
    }

    #[test]
    #[serial]
    fn missing_file_is_config_error() {
        temp_env::with_vars_unset(VARS, || {
            let err = Settings::load(Some(Path::new("no/existe/estatuto.toml"))).unwrap_err();
            assert!(matches!(err, ScrapeError::Config(_)));
        });
    }

    #[test]
    #[serial]
    fn command_line_wins_over_env_and_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("estatuto.toml");
        fs::write(
            &path,
            "url = \"http://archivo.test/\"\narticle_filter = \"section.archivo\"\nout_dir = \"desde_archivo\"\n",
        )
        .unwrap();

        temp_env::with_vars(
            [
                ("ESTATUTO_URL", Some("http://env.test/")),
                ("ESTATUTO_ARTICLE_FILTER", Some("div.env")),
                ("ESTATUTO_OUT_DIR", Some("desde_env")),
                ("ESTATUTO_REQUIRE_MATCHES", Some("true")),
            ],
            || {
                let mut settings = Settings::load(Some(&path)).unwrap();
                settings.apply_overrides(
                    Some("http://cli.test/".into()),
                    Some(PathBuf::from("desde_cli")),
                    Some("div.cli".into()),
                    false,
                );
                assert_eq!(settings.url, "http://cli.test/");
                assert_eq!(settings.out_dir, PathBuf::from("desde_cli"));
                assert_eq!(settings.article_filter, "div.cli");
                // a flag left off does not switch off what env enabled
                assert!(settings.require_matches);
            },
        );
    }

    #[test]
    #[serial]
    fn absent_command_line_values_keep_lower_layers() {
        temp_env::with_vars(
            [
                ("ESTATUTO_URL", None),
                ("ESTATUTO_ARTICLE_FILTER", Some("div.env")),
                ("ESTATUTO_OUT_DIR", None),
                ("ESTATUTO_REQUIRE_MATCHES", None),
            ],
            || {
                let mut settings = Settings::load(None).unwrap();
                settings.apply_overrides(None, None, None, true);
                assert_eq!(settings.url, DEFAULT_URL);
                assert_eq!(settings.article_filter, "div.env");
                assert_eq!(settings.out_dir, PathBuf::from("."));
                assert!(settings.require_matches);
            },
        );
    }

    #[test]
    fn bad_filter_is_reported() {
        let settings = Settings {
            article_filter: "articulo".into(),
            ..Settings::default()
        };
        assert!(matches!(settings.filter(), Err(ScrapeError::InvalidFilter(_))));
    }
}
