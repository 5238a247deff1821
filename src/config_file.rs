//! Optional configuration file, in JSON5, YAML or HCL depending on
//! the file name extension.

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::chart::{spec::FigureSpec, theme::Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigBackend {
    Json5,
    Yaml,
    Hcl,
}

impl ConfigBackend {
    pub fn parse_str<T: DeserializeOwned>(self, s: &str) -> Result<T> {
        match self {
            ConfigBackend::Json5 => {
                serde_json5::from_str(s).with_context(|| anyhow!("decoding JSON5"))
            }
            ConfigBackend::Yaml => serde_yml::from_str(s).with_context(|| anyhow!("decoding YAML")),
            ConfigBackend::Hcl => hcl::from_str(s).with_context(|| anyhow!("decoding HCL")),
        }
    }

    pub fn load_config_file<T: DeserializeOwned>(self, path: &Path) -> Result<T> {
        let s = std::fs::read_to_string(path)
            .with_context(|| anyhow!("loading config file from {path:?}"))?;
        self.parse_str(&s)
            .with_context(|| anyhow!("config file {path:?}"))
    }
}

pub const FILE_EXTENSIONS: &[(&str, ConfigBackend)] = &[
    ("json5", ConfigBackend::Json5),
    ("json", ConfigBackend::Json5),
    ("yml", ConfigBackend::Yaml),
    ("yaml", ConfigBackend::Yaml),
    ("hcl", ConfigBackend::Hcl),
];

pub fn backend_from_path(path: &Path) -> Result<ConfigBackend> {
    let Some(ext) = path.extension() else {
        bail!(
            "given file path does not have an extension \
             for determining the file type: {path:?}"
        )
    };
    let Some(ext) = ext.to_str() else {
        bail!("given file path has an extension that is not unicode: {path:?}")
    };
    match FILE_EXTENSIONS.iter().find(|(e, _)| *e == ext) {
        Some((_, backend)) => Ok(*backend),
        None => bail!(
            "given file path has an unknown extension {ext:?}, known are: {:?}: {path:?}",
            FILE_EXTENSIONS.iter().map(|(e, _)| *e).collect::<Vec<_>>()
        ),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchgraphConfig {
    pub theme: Theme,
    /// Engine in the numerator of speedups
    pub subject: Option<String>,
    /// Engine in the denominator of speedups
    pub baseline: Option<String>,
    /// Replaces the default figures
    pub figures: Option<Vec<FigureSpec>>,
}

impl BenchgraphConfig {
    pub fn load(path: &Path) -> Result<Self> {
        backend_from_path(path)?.load_config_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{chart::theme::Rgb, observation::column::Column};

    #[test]
    fn t_backend_from_path() -> Result<()> {
        assert_eq!(backend_from_path(Path::new("a/b.json5"))?, ConfigBackend::Json5);
        assert_eq!(backend_from_path(Path::new("b.yml"))?, ConfigBackend::Yaml);
        assert_eq!(backend_from_path(Path::new("b.hcl"))?, ConfigBackend::Hcl);
        assert!(backend_from_path(Path::new("b.toml")).is_err());
        assert!(backend_from_path(Path::new("b")).is_err());
        Ok(())
    }

    #[test]
    fn t_json5() -> Result<()> {
        let config: BenchgraphConfig = ConfigBackend::Json5.parse_str(
            r##"{
                // comments are fine
                subject: "tidesdb",
                theme: { panel_width: 800, faster: "#00FF00" },
            }"##,
        )?;
        assert_eq!(config.subject.as_deref(), Some("tidesdb"));
        assert_eq!(config.baseline, None);
        assert_eq!(config.theme.panel_width, 800);
        assert_eq!(config.theme.faster, Rgb(0, 0xFF, 0));
        assert_eq!(config.theme.panel_height, Theme::default().panel_height);
        assert_eq!(config.figures, None);
        Ok(())
    }

    #[test]
    fn t_yaml() -> Result<()> {
        let config: BenchgraphConfig = ConfigBackend::Yaml.parse_str(
            "
baseline: rocksdb
figures:
  - name: tput
    panels:
      - title: Throughput
        kind: bars
        metric: ops_per_sec
        x: workload
",
        )?;
        assert_eq!(config.baseline.as_deref(), Some("rocksdb"));
        let figures = config.figures.unwrap_or_default();
        assert_eq!(figures.len(), 1);
        assert_eq!(figures[0].panels[0].x, Some(Column::Workload));
        Ok(())
    }

    #[test]
    fn t_hcl() -> Result<()> {
        let config: BenchgraphConfig = ConfigBackend::Hcl.parse_str(
            r#"
subject = "rocksdb"
theme {
  label_font_size = 14
}
"#,
        )?;
        assert_eq!(config.subject.as_deref(), Some("rocksdb"));
        assert_eq!(config.theme.label_font_size, 14);
        Ok(())
    }

    #[test]
    fn t_unknown_key() {
        let res: Result<BenchgraphConfig> = ConfigBackend::Json5.parse_str("{ subjekt: 'a' }");
        assert!(res.is_err());
    }
}
