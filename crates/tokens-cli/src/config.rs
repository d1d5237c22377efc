//! # Pipeline Configuration
//!
//! `tokens.config.yaml` names the inputs, the output directory and file
//! names, the CSS namespace prefix, and the layer order. Every field has a
//! default, so an absent file or an empty one describes the conventional
//! repository layout.
//!
//! Relative paths in a configuration file resolve against that file's
//! directory. Paths given on the command line stay relative to the working
//! directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use tokens_core::{CssNaming, NamingError};
use tokens_emit::{ArtifactKind, Platform};
use tokens_resolve::{LayerConfigError, LayerMap};

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "tokens.config.yaml";

/// Full pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Token source document.
    pub tokens: PathBuf,
    /// Constraint document.
    pub schema: PathBuf,
    /// Directory artifacts are written to.
    pub out_dir: PathBuf,
    /// Namespace inserted after `--` in every custom property.
    pub css_prefix: Option<String>,
    /// Layer order and assignments.
    pub layers: LayerConfig,
    /// Artifact file names within `out_dir`.
    pub outputs: OutputConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tokens: PathBuf::from("tokens/tokens.json"),
            schema: PathBuf::from("tokens/schema.json"),
            out_dir: PathBuf::from("dist/tokens"),
            css_prefix: None,
            layers: LayerConfig::default(),
            outputs: OutputConfig::default(),
        }
    }
}

/// Layer section of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayerConfig {
    /// Layer names, most generic first.
    pub order: Vec<String>,
    /// Layer of tokens no assignment claims.
    pub default: String,
    /// Dotted path prefix to layer name.
    pub assign: IndexMap<String, String>,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            order: vec![
                "primitive".to_string(),
                "semantic".to_string(),
                "component".to_string(),
            ],
            default: "primitive".to_string(),
            assign: IndexMap::from([
                ("semantic".to_string(), "semantic".to_string()),
                ("component".to_string(), "component".to_string()),
            ]),
        }
    }
}

/// Output section of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub css: String,
    pub typescript: String,
    pub declarations: String,
    pub ios: String,
    pub android: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            css: ArtifactKind::Css.default_file_name().to_string(),
            typescript: ArtifactKind::TypeScript.default_file_name().to_string(),
            declarations: ArtifactKind::Declarations.default_file_name().to_string(),
            ios: ArtifactKind::Platform(Platform::Ios)
                .default_file_name()
                .to_string(),
            android: ArtifactKind::Platform(Platform::Android)
                .default_file_name()
                .to_string(),
        }
    }
}

impl OutputConfig {
    /// Configured file name for an artifact.
    pub fn file_name(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::Css => &self.css,
            ArtifactKind::TypeScript => &self.typescript,
            ArtifactKind::Declarations => &self.declarations,
            ArtifactKind::Platform(Platform::Ios) => &self.ios,
            ArtifactKind::Platform(Platform::Android) => &self.android,
        }
    }
}

/// Command-line values that take precedence over the configuration.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub tokens: Option<PathBuf>,
    pub schema: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
}

impl PipelineConfig {
    /// Parse a configuration file, resolving its relative paths against the
    /// file's directory.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading pipeline config: {}", path.display()))?;
        let mut config = Self::from_yaml(&content)
            .with_context(|| format!("parsing pipeline config: {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.resolve_relative(base);
        tracing::debug!(config = %path.display(), "loaded pipeline config");
        Ok(config)
    }

    /// Parse configuration YAML. An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Fails on malformed YAML or unknown fields.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Find the configuration for a run: the explicit file if given, else
    /// [`DEFAULT_CONFIG_FILE`] in `cwd` if present, else the defaults
    /// relative to `cwd`.
    ///
    /// # Errors
    ///
    /// Fails if the chosen file cannot be loaded.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = cwd.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            return Self::load(&candidate);
        }
        tracing::debug!("no pipeline config found; using defaults");
        let mut config = Self::default();
        config.resolve_relative(cwd);
        Ok(config)
    }

    /// Join every relative input and output path onto `base`.
    pub fn resolve_relative(&mut self, base: &Path) {
        for path in [&mut self.tokens, &mut self.schema, &mut self.out_dir] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Apply command-line overrides.
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(tokens) = overrides.tokens {
            self.tokens = tokens;
        }
        if let Some(schema) = overrides.schema {
            self.schema = schema;
        }
        if let Some(out_dir) = overrides.out_dir {
            self.out_dir = out_dir;
        }
    }

    /// The CSS naming rule this configuration selects.
    ///
    /// # Errors
    ///
    /// `NamingError::EmptyPrefix` for a prefix with no usable characters.
    pub fn naming(&self) -> Result<CssNaming, NamingError> {
        match &self.css_prefix {
            Some(prefix) => CssNaming::with_prefix(prefix),
            None => Ok(CssNaming::new()),
        }
    }

    /// The layer map this configuration describes.
    ///
    /// # Errors
    ///
    /// [`LayerConfigError`] for an inconsistent layer section.
    pub fn layer_map(&self) -> Result<LayerMap, LayerConfigError> {
        LayerMap::new(
            self.layers.order.clone(),
            &self.layers.default,
            self.layers.assign.clone(),
        )
    }

    /// Where an artifact is written.
    pub fn output_path(&self, kind: ArtifactKind) -> PathBuf {
        self.out_dir.join(self.outputs.file_name(kind))
    }
}
