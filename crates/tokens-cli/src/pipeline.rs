//! # Pipeline Driver
//!
//! Runs the phases in their fixed order:
//!
//! ```text
//! load → schema → resolve → layering → emit
//! ```
//!
//! Schema violations stop the run before resolution. Resolution and layering
//! always both run once resolution has started, so one invocation reports
//! every problem. Resolved references are then held to the format of their
//! own category and any mismatch joins the schema group. Artifacts are rendered in memory and written only when the
//! report is clean, so a failed run leaves the output directory untouched.

use std::path::PathBuf;

use anyhow::{Context, Result};

use tokens_emit::{flatten, render_all, Artifact};
use tokens_resolve::{check_layering, resolve};
use tokens_schema::{check_resolved_formats, load_inputs, validate_document};

use crate::config::PipelineConfig;
use crate::report::Report;
use crate::{EXIT_INVALID, EXIT_OK};

/// What a run does after the checks pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Run every phase and write artifacts.
    Build,
    /// Run every check; render and write nothing.
    ValidateOnly,
}

/// Result of a run that got past loading.
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    /// Everything the checks found.
    pub report: Report,
    /// Number of tokens in the source document.
    pub tokens: usize,
    /// Files written, in emission order.
    pub written: Vec<PathBuf>,
}

impl Outcome {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> u8 {
        if self.report.is_clean() {
            EXIT_OK
        } else {
            EXIT_INVALID
        }
    }
}

/// Run the pipeline.
///
/// # Errors
///
/// Fatal failures only: invalid configuration, unreadable or malformed
/// inputs, and write failures. Validation problems are in the returned
/// [`Outcome`].
pub fn run(config: &PipelineConfig, mode: Mode) -> Result<Outcome> {
    let naming = config.naming().context("invalid css_prefix")?;
    let layers = config
        .layer_map()
        .context("invalid layer configuration")?;

    let inputs = load_inputs(&config.tokens, &config.schema)?;
    let mut outcome = Outcome {
        tokens: inputs.document.leaves().len(),
        ..Outcome::default()
    };

    let schema = validate_document(&inputs.document, &inputs.raw, &inputs.constraint, &naming);
    if !schema.is_ok() {
        tracing::info!(violations = schema.len(), "schema validation failed; skipping resolution");
        outcome.report.schema = schema.into_inner();
        return Ok(outcome);
    }
    tracing::info!(tokens = outcome.tokens, "schema validation passed");

    let resolution = resolve(&inputs.document);
    outcome.report.resolution = resolution.diagnostics().to_vec();
    outcome.report.layering = check_layering(resolution.graph(), &layers);
    outcome.report.schema =
        check_resolved_formats(&inputs.document, &inputs.constraint, |p| resolution.get(p));
    tracing::info!(
        resolved = resolution.values().len(),
        unresolved = resolution.unresolved().len(),
        layering = outcome.report.layering.len(),
        formats = outcome.report.schema.len(),
        "resolution and layering finished"
    );

    if !outcome.report.is_clean() || mode == Mode::ValidateOnly {
        return Ok(outcome);
    }

    let resolved = flatten(&inputs.document, &resolution, &naming)?;
    let artifacts = render_all(&resolved)?;
    outcome.written = write_artifacts(config, &artifacts)?;
    tracing::info!(
        artifacts = outcome.written.len(),
        out_dir = %config.out_dir.display(),
        "artifacts written"
    );
    Ok(outcome)
}

fn write_artifacts(config: &PipelineConfig, artifacts: &[Artifact]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("creating output directory: {}", config.out_dir.display()))?;
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = config.output_path(artifact.kind);
        std::fs::write(&path, &artifact.contents)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::debug!(artifact = %artifact.kind, path = %path.display(), "wrote artifact");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn workspace(tokens: &str, schema: &str) -> (tempfile::TempDir, PipelineConfig) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tokens.json"), tokens).unwrap();
        std::fs::write(dir.path().join("schema.json"), schema).unwrap();
        let config = PipelineConfig {
            tokens: dir.path().join("tokens.json"),
            schema: dir.path().join("schema.json"),
            out_dir: dir.path().join("out"),
            ..PipelineConfig::default()
        };
        (dir, config)
    }

    fn files_in(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    #[test]
    fn build_writes_every_artifact() {
        let (_dir, config) = workspace(
            r##"{"color": {"brand": {"value": "#5739FB"}}, "spacing": {"md": {"value": "16px"}}}"##,
            r#"{"required": ["color", "spacing"], "formats": {"color": "hex-color"}}"#,
        );
        let outcome = run(&config, Mode::Build).unwrap();
        assert_eq!(outcome.exit_code(), EXIT_OK);
        assert_eq!(outcome.written.len(), 5);
        let css = std::fs::read_to_string(config.out_dir.join("tokens.css")).unwrap();
        assert!(css.contains("--color-brand-value: #5739FB;"));
        assert!(css.contains("--spacing-md-value: 16px;"));
    }

    #[test]
    fn validate_only_writes_nothing() {
        let (_dir, config) = workspace(
            r##"{"color": {"brand": {"value": "#5739FB"}}}"##,
            r#"{"required": ["color"]}"#,
        );
        let outcome = run(&config, Mode::ValidateOnly).unwrap();
        assert_eq!(outcome.exit_code(), EXIT_OK);
        assert!(outcome.written.is_empty());
        assert!(!config.out_dir.exists());
    }

    #[test]
    fn schema_failure_skips_resolution() {
        let (_dir, config) = workspace(
            r#"{"color": {"brand": {"value": "{color.missing}"}}}"#,
            r#"{"required": ["color", "spacing"]}"#,
        );
        let outcome = run(&config, Mode::Build).unwrap();
        assert_eq!(outcome.exit_code(), EXIT_INVALID);
        assert_eq!(outcome.report.schema.len(), 1);
        assert!(outcome.report.resolution.is_empty());
        assert!(outcome.report.layering.is_empty());
        assert_eq!(files_in(&config.out_dir), 0);
    }

    #[test]
    fn resolution_and_layering_are_both_collected() {
        let (_dir, config) = workspace(
            r##"{
                "color": {"brand": {"value": "#5739FB"}, "loop": {"value": "{color.loop}"}},
                "component": {"bg": {"value": "{color.brand}"}},
                "semantic": {"accent": {"value": "{component.bg}"}}
            }"##,
            "{}",
        );
        let outcome = run(&config, Mode::Build).unwrap();
        assert_eq!(outcome.exit_code(), EXIT_INVALID);
        assert_eq!(outcome.report.resolution.len(), 1);
        assert_eq!(outcome.report.layering.len(), 1);
        assert!(outcome.written.is_empty());
        assert!(!config.out_dir.exists());
    }

    #[test]
    fn reference_into_another_format_blocks_emission() {
        let (_dir, config) = workspace(
            r##"{"color": {"brand": {"value": "#5739FB"}, "alias": {"value": "{spacing.md}"}}, "spacing": {"md": {"value": "16px"}}}"##,
            r#"{"required": ["color", "spacing"], "formats": {"color": "hex-color", "spacing": "dimension"}}"#,
        );
        let outcome = run(&config, Mode::Build).unwrap();
        assert_eq!(outcome.exit_code(), EXIT_INVALID);
        assert_eq!(outcome.report.schema.len(), 1);
        assert_eq!(outcome.report.schema[0].path, "color.alias.value");
        assert!(outcome.report.resolution.is_empty());
        assert!(!config.out_dir.exists());
    }

    #[test]
    fn bad_layer_configuration_is_fatal() {
        let (_dir, mut config) = workspace("{}", "{}");
        config.layers.default = "nowhere".to_string();
        let err = run(&config, Mode::Build).unwrap_err();
        assert!(format!("{err:#}").contains("invalid layer configuration"));
    }

    #[test]
    fn missing_tokens_file_is_fatal() {
        let (dir, mut config) = workspace("{}", "{}");
        config.tokens = dir.path().join("absent.json");
        let err = run(&config, Mode::ValidateOnly).unwrap_err();
        assert!(err.to_string().contains("absent.json"), "{err}");
    }
}
