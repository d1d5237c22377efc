//! Diagnostics report, grouped by phase for printing.

use std::fmt;

use tokens_resolve::{LayeringViolation, Phase, ResolveDiagnostic};
use tokens_schema::FieldError;

/// Every diagnostic a run collected.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Schema violations. Resolved references that break their category's
    /// format are added here after resolution. Any other entry means no
    /// later phase ran.
    pub schema: Vec<FieldError>,
    /// Missing references and cycles.
    pub resolution: Vec<ResolveDiagnostic>,
    /// Edges that point into a more specific layer.
    pub layering: Vec<LayeringViolation>,
}

impl Report {
    /// True if the run found nothing to report.
    pub fn is_clean(&self) -> bool {
        self.len() == 0
    }

    /// Total number of diagnostics.
    pub fn len(&self) -> usize {
        self.schema.len() + self.resolution.len() + self.layering.len()
    }

    /// Diagnostics of one phase, rendered, in discovery order.
    pub fn phase(&self, phase: Phase) -> Vec<String> {
        match phase {
            Phase::Schema => self.schema.iter().map(ToString::to_string).collect(),
            Phase::Layering => self.layering.iter().map(ToString::to_string).collect(),
            Phase::MissingReference | Phase::Cycle => self
                .resolution
                .iter()
                .filter(|d| d.phase() == phase)
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for phase in Phase::ALL {
            let lines = self.phase(phase);
            if lines.is_empty() {
                continue;
            }
            writeln!(f, "{phase} ({}):", lines.len())?;
            for line in lines {
                writeln!(f, "  - {line}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokens_core::TokenPath;

    fn p(s: &str) -> TokenPath {
        TokenPath::new(s)
    }

    #[test]
    fn clean_report_prints_nothing() {
        let report = Report::default();
        assert!(report.is_clean());
        assert_eq!(report.to_string(), "");
    }

    #[test]
    fn groups_print_in_phase_order() {
        let report = Report {
            schema: Vec::new(),
            resolution: vec![
                ResolveDiagnostic::CyclicReference {
                    cycle: vec![p("a.value"), p("b.value"), p("a.value")],
                },
                ResolveDiagnostic::MissingReference {
                    path: p("c.value"),
                    target: p("nope"),
                },
            ],
            layering: vec![LayeringViolation {
                from: p("color.x.value"),
                to: p("component.y.value"),
                from_layer: "primitive".to_string(),
                to_layer: "component".to_string(),
            }],
        };
        let text = report.to_string();
        let missing = text.find("missing-reference (1):").unwrap();
        let cycle = text.find("cycle (1):").unwrap();
        let layering = text.find("layering (1):").unwrap();
        assert!(missing < cycle && cycle < layering, "{text}");
        assert!(text.contains("  - c.value: reference {nope} does not name a token\n"));
        assert!(!text.contains("schema"));
        assert_eq!(report.len(), 3);
    }

    #[test]
    fn phase_selects_only_its_own_diagnostics() {
        let report = Report {
            schema: Vec::new(),
            resolution: vec![
                ResolveDiagnostic::MissingReference {
                    path: p("c.value"),
                    target: p("nope"),
                },
                ResolveDiagnostic::MissingReference {
                    path: p("d.value"),
                    target: p("gone"),
                },
            ],
            layering: Vec::new(),
        };
        assert_eq!(report.phase(Phase::MissingReference).len(), 2);
        assert!(report.phase(Phase::Cycle).is_empty());
        assert!(report.phase(Phase::Schema).is_empty());
        assert!(report.phase(Phase::Layering).is_empty());
    }
}
