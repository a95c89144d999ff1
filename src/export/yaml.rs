//! YAML export
//!
//! Same envelope as the JSON export, preceded by a comment header.

use std::io::Write;

use super::{Report, ReportExport};
use crate::error::{FintrackError, FintrackResult};

/// Write the report as YAML
pub fn export_yaml<W: Write>(report: &Report, writer: &mut W) -> FintrackResult<()> {
    let export = ReportExport::new(report);

    writeln!(writer, "# fintrack {} report", report.data.kind())
        .and_then(|_| {
            writeln!(
                writer,
                "# Covers {} to {}",
                report.range.from, report.range.to
            )
        })
        .map_err(|e| FintrackError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::monthly;

    #[test]
    fn test_yaml_export() {
        let mut out = Vec::new();
        export_yaml(&monthly(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("# fintrack monthly report\n# Covers 2025-01-01 to 2025-01-31\n"));
        assert!(text.contains("kind: monthly"));
        assert!(text.contains("label: Jan"));
    }

    #[test]
    fn test_yaml_parses_back() {
        let mut out = Vec::new();
        export_yaml(&monthly(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let body: String = text
            .lines()
            .filter(|line| !line.starts_with('#'))
            .collect::<Vec<_>>()
            .join("\n");
        let value: serde_yaml::Value = serde_yaml::from_str(&body).unwrap();
        assert_eq!(value["schema_version"].as_str(), Some("1.0.0"));
    }
}
