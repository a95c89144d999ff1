//! JSON export
//!
//! Writes the report inside a [`ReportExport`] envelope with schema version
//! and export timestamp.

use std::io::Write;

use super::{Report, ReportExport};
use crate::error::{FintrackError, FintrackResult};

/// Write the report as pretty-printed JSON
pub fn export_json<W: Write>(report: &Report, writer: &mut W) -> FintrackResult<()> {
    let export = ReportExport::new(report);
    serde_json::to_writer_pretty(&mut *writer, &export)?;
    writeln!(writer).map_err(|e| FintrackError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::{categories, monthly};
    use crate::export::EXPORT_SCHEMA_VERSION;

    #[test]
    fn test_envelope_fields() {
        let mut out = Vec::new();
        export_json(&monthly(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["schema_version"], EXPORT_SCHEMA_VERSION);
        assert_eq!(value["kind"], "monthly");
        assert_eq!(value["range"]["from"], "2025-01-01");
        assert_eq!(value["data"][0]["label"], "Jan");
        assert_eq!(value["data"][0]["income"], 100.0);
        assert!(value["exported_at"].is_string());
    }

    #[test]
    fn test_categories_payload() {
        let mut out = Vec::new();
        export_json(&categories(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["kind"], "categories");
        assert_eq!(value["data"][0]["name"], "Dining, takeout");
        assert_eq!(value["data"][0]["total"], 25.5);
    }
}
