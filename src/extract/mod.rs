//! Marks report extraction seam.
//!
//! The portal serves the per-semester marks report as an opaque document;
//! turning it into a structured [`MarksReport`] is the extractor's job. The
//! store treats the extractor like any other producer: its result is cached
//! per semester and it runs at most once per newly selected semester.
//!
//! The default implementation parses the document bytes as a JSON report.
//! A PDF-based pipeline plugs in behind the same trait without touching the
//! store.

use crate::core::{PortalError, Result};
use crate::models::MarksReport;
use async_trait::async_trait;

/// Turns a raw marks document into a structured report.
#[async_trait]
pub trait MarksExtractor: Send + Sync {
    /// Parse `raw` into a report. Failures surface as
    /// [`PortalError::Extraction`].
    async fn extract(&self, raw: &[u8]) -> Result<MarksReport>;
}

/// Extractor for JSON-encoded marks reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReportExtractor;

#[async_trait]
impl MarksExtractor for JsonReportExtractor {
    async fn extract(&self, raw: &[u8]) -> Result<MarksReport> {
        serde_json::from_slice(raw).map_err(|err| PortalError::Extraction {
            reason: err.to_string(),
        })
    }
}
