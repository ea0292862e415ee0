//! Pescope: static inspection of Windows PE binaries
//!
//! This crate parses PE images into an owned, typed model and derives
//! triage-oriented reports from it: section standards compliance, header
//! summaries, imports, Authenticode certificates, entropy and structural
//! anomalies.

pub mod analysis;
pub mod pe;
pub mod report;
pub mod standards;

pub use analysis::facets::{Facet, FacetError, FacetReport};
pub use pe::adapter::{load_model, parse_model, ModelError};
pub use pe::model::PeModel;
pub use report::{run_file, run_model, FileReport, ReportOptions};
pub use standards::compliance::{validate, ComplianceVerdict};
pub use standards::SectionFlag;
