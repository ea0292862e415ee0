//! Facet identifiers and dispatch
//!
//! Selection is a set of enum identifiers mapped to analyzer functions;
//! nothing here depends on positional codes, so adding a facet cannot
//! shift the meaning of existing ones.

use serde::Serialize;
use thiserror::Error;

use super::anomalies::{anomalies_report, AnomaliesReport};
use super::certificates::{certificates_report, CertificatesReport};
use super::headers::{
    coff_report, dos_report, headers_report, nt_report, rich_report, CoffReport, DosReport,
    HeadersReport, NtReport, RichReport,
};
use super::imports::{imports_report, ImportsReport};
use super::sections::{entropy_report, sections_report, EntropyReport, SectionsReport};
use crate::pe::model::PeModel;
use crate::report::ReportOptions;

/// Identifier for one independently selectable slice of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Entropy,
    Sections,
    Headers,
    Coff,
    Imports,
    Anomalies,
    Dos,
    Rich,
    Nt,
    Certificates,
}

impl Facet {
    /// Canonical ordering, used when the caller selects facets explicitly.
    pub const ALL: [Facet; 10] = [
        Facet::Entropy,
        Facet::Sections,
        Facet::Headers,
        Facet::Coff,
        Facet::Imports,
        Facet::Anomalies,
        Facet::Dos,
        Facet::Rich,
        Facet::Nt,
        Facet::Certificates,
    ];

    /// Facets run when the caller selects nothing. The individual header
    /// sub-facets are covered by the aggregate Headers facet, and entropy
    /// display is off by default.
    pub const DEFAULT: [Facet; 6] = [
        Facet::Sections,
        Facet::Headers,
        Facet::Coff,
        Facet::Imports,
        Facet::Anomalies,
        Facet::Certificates,
    ];

    /// Label used for the facet's block in text output.
    pub fn label(self) -> &'static str {
        match self {
            Facet::Entropy => "ENTROPY",
            Facet::Sections => "SECTIONS",
            Facet::Headers => "HEADERS",
            Facet::Coff => "COFF",
            Facet::Imports => "IMPORTS",
            Facet::Anomalies => "ANOMALIES",
            Facet::Dos => "DOS HEADER",
            Facet::Rich => "RICH HEADER",
            Facet::Nt => "NT HEADER",
            Facet::Certificates => "CERTIFICATES",
        }
    }

    /// Longer description appended to the label in verbose output.
    pub fn description(self) -> &'static str {
        match self {
            Facet::Entropy => "per-section Shannon entropy",
            Facet::Sections => "section table with standards compliance",
            Facet::Headers => "DOS, Rich and NT headers",
            Facet::Coff => "COFF symbol table",
            Facet::Imports => "imported libraries and functions",
            Facet::Anomalies => "structural irregularities",
            Facet::Dos => "DOS header fields",
            Facet::Rich => "decoded Rich header",
            Facet::Nt => "NT header summary",
            Facet::Certificates => "Authenticode certificates",
        }
    }

    /// Run this facet's analyzer against a parsed model.
    pub fn analyze(
        self,
        model: &PeModel,
        options: &ReportOptions,
    ) -> Result<FacetReport, FacetError> {
        match self {
            Facet::Entropy => Ok(FacetReport::Entropy(entropy_report(model))),
            Facet::Sections => Ok(FacetReport::Sections(sections_report(
                model,
                options.show_entropy,
            ))),
            Facet::Headers => Ok(FacetReport::Headers(headers_report(model))),
            Facet::Coff => Ok(FacetReport::Coff(coff_report(model))),
            Facet::Imports => imports_report(model).map(FacetReport::Imports),
            Facet::Anomalies => Ok(FacetReport::Anomalies(anomalies_report(model))),
            Facet::Dos => Ok(FacetReport::Dos(dos_report(model))),
            Facet::Rich => Ok(FacetReport::Rich(rich_report(model))),
            Facet::Nt => Ok(FacetReport::Nt(nt_report(model))),
            Facet::Certificates => Ok(FacetReport::Certificates(certificates_report(model))),
        }
    }
}

/// Recoverable analyzer failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FacetError {
    #[error("no import found in the file")]
    NoImports,
}

/// Output of one facet analyzer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "facet", rename_all = "snake_case")]
pub enum FacetReport {
    Entropy(EntropyReport),
    Sections(SectionsReport),
    Headers(HeadersReport),
    Coff(CoffReport),
    Imports(ImportsReport),
    Anomalies(AnomaliesReport),
    Dos(DosReport),
    Rich(RichReport),
    Nt(NtReport),
    Certificates(CertificatesReport),
    /// Informational line standing in for a facet that failed recoverably.
    Note { label: &'static str, message: String },
}
