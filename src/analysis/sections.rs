//! Sections facet: per-section standards compliance, plus the entropy
//! listing

use serde::Serialize;

use crate::pe::model::PeModel;
use crate::standards::compliance::{validate, ComplianceVerdict};
use crate::standards::SectionFlag;

/// One section with its compliance verdict.
#[derive(Debug, Clone, Serialize)]
pub struct SectionRecord {
    pub name: String,
    /// Declared flags in declaration order.
    pub flags: Vec<SectionFlag>,
    pub verdict: ComplianceVerdict,
    /// Present only when entropy display is enabled for the run.
    pub entropy: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionsReport {
    pub sections: Vec<SectionRecord>,
}

/// Validate every section independently. The verdict for each section
/// depends only on its own name and flags.
pub fn sections_report(model: &PeModel, show_entropy: bool) -> SectionsReport {
    let sections = model
        .sections
        .iter()
        .map(|section| SectionRecord {
            name: section.name.clone(),
            flags: section.flags.clone(),
            verdict: validate(&section.name, &section.flags),
            entropy: show_entropy.then_some(section.entropy),
        })
        .collect();

    SectionsReport { sections }
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionEntropy {
    pub name: String,
    pub entropy: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntropyReport {
    pub sections: Vec<SectionEntropy>,
}

/// Per-section entropy listing; values come straight from the adapter.
pub fn entropy_report(model: &PeModel) -> EntropyReport {
    let sections = model
        .sections
        .iter()
        .map(|section| SectionEntropy {
            name: section.name.clone(),
            entropy: section.entropy,
        })
        .collect();

    EntropyReport { sections }
}
