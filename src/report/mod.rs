//! Report assembly: facet selection and per-file orchestration

pub mod text;

use std::path::Path;

use serde::Serialize;

use crate::analysis::facets::{Facet, FacetError, FacetReport};
use crate::pe::adapter::{load_model, ModelError};
use crate::pe::model::PeModel;

/// Options for one run of the tool, built once from caller input and
/// read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Explicitly selected facets; `None` runs the default set.
    pub facets: Option<Vec<Facet>>,
    /// Include numeric entropy values in the Sections facet. Applies
    /// uniformly to every file and section in the run.
    pub show_entropy: bool,
}

impl ReportOptions {
    /// The facets that will run, in execution order. Explicit selections
    /// run in canonical order regardless of how they were spelled.
    pub fn selected(&self) -> Vec<Facet> {
        match &self.facets {
            Some(selected) => Facet::ALL
                .iter()
                .copied()
                .filter(|facet| selected.contains(facet))
                .collect(),
            None => Facet::DEFAULT.to_vec(),
        }
    }

    /// Explicit selections get verbose per-facet labels.
    pub fn verbose_labels(&self) -> bool {
        self.facets.is_some()
    }
}

/// One analyzed file: the facet outputs in execution order.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    pub facets: Vec<FacetReport>,
}

/// Parse `path` and assemble the report selected by `options`.
///
/// A parse failure is fatal for this file only; the caller's per-path
/// loop decides what happens to the remaining files.
pub fn run_file(path: &Path, options: &ReportOptions) -> Result<FileReport, ModelError> {
    let model = load_model(path)?;
    Ok(run_model(&path.display().to_string(), &model, options))
}

/// Assemble a report for an already parsed model.
///
/// Recoverable facet failures degrade to informational notes; every other
/// selected facet still runs.
pub fn run_model(path: &str, model: &PeModel, options: &ReportOptions) -> FileReport {
    let mut facets = Vec::new();
    for facet in options.selected() {
        match facet.analyze(model, options) {
            Ok(report) => facets.push(report),
            Err(error @ FacetError::NoImports) => facets.push(FacetReport::Note {
                label: facet.label(),
                message: error.to_string(),
            }),
        }
    }

    FileReport {
        path: path.to_string(),
        facets,
    }
}
