//! Imports facet: library to imported-function map

use serde::Serialize;

use super::facets::FacetError;
use crate::pe::model::{LibraryImports, PeModel};

#[derive(Debug, Clone, Serialize)]
pub struct ImportsReport {
    /// Libraries in import-table order; duplicate function names are kept.
    pub libraries: Vec<LibraryImports>,
    pub imphash: Option<String>,
}

/// Build the import map, or fail when the image has no import directory.
/// The failure is recoverable: the selector reports it as an
/// informational line and the remaining facets still run.
pub fn imports_report(model: &PeModel) -> Result<ImportsReport, FacetError> {
    if !model.info.has_imports {
        return Err(FacetError::NoImports);
    }

    Ok(ImportsReport {
        libraries: model.imports.clone(),
        imphash: model.imphash.clone(),
    })
}
