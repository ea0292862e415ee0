//! Header facets: DOS, Rich and NT individually, their aggregate, and the
//! COFF symbol table
//!
//! Absence of an optional structure is a reported state, never an error;
//! some PE variants legitimately lack a Rich header or symbol table.

use serde::Serialize;

use crate::pe::model::{CoffInfo, DosHeaderInfo, NtHeaderInfo, PeModel, RichHeaderInfo};

#[derive(Debug, Clone, Serialize)]
pub struct DosReport {
    pub header: Option<DosHeaderInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RichReport {
    pub header: Option<RichHeaderInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NtReport {
    pub header: Option<NtHeaderInfo>,
}

/// Aggregate of the three header sub-facets.
#[derive(Debug, Clone, Serialize)]
pub struct HeadersReport {
    pub dos: DosReport,
    pub rich: RichReport,
    pub nt: NtReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoffReport {
    pub coff: Option<CoffInfo>,
}

pub fn dos_report(model: &PeModel) -> DosReport {
    DosReport {
        header: model.dos.clone(),
    }
}

pub fn rich_report(model: &PeModel) -> RichReport {
    RichReport {
        header: model.rich.clone(),
    }
}

pub fn nt_report(model: &PeModel) -> NtReport {
    NtReport {
        header: model.nt.clone(),
    }
}

pub fn headers_report(model: &PeModel) -> HeadersReport {
    HeadersReport {
        dos: dos_report(model),
        rich: rich_report(model),
        nt: nt_report(model),
    }
}

pub fn coff_report(model: &PeModel) -> CoffReport {
    CoffReport {
        coff: model.coff.clone(),
    }
}
