//! Certificates facet: standalone per-certificate summaries

use serde::Serialize;

use crate::pe::model::{CertificateSummary, PeModel};

#[derive(Debug, Clone, Serialize)]
pub struct CertificatesReport {
    /// Each certificate is reported standalone, even when chained.
    pub certificates: Vec<CertificateSummary>,
}

pub fn certificates_report(model: &PeModel) -> CertificatesReport {
    CertificatesReport {
        certificates: model.certificates.clone(),
    }
}
