//! Anomalies facet: passthrough of the adapter's irregularity list

use serde::Serialize;

use crate::pe::model::PeModel;

#[derive(Debug, Clone, Serialize)]
pub struct AnomaliesReport {
    /// Empty means "checked, clean" -- the renderer says so explicitly to
    /// keep it distinguishable from a facet that never ran.
    pub anomalies: Vec<String>,
}

pub fn anomalies_report(model: &PeModel) -> AnomaliesReport {
    AnomaliesReport {
        anomalies: model.anomalies.clone(),
    }
}
