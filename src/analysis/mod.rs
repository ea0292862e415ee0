//! Facet analyzers: pure projections from the PE model to report content

pub mod anomalies;
pub mod certificates;
pub mod facets;
pub mod headers;
pub mod imports;
pub mod sections;

pub use facets::{Facet, FacetError, FacetReport};
