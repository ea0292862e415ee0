//! PE model adapter: goblin-backed parsing into an owned, typed model

pub mod adapter;
pub mod anomalies;
pub mod authenticode;
pub mod entropy;
pub mod model;
pub mod rich;
