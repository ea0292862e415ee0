//! Section compliance checks against the standards table

use serde::Serialize;

use super::{expected_flags, SectionFlag};

/// Outcome of checking one section's declared characteristics.
///
/// A verdict is a pure function of the section name, the declared flags
/// and the standards table; it never depends on other sections or on the
/// order sections are validated in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComplianceVerdict {
    /// The name is a documented standard section. `matched` holds the
    /// declared flags that belong to its expected set, `unexpected` the
    /// declared flags that do not; both preserve declaration order.
    Known {
        matched: Vec<SectionFlag>,
        unexpected: Vec<SectionFlag>,
    },
    /// The name itself is non-standard; the declared flags are passed
    /// through unjudged.
    Unknown { flags: Vec<SectionFlag> },
}

impl ComplianceVerdict {
    /// True for a known section with no over-declared characteristics.
    pub fn is_clean(&self) -> bool {
        matches!(self, ComplianceVerdict::Known { unexpected, .. } if unexpected.is_empty())
    }
}

/// Classify a section's declared flags against the standards table.
///
/// `name` must already be trimmed of NUL padding. Flags the standard
/// expects but the section does not declare are not flagged; only
/// over-declaration is.
pub fn validate(name: &str, actual: &[SectionFlag]) -> ComplianceVerdict {
    match expected_flags(name) {
        None => ComplianceVerdict::Unknown {
            flags: actual.to_vec(),
        },
        Some(expected) => {
            let mut matched = Vec::new();
            let mut unexpected = Vec::new();
            for &flag in actual {
                if expected.contains(&flag) {
                    matched.push(flag);
                } else {
                    unexpected.push(flag);
                }
            }
            ComplianceVerdict::Known { matched, unexpected }
        }
    }
}
