//! Structural irregularity scan
//!
//! Each check produces a free-text description; the list is reported
//! verbatim by the anomalies facet. None of these conditions is an error:
//! they are data points for triage.

use goblin::pe::PE;

use super::model::SectionInfo;
use crate::standards::SectionFlag;

/// Entropy above this level in an executable section is a packing
/// indicator.
const PACKED_ENTROPY_THRESHOLD: f64 = 7.2;

/// Scan a parsed image for structural irregularities.
pub fn scan(pe: &PE<'_>, bytes: &[u8], sections: &[SectionInfo]) -> Vec<String> {
    let mut anomalies = Vec::new();

    if pe.header.optional_header.is_none() {
        anomalies.push("optional header is missing".to_string());
    }
    if pe.header.coff_header.time_date_stamp == 0 {
        anomalies.push("COFF timestamp is zero".to_string());
    }

    let entry = pe.entry as u64;
    if entry != 0 {
        let in_code = sections.iter().any(|s| {
            s.flags.contains(&SectionFlag::Executable)
                && entry >= s.virtual_address
                && entry < s.virtual_address + s.virtual_size.max(s.raw_size)
        });
        if !in_code {
            anomalies.push(format!(
                "entry point 0x{entry:x} lies outside any executable section"
            ));
        }
    }

    for section in sections {
        let executable = section.flags.contains(&SectionFlag::Executable);
        let writable = section.flags.contains(&SectionFlag::Writable);
        let uninitialized = section.flags.contains(&SectionFlag::UninitializedData);

        if executable && writable {
            anomalies.push(format!(
                "section '{}' is both writable and executable",
                section.name
            ));
        }
        if section.raw_size == 0 && section.virtual_size > 0 && !uninitialized {
            anomalies.push(format!(
                "section '{}' declares no raw data but 0x{:x} bytes of virtual size",
                section.name, section.virtual_size
            ));
        }
        if section.raw_offset + section.raw_size > bytes.len() as u64 {
            anomalies.push(format!(
                "section '{}' raw data extends past the end of the file",
                section.name
            ));
        }
        if executable && section.entropy > PACKED_ENTROPY_THRESHOLD {
            anomalies.push(format!(
                "high entropy ({:.2}) in executable section '{}', possible packing",
                section.entropy, section.name
            ));
        }
    }

    let mut ranges: Vec<(&str, u64, u64)> = sections
        .iter()
        .filter(|s| s.raw_size > 0)
        .map(|s| (s.name.as_str(), s.raw_offset, s.raw_offset + s.raw_size))
        .collect();
    ranges.sort_by_key(|&(_, start, _)| start);
    for pair in ranges.windows(2) {
        let (first, _, first_end) = pair[0];
        let (second, second_start, _) = pair[1];
        if second_start < first_end {
            anomalies.push(format!(
                "sections '{}' and '{}' overlap in the file",
                first, second
            ));
        }
    }

    anomalies
}
