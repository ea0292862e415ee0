//! Canonical table of Microsoft-documented standard PE sections
//!
//! The table maps each standard section name to the characteristic set the
//! PE format specification expects it to declare. It is pure reference
//! data: constructed at compile time, never mutated, and consulted by the
//! compliance validator to flag over-declared characteristics.

pub mod compliance;

use std::fmt;

use goblin::pe::section_table::{
    IMAGE_SCN_CNT_CODE, IMAGE_SCN_CNT_INITIALIZED_DATA, IMAGE_SCN_CNT_UNINITIALIZED_DATA,
    IMAGE_SCN_GPREL, IMAGE_SCN_LNK_INFO, IMAGE_SCN_MEM_DISCARDABLE, IMAGE_SCN_MEM_EXECUTE,
    IMAGE_SCN_MEM_READ, IMAGE_SCN_MEM_WRITE,
};
use serde::Serialize;

/// A single declared section characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SectionFlag {
    UninitializedData,
    InitializedData,
    Code,
    Readable,
    Writable,
    Discardable,
    Executable,
    LinkerInfo,
    GpReferenced,
}

impl SectionFlag {
    /// Label used in report output.
    pub fn label(self) -> &'static str {
        match self {
            SectionFlag::UninitializedData => "Uninitialized Data",
            SectionFlag::InitializedData => "Initialized Data",
            SectionFlag::Code => "Contains Code",
            SectionFlag::Readable => "Readable",
            SectionFlag::Writable => "Writable",
            SectionFlag::Discardable => "Discardable",
            SectionFlag::Executable => "Executable",
            SectionFlag::LinkerInfo => "Linker Info",
            SectionFlag::GpReferenced => "GP Referenced",
        }
    }

    /// Decode a section header's characteristics word into the flags it
    /// declares, in declaration order.
    pub fn from_characteristics(characteristics: u32) -> Vec<SectionFlag> {
        const BITS: [(u32, SectionFlag); 9] = [
            (IMAGE_SCN_CNT_UNINITIALIZED_DATA, SectionFlag::UninitializedData),
            (IMAGE_SCN_CNT_INITIALIZED_DATA, SectionFlag::InitializedData),
            (IMAGE_SCN_CNT_CODE, SectionFlag::Code),
            (IMAGE_SCN_MEM_READ, SectionFlag::Readable),
            (IMAGE_SCN_MEM_WRITE, SectionFlag::Writable),
            (IMAGE_SCN_MEM_DISCARDABLE, SectionFlag::Discardable),
            (IMAGE_SCN_MEM_EXECUTE, SectionFlag::Executable),
            (IMAGE_SCN_LNK_INFO, SectionFlag::LinkerInfo),
            (IMAGE_SCN_GPREL, SectionFlag::GpReferenced),
        ];

        BITS.iter()
            .filter(|(bit, _)| characteristics & bit != 0)
            .map(|&(_, flag)| flag)
            .collect()
    }
}

impl fmt::Display for SectionFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Expected characteristic set for a standard section name.
///
/// Exact, case-sensitive match only; the `.debug$` family is matched on
/// the literal F/P/S/T suffixes, nothing else. Returns `None` for any name
/// the PE format specification does not document.
pub fn expected_flags(name: &str) -> Option<&'static [SectionFlag]> {
    use SectionFlag::*;

    let flags: &'static [SectionFlag] = match name {
        ".bss" => &[UninitializedData, Readable, Writable],
        ".cormeta" => &[LinkerInfo],
        ".data" => &[InitializedData, Readable, Writable],
        ".debug$F" | ".debug$P" | ".debug$S" | ".debug$T" => {
            &[InitializedData, Readable, Discardable]
        }
        ".drective" => &[LinkerInfo],
        ".edata" => &[InitializedData, Readable],
        ".idata" => &[InitializedData, Readable, Writable],
        ".idlsym" => &[LinkerInfo],
        ".pdata" => &[InitializedData, Readable],
        ".rdata" => &[InitializedData, Readable],
        ".reloc" => &[InitializedData, Readable, Discardable],
        ".rsrc" => &[InitializedData, Readable],
        ".sbss" => &[UninitializedData, Readable, Writable, GpReferenced],
        ".sdata" => &[InitializedData, Readable, Writable, GpReferenced],
        ".srdata" => &[InitializedData, Readable, GpReferenced],
        ".sxdata" => &[LinkerInfo],
        ".text" => &[Code, Executable, Readable],
        ".tls" | ".tls$" => &[InitializedData, Readable, Writable],
        ".vsdata" => &[InitializedData, Readable, Writable],
        ".xdata" => &[InitializedData, Readable],
        _ => return None,
    };

    Some(flags)
}
