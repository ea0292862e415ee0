//! Typed model of a parsed PE image
//!
//! Everything here is owned data: the adapter copies what it needs out of
//! the parsed file so the analyzers never borrow from the raw bytes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::standards::SectionFlag;

/// Presence flags for the optional parts of a PE image.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct FileInfo {
    pub has_dos: bool,
    pub has_rich: bool,
    pub has_nt: bool,
    pub has_coff: bool,
    pub has_sections: bool,
    pub has_imports: bool,
    pub is_64: bool,
    pub is_lib: bool,
}

/// Selected DOS header fields.
#[derive(Debug, Clone, Serialize)]
pub struct DosHeaderInfo {
    pub magic: u16,
    pub bytes_on_last_page: u16,
    pub pages_in_file: u16,
    pub relocations: u16,
    pub header_paragraphs: u16,
    pub checksum: u16,
    pub initial_ip: u16,
    pub initial_relative_cs: u16,
    pub overlay_number: u16,
    pub oem_id: u16,
    pub pe_pointer: u32,
}

/// One decoded Rich header tool record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RichEntry {
    pub product_id: u16,
    pub build_id: u16,
    pub use_count: u32,
}

/// The decoded Rich header left by Microsoft linkers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RichHeaderInfo {
    pub xor_key: u32,
    pub entries: Vec<RichEntry>,
}

/// NT header summary: COFF file header plus optional header fields.
#[derive(Debug, Clone, Serialize)]
pub struct NtHeaderInfo {
    pub machine: u16,
    pub machine_name: &'static str,
    /// "PE32" or "PE32+".
    pub kind: &'static str,
    pub subsystem: u16,
    pub subsystem_name: &'static str,
    /// Entry point RVA.
    pub entry_point: u64,
    pub image_base: u64,
    pub number_of_sections: u16,
    pub time_date_stamp: u32,
    pub major_linker_version: u8,
    pub minor_linker_version: u8,
    pub size_of_image: u32,
    pub checksum: u32,
    pub characteristics: u16,
    pub dll_characteristics: u16,
}

/// One COFF symbol record (auxiliary records skipped).
#[derive(Debug, Clone, Serialize)]
pub struct CoffSymbol {
    pub name: String,
    pub value: u32,
    pub section_number: i16,
    pub storage_class: u8,
}

/// COFF symbol table summary.
#[derive(Debug, Clone, Serialize)]
pub struct CoffInfo {
    pub number_of_symbols: u32,
    pub symbols: Vec<CoffSymbol>,
}

/// One section with decoded characteristics and raw-data entropy.
#[derive(Debug, Clone, Serialize)]
pub struct SectionInfo {
    /// Name, trimmed of NUL padding.
    pub name: String,
    pub characteristics: u32,
    /// Decoded characteristic flags, in declaration order.
    pub flags: Vec<SectionFlag>,
    /// Section RVA.
    pub virtual_address: u64,
    pub virtual_size: u64,
    pub raw_offset: u64,
    pub raw_size: u64,
    /// Shannon entropy of the raw data, 0.0..=8.0 bits per byte.
    pub entropy: f64,
}

/// Functions imported from one library, in import-table order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryImports {
    pub library: String,
    pub functions: Vec<String>,
}

/// Summary of one X.509 certificate embedded in the Authenticode
/// signature. Certificates are summarized standalone; chain trust is
/// never aggregated.
#[derive(Debug, Clone, Serialize)]
pub struct CertificateSummary {
    pub issuer: String,
    pub subject: String,
    pub not_before: Option<DateTime<Utc>>,
    pub not_after: Option<DateTime<Utc>>,
    /// Hex-encoded serial number.
    pub serial_number: String,
    pub public_key_algorithm: String,
    pub signature_algorithm: String,
    /// The content digest embedded in the signature matches the digest
    /// recomputed over the file's signed ranges.
    pub signature_valid: bool,
    /// This certificate is the one named by a SignerInfo issuer+serial.
    pub is_signer: bool,
    pub content_hash_algorithm: String,
    /// Hex-encoded digest embedded in the signature.
    pub content_hash: String,
}

/// Fully parsed, owned PE model.
#[derive(Debug, Clone, Serialize)]
pub struct PeModel {
    pub info: FileInfo,
    pub dos: Option<DosHeaderInfo>,
    pub rich: Option<RichHeaderInfo>,
    pub nt: Option<NtHeaderInfo>,
    pub coff: Option<CoffInfo>,
    pub sections: Vec<SectionInfo>,
    pub imports: Vec<LibraryImports>,
    /// MD5 over the lowercased `dll.function` import list.
    pub imphash: Option<String>,
    pub certificates: Vec<CertificateSummary>,
    /// Free-text structural irregularities, in scan order.
    pub anomalies: Vec<String>,
}
