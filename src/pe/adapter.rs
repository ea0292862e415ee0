//! goblin-backed construction of the typed PE model

use std::path::Path;

use goblin::pe::PE;
use thiserror::Error;

use super::anomalies;
use super::authenticode;
use super::entropy::shannon_entropy;
use super::model::{
    CoffInfo, CoffSymbol, DosHeaderInfo, FileInfo, LibraryImports, NtHeaderInfo, PeModel,
    SectionInfo,
};
use super::rich;
use crate::standards::SectionFlag;

/// Symbol records extracted from the COFF table are capped for report
/// sanity; the full count is still reported.
const MAX_COFF_SYMBOLS: usize = 256;

/// Errors produced while turning a file into a [`PeModel`].
///
/// Both kinds are fatal for the file they occur on, and only for that
/// file: the per-path loop upstream keeps going.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("not a valid PE image: {0}")]
    Parse(#[from] goblin::error::Error),
}

/// Parse the file at `path` into a fully owned model.
pub fn load_model(path: &Path) -> Result<PeModel, ModelError> {
    let bytes = std::fs::read(path).map_err(|source| ModelError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_model(&bytes)
}

/// Parse an in-memory PE image into a fully owned model.
pub fn parse_model(bytes: &[u8]) -> Result<PeModel, ModelError> {
    let pe = PE::parse(bytes)?;

    let dos = dos_info(&pe);
    let rich = rich::scan(bytes, pe.header.dos_header.pe_pointer as usize);
    let nt = nt_info(&pe);
    let coff = coff_info(&pe, bytes);
    let sections = section_info(&pe, bytes);
    let imports = import_map(&pe);
    let imphash = (!pe.imports.is_empty()).then(|| import_hash(&pe));
    let certificates = authenticode::summarize(&pe);
    let anomalies = anomalies::scan(&pe, bytes, &sections);

    let info = FileInfo {
        has_dos: true,
        has_rich: rich.is_some(),
        has_nt: nt.is_some(),
        has_coff: coff.is_some(),
        has_sections: !sections.is_empty(),
        has_imports: !pe.imports.is_empty(),
        is_64: pe.is_64,
        is_lib: pe.is_lib,
    };

    Ok(PeModel {
        info,
        dos: Some(dos),
        rich,
        nt,
        coff,
        sections,
        imports,
        imphash,
        certificates,
        anomalies,
    })
}

fn dos_info(pe: &PE<'_>) -> DosHeaderInfo {
    let dos = &pe.header.dos_header;
    DosHeaderInfo {
        magic: dos.signature,
        bytes_on_last_page: dos.bytes_on_last_page,
        pages_in_file: dos.pages_in_file,
        relocations: dos.relocations,
        header_paragraphs: dos.size_of_header_in_paragraphs,
        checksum: dos.checksum,
        initial_ip: dos.initial_ip,
        initial_relative_cs: dos.initial_relative_cs,
        overlay_number: dos.overlay_number,
        oem_id: dos.oem_id,
        pe_pointer: dos.pe_pointer,
    }
}

fn nt_info(pe: &PE<'_>) -> Option<NtHeaderInfo> {
    let optional = pe.header.optional_header?;
    let coff = &pe.header.coff_header;

    Some(NtHeaderInfo {
        machine: coff.machine,
        machine_name: machine_name(coff.machine),
        kind: if pe.is_64 { "PE32+" } else { "PE32" },
        subsystem: optional.windows_fields.subsystem,
        subsystem_name: subsystem_name(optional.windows_fields.subsystem),
        entry_point: pe.entry as u64,
        image_base: pe.image_base as u64,
        number_of_sections: coff.number_of_sections,
        time_date_stamp: coff.time_date_stamp,
        major_linker_version: optional.standard_fields.major_linker_version,
        minor_linker_version: optional.standard_fields.minor_linker_version,
        size_of_image: optional.windows_fields.size_of_image,
        checksum: optional.windows_fields.check_sum,
        characteristics: coff.characteristics,
        dll_characteristics: optional.windows_fields.dll_characteristics,
    })
}

fn coff_info(pe: &PE<'_>, bytes: &[u8]) -> Option<CoffInfo> {
    let header = &pe.header.coff_header;
    if header.pointer_to_symbol_table == 0 || header.number_of_symbol_table == 0 {
        return None;
    }

    let table = header.symbols(bytes).ok().flatten()?;
    let strings = header.strings(bytes).ok().flatten();

    let mut symbols = Vec::new();
    let mut aux_to_skip = 0usize;
    for (_index, inline_name, symbol) in table.iter() {
        if aux_to_skip > 0 {
            aux_to_skip -= 1;
            continue;
        }
        aux_to_skip = symbol.number_of_aux_symbols as usize;

        if symbols.len() >= MAX_COFF_SYMBOLS {
            break;
        }

        let name = match inline_name {
            Some(name) => name.to_string(),
            None => strings
                .as_ref()
                .and_then(|table| symbol.name(table).ok())
                .unwrap_or("")
                .to_string(),
        };

        symbols.push(CoffSymbol {
            name,
            value: symbol.value,
            section_number: symbol.section_number,
            storage_class: symbol.storage_class,
        });
    }

    Some(CoffInfo {
        number_of_symbols: header.number_of_symbol_table,
        symbols,
    })
}

fn section_info(pe: &PE<'_>, bytes: &[u8]) -> Vec<SectionInfo> {
    pe.sections
        .iter()
        .map(|section| {
            // Trim the NUL padding before any standards lookup happens.
            let name = String::from_utf8_lossy(&section.name)
                .trim_end_matches('\0')
                .to_string();

            let start = section.pointer_to_raw_data as usize;
            let end = (start + section.size_of_raw_data as usize).min(bytes.len());
            let data = if start < end { &bytes[start..end] } else { &[][..] };

            SectionInfo {
                name,
                characteristics: section.characteristics,
                flags: SectionFlag::from_characteristics(section.characteristics),
                virtual_address: section.virtual_address as u64,
                virtual_size: section.virtual_size as u64,
                raw_offset: section.pointer_to_raw_data as u64,
                raw_size: section.size_of_raw_data as u64,
                entropy: shannon_entropy(data),
            }
        })
        .collect()
}

fn import_map(pe: &PE<'_>) -> Vec<LibraryImports> {
    let mut libraries: Vec<LibraryImports> = Vec::new();
    for import in &pe.imports {
        let function = import.name.to_string();
        match libraries.iter_mut().find(|lib| lib.library == import.dll) {
            Some(lib) => lib.functions.push(function),
            None => libraries.push(LibraryImports {
                library: import.dll.to_string(),
                functions: vec![function],
            }),
        }
    }
    libraries
}

/// MD5 over the lowercased, comma-joined `dll.function` list, the hash
/// commonly used to cluster samples by import pattern.
fn import_hash(pe: &PE<'_>) -> String {
    let mut parts = Vec::new();
    for import in &pe.imports {
        let dll = import.dll.to_lowercase();
        let dll = dll
            .strip_suffix(".dll")
            .or_else(|| dll.strip_suffix(".sys"))
            .or_else(|| dll.strip_suffix(".ocx"))
            .unwrap_or(&dll);
        parts.push(format!("{}.{}", dll, import.name.to_lowercase()));
    }
    format!("{:x}", md5::compute(parts.join(",").as_bytes()))
}

fn machine_name(machine: u16) -> &'static str {
    match machine {
        0x0 => "Unknown",
        0x14c => "x86",
        0x1c0 => "ARM",
        0x1c4 => "ARMv7",
        0x8664 => "x86_64",
        0xaa64 => "ARM64",
        0x5032 => "RISC-V 32",
        0x5064 => "RISC-V 64",
        _ => "Unrecognized",
    }
}

fn subsystem_name(subsystem: u16) -> &'static str {
    match subsystem {
        0 => "Unknown",
        1 => "Native",
        2 => "Windows GUI",
        3 => "Windows Console",
        5 => "OS/2 Console",
        7 => "POSIX Console",
        9 => "Windows CE",
        10 => "EFI Application",
        11 => "EFI Boot Service Driver",
        12 => "EFI Runtime Driver",
        13 => "EFI ROM",
        14 => "Xbox",
        16 => "Windows Boot Application",
        _ => "Unrecognized",
    }
}
