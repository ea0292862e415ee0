//! Shared test utilities and fixtures for Pescope tests

use pescope::pe::model::{
    CoffInfo, CoffSymbol, FileInfo, LibraryImports, PeModel, SectionInfo,
};
use pescope::standards::SectionFlag;

// ============================================================================
// Section characteristic words
// ============================================================================

/// CNT_CODE | MEM_EXECUTE | MEM_READ
pub const CODE_FLAGS: u32 = 0x6000_0020;

/// CNT_INITIALIZED_DATA | MEM_READ | MEM_WRITE
pub const DATA_FLAGS: u32 = 0xC000_0040;

/// CNT_INITIALIZED_DATA | MEM_READ
pub const RDATA_FLAGS: u32 = 0x4000_0040;

/// CNT_UNINITIALIZED_DATA | MEM_READ | MEM_WRITE
pub const BSS_FLAGS: u32 = 0xC000_0080;

/// CNT_CODE | MEM_EXECUTE | MEM_READ | MEM_WRITE -- the packer classic
pub const WX_TEXT_FLAGS: u32 = 0xE000_0020;

// ============================================================================
// Synthetic PE builders
// ============================================================================

/// One section of a synthetic image.
pub struct SectionSpec {
    pub name: &'static str,
    pub characteristics: u32,
    pub data: Vec<u8>,
}

impl SectionSpec {
    pub fn new(name: &'static str, characteristics: u32, data: Vec<u8>) -> Self {
        SectionSpec {
            name,
            characteristics,
            data,
        }
    }
}

/// Build a minimal valid PE32+ image from section specs.
///
/// Layout: DOS header with `e_lfanew` at 0x80, PE signature, COFF header,
/// 240-byte PE32+ optional header with 16 empty data directories, section
/// headers, then raw section data in 0x200-byte file-aligned blocks.
/// Supports up to three sections (the headers fill 0x200 bytes exactly at
/// three). Entry point is 0x1000, the first section's RVA.
pub fn build_pe64(sections: &[SectionSpec]) -> Vec<u8> {
    build_pe64_image(sections, None)
}

/// Same as [`build_pe64`] with a masked Rich header block placed in the
/// DOS stub.
pub fn build_pe64_with_rich(
    sections: &[SectionSpec],
    xor_key: u32,
    entries: &[(u16, u16, u32)],
) -> Vec<u8> {
    build_pe64_image(sections, Some((xor_key, entries)))
}

fn build_pe64_image(sections: &[SectionSpec], rich: Option<(u32, &[(u16, u16, u32)])>) -> Vec<u8> {
    assert!(sections.len() <= 3, "fixture supports at most 3 sections");

    let mut pe = Vec::new();

    // DOS header (64 bytes)
    let dos_header = vec![
        // DOS Magic
        0x4D, 0x5A, // "MZ"
        // Padding to e_lfanew at offset 60
        0x90, 0x00, 0x03, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0xB8,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        // e_lfanew - PE header offset (offset 60)
        0x80, 0x00, 0x00, 0x00, // 128
    ];
    pe.extend_from_slice(&dos_header);

    // DOS stub - padding to offset 128, with an optional Rich block
    pe.resize(128, 0);
    if let Some((xor_key, entries)) = rich {
        let block = masked_rich_block(xor_key, entries);
        assert!(block.len() <= 64, "rich block does not fit in the stub");
        pe[0x40..0x40 + block.len()].copy_from_slice(&block);
    }

    // PE Signature
    pe.extend_from_slice(&[0x50, 0x45, 0x00, 0x00]); // "PE\0\0"

    // COFF File Header (20 bytes)
    pe.extend_from_slice(&[0x64, 0x86]); // Machine: AMD64
    pe.extend_from_slice(&(sections.len() as u16).to_le_bytes());
    pe.extend_from_slice(&0x6000_0000u32.to_le_bytes()); // TimeDateStamp
    pe.extend_from_slice(&0u32.to_le_bytes()); // PointerToSymbolTable
    pe.extend_from_slice(&0u32.to_le_bytes()); // NumberOfSymbols
    pe.extend_from_slice(&240u16.to_le_bytes()); // SizeOfOptionalHeader
    pe.extend_from_slice(&0x0022u16.to_le_bytes()); // EXECUTABLE | LARGE_ADDRESS_AWARE

    // Optional Header (PE32+) - 240 bytes
    let size_of_image = 0x1000u32 * (sections.len() as u32 + 1);
    let mut opt = Vec::new();
    opt.extend_from_slice(&0x020Bu16.to_le_bytes()); // Magic: PE32+
    opt.push(14); // MajorLinkerVersion
    opt.push(0); // MinorLinkerVersion
    opt.extend_from_slice(&0x200u32.to_le_bytes()); // SizeOfCode
    opt.extend_from_slice(&0u32.to_le_bytes()); // SizeOfInitializedData
    opt.extend_from_slice(&0u32.to_le_bytes()); // SizeOfUninitializedData
    opt.extend_from_slice(&0x1000u32.to_le_bytes()); // AddressOfEntryPoint
    opt.extend_from_slice(&0x1000u32.to_le_bytes()); // BaseOfCode
    opt.extend_from_slice(&0x1_4000_0000u64.to_le_bytes()); // ImageBase
    opt.extend_from_slice(&0x1000u32.to_le_bytes()); // SectionAlignment
    opt.extend_from_slice(&0x200u32.to_le_bytes()); // FileAlignment
    opt.extend_from_slice(&6u16.to_le_bytes()); // MajorOperatingSystemVersion
    opt.extend_from_slice(&0u16.to_le_bytes());
    opt.extend_from_slice(&0u16.to_le_bytes()); // image version
    opt.extend_from_slice(&0u16.to_le_bytes());
    opt.extend_from_slice(&6u16.to_le_bytes()); // MajorSubsystemVersion
    opt.extend_from_slice(&0u16.to_le_bytes());
    opt.extend_from_slice(&0u32.to_le_bytes()); // Win32VersionValue
    opt.extend_from_slice(&size_of_image.to_le_bytes());
    opt.extend_from_slice(&0x200u32.to_le_bytes()); // SizeOfHeaders
    opt.extend_from_slice(&0u32.to_le_bytes()); // CheckSum
    opt.extend_from_slice(&3u16.to_le_bytes()); // Subsystem: CONSOLE
    opt.extend_from_slice(&0x8160u16.to_le_bytes()); // DllCharacteristics
    opt.extend_from_slice(&0x10_0000u64.to_le_bytes()); // SizeOfStackReserve
    opt.extend_from_slice(&0x1000u64.to_le_bytes()); // SizeOfStackCommit
    opt.extend_from_slice(&0x10_0000u64.to_le_bytes()); // SizeOfHeapReserve
    opt.extend_from_slice(&0x1000u64.to_le_bytes()); // SizeOfHeapCommit
    opt.extend_from_slice(&0u32.to_le_bytes()); // LoaderFlags
    opt.extend_from_slice(&16u32.to_le_bytes()); // NumberOfRvaAndSizes
    for _ in 0..16 {
        opt.extend_from_slice(&[0u8; 8]); // empty data directories
    }
    assert_eq!(opt.len(), 240);
    pe.extend_from_slice(&opt);

    // Section headers (40 bytes each)
    let mut raw_cursor = 0x200u32;
    let mut raw_blocks: Vec<Vec<u8>> = Vec::new();
    for (index, spec) in sections.iter().enumerate() {
        let mut name_bytes = [0u8; 8];
        name_bytes[..spec.name.len()].copy_from_slice(spec.name.as_bytes());
        pe.extend_from_slice(&name_bytes);

        let virtual_size = if spec.data.is_empty() {
            0x200u32
        } else {
            spec.data.len() as u32
        };
        pe.extend_from_slice(&virtual_size.to_le_bytes());
        pe.extend_from_slice(&(0x1000u32 * (index as u32 + 1)).to_le_bytes()); // VirtualAddress

        if spec.data.is_empty() {
            pe.extend_from_slice(&0u32.to_le_bytes()); // SizeOfRawData
            pe.extend_from_slice(&0u32.to_le_bytes()); // PointerToRawData
        } else {
            pe.extend_from_slice(&0x200u32.to_le_bytes());
            pe.extend_from_slice(&raw_cursor.to_le_bytes());
            raw_cursor += 0x200;

            let mut block = spec.data.clone();
            block.resize(0x200, 0);
            raw_blocks.push(block);
        }

        pe.extend_from_slice(&0u32.to_le_bytes()); // PointerToRelocations
        pe.extend_from_slice(&0u32.to_le_bytes()); // PointerToLinenumbers
        pe.extend_from_slice(&0u16.to_le_bytes()); // NumberOfRelocations
        pe.extend_from_slice(&0u16.to_le_bytes()); // NumberOfLinenumbers
        pe.extend_from_slice(&spec.characteristics.to_le_bytes());
    }

    // Pad headers to the file alignment, then append raw data
    pe.resize(0x200, 0);
    for block in raw_blocks {
        pe.extend_from_slice(&block);
    }

    pe
}

fn masked_rich_block(xor_key: u32, entries: &[(u16, u16, u32)]) -> Vec<u8> {
    let mut block = Vec::new();
    block.extend_from_slice(&(0x536e_6144u32 ^ xor_key).to_le_bytes()); // "DanS"
    for _ in 0..3 {
        block.extend_from_slice(&xor_key.to_le_bytes()); // checksum padding
    }
    for &(product, build, count) in entries {
        let id = (u32::from(product) << 16) | u32::from(build);
        block.extend_from_slice(&(id ^ xor_key).to_le_bytes());
        block.extend_from_slice(&(count ^ xor_key).to_le_bytes());
    }
    block.extend_from_slice(b"Rich");
    block.extend_from_slice(&xor_key.to_le_bytes());
    block
}

/// Append a COFF symbol table and patch the COFF header to point at it.
/// Symbols are `(name, value, section_number, storage_class)`; names must
/// fit the 8-byte inline field.
pub fn build_pe64_with_symbols(
    sections: &[SectionSpec],
    symbols: &[(&str, u32, i16, u8)],
) -> Vec<u8> {
    let mut pe = build_pe64(sections);
    let symbol_offset = pe.len() as u32;

    for &(name, value, section_number, storage_class) in symbols {
        assert!(name.len() <= 8, "symbol name must fit the inline field");
        let mut name_bytes = [0u8; 8];
        name_bytes[..name.len()].copy_from_slice(name.as_bytes());
        pe.extend_from_slice(&name_bytes);
        pe.extend_from_slice(&value.to_le_bytes());
        pe.extend_from_slice(&section_number.to_le_bytes());
        pe.extend_from_slice(&0u16.to_le_bytes()); // type
        pe.push(storage_class);
        pe.push(0); // auxiliary symbol count
    }
    pe.extend_from_slice(&4u32.to_le_bytes()); // empty string table

    // COFF header sits at 0x84: symbol pointer at +8, symbol count at +12
    pe[0x8C..0x90].copy_from_slice(&symbol_offset.to_le_bytes());
    pe[0x90..0x94].copy_from_slice(&(symbols.len() as u32).to_le_bytes());

    pe
}

/// Minimal single-section image: a `.text` with standard characteristics
/// and a few real instructions.
pub fn make_minimal_pe64() -> Vec<u8> {
    let code = vec![
        0x48, 0x31, 0xC0, // xor rax, rax
        0xC3, // ret
        0x48, 0x89, 0xD8, // mov rax, rbx
        0x48, 0x01, 0xD8, // add rax, rbx
        0xC3, // ret
    ];
    build_pe64(&[SectionSpec::new(".text", CODE_FLAGS, code)])
}

/// Bytes that exercise every value equally: entropy is exactly 8.0.
pub fn high_entropy_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 197 + 91) & 0xFF) as u8).collect()
}

// ============================================================================
// Hand-built model fixtures
// ============================================================================

/// Section record for a hand-built model; entropy picked below any
/// packing threshold.
pub fn make_section(name: &str, flags: &[SectionFlag]) -> SectionInfo {
    SectionInfo {
        name: name.to_string(),
        characteristics: 0,
        flags: flags.to_vec(),
        virtual_address: 0x1000,
        virtual_size: 0x200,
        raw_offset: 0x200,
        raw_size: 0x200,
        entropy: 4.5,
    }
}

/// A model with one standard `.text` section, imports and a symbol, no
/// certificates and no anomalies.
pub fn make_test_model() -> PeModel {
    use SectionFlag::*;

    PeModel {
        info: FileInfo {
            has_dos: true,
            has_rich: false,
            has_nt: true,
            has_coff: true,
            has_sections: true,
            has_imports: true,
            is_64: true,
            is_lib: false,
        },
        dos: None,
        rich: None,
        nt: None,
        coff: Some(CoffInfo {
            number_of_symbols: 1,
            symbols: vec![CoffSymbol {
                name: "main".to_string(),
                value: 0,
                section_number: 1,
                storage_class: 2,
            }],
        }),
        sections: vec![make_section(".text", &[Code, Readable, Executable])],
        imports: vec![LibraryImports {
            library: "KERNEL32.dll".to_string(),
            functions: vec!["ExitProcess".to_string(), "GetLastError".to_string()],
        }],
        imphash: Some("0".repeat(32)),
        certificates: vec![],
        anomalies: vec![],
    }
}

/// Same model without an import directory.
pub fn make_importless_model() -> PeModel {
    let mut model = make_test_model();
    model.info.has_imports = false;
    model.imports.clear();
    model.imphash = None;
    model
}
