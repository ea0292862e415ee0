//! Plain-text rendering of assembled reports

use std::fmt::Write;

use crate::analysis::certificates::CertificatesReport;
use crate::analysis::facets::{Facet, FacetReport};
use crate::analysis::headers::{CoffReport, DosReport, NtReport, RichReport};
use crate::analysis::sections::{SectionRecord, SectionsReport};
use crate::pe::model::CertificateSummary;
use crate::report::FileReport;
use crate::standards::compliance::ComplianceVerdict;

/// Render one file's report as the text block printed to stdout.
pub fn format_report_text(report: &FileReport, verbose: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "FILE: {}", report.path);
    out.push('\n');

    for facet in &report.facets {
        render_facet(&mut out, facet, verbose);
        out.push('\n');
    }

    out
}

fn heading(out: &mut String, facet: Facet, verbose: bool) {
    if verbose {
        let _ = writeln!(out, "==== {}: {} ====", facet.label(), facet.description());
    } else {
        let _ = writeln!(out, "{}:", facet.label());
    }
}

fn render_facet(out: &mut String, report: &FacetReport, verbose: bool) {
    match report {
        FacetReport::Sections(sections) => {
            heading(out, Facet::Sections, verbose);
            render_sections(out, sections);
        }
        FacetReport::Entropy(entropy) => {
            heading(out, Facet::Entropy, verbose);
            if entropy.sections.is_empty() {
                out.push_str("\tno section found in the file\n");
            }
            for section in &entropy.sections {
                let _ = writeln!(out, "\t{}  {:.2}", section.name, section.entropy);
            }
        }
        FacetReport::Headers(headers) => {
            heading(out, Facet::Headers, verbose);
            out.push_str("\tDOS header:\n");
            render_dos(out, &headers.dos);
            out.push_str("\tRich header:\n");
            render_rich(out, &headers.rich);
            out.push_str("\tNT header:\n");
            render_nt(out, &headers.nt);
        }
        FacetReport::Dos(dos) => {
            heading(out, Facet::Dos, verbose);
            render_dos(out, dos);
        }
        FacetReport::Rich(rich) => {
            heading(out, Facet::Rich, verbose);
            render_rich(out, rich);
        }
        FacetReport::Nt(nt) => {
            heading(out, Facet::Nt, verbose);
            render_nt(out, nt);
        }
        FacetReport::Coff(coff) => {
            heading(out, Facet::Coff, verbose);
            render_coff(out, coff);
        }
        FacetReport::Imports(imports) => {
            heading(out, Facet::Imports, verbose);
            if let Some(imphash) = &imports.imphash {
                let _ = writeln!(out, "\timphash: {}", imphash);
            }
            for library in &imports.libraries {
                let _ = writeln!(out, "\tLIBRARY: {}", library.library);
                for function in &library.functions {
                    let _ = writeln!(out, "\t\t{}", function);
                }
            }
        }
        FacetReport::Anomalies(anomalies) => {
            heading(out, Facet::Anomalies, verbose);
            if anomalies.anomalies.is_empty() {
                out.push_str("\tno anomalies found\n");
            }
            for anomaly in &anomalies.anomalies {
                let _ = writeln!(out, "\t{}", anomaly);
            }
        }
        FacetReport::Certificates(certificates) => {
            heading(out, Facet::Certificates, verbose);
            render_certificates(out, certificates);
        }
        FacetReport::Note { label, message } => {
            let _ = writeln!(out, "{}:", label);
            let _ = writeln!(out, "\t{}", message);
        }
    }
}

fn render_sections(out: &mut String, report: &SectionsReport) {
    if report.sections.is_empty() {
        out.push_str("\tno section found in the file\n");
        return;
    }

    for section in &report.sections {
        render_section(out, section);
    }
}

fn render_section(out: &mut String, section: &SectionRecord) {
    let _ = writeln!(out, "\t{}", section.name);
    if let Some(entropy) = section.entropy {
        let _ = writeln!(out, "\t\tEntropy: {:.2}", entropy);
    }

    match &section.verdict {
        ComplianceVerdict::Known { unexpected, .. } => {
            for flag in &section.flags {
                if unexpected.contains(flag) {
                    let _ = writeln!(
                        out,
                        "\t\tNon standard characteristic found, got '{}'.",
                        flag
                    );
                } else {
                    let _ = writeln!(out, "\t\t{}", flag);
                }
            }
        }
        ComplianceVerdict::Unknown { flags } => {
            out.push_str("\t\tNon standard section found.\n");
            let labels: Vec<&str> = flags.iter().map(|flag| flag.label()).collect();
            let _ = writeln!(out, "\t\tCharacteristics: [{}]", labels.join(", "));
        }
    }
}

fn render_dos(out: &mut String, report: &DosReport) {
    let Some(dos) = &report.header else {
        out.push_str("\t\tabsent\n");
        return;
    };
    let _ = writeln!(
        out,
        "\t\tmagic: 0x{:04x}  pe-pointer: 0x{:x}  pages: {}  bytes-on-last-page: {}",
        dos.magic, dos.pe_pointer, dos.pages_in_file, dos.bytes_on_last_page
    );
    let _ = writeln!(
        out,
        "\t\trelocations: {}  header-paragraphs: {}  checksum: 0x{:x}  overlay: {}",
        dos.relocations, dos.header_paragraphs, dos.checksum, dos.overlay_number
    );
    let _ = writeln!(
        out,
        "\t\tinitial cs:ip: {:04x}:{:04x}  oem-id: {}",
        dos.initial_relative_cs, dos.initial_ip, dos.oem_id
    );
}

fn render_rich(out: &mut String, report: &RichReport) {
    let Some(rich) = &report.header else {
        out.push_str("\t\tabsent\n");
        return;
    };
    let _ = writeln!(out, "\t\txor-key: 0x{:08x}", rich.xor_key);
    for entry in &rich.entries {
        let _ = writeln!(
            out,
            "\t\tproduct: {}  build: {}  count: {}",
            entry.product_id, entry.build_id, entry.use_count
        );
    }
}

fn render_nt(out: &mut String, report: &NtReport) {
    let Some(nt) = &report.header else {
        out.push_str("\t\tabsent\n");
        return;
    };
    let _ = writeln!(
        out,
        "\t\t{} {}, {}",
        nt.kind, nt.machine_name, nt.subsystem_name
    );
    let _ = writeln!(
        out,
        "\t\tentry-point-rva: 0x{:x}  image-base: 0x{:x}  size-of-image: 0x{:x}",
        nt.entry_point, nt.image_base, nt.size_of_image
    );
    let _ = writeln!(
        out,
        "\t\tsections: {}  timestamp: 0x{:x}  linker: {}.{}  checksum: 0x{:x}",
        nt.number_of_sections,
        nt.time_date_stamp,
        nt.major_linker_version,
        nt.minor_linker_version,
        nt.checksum
    );
    let _ = writeln!(
        out,
        "\t\tcharacteristics: 0x{:04x}  dll-characteristics: 0x{:04x}",
        nt.characteristics, nt.dll_characteristics
    );
}

fn render_coff(out: &mut String, report: &CoffReport) {
    let Some(coff) = &report.coff else {
        out.push_str("\tsymbol table is empty\n");
        return;
    };
    let _ = writeln!(out, "\tsymbols: {}", coff.number_of_symbols);
    for symbol in &coff.symbols {
        let _ = writeln!(
            out,
            "\t\t{}  value=0x{:x} section={} class={}",
            symbol.name, symbol.value, symbol.section_number, symbol.storage_class
        );
    }
}

fn render_certificates(out: &mut String, report: &CertificatesReport) {
    if report.certificates.is_empty() {
        out.push_str("\tno certificate found\n");
        return;
    }

    for (index, certificate) in report.certificates.iter().enumerate() {
        let _ = writeln!(out, "\tCertificate #{}", index + 1);
        render_certificate(out, certificate);
    }
}

fn render_certificate(out: &mut String, certificate: &CertificateSummary) {
    let _ = writeln!(out, "\t\tsubject: {}", certificate.subject);
    let _ = writeln!(out, "\t\tissuer: {}", certificate.issuer);
    let _ = writeln!(out, "\t\tserial: {}", certificate.serial_number);

    let not_before = certificate
        .not_before
        .map(|t| t.to_string())
        .unwrap_or_else(|| "?".to_string());
    let not_after = certificate
        .not_after
        .map(|t| t.to_string())
        .unwrap_or_else(|| "?".to_string());
    let _ = writeln!(out, "\t\tvalid: {} -> {}", not_before, not_after);

    let _ = writeln!(
        out,
        "\t\tpublic-key: {}  signature: {}",
        certificate.public_key_algorithm, certificate.signature_algorithm
    );
    let _ = writeln!(
        out,
        "\t\tsigner: {}  digest-match: {}",
        yes_no(certificate.is_signer),
        yes_no(certificate.signature_valid)
    );
    let _ = writeln!(
        out,
        "\t\tcontent-hash ({}): {}",
        certificate.content_hash_algorithm, certificate.content_hash
    );
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
