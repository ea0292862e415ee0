//! Pescope: static inspection tool for Windows PE binaries
//!
//! Reports headers, sections with standards compliance, imports,
//! certificates, entropy and structural anomalies for one or more files.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use pescope::analysis::facets::Facet;
use pescope::report::text::format_report_text;
use pescope::report::{run_file, FileReport, ReportOptions};

#[derive(Parser)]
#[command(name = "pescope")]
#[command(author, version, about = "Static inspection tool for Windows PE binaries")]
struct Cli {
    /// PE files to inspect
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Show per-section entropy
    #[arg(long)]
    entropy: bool,

    /// Report the section table with standards compliance
    #[arg(long)]
    sections: bool,

    /// Report the DOS, Rich and NT headers
    #[arg(long)]
    headers: bool,

    /// Report the COFF symbol table
    #[arg(long)]
    coff: bool,

    /// Report imported libraries and functions
    #[arg(long)]
    imports: bool,

    /// Report structural anomalies
    #[arg(long)]
    anomalies: bool,

    /// Report the DOS header only
    #[arg(long)]
    dos: bool,

    /// Report the Rich header only
    #[arg(long)]
    rich: bool,

    /// Report the NT header only
    #[arg(long)]
    nt: bool,

    /// Report Authenticode certificates
    #[arg(long)]
    certificates: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Explicit facet selection; `None` when no facet switch was given,
    /// which makes the default set run.
    fn selected_facets(&self) -> Option<Vec<Facet>> {
        let switches = [
            (self.entropy, Facet::Entropy),
            (self.sections, Facet::Sections),
            (self.headers, Facet::Headers),
            (self.coff, Facet::Coff),
            (self.imports, Facet::Imports),
            (self.anomalies, Facet::Anomalies),
            (self.dos, Facet::Dos),
            (self.rich, Facet::Rich),
            (self.nt, Facet::Nt),
            (self.certificates, Facet::Certificates),
        ];

        let selected: Vec<Facet> = switches
            .iter()
            .filter(|(enabled, _)| *enabled)
            .map(|&(_, facet)| facet)
            .collect();

        if selected.is_empty() {
            None
        } else {
            Some(selected)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let options = ReportOptions {
        facets: cli.selected_facets(),
        show_entropy: cli.entropy,
    };

    // Nonexistent paths are skipped before any parsing happens.
    let files: Vec<PathBuf> = cli
        .files
        .iter()
        .filter(|path| {
            let exists = path.exists();
            if !exists && cli.verbose {
                eprintln!("Skipping missing path: {:?}", path);
            }
            exists
        })
        .cloned()
        .collect();

    if files.is_empty() {
        anyhow::bail!("no valid file path supplied (see --help for usage)");
    }

    let mut reports: Vec<FileReport> = Vec::new();
    for path in &files {
        if cli.verbose {
            eprintln!("Parsing: {:?}", path);
        }

        // One unparseable file does not stop the remaining ones.
        match run_file(path, &options) {
            Ok(report) => reports.push(report),
            Err(e) => eprintln!("Warning: failed to parse {:?}: {}", path, e),
        }
    }

    match cli.format {
        OutputFormat::Text => {
            for report in &reports {
                print!("{}", format_report_text(report, options.verbose_labels()));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    Ok(())
}
