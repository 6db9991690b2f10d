//! Batch diploma generation from the command line
//!
//! Fills a template once per workbook row and writes the documents to a
//! folder, optionally zipping it.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: "Diploma  nuevo 2025.docx" + "INFORMACIÓN DIPLOMAS.xlsx" -> DIPLOMAS_GENERADOS/
//! diploma-batch
//!
//! # Explicit files, second sheet, plus a ZIP next to the output folder
//! diploma-batch --template plantilla.docx --data datos.xlsx --sheet-index 1 --zip
//! ```

use anyhow::Context;
use clap::Parser;
use diploma_server::init_tracing;
use mail_merge::{MergeEngine, MergeOptions, XlsxConfig, XlsxParser, ARCHIVE_NAME, OUTPUT_FOLDER};
use std::path::PathBuf;

/// Generate one diploma per spreadsheet row
#[derive(Parser, Debug)]
#[command(name = "diploma-batch")]
#[command(version, about, long_about = None)]
struct Args {
    /// DOCX template with `{COLUMN}` placeholders
    #[arg(short, long, default_value = "Diploma  nuevo 2025.docx")]
    template: PathBuf,

    /// Workbook with one row per diploma
    #[arg(short, long, default_value = "INFORMACIÓN DIPLOMAS.xlsx")]
    data: PathBuf,

    /// Output folder
    #[arg(short, long, default_value = OUTPUT_FOLDER)]
    output: PathBuf,

    /// Sheet to read, by name (defaults to the first sheet)
    #[arg(long, conflicts_with = "sheet_index")]
    sheet: Option<String>,

    /// Sheet to read, by 0-based index
    #[arg(long)]
    sheet_index: Option<usize>,

    /// Also write diplomas_generados.zip next to the output folder
    #[arg(long)]
    zip: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(if args.verbose {
        "diploma_batch=debug,mail_merge=debug,store=debug"
    } else {
        "diploma_batch=info,mail_merge=info"
    });

    let mut config = XlsxConfig::new();
    if let Some(name) = &args.sheet {
        config = config.with_sheet_name(name.as_str());
    } else if let Some(index) = args.sheet_index {
        config = config.with_sheet_index(index);
    }

    let data_source = XlsxParser::with_config(config)
        .parse_file(&args.data)
        .with_context(|| format!("reading {}", args.data.display()))?;
    tracing::info!(
        "Columns found: {:?} ({} records)",
        data_source.columns,
        data_source.record_count()
    );

    let template = store::DocxPackage::open(&args.template)
        .with_context(|| format!("opening template {}", args.template.display()))?;
    let engine = MergeEngine::new(template, data_source, MergeOptions::default())
        .context("template is not a valid document")?;

    let result = engine
        .execute_with_progress(&args.output, |progress| {
            tracing::debug!(
                "{}/{} ({:.0}%)",
                progress.current_record,
                progress.total_records,
                progress.percent
            );
        })
        .context("generating diplomas")?;

    if args.zip {
        let archive_path = args
            .output
            .parent()
            .map(|parent| parent.join(ARCHIVE_NAME))
            .unwrap_or_else(|| PathBuf::from(ARCHIVE_NAME));
        let count = store::archive_directory(&args.output, &archive_path)
            .with_context(|| format!("writing {}", archive_path.display()))?;
        tracing::info!("Archived {} file(s) into {}", count, archive_path.display());
    }

    tracing::info!("{}", result.summary);
    Ok(())
}
