use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use tracing::info;

use crate::catalog::{GenotypeTable, ReferencePanel};
use crate::cli::OutputFormat;
use crate::parsing::fasta::SampleReader;
use crate::typing::{report, SamplePipeline};

#[derive(Args)]
pub struct GenotypeArgs {
    /// Input FASTA file with one record per segment, optionally gzipped
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to a custom reference panel JSON
    #[arg(long, requires = "models")]
    pub references: Option<PathBuf>,

    /// Path to a custom model set JSON
    #[arg(long, requires = "references")]
    pub models: Option<PathBuf>,

    /// Path to a custom genotype composition table (TSV)
    #[arg(long)]
    pub compositions: Option<PathBuf>,
}

/// Execute the genotype subcommand
///
/// # Errors
///
/// Returns an error if the data files cannot be loaded, the input cannot
/// be read, or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: GenotypeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let started = Instant::now();

    let panel = if let (Some(references), Some(models)) = (&args.references, &args.models) {
        ReferencePanel::load_from_files(references, models)?
    } else {
        ReferencePanel::load_embedded()?
    };

    let table = if let Some(path) = &args.compositions {
        GenotypeTable::load_from_file(path)?
    } else {
        GenotypeTable::load_embedded()?
    };

    if verbose {
        eprintln!(
            "Loaded panel with {} predicted segments and {} genotype compositions",
            panel.len(),
            table.len()
        );
    }

    let pipeline = SamplePipeline::new(&panel, &table);
    let reader = SampleReader::from_path(&args.input)?;
    let mut writer = open_output(args.output.as_deref())?;

    let mut samples = 0usize;
    let mut sequences = 0usize;

    match format {
        OutputFormat::Tsv => {
            writeln!(writer, "{}", report::tsv_header())?;
            for result in reader {
                let sample = result?;
                samples += 1;
                sequences += sample.len();
                let sample_report = pipeline.genotype_sample(&sample);
                writeln!(writer, "{}", report::tsv_row(&sample_report, &panel))?;
            }
        }
        OutputFormat::Json => {
            let mut records = Vec::new();
            for result in reader {
                let sample = result?;
                samples += 1;
                sequences += sample.len();
                let sample_report = pipeline.genotype_sample(&sample);
                records.push(report::json_record(&sample_report, &panel));
            }
            writeln!(writer, "{}", serde_json::to_string_pretty(&records)?)?;
        }
    }

    writer.flush()?;

    info!(
        "Processed {samples} samples ({sequences} sequences) in {:.2}s",
        started.elapsed().as_secs_f64()
    );

    Ok(())
}

fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match path {
        Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}
