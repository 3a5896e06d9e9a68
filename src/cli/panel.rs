use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};

use crate::catalog::{GenotypeTable, ReferencePanel};
use crate::cli::OutputFormat;
use crate::core::Segment;

#[derive(Args)]
pub struct PanelArgs {
    #[command(subcommand)]
    pub command: PanelCommands,
}

#[derive(Subcommand)]
pub enum PanelCommands {
    /// List all genotype compositions
    List {
        /// Path to a custom composition table (TSV)
        #[arg(long)]
        compositions: Option<PathBuf>,
    },

    /// Show the segment composition of one genotype
    Show {
        /// Genotype name
        #[arg(required = true)]
        genotype: String,

        /// Path to a custom composition table (TSV)
        #[arg(long)]
        compositions: Option<PathBuf>,
    },

    /// Summarize the reference panel segments
    Refs {
        /// Path to a custom reference panel JSON
        #[arg(long, requires = "models")]
        references: Option<PathBuf>,

        /// Path to a custom model set JSON
        #[arg(long, requires = "references")]
        models: Option<PathBuf>,
    },

    /// Export the reference panel to a JSON file
    Export {
        /// Output file path
        #[arg(required = true)]
        output: PathBuf,
    },
}

/// Execute the panel subcommand
///
/// # Errors
///
/// Returns an error if a data file cannot be loaded or a genotype is not
/// found.
pub fn run(args: PanelArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        PanelCommands::List { compositions } => run_list(compositions, format, verbose),
        PanelCommands::Show {
            genotype,
            compositions,
        } => run_show(&genotype, compositions, format),
        PanelCommands::Refs { references, models } => {
            run_refs(references, models, format, verbose)
        }
        PanelCommands::Export { output } => run_export(&output),
    }
}

fn load_table(path: Option<PathBuf>) -> anyhow::Result<GenotypeTable> {
    let table = if let Some(path) = path {
        GenotypeTable::load_from_file(&path)?
    } else {
        GenotypeTable::load_embedded()?
    };
    Ok(table)
}

fn run_list(
    compositions: Option<PathBuf>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let table = load_table(compositions)?;

    if verbose {
        eprintln!("Loaded composition table with {} genotypes", table.len());
    }

    match format {
        OutputFormat::Tsv => {
            let mut header = vec!["Genotype".to_string()];
            header.extend(Segment::ALL.iter().map(|s| s.name().to_string()));
            println!("{}", header.join("\t"));

            for composition in table.iter() {
                let mut fields = vec![composition.name.clone()];
                fields.extend(
                    Segment::ALL
                        .iter()
                        .map(|s| composition.version(*s).to_string()),
                );
                println!("{}", fields.join("\t"));
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = table
                .iter()
                .map(|composition| {
                    let versions: BTreeMap<Segment, &str> = Segment::ALL
                        .into_iter()
                        .map(|segment| (segment, composition.version(segment)))
                        .collect();
                    serde_json::json!({
                        "genotype": composition.name,
                        "versions": versions,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn run_show(
    genotype: &str,
    compositions: Option<PathBuf>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let table = load_table(compositions)?;
    let composition = table
        .get(genotype)
        .ok_or_else(|| anyhow::anyhow!("Genotype '{genotype}' not found in composition table"))?;

    match format {
        OutputFormat::Tsv => {
            println!("Segment\tVersion");
            for segment in Segment::ALL {
                println!("{}\t{}", segment.name(), composition.version(segment));
            }
        }
        OutputFormat::Json => {
            let versions: BTreeMap<Segment, &str> = Segment::ALL
                .into_iter()
                .map(|segment| (segment, composition.version(segment)))
                .collect();
            let output = serde_json::json!({
                "genotype": composition.name,
                "versions": versions,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn run_refs(
    references: Option<PathBuf>,
    models: Option<PathBuf>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let panel = if let (Some(references), Some(models)) = (&references, &models) {
        ReferencePanel::load_from_files(references, models)?
    } else {
        ReferencePanel::load_embedded()?
    };

    if verbose {
        eprintln!("Loaded panel with {} predicted segments", panel.len());
    }

    match format {
        OutputFormat::Tsv => {
            println!("Segment\tMode\tReference Length\tVersions");
            for segment in Segment::ALL {
                if let Some(version) = panel.fixed_version(segment) {
                    println!("{}\tfixed\t-\t{}", segment.name(), version);
                } else if let (Some(reference), Some(classifier)) =
                    (panel.reference(segment), panel.classifier(segment))
                {
                    println!(
                        "{}\tpredicted\t{}\t{}",
                        segment.name(),
                        reference.len(),
                        classifier.labels().join(",")
                    );
                }
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = Segment::ALL
                .into_iter()
                .filter_map(|segment| {
                    if let Some(version) = panel.fixed_version(segment) {
                        Some(serde_json::json!({
                            "segment": segment.name(),
                            "mode": "fixed",
                            "version": version,
                        }))
                    } else {
                        let reference = panel.reference(segment)?;
                        let classifier = panel.classifier(segment)?;
                        Some(serde_json::json!({
                            "segment": segment.name(),
                            "mode": "predicted",
                            "reference_length": reference.len(),
                            "versions": classifier.labels(),
                        }))
                    }
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn run_export(output: &Path) -> anyhow::Result<()> {
    let panel = ReferencePanel::load_embedded()?;
    let json = panel.to_json()?;
    std::fs::write(output, json)?;

    println!(
        "Exported reference panel with {} predicted segments to {}",
        panel.len(),
        output.display()
    );

    Ok(())
}
