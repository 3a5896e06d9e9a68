//! Command-line interface for geno-solver.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **genotype**: Genotype samples from a segmented FASTA file
//! - **panel**: Inspect the genotype compositions and the reference panel
//!
//! ## Usage
//!
//! ```text
//! # Genotype samples from a FASTA file
//! geno-solver genotype sequences.fa
//!
//! # Write the report to a file instead of stdout
//! geno-solver genotype sequences.fa -o report.tsv
//!
//! # JSON output for scripting
//! geno-solver genotype sequences.fa --format json
//!
//! # Inspect the composition table
//! geno-solver panel list
//! geno-solver panel show EA-2022-BB
//! ```

use clap::{Parser, Subcommand};

pub mod genotype;
pub mod panel;

#[derive(Parser)]
#[command(name = "geno-solver")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Assign influenza internal-gene genotypes from segment sequences")]
#[command(
    long_about = "geno-solver assigns genotypes to clade 2.3.4.4b A(H5N1) samples from their internal gene segments.\n\nEach submitted segment is aligned against a fixed reference, classified into a segment version, and the combined versions are resolved against a table of known genotype compositions. Samples that cannot be pinned to exactly one genotype get an explanatory note instead of a genotype."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "tsv")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Genotype samples from a segmented FASTA file
    Genotype(genotype::GenotypeArgs),

    /// Inspect the genotype compositions and the reference panel
    Panel(panel::PanelArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Tsv,
    Json,
}
