//! FASTA sample reader built on noodles.
//!
//! Input records carry the segment in the last underscore-delimited token of
//! the record name, e.g. `>A/duck/Italy/24VIR0001-3/2024_PB2`. Consecutive
//! records sharing the same name prefix form one sample; a prefix change
//! closes the previous sample, so samples stream out in input order without
//! buffering the whole file.
//!
//! Supports both uncompressed and gzip/bgzip compressed files.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use noodles::fasta;
use thiserror::Error;
use tracing::warn;

use crate::core::{Sample, Segment};

#[derive(Error, Debug)]
pub enum FastaError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse FASTA record: {0}")]
    Noodles(String),
}

/// Check if the path is a gzipped file
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Streams samples out of a FASTA file, grouping consecutive records by
/// their name prefix.
///
/// Records are screened as they arrive: HA records are dropped without
/// comment (hemagglutinin is typed by other tools), records with an
/// unrecognized segment suffix or no suffix at all are skipped with a
/// warning, and a repeated segment within one sample keeps the last
/// sequence seen. Sequences are uppercased on ingest.
pub struct SampleReader<R> {
    inner: fasta::io::Reader<R>,
    current: Option<Sample>,
}

impl SampleReader<Box<dyn BufRead>> {
    /// Open a FASTA file, transparently decompressing gzipped input.
    ///
    /// # Errors
    ///
    /// Returns `FastaError::Io` if the file cannot be opened.
    pub fn from_path(path: &Path) -> Result<Self, FastaError> {
        let file = File::open(path)?;
        let reader: Box<dyn BufRead> = if is_gzipped(path) {
            Box::new(BufReader::new(GzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        Ok(Self::new(reader))
    }
}

impl<R: BufRead> SampleReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: fasta::io::Reader::new(reader),
            current: None,
        }
    }

    /// Fold one record into the current sample, starting a new sample on a
    /// prefix change. Returns the sample that was closed, if any.
    fn accept(&mut self, record: &fasta::Record) -> Option<Sample> {
        let name = String::from_utf8_lossy(record.name()).to_string();
        let (sample_id, suffix) = match name.rsplit_once('_') {
            Some(parts) => parts,
            None => {
                warn!(record = %name, "Record name has no segment suffix, skipping");
                return None;
            }
        };

        // The prefix decides sample grouping before the suffix is looked
        // at, so a record with a bad suffix still opens its sample.
        let finished = if self.current.as_ref().is_some_and(|s| s.id == sample_id) {
            None
        } else {
            self.current.replace(Sample::new(sample_id))
        };

        if suffix == "HA" {
            // Hemagglutinin is typed by dedicated tools, not here.
            return finished;
        }

        match suffix.parse::<Segment>() {
            Ok(segment) => {
                let sequence = String::from_utf8_lossy(record.sequence().as_ref()).to_uppercase();
                if let Some(current) = self.current.as_mut() {
                    if current.insert_sequence(segment, sequence).is_some() {
                        warn!(
                            sample = %current.id,
                            segment = %segment,
                            "Duplicate segment record, keeping the last one"
                        );
                    }
                }
            }
            Err(_) => {
                warn!(
                    record = %name,
                    suffix = %suffix,
                    "Unrecognized segment suffix, skipping record"
                );
            }
        }

        finished
    }
}

impl<R: BufRead> Iterator for SampleReader<R> {
    type Item = Result<Sample, FastaError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.inner.records().next() {
                Some(Ok(record)) => record,
                Some(Err(e)) => return Some(Err(FastaError::Noodles(e.to_string()))),
                None => return self.current.take().map(Ok),
            };

            if let Some(sample) = self.accept(&record) {
                return Some(Ok(sample));
            }
        }
    }
}
