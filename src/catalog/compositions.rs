use std::path::Path;
use thiserror::Error;

use crate::core::Segment;

#[derive(Error, Debug)]
pub enum CompositionError {
    #[error("Failed to read composition table: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Invalid composition table: {0}")]
    InvalidFormat(String),
}

/// One genotype and the segment version it expects for every segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub name: String,
    versions: [String; 7],
}

impl Composition {
    /// Build a composition from versions listed in report column order.
    #[must_use]
    pub fn new(name: impl Into<String>, versions: [&str; 7]) -> Self {
        Self {
            name: name.into(),
            versions: versions.map(str::to_string),
        }
    }

    /// Expected version for a segment. Defined for every segment by
    /// construction.
    #[must_use]
    pub fn version(&self, segment: Segment) -> &str {
        &self.versions[segment as usize]
    }
}

/// The genotype composition table, in file order.
///
/// Order matters: resolver output lists compatible genotypes in table order,
/// so two runs over the same table produce identical notes.
#[derive(Debug, Clone, Default)]
pub struct GenotypeTable {
    compositions: Vec<Composition>,
}

impl GenotypeTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self {
            compositions: Vec::new(),
        }
    }

    /// Load the embedded default composition table
    ///
    /// # Errors
    ///
    /// Returns `CompositionError` if the embedded table is corrupt.
    pub fn load_embedded() -> Result<Self, CompositionError> {
        // Embedded at compile time; validated by build.rs
        const EMBEDDED_TABLE: &str = include_str!("../../data/compositions.tsv");
        Self::from_tsv(EMBEDDED_TABLE)
    }

    /// Load a composition table from a TSV file
    ///
    /// # Errors
    ///
    /// Returns `CompositionError` if the file cannot be read or is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, CompositionError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_tsv(&content)
    }

    /// Parse a composition table from TSV text.
    ///
    /// The first non-comment line is a header: a `Genotype` column followed
    /// by all seven segment names in any order. Every data row must supply a
    /// non-empty version for every segment.
    ///
    /// # Errors
    ///
    /// Returns `CompositionError::InvalidFormat` describing the offending
    /// line when the header or a row does not match the schema.
    pub fn from_tsv(text: &str) -> Result<Self, CompositionError> {
        let mut lines = text.lines().enumerate();

        let mut columns: Option<Vec<Segment>> = None;
        for (i, line) in lines.by_ref() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            columns = Some(parse_header(line, i + 1)?);
            break;
        }
        let columns = columns.ok_or_else(|| {
            CompositionError::InvalidFormat("No header line found".to_string())
        })?;

        let mut table = Self::new();
        for (i, line) in lines {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Line numbers in errors are 1-based for user friendliness
            let line_num = i + 1;
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != columns.len() + 1 {
                return Err(CompositionError::InvalidFormat(format!(
                    "Line {line_num}: expected {} fields, found {}",
                    columns.len() + 1,
                    fields.len()
                )));
            }

            let name = fields[0].trim();
            if name.is_empty() {
                return Err(CompositionError::InvalidFormat(format!(
                    "Line {line_num}: empty genotype name"
                )));
            }
            if table.get(name).is_some() {
                return Err(CompositionError::InvalidFormat(format!(
                    "Line {line_num}: duplicate genotype '{name}'"
                )));
            }

            let mut versions: [String; 7] = Default::default();
            for (segment, value) in columns.iter().zip(&fields[1..]) {
                let value = value.trim();
                if value.is_empty() {
                    return Err(CompositionError::InvalidFormat(format!(
                        "Line {line_num}: empty {segment} version for genotype '{name}'"
                    )));
                }
                versions[*segment as usize] = value.to_string();
            }

            table.compositions.push(Composition {
                name: name.to_string(),
                versions,
            });
        }

        if table.is_empty() {
            return Err(CompositionError::InvalidFormat(
                "No genotypes found in table".to_string(),
            ));
        }

        Ok(table)
    }

    /// Append a composition, keeping insertion order.
    pub fn push(&mut self, composition: Composition) {
        self.compositions.push(composition);
    }

    /// Look up a genotype by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Composition> {
        self.compositions.iter().find(|c| c.name == name)
    }

    /// Iterate compositions in table order
    pub fn iter(&self) -> std::slice::Iter<'_, Composition> {
        self.compositions.iter()
    }

    /// Number of genotypes in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.compositions.len()
    }

    /// Check if the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.compositions.is_empty()
    }
}

/// Parse the header line into the segment order of its columns.
fn parse_header(line: &str, line_num: usize) -> Result<Vec<Segment>, CompositionError> {
    let fields: Vec<&str> = line.split('\t').collect();
    let first = fields.first().map(|s| s.to_lowercase()).unwrap_or_default();
    if first != "genotype" {
        return Err(CompositionError::InvalidFormat(format!(
            "Line {line_num}: header must start with 'Genotype'"
        )));
    }

    let mut segments = Vec::new();
    for name in &fields[1..] {
        let name = name.trim();
        let segment: Segment = name.parse().map_err(|_| {
            CompositionError::InvalidFormat(format!(
                "Line {line_num}: unrecognized segment column '{name}'"
            ))
        })?;
        if segments.contains(&segment) {
            return Err(CompositionError::InvalidFormat(format!(
                "Line {line_num}: duplicate segment column '{name}'"
            )));
        }
        segments.push(segment);
    }
    if segments.len() != Segment::ALL.len() {
        return Err(CompositionError::InvalidFormat(format!(
            "Line {line_num}: header must list all {} segments, found {}",
            Segment::ALL.len(),
            segments.len()
        )));
    }

    Ok(segments)
}
