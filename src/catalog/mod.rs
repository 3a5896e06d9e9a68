//! Reference panel and genotype composition storage.
//!
//! The panel holds, per segment, the fixed reference sequence and the trained
//! classifier used to call segment versions; the composition table maps each
//! known genotype to the versions it expects. Default data for the Eurasian
//! H5 panel is compiled into the binary, but custom panels and tables can be
//! loaded from files at startup.
//!
//! ## Example
//!
//! ```rust,no_run
//! use geno_solver::catalog::{GenotypeTable, ReferencePanel};
//! use geno_solver::core::Segment;
//!
//! // Load the embedded panel and table
//! let panel = ReferencePanel::load_embedded().unwrap();
//! let table = GenotypeTable::load_embedded().unwrap();
//!
//! // List genotype compositions
//! for composition in table.iter() {
//!     println!("{}: PB2 {}", composition.name, composition.version(Segment::Pb2));
//! }
//! ```
//!
//! ## Custom Panels
//!
//! A panel can be exported, modified, and loaded back:
//!
//! ```rust,no_run
//! use geno_solver::catalog::ReferencePanel;
//! use std::path::Path;
//!
//! let panel = ReferencePanel::load_embedded().unwrap();
//! let json = panel.to_json().unwrap();
//!
//! let custom = ReferencePanel::load_from_files(
//!     Path::new("my_references.json"),
//!     Path::new("my_models.json"),
//! ).unwrap();
//! ```

pub mod compositions;
pub mod panel;

pub use compositions::{Composition, CompositionError, GenotypeTable};
pub use panel::{PanelData, PanelError, ReferencePanel, PANEL_VERSION};
