//! Feature encoding and version classification.
//!
//! This module turns a coordinate-projected sequence into a prediction:
//!
//! - [`encode`]: 4-bit-per-base ambiguity encoding into a boolean vector
//! - [`VersionClassifier`]: the opaque classifier interface
//! - [`LinearModel`]: the bundled sparse logistic implementation
//! - [`ModelSetData`]: the serialized artifact holding one model per segment

pub mod classifier;
pub mod encoding;

pub use classifier::{LinearModel, ModelError, ModelSetData, VersionClassifier, MODELS_VERSION};
pub use encoding::{encode, EncodeError, ENCODING_WIDTH};
