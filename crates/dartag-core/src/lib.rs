//! # dartag Core Library
//!
//! Disconnection-aware tagging of atom-mapped reactions, for preparing
//! retrosynthesis training data.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Molecule and reaction models, a SMILES reader and
//!   writer behind the `MolecularNotation` interface, element data and CSV tables.
//!
//! - **[`engine`]: The Logic Core.** Atomic neighbourhood extraction, CHANGED / SAME
//!   classification, product tagging, tag combination sampling, batch atom mapping,
//!   standardisation and tokenization.
//!
//! - **[`workflows`]: The Public API.** Table-in, table-out procedures (map, tag,
//!   augment, tokenize) that tie `engine` and `core` together with progress reporting.

pub mod core;
pub mod engine;
pub mod workflows;
