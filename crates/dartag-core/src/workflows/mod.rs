//! # Workflows Module
//!
//! High-level entry points that run a complete dartag processing step over a
//! [`ReactionTable`](crate::core::io::table::ReactionTable).
//!
//! ## Overview
//!
//! Each workflow takes a table plus its configuration and a
//! [`ProgressReporter`](crate::engine::progress::ProgressReporter), and returns new
//! tables rather than writing files; reading inputs and choosing output paths is left
//! to the caller.
//!
//! ## Architecture
//!
//! - **Mapping Workflow** ([`map`]) - Normalises reactions and maps them in batches
//!   through an external atom mapper
//! - **Tagging Workflow** ([`tag`]) - Tags changed product atoms, standardises reactants,
//!   computes tag statistics and filters by tag count
//! - **Augmentation Workflow** ([`augment`]) - Samples tag permutations per reaction
//! - **Tokenization Workflow** ([`tokenize`]) - Tokenizes or detokenizes enzymatic reactions

pub mod augment;
pub mod map;
pub mod tag;
pub mod tokenize;
