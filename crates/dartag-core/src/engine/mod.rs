//! # Engine Module
//!
//! This module implements the reaction-center analysis at the heart of dartag: it
//! compares the bonding environment of every mapped atom before and after a reaction,
//! tags the atoms whose environment changed, and enumerates subsets of those tags for
//! data augmentation.
//!
//! ## Overview
//!
//! All analysis is keyed by atom map numbers, never by positional indices, so the two
//! sides of a reaction can be compared regardless of how each was written. Molecules are
//! read and written through the [`MolecularNotation`](crate::core::io::traits::MolecularNotation)
//! interface, which keeps the engine independent of any particular line notation.
//!
//! ## Architecture
//!
//! - **Neighbourhoods & Classification** ([`environment`]) - Per-atom bond descriptors and
//!   the CHANGED / SAME partition
//! - **Tagging** ([`tagging`]) - Tag stamping on products and tag counting
//! - **Combinations** ([`combinations`]) - Bounded-size tag subsets and seeded sampling
//! - **Standardisation** ([`standardize`]) - Mapping removal and component clean-up
//! - **Atom Mapping** ([`mapping`]) - Batch mapping through an external model with per-item fallback
//! - **Tokenization** ([`tokenization`]) - Atom-level and enzymatic reaction tokenization
//! - **Statistics** ([`stats`]) - Tag count distributions
//! - **Configuration** ([`config`]) - Workflow parameters and their builders
//! - **Progress Monitoring** ([`progress`]) - Progress reporting hooks
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod combinations;
pub mod config;
pub mod environment;
pub mod error;
pub mod mapping;
pub mod progress;
pub mod standardize;
pub mod stats;
pub mod tagging;
pub mod tokenization;
