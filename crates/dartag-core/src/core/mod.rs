//! # Core Module
//!
//! Foundation types shared by the tagging engine: the molecular graph model,
//! reaction strings, notation I/O and element data.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, bonds, molecules and reactions
//! - **File I/O** ([`io`]) - The notation capability trait, the SMILES provider and CSV tables
//! - **Element Data** ([`utils`]) - Static element and valence tables

pub mod io;
pub mod models;
pub mod utils;
