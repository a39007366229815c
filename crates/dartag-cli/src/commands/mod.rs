pub mod augment;
pub mod map;
pub mod tag;
pub mod tokenize;

use crate::error::{CliError, Result};
use dartag::core::io::table::ReactionTable;
use std::path::Path;
use tracing::info;

pub(crate) fn read_table(path: &Path) -> Result<ReactionTable> {
    info!("Loading reactions from {:?}", path);
    ReactionTable::read_from_path(path).map_err(|source| CliError::ReadTable {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_table(table: &ReactionTable, path: &Path) -> Result<()> {
    info!("Writing {} row(s) to {:?}", table.len(), path);
    table
        .write_to_path(path)
        .map_err(|source| CliError::WriteTable {
            path: path.to_path_buf(),
            source,
        })
}
