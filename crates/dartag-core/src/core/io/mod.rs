pub mod smiles;
pub mod table;
pub mod traits;
