pub mod atom;
pub mod molecule;
pub mod reaction;
pub mod topology;
