//! Show sequence
//!
//! A show is an ordered table of fixed-duration steps decoded from a
//! `;`-delimited text file produced by the show-authoring tool.

pub mod step;
pub mod table;

pub use step::SequenceStep;
pub use table::{header_for, SequenceTable, DRIVE_PREFIXES, SCALAR_COLUMNS};
