pub mod gvcf;
pub mod rangemap;
pub mod variant;

pub use biocore::location::{Interval, Position, compare_contigs};
