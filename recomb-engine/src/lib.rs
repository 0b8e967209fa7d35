pub mod filename;
pub mod mutation;
pub mod resizer;
pub mod writer;
