pub mod container;
pub mod fragment_sequence;
