pub mod mutators;
pub mod selectors;
pub mod spec;
