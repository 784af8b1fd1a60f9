pub mod gallery;
pub mod public;
