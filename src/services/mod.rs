pub mod document;
pub mod generate;
