pub mod inference;
pub mod input;
