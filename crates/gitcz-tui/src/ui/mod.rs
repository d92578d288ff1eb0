pub mod binary_choice;
pub mod selector;
pub(crate) mod text;
pub mod text_field;
