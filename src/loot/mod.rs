pub mod catalog;
pub mod decompose;
pub mod picker;
