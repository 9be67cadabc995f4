//! Dataset loading and persistence layer.

pub mod table;

pub use table::{load_dataset, save_augmented_dataset, Table};
