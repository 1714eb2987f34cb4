//! Selection of songs to sort.
//!
//! - [`mode`]: selection modes and their storage/picker lookup tables
//! - [`store`]: the persisted playlist subsets and date settings
//! - [`engine`]: running a mode against the media store

pub mod engine;
pub mod mode;
pub mod store;

pub use engine::select_songs;
pub use mode::{DateSelection, DateSelectionMode, SelectionMode};
pub use store::{SelectionStore, Subset};
