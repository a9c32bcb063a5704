//! Photo Roll Common Library
//!
//! CLIとストア実装で共有される型とユーティリティ

pub mod error;
pub mod parser;
pub mod state;
pub mod transform;
pub mod types;

pub use error::{Error, Result};
pub use parser::{latest_record, parse_mars_list, parse_photo_list, parse_selection_tree};
pub use state::UiState;
pub use transform::{resolve, DisplayTransform, BLUR_RADIUS};
pub use types::{MarsPhoto, Photo, SelectionRecord};
