pub mod utils;

pub use utils::{normalized_note, utc_day_bounds};
