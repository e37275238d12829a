pub mod input;
pub mod play;
pub mod render;

pub use play::{PlayOutcome, play};
