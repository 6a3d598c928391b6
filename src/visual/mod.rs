pub mod draw;

pub use draw::{draw, draw_grid};
