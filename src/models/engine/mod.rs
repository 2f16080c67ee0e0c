pub mod chart;
pub mod constants;
pub mod hit_window;
pub mod note;

pub use chart::{Chart, ChartData};
pub use constants::*;
pub use hit_window::HitWindow;
pub use note::{Direction, Note, NoteRecord};
