//! Software rendering of the play screen.

pub mod cache;
pub mod draw;
pub mod font;
pub mod layout;
pub mod surface;

pub use cache::{LayeredRenderCache, RedrawCounts};
pub use layout::{Palette, Rect, ScreenLayout};
pub use surface::Surface;
