//! Everything that turns a [`Game`](crate::game::Game) into terminal output

pub mod font;
pub mod pixbuf;
pub mod scene;
pub mod term;

pub use pixbuf::PixelBuf;
pub use scene::draw;
pub use term::{Layout, draw_hud, present};
