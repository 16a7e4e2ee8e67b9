//! Screens and overlays drawn on top of (or instead of) the stage

pub mod backdrop;
pub mod complete;
pub mod hud;
pub mod titles;

pub use backdrop::Backdrop;
pub use complete::Complete;
pub use titles::{TitleChoice, Titles};

/// Default text colour
pub const TEXT_COLOUR: u8 = 7;
