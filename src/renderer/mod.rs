//! Rendering output
//!
//! The simulation never touches a GPU. Each frame's draw pass appends
//! commands to a [`DrawList`]; a platform layer turns them into sprite
//! instances and submits them however it likes.

pub mod draw;
pub mod instance;

pub use draw::{DrawCmd, DrawList, PalSwap};
pub use instance::SpriteInstance;
