//! GPU-ready sprite instance records

use bytemuck::{Pod, Zeroable};

use super::draw::DrawCmd;

/// Flag bits for [`SpriteInstance::flags`]
pub mod flags {
    pub const HAS_COLKEY: u32 = 1 << 0;
    pub const HAS_PAL_SWAP: u32 = 1 << 1;
    pub const SOLID_RECT: u32 = 1 << 2;
}

/// One textured (or solid) quad
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Screen position (top-left)
    pub position: [f32; 2],
    /// Size in pixels; negative mirrors the source region
    pub size: [f32; 2],
    /// Source region origin in the sprite bank
    pub uv: [f32; 2],
    /// colkey | pal_from << 8 | pal_to << 16 | solid colour << 24
    pub palette: u32,
    pub flags: u32,
}

impl SpriteInstance {
    /// Convert a draw command. Text has no instance form and yields `None`.
    pub fn from_cmd(cmd: &DrawCmd) -> Option<Self> {
        match *cmd {
            DrawCmd::Blit {
                x,
                y,
                u,
                v,
                w,
                h,
                colkey,
                pal,
            } => {
                let mut inst = Self {
                    position: [x, y],
                    size: [w, h],
                    uv: [f32::from(u), f32::from(v)],
                    ..Default::default()
                };
                if let Some(key) = colkey {
                    inst.palette |= u32::from(key);
                    inst.flags |= flags::HAS_COLKEY;
                }
                if let Some(swap) = pal {
                    inst.palette |= u32::from(swap.from) << 8 | u32::from(swap.to) << 16;
                    inst.flags |= flags::HAS_PAL_SWAP;
                }
                Some(inst)
            }
            DrawCmd::Rect { x, y, w, h, colour } => Some(Self {
                position: [x, y],
                size: [w, h],
                uv: [0.0, 0.0],
                palette: u32::from(colour) << 24,
                flags: flags::SOLID_RECT,
            }),
            DrawCmd::Text { .. } => None,
        }
    }

    /// Raw bytes for a vertex buffer upload
    pub fn as_bytes(instances: &[SpriteInstance]) -> &[u8] {
        bytemuck::cast_slice(instances)
    }
}
