//! Top and bottom status strips

use super::TEXT_COLOUR;
use crate::consts::*;
use crate::renderer::DrawList;
use crate::sim::GameVars;

const STRIP_COLOUR: u8 = 1;
const PIP_ON: u8 = 10;
const PIP_OFF: u8 = 5;

pub fn draw(vars: &GameVars, out: &mut DrawList) {
    out.rect(0.0, 0.0, APP_WIDTH, HUD_HEIGHT, STRIP_COLOUR);
    out.rect(0.0, PLAYFIELD_BOTTOM, APP_WIDTH, HUD_HEIGHT, STRIP_COLOUR);

    out.text(24.0, 0.0, "1UP", TEXT_COLOUR);
    out.text(16.0, 8.0, format!("{:06}", vars.score), TEXT_COLOUR);

    out.text(96.0, 0.0, "HI-SCORE", TEXT_COLOUR);
    out.text(104.0, 8.0, format!("{:06}", vars.hi_score), TEXT_COLOUR);

    out.text(176.0, 0.0, "ARM", TEXT_COLOUR);
    out.text(176.0, 8.0, WEAPON_NAMES[vars.current_weapon], TEXT_COLOUR);
    out.blit(184.0, 8.0, vars.current_weapon as u16 * 16, 224, 8.0, 8.0, Some(0), None);

    out.blit(216.0, 0.0, 0, 4, 8.0, 8.0, Some(0), None);
    out.text(224.0, 8.0, vars.lives.to_string(), TEXT_COLOUR);

    out.text(16.0, PLAYFIELD_BOTTOM, "ARM", TEXT_COLOUR);
    out.text(16.0, PLAYFIELD_BOTTOM + 8.0, "LVL", TEXT_COLOUR);
    for (i, name) in WEAPON_NAMES.iter().enumerate() {
        let x = 56.0 + 64.0 * i as f32;
        let colour = if i == vars.current_weapon { PIP_ON } else { TEXT_COLOUR };
        out.text(x, PLAYFIELD_BOTTOM, *name, colour);
        for lvl in 0..MAX_WEAPON_LEVEL {
            let lit = lvl < vars.weapon_levels[i];
            out.rect(
                x + f32::from(lvl) * 8.0,
                PLAYFIELD_BOTTOM + 9.0,
                6.0,
                4.0,
                if lit { PIP_ON } else { PIP_OFF },
            );
        }
    }
}
