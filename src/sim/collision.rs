//! Axis-aligned overlap tests and pairwise collision dispatch
//!
//! The resolver only knows THAT two entities touched. What happens next is
//! up to each side's [`Entity::collided_with`], so new entity kinds never
//! need changes here.

use glam::Vec2;

use super::context::StageCtx;
use super::sprite::Entity;

/// Open-interval rectangle overlap: touching edges are not a collision
#[inline]
pub fn rect_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && a_pos.x + a_size.x > b_pos.x
        && a_pos.y < b_pos.y + b_size.y
        && a_pos.y + a_size.y > b_pos.y
}

fn entities_overlap<A: Entity + ?Sized, B: Entity + ?Sized>(a: &A, b: &B) -> bool {
    a.is_collidable() && b.is_collidable() && a.sprite().overlaps(b.sprite())
}

/// Notify both sides of a collision, `a` first
fn dispatch<A: Entity + ?Sized, B: Entity + ?Sized>(a: &mut A, b: &mut B, ctx: &mut StageCtx<'_>) {
    let from_b = b.contact();
    a.collided_with(&from_b, ctx);
    let from_a = a.contact();
    b.collided_with(&from_a, ctx);
}

/// Collide every live entity in `a` with every live entity in `b`.
///
/// Removal flags are read fresh before each comparison, so an entity taken
/// out earlier in the pass is never hit again.
pub fn lists_collide<A: Entity, B: Entity>(a: &mut [A], b: &mut [B], ctx: &mut StageCtx<'_>) {
    for ea in a.iter_mut() {
        for eb in b.iter_mut() {
            if ea.is_removed() {
                break;
            }
            if eb.is_removed() {
                continue;
            }
            if entities_overlap(ea, eb) {
                dispatch(ea, eb, ctx);
            }
        }
    }
}

/// Collide a single entity with a list. Does nothing once `single` is removed.
pub fn collide_list<S: Entity, B: Entity>(single: &mut S, list: &mut [B], ctx: &mut StageCtx<'_>) {
    for eb in list.iter_mut() {
        if single.is_removed() {
            return;
        }
        if eb.is_removed() {
            continue;
        }
        if entities_overlap(single, eb) {
            dispatch(single, eb, ctx);
        }
    }
}
