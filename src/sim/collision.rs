//! Player/entity overlap test
//!
//! Entities only ever share the player's column exactly, so the check is a
//! column equality followed by a one-dimensional overlap on the vertical
//! axis, using the tile width as the entity height.

use crate::consts::TILE_WIDTH;

use super::entity::FallingEntity;
use super::state::Player;

/// True when an entity with top edge `entity_y` in column `entity_x` touches
/// the player row at `player_y` in column `player_x`.
///
/// The entity's bottom edge must have reached the player row, and its top
/// edge must not have passed below it.
#[inline]
pub fn overlaps(entity_x: i32, entity_y: f32, player_x: i32, player_y: f32) -> bool {
    if entity_x != player_x {
        return false;
    }

    let entity_bottom = entity_y + TILE_WIDTH as f32;
    entity_bottom > player_y && !(player_y < entity_y)
}

/// Convenience wrapper over [`overlaps`]
pub fn entity_hits_player(entity: &FallingEntity, player: &Player) -> bool {
    overlaps(entity.x, entity.y, player.x, player.y)
}
