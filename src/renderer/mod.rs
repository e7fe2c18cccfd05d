//! Scene rendering
//!
//! Draws the background grid, then enemies, items and the player, in that
//! order, onto an injected `Surface`. Images still loading are skipped.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

use glam::Vec2;

use crate::consts::*;
use crate::resources::ResourceCache;
use crate::sim::GameState;

/// A 2D target that can blit cached images
pub trait Surface {
    type Image;

    /// Clear the whole playfield
    fn clear(&mut self, width: f32, height: f32);
    /// Draw an image with its top-left corner at `pos`
    fn draw_image(&mut self, image: &Self::Image, pos: Vec2);
}

/// Draw one frame of `state`
pub fn render_scene<S: Surface>(
    state: &GameState,
    cache: &ResourceCache<S::Image>,
    surface: &mut S,
) {
    let engine = &state.config.engine;
    surface.clear(
        engine.playfield_width() as f32,
        engine.playfield_height() as f32,
    );

    for (row, id) in engine.row_images.iter().enumerate() {
        let Some(image) = cache.get(id) else { continue };
        for col in 0..engine.column_count {
            let pos = Vec2::new(
                (col as i32 * TILE_WIDTH) as f32,
                (row as i32 * ROW_HEIGHT) as f32,
            );
            surface.draw_image(image, pos);
        }
    }

    for entity in state.enemies.iter().chain(&state.items) {
        if let Some(image) = cache.get(&entity.sprite) {
            surface.draw_image(image, Vec2::new(entity.x as f32, entity.y));
        }
    }

    let player = &state.player;
    if let Some(image) = cache.get(&player.sprite) {
        surface.draw_image(image, Vec2::new(player.x as f32, player.y));
    }
}
