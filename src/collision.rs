//! axis‑separated AABB vs. tile‑grid collision
//!
//! One call per entity per tick: horizontal pass first, then vertical.
//! Each pass moves the body by its full velocity, samples a handful of
//! points along the leading edge and snaps flush to the first solid tile
//! found. Corners are never swept diagonally, so a body moving faster than
//! a corner gap per tick can slip through it.
use bevy::prelude::*;

use crate::constants::{SAMPLE_INSET, SAMPLE_STEP_COLS, SAMPLE_STEP_ROWS};
use crate::terrain::{pixel_to_tile, tile_to_pixel, Terrain};

/// axis‑aligned box in pixel space (top‑left origin, y down)
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub grounded: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            grounded: false,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.pos.x
            && p.y >= self.pos.y
            && p.x < self.pos.x + self.size.x
            && p.y < self.pos.y + self.size.y
    }
}

/// Sample offsets inside `[inset, extent - inset]`, every `step`, always
/// ending on the far inset so the last row/column is never skipped.
fn sample_offsets(extent: f32, step: f32) -> impl Iterator<Item = f32> {
    let last = (extent - SAMPLE_INSET).max(SAMPLE_INSET);
    let mut next = Some(SAMPLE_INSET.min(last));
    std::iter::from_fn(move || {
        let cur = next?;
        next = if cur >= last {
            None
        } else {
            Some((cur + step).min(last))
        };
        Some(cur)
    })
}

/// Move `body` by its velocity against `terrain`, resolving each axis.
pub fn resolve(terrain: &Terrain, body: &mut Body) {
    resolve_horizontal(terrain, body);
    resolve_vertical(terrain, body);
}

pub fn resolve_horizontal(terrain: &Terrain, body: &mut Body) {
    let ts = terrain.tile_size;
    body.pos.x += body.vel.x;
    if body.vel.x == 0.0 {
        return;
    }

    let edge = if body.vel.x > 0.0 {
        body.pos.x + body.size.x
    } else {
        body.pos.x
    };
    let tx = pixel_to_tile(edge, ts);

    for dy in sample_offsets(body.size.y, SAMPLE_STEP_ROWS) {
        let ty = pixel_to_tile(body.pos.y + dy, ts);
        if terrain.is_solid(tx, ty) {
            body.pos.x = if body.vel.x > 0.0 {
                tile_to_pixel(tx, ts) - body.size.x
            } else {
                tile_to_pixel(tx + 1, ts)
            };
            body.vel.x = 0.0;
            break;
        }
    }
}

pub fn resolve_vertical(terrain: &Terrain, body: &mut Body) {
    let ts = terrain.tile_size;
    body.grounded = false;
    body.pos.y += body.vel.y;
    if body.vel.y == 0.0 {
        return;
    }

    let edge = if body.vel.y > 0.0 {
        body.pos.y + body.size.y
    } else {
        body.pos.y
    };
    let ty = pixel_to_tile(edge, ts);

    for dx in sample_offsets(body.size.x, SAMPLE_STEP_COLS) {
        let tx = pixel_to_tile(body.pos.x + dx, ts);
        if terrain.is_solid(tx, ty) {
            if body.vel.y > 0.0 {
                body.pos.y = tile_to_pixel(ty, ts) - body.size.y;
                body.grounded = true;
            } else {
                body.pos.y = tile_to_pixel(ty + 1, ts);
            }
            body.vel.y = 0.0;
            break;
        }
    }
}

/// keep the body inside the world horizontally
pub fn clamp_to_world(terrain: &Terrain, body: &mut Body) {
    let max_x = (terrain.pixel_width() - body.size.x).max(0.0);
    body.pos.x = body.pos.x.clamp(0.0, max_x);
}
