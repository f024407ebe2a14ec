//! tile sprites, quantised tint, water wave, body → transform sync & HUD
//!
//! Everything here only *reads* the simulation. Pixel space is y down with
//! the origin at the top‑left of the world; render space flips y.

use bevy::prelude::*;
use noise::{NoiseFn, Perlin};

use crate::collision::Body;
use crate::components::*;
use crate::constants::*;
use crate::interaction::{in_reach, target_tile, CursorWorld};
use crate::rng::hash_seed;
use crate::terrain::{BlockKind, Terrain};
use crate::world_gen::WorldConfig;

const WATER_ALPHA: f32 = 0.6;
const WAVE_AMPLITUDE: f32 = 1.5;
const HUD_FONT_SIZE: f32 = 16.0;
pub const HUD_HINTS: [&str; 2] = ["L-Click: Mine | R-Click: Place", "MUST BE NEAR PLAYER TO INTERACT"];

/// sprite entity per grid cell, `None` for air
#[derive(Resource)]
pub struct TileSprites {
    width: usize,
    entities: Vec<Option<Entity>>,
}

impl TileSprites {
    fn slot(&mut self, x: usize, y: usize) -> &mut Option<Entity> {
        &mut self.entities[y * self.width + x]
    }
}

#[derive(Resource)]
pub struct TileTint(Perlin);

impl TileTint {
    pub fn new(seed: &str) -> Self {
        Self(Perlin::new(hash_seed(seed)))
    }

    /// brightness factor, snapped to `COLOR_VARIATION_LEVELS` steps
    pub fn factor(&self, x: usize, y: usize) -> f32 {
        let raw = self
            .0
            .get([x as f64 * COLOR_NOISE_SCALE, y as f64 * COLOR_NOISE_SCALE]) as f32;
        let levels = COLOR_VARIATION_LEVELS as f32;
        let step = (((raw + 1.0) * 0.5) * levels)
            .floor()
            .clamp(0.0, levels - 1.0);
        let norm = step / (levels - 1.0) * 2.0 - 1.0;
        1.0 + norm * COLOR_VARIATION_STRENGTH
    }
}

pub fn base_rgb(kind: BlockKind) -> Option<Vec3> {
    Some(match kind {
        BlockKind::Air => return None,
        BlockKind::Dirt => Vec3::new(0.55, 0.27, 0.07),
        BlockKind::Stone => Vec3::new(0.50, 0.50, 0.50),
        BlockKind::Grass => Vec3::new(0.13, 0.70, 0.08),
        BlockKind::Sand => Vec3::new(0.93, 0.84, 0.55),
        BlockKind::Water => Vec3::new(0.12, 0.35, 0.85),
        BlockKind::Wood => Vec3::new(0.45, 0.30, 0.15),
        BlockKind::Leaf => Vec3::new(0.10, 0.55, 0.12),
    })
}

pub fn tile_color(kind: BlockKind, factor: f32) -> Option<Color> {
    let rgb = (base_rgb(kind)? * factor).clamp(Vec3::ZERO, Vec3::ONE);
    let alpha = if kind == BlockKind::Water { WATER_ALPHA } else { 1.0 };
    Some(Color::srgba(rgb.x, rgb.y, rgb.z, alpha))
}

/// centre of tile (x, y) in render space
pub fn tile_translation(x: usize, y: usize, tile_size: u32, z: f32) -> Vec3 {
    let ts = tile_size as f32;
    Vec3::new(x as f32 * ts + ts * 0.5, -(y as f32 * ts + ts * 0.5), z)
}

/// centre of a body in render space, keeping its z
pub fn body_translation(body: &Body, z: f32) -> Vec3 {
    let c = body.center();
    Vec3::new(c.x, -c.y, z)
}

fn spawn_tile(
    commands: &mut Commands,
    tint: &TileTint,
    kind: BlockKind,
    x: usize,
    y: usize,
    tile_size: u32,
) -> Option<Entity> {
    let color = tile_color(kind, tint.factor(x, y))?;
    let z = if kind == BlockKind::Water { 1.0 } else { 0.0 };
    let translation = tile_translation(x, y, tile_size, z);
    let mut e = commands.spawn((
        Sprite {
            color,
            custom_size: Some(Vec2::splat(tile_size as f32)),
            ..default()
        },
        Transform::from_translation(translation),
        TileSprite { x, y },
    ));
    if kind == BlockKind::Water {
        e.insert(WaterTile {
            base_y: translation.y,
        });
    }
    Some(e.id())
}

/* ===========================================================
   startup: one sprite per non‑air tile
   =========================================================== */
pub fn spawn_tile_sprites(
    mut commands: Commands,
    terrain: Res<Terrain>,
    config: Res<WorldConfig>,
) {
    let tint = TileTint::new(&config.seed);
    let mut sprites = TileSprites {
        width: terrain.width,
        entities: vec![None; terrain.width * terrain.height],
    };

    for y in 0..terrain.height {
        for x in 0..terrain.width {
            let Some(kind) = terrain.get(x as i32, y as i32) else { continue };
            *sprites.slot(x, y) = spawn_tile(&mut commands, &tint, kind, x, y, terrain.tile_size);
        }
    }
    let count = sprites.entities.iter().flatten().count();
    info!("spawned {count} tile sprites");

    commands.spawn((
        Sprite {
            color: Color::srgba(1.0, 1.0, 1.0, 0.25),
            custom_size: Some(Vec2::splat(terrain.tile_size as f32)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 5.0),
        Visibility::Hidden,
        TileCursor,
    ));

    commands.insert_resource(sprites);
    commands.insert_resource(tint);
}

/* ===========================================================
   redraw tiles the simulation touched since last frame
   =========================================================== */
pub fn redraw_changed_tiles_system(
    mut commands: Commands,
    mut terrain: ResMut<Terrain>,
    mut sprites: ResMut<TileSprites>,
    tint: Res<TileTint>,
) {
    let changed: Vec<(usize, usize)> = terrain.drain_changes().collect();
    for (x, y) in changed {
        if let Some(e) = sprites.slot(x, y).take() {
            commands.entity(e).despawn();
        }
        let Some(kind) = terrain.get(x as i32, y as i32) else { continue };
        *sprites.slot(x, y) = spawn_tile(&mut commands, &tint, kind, x, y, terrain.tile_size);
    }
}

pub fn water_wave_system(time: Res<Time>, mut q: Query<(&mut Transform, &WaterTile)>) {
    let t = time.elapsed_secs();
    for (mut tf, water) in &mut q {
        tf.translation.y = water.base_y + (t * 2.0 + tf.translation.x * 0.1).sin() * WAVE_AMPLITUDE;
    }
}

pub fn sync_body_transforms_system(mut q: Query<(&Body, &mut Transform), Changed<Body>>) {
    for (body, mut tf) in &mut q {
        tf.translation = body_translation(body, tf.translation.z);
    }
}

/// highlight the tile under the cursor while it is within reach
pub fn tile_cursor_system(
    cursor: Res<CursorWorld>,
    terrain: Res<Terrain>,
    player_q: Query<&Body, With<Player>>,
    mut cursor_q: Query<(&mut Transform, &mut Visibility), With<TileCursor>>,
) {
    let Ok((mut tf, mut vis)) = cursor_q.get_single_mut() else { return };
    let target = cursor.0.and_then(|p| {
        let (tx, ty, center) = target_tile(&terrain, p);
        let player = player_q.get_single().ok()?;
        terrain.get(tx, ty)?;
        in_reach(player, center).then_some((tx as usize, ty as usize))
    });

    match target {
        Some((x, y)) => {
            tf.translation = tile_translation(x, y, terrain.tile_size, tf.translation.z);
            *vis = Visibility::Visible;
        }
        None => *vis = Visibility::Hidden,
    }
}

/* ===========================================================
   HUD (top-left stats panel)
   =========================================================== */
pub fn hud_text(health: &Health, player: &Player, inventory: &Inventory, xp: &Experience) -> String {
    let equipped = inventory
        .equipped_item()
        .map_or("None", |item| item.kind.name());
    format!(
        "Level {} | XP {}\nHealth {:.0}/{:.0}\nHunger {:.0}\nEquipped: {}\nCarrying {:.1}/{:.0}",
        xp.level(),
        xp.mining + xp.building + xp.combat,
        health.current,
        health.max,
        player.hunger,
        equipped,
        inventory.carrying,
        inventory.max_carry,
    )
}

pub fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(8.0),
                left: Val::Px(8.0),
                padding: UiRect::all(Val::Px(6.0)),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new(""),
                TextFont {
                    font_size: HUD_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::WHITE),
                HudText,
            ));
            for hint in HUD_HINTS {
                panel.spawn((
                    Text::new(hint),
                    TextFont {
                        font_size: HUD_FONT_SIZE * 0.8,
                        ..default()
                    },
                    TextColor(Color::srgb(1.0, 0.9, 0.2)),
                ));
            }
        });
}

pub fn hud_system(
    player_q: Query<(&Health, &Player, &Inventory, &Experience)>,
    mut text_q: Query<&mut Text, With<HudText>>,
) {
    let Ok((health, player, inventory, xp)) = player_q.get_single() else { return };
    let Ok(mut text) = text_q.get_single_mut() else { return };
    let next = hud_text(health, player, inventory, xp);
    if text.0 != next {
        text.0 = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tint_is_quantised() {
        let tint = TileTint::new("test");
        let allowed: Vec<f32> = (0..COLOR_VARIATION_LEVELS)
            .map(|s| {
                let norm = s as f32 / (COLOR_VARIATION_LEVELS - 1) as f32 * 2.0 - 1.0;
                1.0 + norm * COLOR_VARIATION_STRENGTH
            })
            .collect();
        for y in 0..40 {
            for x in 0..40 {
                let f = tint.factor(x, y);
                assert!(allowed.iter().any(|a| (a - f).abs() < 1e-5), "{f}");
            }
        }
    }

    #[test]
    fn air_has_no_sprite_colour() {
        assert_eq!(tile_color(BlockKind::Air, 1.0), None);
        for kind in BlockKind::ALL {
            if kind != BlockKind::Air {
                assert!(tile_color(kind, 1.2).is_some());
            }
        }
    }

    #[test]
    fn water_is_translucent() {
        let c = tile_color(BlockKind::Water, 1.0).unwrap();
        assert!((c.alpha() - WATER_ALPHA).abs() < 1e-6);
        assert_eq!(tile_color(BlockKind::Stone, 1.0).unwrap().alpha(), 1.0);
    }

    #[test]
    fn hud_lists_player_stats() {
        let mut inv = Inventory::default();
        inv.add(Item {
            kind: ItemKind::Tool {
                name: "Starter Pickaxe".into(),
                damage: 15.0,
            },
            weight: 1.0,
        });
        let player = Player {
            spawn: Vec2::ZERO,
            hunger: 72.6,
        };
        let xp = Experience {
            mining: 100,
            building: 5,
            combat: 0,
        };
        let health = Health {
            current: 80.0,
            max: 100.0,
        };

        let text = hud_text(&health, &player, &inv, &xp);
        assert!(text.starts_with("Level 2 | XP 105\n"));
        assert!(text.contains("Health 80/100"));
        assert!(text.contains("Hunger 73"));
        assert!(text.contains("Equipped: None"));

        inv.equip(0);
        let text = hud_text(&health, &player, &inv, &xp);
        assert!(text.contains("Equipped: Starter Pickaxe"));
        assert!(text.contains("Carrying 1.0/100"));
    }

    #[test]
    fn render_space_flips_y() {
        assert_eq!(tile_translation(0, 0, 16, 0.0), Vec3::new(8.0, -8.0, 0.0));
        assert_eq!(tile_translation(3, 2, 16, 1.0), Vec3::new(56.0, -40.0, 1.0));

        let b = Body::new(Vec2::new(100.0, 50.0), Vec2::new(12.0, 20.0));
        assert_eq!(body_translation(&b, 10.0), Vec3::new(106.0, -60.0, 10.0));
    }
}
