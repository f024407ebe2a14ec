//! player spawn, keyboard intent & per‑tick platformer physics

use bevy::input::ButtonInput;
use bevy::prelude::*;

use crate::collision::{clamp_to_world, resolve, Body};
use crate::components::*;
use crate::constants::*;
use crate::terrain::{tile_to_pixel, BlockKind, Terrain};

/// movement wanted for the next tick, filled from the keyboard every frame
#[derive(Resource, Default, Clone, Copy, Debug, PartialEq)]
pub struct PlayerIntent {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/* ===========================================================
   spawn (standing on the generation surface)
   =========================================================== */
pub fn spawn_point(terrain: &Terrain) -> Vec2 {
    let column = PLAYER_SPAWN_COLUMN.min(terrain.width - 1);
    let ts = terrain.tile_size;
    let ground = terrain
        .surface_at(column)
        .unwrap_or(terrain.height_map[column]);
    Vec2::new(
        tile_to_pixel(column as i32, ts),
        tile_to_pixel(ground as i32, ts) - PLAYER_HEIGHT,
    )
}

pub fn spawn_player(mut commands: Commands, terrain: Res<Terrain>) {
    let spawn = spawn_point(&terrain);

    let mut inventory = Inventory::default();
    for kind in [BlockKind::Wood, BlockKind::Stone] {
        inventory.add(Item {
            kind: ItemKind::Block(kind),
            weight: BLOCK_ITEM_WEIGHT,
        });
    }
    inventory.add(Item {
        kind: ItemKind::Tool {
            name: "Starter Pickaxe".into(),
            damage: 15.0,
        },
        weight: 1.0,
    });
    inventory.equip(inventory.items.len() - 1);

    commands.spawn((
        Sprite {
            color: Color::srgb(0.95, 0.78, 0.35),
            custom_size: Some(Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        Body::new(spawn, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)),
        Player { spawn, hunger: 100.0 },
        Health::full(PLAYER_MAX_HEALTH),
        inventory,
        Experience::default(),
    ));
    info!("player spawned at ({:.0}, {:.0})", spawn.x, spawn.y);
}

/* ===========================================================
   input (A/D or arrows, W/Space/Up to jump)
   =========================================================== */
pub fn player_input_system(keys: Res<ButtonInput<KeyCode>>, mut intent: ResMut<PlayerIntent>) {
    *intent = PlayerIntent {
        left: keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]),
        right: keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]),
        jump: keys.any_pressed([KeyCode::KeyW, KeyCode::Space, KeyCode::ArrowUp]),
    };
}

/// One simulation tick of the controller: walk, gravity, jump, collide.
pub fn step_player(terrain: &Terrain, body: &mut Body, intent: PlayerIntent) {
    body.vel.x = match (intent.left, intent.right) {
        (true, false) => -WALK_SPEED,
        (false, true) => WALK_SPEED,
        _ => 0.0,
    };

    body.vel.y = (body.vel.y + GRAVITY).min(MAX_FALL_SPEED);

    if intent.jump && body.grounded {
        body.vel.y = -JUMP_SPEED;
        body.grounded = false;
    }

    resolve(terrain, body);
    clamp_to_world(terrain, body);
}

/* ===========================================================
   physics, hunger & falling out of the world
   =========================================================== */
pub fn player_physics_system(
    terrain: Res<Terrain>,
    intent: Res<PlayerIntent>,
    mut q: Query<(&mut Body, &mut Player, &mut Health)>,
) {
    let Ok((mut body, mut player, mut health)) = q.get_single_mut() else { return };

    step_player(&terrain, &mut body, *intent);
    player.hunger = (player.hunger - HUNGER_DECAY).max(0.0);

    if body.pos.y > terrain.pixel_height() {
        warn!("player fell out of the world");
        health.current = 0.0;
    }

    if health.is_dead() {
        info!("player died, respawning at ({:.0}, {:.0})", player.spawn.x, player.spawn.y);
        *body = Body::new(player.spawn, body.size);
        *health = Health::full(health.max);
        player.hunger = 100.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 32×32 grid with a floor at row 20
    fn floor() -> Terrain {
        let (w, h) = (32usize, 32usize);
        let mut blocks = vec![BlockKind::Air; w * h];
        for y in 20..h {
            for x in 0..w {
                blocks[y * w + x] = BlockKind::Dirt;
            }
        }
        Terrain::from_blocks(w, h, 16, blocks, vec![20; w]).unwrap()
    }

    fn player_at(x: f32, y: f32) -> Body {
        Body::new(Vec2::new(x, y), Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT))
    }

    #[test]
    fn falls_until_grounded() {
        let t = floor();
        let mut b = player_at(100.0, 100.0);
        for _ in 0..200 {
            step_player(&t, &mut b, PlayerIntent::default());
        }
        assert!(b.grounded);
        assert_eq!(b.bottom(), 320.0);
    }

    #[test]
    fn fall_speed_is_capped() {
        let t = floor();
        let mut b = player_at(100.0, -2000.0);
        for _ in 0..100 {
            step_player(&t, &mut b, PlayerIntent::default());
            assert!(b.vel.y <= MAX_FALL_SPEED);
        }
    }

    #[test]
    fn jump_only_from_ground() {
        let t = floor();
        let jump = PlayerIntent {
            jump: true,
            ..default()
        };

        let mut airborne = player_at(100.0, 100.0);
        step_player(&t, &mut airborne, jump);
        assert!(airborne.vel.y > 0.0);

        let mut standing = player_at(100.0, 300.0);
        step_player(&t, &mut standing, PlayerIntent::default());
        assert!(standing.grounded);
        step_player(&t, &mut standing, jump);
        assert!(!standing.grounded);
        assert!(standing.pos.y < 300.0);
        assert_eq!(standing.vel.y, -JUMP_SPEED);
    }

    #[test]
    fn walking_is_clamped_to_world() {
        let t = floor();
        let mut b = player_at(2.0, 300.0);
        let left = PlayerIntent {
            left: true,
            ..default()
        };
        for _ in 0..5 {
            step_player(&t, &mut b, left);
        }
        assert_eq!(b.pos.x, 0.0);
    }

    #[test]
    fn spawn_point_rests_on_surface() {
        let t = floor();
        let p = spawn_point(&t);
        assert_eq!(p.y + PLAYER_HEIGHT, 320.0);
        let mut b = player_at(p.x, p.y);
        step_player(&t, &mut b, PlayerIntent::default());
        assert!(b.grounded);
        assert_eq!(b.pos, p);
    }
}
