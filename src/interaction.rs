//! mouse → block commands, then mining, placing & melee in range
//!
//! Clicks are queued as [`BlockCommand`] events by the input system and
//! consumed once per frame by [`interaction_system`]; nothing else writes
//! to the grid.
use bevy::input::ButtonInput;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use thiserror::Error;

use crate::collision::Body;
use crate::components::*;
use crate::constants::*;
use crate::mobs::{EnemyAi, Mob, MobRng};
use crate::terrain::{pixel_to_tile, tile_to_pixel, BlockKind, Terrain, WorldError};

/// cursor position in world pixels (y down), if over the window
#[derive(Resource, Default, Clone, Copy, Debug)]
pub struct CursorWorld(pub Option<Vec2>);

#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub enum BlockCommand {
    /// hit a mob under the cursor, or mine the tile
    Primary(Vec2),
    /// put a block from the inventory down
    Secondary(Vec2),
}

#[derive(Debug, Error, PartialEq)]
pub enum ActionError {
    #[error("target is out of reach")]
    OutOfRange,
    #[error("no placeable block in the inventory")]
    NothingToPlace,
    #[error("something is standing there")]
    Occupied,
    #[error("inventory is full")]
    InventoryFull,
    #[error("invalid item name")]
    InvalidItemName,
    #[error("need at least one material")]
    NoMaterials,
    #[error(transparent)]
    World(#[from] WorldError),
}

/* ===========================================================
   pure helpers
   =========================================================== */
/// centre of the tile containing `p`, plus its coordinates
pub fn target_tile(terrain: &Terrain, p: Vec2) -> (i32, i32, Vec2) {
    let ts = terrain.tile_size;
    let (tx, ty) = (pixel_to_tile(p.x, ts), pixel_to_tile(p.y, ts));
    let half = ts as f32 * 0.5;
    (
        tx,
        ty,
        Vec2::new(tile_to_pixel(tx, ts) + half, tile_to_pixel(ty, ts) + half),
    )
}

pub fn in_reach(player: &Body, target: Vec2) -> bool {
    player.center().distance(target) < INTERACTION_RANGE
}

fn tile_overlaps(terrain: &Terrain, tx: i32, ty: i32, body: &Body) -> bool {
    let ts = terrain.tile_size as f32;
    let (x0, y0) = (tx as f32 * ts, ty as f32 * ts);
    x0 < body.pos.x + body.size.x
        && x0 + ts > body.pos.x
        && y0 < body.pos.y + body.size.y
        && y0 + ts > body.pos.y
}

/// Mine the tile under `p` and pocket it.
pub fn mine_for(
    terrain: &mut Terrain,
    player: &Body,
    inventory: &mut Inventory,
    xp: &mut Experience,
    p: Vec2,
) -> Result<BlockKind, ActionError> {
    let (tx, ty, center) = target_tile(terrain, p);
    if !in_reach(player, center) {
        return Err(ActionError::OutOfRange);
    }
    let kind = terrain.try_mine(tx, ty)?;
    xp.mining += MINING_XP;
    if !inventory.add(Item {
        kind: ItemKind::Block(kind),
        weight: BLOCK_ITEM_WEIGHT,
    }) {
        // the block is gone either way
        return Err(ActionError::InventoryFull);
    }
    Ok(kind)
}

/// Put the first placeable block from the inventory at `p`.
pub fn place_for(
    terrain: &mut Terrain,
    player: &Body,
    others: &[Body],
    inventory: &mut Inventory,
    xp: &mut Experience,
    p: Vec2,
) -> Result<BlockKind, ActionError> {
    let (tx, ty, center) = target_tile(terrain, p);
    if !in_reach(player, center) {
        return Err(ActionError::OutOfRange);
    }
    let (slot, kind) = inventory.first_placeable().ok_or(ActionError::NothingToPlace)?;
    if std::iter::once(player)
        .chain(others)
        .any(|b| tile_overlaps(terrain, tx, ty, b))
    {
        return Err(ActionError::Occupied);
    }
    terrain.try_place(tx, ty, kind)?;
    inventory.remove(slot);
    xp.building += BUILDING_XP;
    Ok(kind)
}

/* ===========================================================
   input (LMB mine / hit, RMB place)
   =========================================================== */
pub fn mouse_input_system(
    mouse: Res<ButtonInput<MouseButton>>,
    window_q: Query<&Window, With<PrimaryWindow>>,
    cam_q: Query<(&Camera, &GlobalTransform)>,
    mut cursor: ResMut<CursorWorld>,
    mut commands_out: EventWriter<BlockCommand>,
) {
    cursor.0 = None;
    let Ok(window) = window_q.get_single() else { return };
    let Ok((cam, cam_tf)) = cam_q.get_single() else { return };
    let Some(screen) = window.cursor_position() else { return };
    let Ok(world) = cam.viewport_to_world_2d(cam_tf, screen) else { return };

    // render space is y up
    let p = Vec2::new(world.x, -world.y);
    cursor.0 = Some(p);

    if mouse.just_pressed(MouseButton::Left) {
        commands_out.send(BlockCommand::Primary(p));
    }
    if mouse.just_pressed(MouseButton::Right) {
        commands_out.send(BlockCommand::Secondary(p));
    }
}

/* ===========================================================
   apply queued commands
   =========================================================== */
#[allow(clippy::too_many_arguments)]
pub fn interaction_system(
    mut commands: Commands,
    mut events: EventReader<BlockCommand>,
    mut terrain: ResMut<Terrain>,
    mut ai: ResMut<EnemyAi>,
    mut rng: Option<ResMut<MobRng>>,
    mut player_q: Query<(&Body, &mut Inventory, &mut Experience), With<Player>>,
    mut mobs: Query<(Entity, &Body, &Mob, &mut Health), Without<Player>>,
) {
    let Ok((body, mut inventory, mut xp)) = player_q.get_single_mut() else { return };

    for cmd in events.read() {
        match *cmd {
            BlockCommand::Primary(p) => {
                let hit = mobs.iter_mut().find(|(_, b, _, _)| b.contains(p));
                if let Some((e, mob_body, mob, mut health)) = hit {
                    if !in_reach(body, mob_body.center()) {
                        continue;
                    }
                    let damage = inventory.equipped_damage().unwrap_or(BARE_HAND_DAMAGE);
                    if health.take(damage) {
                        commands.entity(e).despawn();
                        xp.combat += COMBAT_XP;
                        if mob.is_enemy() {
                            ai.adapt_after_encounter(false);
                        }
                        if let Some(rng) = rng.as_mut() {
                            let (name, count) = mob.drops(&mut rng.0);
                            for _ in 0..count {
                                inventory.add(Item {
                                    kind: ItemKind::Drop(name),
                                    weight: BLOCK_ITEM_WEIGHT,
                                });
                            }
                        }
                        info!("mob {e} killed");
                    }
                    continue;
                }

                match mine_for(&mut terrain, body, &mut inventory, &mut xp, p) {
                    Ok(kind) => debug!("mined {kind} at {p}"),
                    Err(err) => debug!("mine at {p} refused: {err}"),
                }
            }
            BlockCommand::Secondary(p) => {
                let others: Vec<Body> = mobs.iter().map(|(_, b, _, _)| *b).collect();
                match place_for(&mut terrain, body, &others, &mut inventory, &mut xp, p) {
                    Ok(kind) => debug!("placed {kind} at {p}"),
                    Err(err) => debug!("place at {p} refused: {err}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 16×16, dirt from row 8 down, player standing on it near column 4
    fn setup() -> (Terrain, Body, Inventory, Experience) {
        let (w, h) = (16usize, 16usize);
        let mut blocks = vec![BlockKind::Air; w * h];
        for y in 8..h {
            for x in 0..w {
                blocks[y * w + x] = BlockKind::Dirt;
            }
        }
        let t = Terrain::from_blocks(w, h, 16, blocks, vec![8; w]).unwrap();
        let body = Body::new(Vec2::new(64.0, 108.0), Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT));
        (t, body, Inventory::default(), Experience::default())
    }

    #[test]
    fn target_tile_floors_and_centres() {
        let (t, ..) = setup();
        assert_eq!(target_tile(&t, Vec2::new(17.0, 31.9)), (1, 1, Vec2::new(24.0, 24.0)));
    }

    #[test]
    fn mining_pockets_the_block() {
        let (mut t, body, mut inv, mut xp) = setup();
        let kind = mine_for(&mut t, &body, &mut inv, &mut xp, Vec2::new(80.0, 130.0)).unwrap();
        assert_eq!(kind, BlockKind::Dirt);
        assert_eq!(t.get(5, 8), Some(BlockKind::Air));
        assert_eq!(inv.first_placeable(), Some((0, BlockKind::Dirt)));
        assert_eq!(xp.mining, MINING_XP);
    }

    #[test]
    fn far_tiles_are_untouched() {
        let (mut t, body, mut inv, mut xp) = setup();
        let err = mine_for(&mut t, &body, &mut inv, &mut xp, Vec2::new(240.0, 240.0)).unwrap_err();
        assert_eq!(err, ActionError::OutOfRange);
        assert_eq!(t.get(15, 15), Some(BlockKind::Dirt));
    }

    #[test]
    fn mining_air_reports_world_error() {
        let (mut t, body, mut inv, mut xp) = setup();
        let err = mine_for(&mut t, &body, &mut inv, &mut xp, Vec2::new(100.0, 100.0)).unwrap_err();
        assert!(matches!(err, ActionError::World(WorldError::InvalidMutation { .. })));
        assert!(inv.items.is_empty());
    }

    #[test]
    fn placing_consumes_inventory() {
        let (mut t, body, mut inv, mut xp) = setup();
        let at = Vec2::new(100.0, 120.0); // tile (6, 7), right of the player
        assert_eq!(
            place_for(&mut t, &body, &[], &mut inv, &mut xp, at),
            Err(ActionError::NothingToPlace)
        );

        inv.add(Item {
            kind: ItemKind::Block(BlockKind::Stone),
            weight: BLOCK_ITEM_WEIGHT,
        });
        assert_eq!(place_for(&mut t, &body, &[], &mut inv, &mut xp, at), Ok(BlockKind::Stone));
        assert_eq!(t.get(6, 7), Some(BlockKind::Stone));
        assert!(inv.items.is_empty());
        assert_eq!(xp.building, BUILDING_XP);
    }

    #[test]
    fn cannot_place_inside_a_body() {
        let (mut t, body, mut inv, mut xp) = setup();
        inv.add(Item {
            kind: ItemKind::Block(BlockKind::Wood),
            weight: BLOCK_ITEM_WEIGHT,
        });
        let own_tile = body.center();
        assert_eq!(
            place_for(&mut t, &body, &[], &mut inv, &mut xp, own_tile),
            Err(ActionError::Occupied)
        );
        let mob = Body::new(Vec2::new(36.0, 114.0), Vec2::new(MOB_WIDTH, MOB_HEIGHT));
        assert_eq!(
            place_for(&mut t, &body, &[mob], &mut inv, &mut xp, Vec2::new(40.0, 120.0)),
            Err(ActionError::Occupied)
        );
        assert_eq!(inv.items.len(), 1);
    }
}
