use bevy::prelude::*;

/// -------- tiles & world size --------
pub const TILE_SIZE: u32 = 16;
pub const WORLD_WIDTH: usize = 256;
pub const WORLD_HEIGHT: usize = 128;
pub const MIN_WORLD_HEIGHT: usize = 32;

/// -------- height field --------
pub const SURFACE_WAVE_A: (f64, f64) = (0.05, 8.0); // (frequency, amplitude), sin
pub const SURFACE_WAVE_B: (f64, f64) = (0.03, 5.0); // (frequency, amplitude), cos
pub const DIRT_DEPTH: usize = 4;
pub const BEACH_THRESHOLD: usize = 3;
pub const SAND_DEPTH: usize = 3;
pub const WATER_LEVEL_OFFSET: usize = 12;

/// -------- trees --------
pub const TREE_MARGIN: usize = 20;
pub const TREE_STRIDE: usize = 30;
pub const TREE_STRIDE_JITTER: usize = 20;
pub const TREE_MIN_CLEARANCE: usize = 10;
pub const TRUNK_MIN_HEIGHT: usize = 4;
pub const TRUNK_HEIGHT_JITTER: usize = 3;
pub const CANOPY_RADIUS_X: i32 = 2;
pub const CANOPY_HEIGHT: usize = 3;

/// -------- collision sampling (pixels) --------
pub const SAMPLE_INSET: f32 = 2.0;
pub const SAMPLE_STEP_ROWS: f32 = 8.0;
pub const SAMPLE_STEP_COLS: f32 = 6.0;

/// -------- player phys (pixels / tick, y down) --------
pub const SIM_HZ: f64 = 60.0;
pub const PLAYER_WIDTH: f32 = 12.0;
pub const PLAYER_HEIGHT: f32 = 20.0;
pub const PLAYER_SPAWN_COLUMN: usize = 100;
pub const GRAVITY: f32 = 0.3;
pub const MAX_FALL_SPEED: f32 = 10.0;
pub const JUMP_SPEED: f32 = 8.0;
pub const WALK_SPEED: f32 = 3.0;
pub const PLAYER_MAX_HEALTH: f32 = 100.0;
pub const HUNGER_DECAY: f32 = 0.001;

/// -------- interaction --------
pub const INTERACTION_RANGE: f32 = 80.0;
pub const MAX_CARRY: f32 = 100.0;
pub const BLOCK_ITEM_WEIGHT: f32 = 0.1;
pub const BARE_HAND_DAMAGE: f32 = 10.0;
pub const MINING_XP: u32 = 5;
pub const BUILDING_XP: u32 = 2;
pub const COMBAT_XP: u32 = 10;

/// -------- crafting --------
pub const CRAFT_PROMPT: &str = "Stone Pickaxe";
pub const CRAFT_MIN_DURABILITY: f32 = 100.0;
pub const CRAFT_DURABILITY_SCALE: f32 = 80.0;
pub const CRAFT_DAMAGE_SCALE: f32 = 1.5;
pub const CRAFT_DEFENSE_SCALE: f32 = 1.2;
pub const CRAFT_WEIGHT_PER_MATERIAL: f32 = 0.5;
pub const XP_PER_LEVEL: u32 = 100;

/// -------- mobs --------
pub const PASSIVE_MOB_COUNT: usize = 10;
pub const ENEMY_MOB_COUNT: usize = 5;
pub const MOB_WIDTH: f32 = 14.0;
pub const MOB_HEIGHT: f32 = 14.0;
pub const PASSIVE_SPEED: f32 = 1.5;
pub const PASSIVE_HEALTH: f32 = 30.0;
pub const HERD_RADIUS: f32 = 160.0;
pub const HERD_SLACK: f32 = 10.0;
pub const ENEMY_SPEED: f32 = 2.0;
pub const ENEMY_HEALTH: f32 = 50.0;
pub const ENEMY_DAMAGE: f32 = 10.0;
pub const ENEMY_DETECTION_RANGE: f32 = 50.0;
pub const ENEMY_SIGHT_RANGE: f32 = 120.0;
pub const ENEMY_REACH: f32 = 16.0;
pub const ENEMY_ATTACK_COOLDOWN: u32 = 30;
pub const BASE_AGGRESSION: f32 = 0.5;

/// -------- colour‑variation --------
pub const COLOR_NOISE_SCALE: f64 = 0.05;
pub const COLOR_VARIATION_LEVELS: i32 = 4;
pub const COLOR_VARIATION_STRENGTH: f32 = 0.2;
pub const SKY_COLOR: Color = Color::srgb(0.31, 0.67, 1.0);
