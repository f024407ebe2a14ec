//! bootstrap for the block sandbox
//!
//! `block_sandbox [seed]`; without a seed one is derived from the clock.

use std::time::{SystemTime, UNIX_EPOCH};

use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin,
};
use bevy::input::ButtonInput;
use bevy::prelude::*;
use bevy::transform::TransformSystem;
use bevy::window::{MonitorSelection, PrimaryWindow, WindowMode};

use block_sandbox::camera::{camera_follow_system, setup_camera};
use block_sandbox::constants::{SIM_HZ, SKY_COLOR};
use block_sandbox::crafting::{crafting_input_system, Crafter};
use block_sandbox::interaction::{
    interaction_system, mouse_input_system, BlockCommand, CursorWorld,
};
use block_sandbox::mobs::{mob_ai_system, mob_physics_system, spawn_mobs, EnemyAi};
use block_sandbox::player::{
    player_input_system, player_physics_system, spawn_player, PlayerIntent,
};
use block_sandbox::render::{
    hud_system, redraw_changed_tiles_system, spawn_hud, spawn_tile_sprites,
    sync_body_transforms_system, tile_cursor_system, water_wave_system,
};
use block_sandbox::terrain::Terrain;
use block_sandbox::world_gen::{generate_world_system, WorldConfig};

/* ------------------------------------------------------------------------ */
/* F11 borderless‑fullscreen toggle                                         */
/* ------------------------------------------------------------------------ */
fn toggle_fullscreen(
    keys: Res<ButtonInput<KeyCode>>,
    mut window_q: Query<&mut Window, With<PrimaryWindow>>,
) {
    if !keys.just_pressed(KeyCode::F11) {
        return;
    }
    let Ok(mut window) = window_q.get_single_mut() else { return };
    window.mode = match window.mode {
        WindowMode::Windowed => WindowMode::BorderlessFullscreen(MonitorSelection::Primary),
        _ => WindowMode::Windowed,
    };
}

fn world_seed() -> String {
    std::env::args().nth(1).unwrap_or_else(|| {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        format!("default_seed_{millis}")
    })
}

/* ------------------------------------------------------------------------ */
/* main                                                                     */
/* ------------------------------------------------------------------------ */
fn main() {
    let config = WorldConfig::with_seed(world_seed());

    App::new()
        /* diagnostics ----------------------------------------------------- */
        .add_plugins((
            LogDiagnosticsPlugin::default(),
            FrameTimeDiagnosticsPlugin::default(),
            EntityCountDiagnosticsPlugin::default(),
        ))

        /* bevy core ------------------------------------------------------- */
        .insert_resource(ClearColor(SKY_COLOR))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: format!("block sandbox ({})", config.seed),
                resolution: (1280., 720.).into(),
                mode: WindowMode::Windowed,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(Time::<Fixed>::from_hz(SIM_HZ))

        /* simulation state ------------------------------------------------ */
        .insert_resource(config)
        .init_resource::<PlayerIntent>()
        .init_resource::<EnemyAi>()
        .init_resource::<CursorWorld>()
        .init_resource::<Crafter>()
        .add_event::<BlockCommand>()

        /* startup systems ------------------------------------------------- */
        .add_systems(Startup, (setup_camera, spawn_hud, generate_world_system))
        .add_systems(
            Startup,
            (spawn_tile_sprites, spawn_player, spawn_mobs)
                .after(generate_world_system)
                .run_if(resource_exists::<Terrain>),
        )

        /* frame‑update systems ------------------------------------------- */
        .add_systems(
            Update,
            (
                player_input_system,         // WASD + jump
                mouse_input_system,          // LMB / RMB → BlockCommand
                interaction_system,          // mine, place, hit
                crafting_input_system,       // C → craft the default recipe
                redraw_changed_tiles_system, // drain the change log
                water_wave_system,
                tile_cursor_system,
                hud_system,
            )
                .chain()
                .run_if(resource_exists::<Terrain>),
        )
        .add_systems(Update, toggle_fullscreen)

        /* fixed‑rate simulation ------------------------------------------ */
        .add_systems(
            FixedUpdate,
            (player_physics_system, mob_ai_system, mob_physics_system)
                .chain()
                .run_if(resource_exists::<Terrain>),
        )

        /* post‑update (transforms / camera) ------------------------------- */
        .add_systems(
            PostUpdate,
            (sync_body_transforms_system, camera_follow_system)
                .chain()
                .before(TransformSystem::TransformPropagate)
                .run_if(resource_exists::<Terrain>),
        )
        .run();
}
