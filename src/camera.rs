use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::components::Player;
use crate::terrain::Terrain;

const FOLLOW_LERP: f32 = 0.1;

/// keep the camera on whole pixels so tile sprites never shimmer
#[inline]
fn snap(v: f32) -> f32 {
    v.round()
}

/// clamp one axis of the view centre to `[lo, hi]`; a view wider than the
/// world is centred on it
#[inline]
fn clamp_axis(v: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        (lo + hi) * 0.5
    } else {
        v.clamp(lo, hi)
    }
}

/// Next camera centre in render space (the world spans x ∈ [0, w], y ∈ [-h, 0]).
pub fn follow_target(current: Vec2, player: Vec2, half_view: Vec2, world: Vec2) -> Vec2 {
    let eased = current.lerp(player, FOLLOW_LERP);
    Vec2::new(
        clamp_axis(eased.x, half_view.x, world.x - half_view.x),
        clamp_axis(eased.y, -world.y + half_view.y, -half_view.y),
    )
}

/// smooth follow with world clamping
///
/// Runs in **PostUpdate**, after body positions were synced to transforms.
pub fn camera_follow_system(
    mut cam_q: Query<&mut Transform, (With<Camera>, Without<Player>)>,
    player_q: Query<&Transform, With<Player>>,
    window_q: Query<&Window, With<PrimaryWindow>>,
    terrain: Res<Terrain>,
) {
    let Ok(mut cam_tf) = cam_q.get_single_mut() else { return };
    let Ok(player_tf) = player_q.get_single() else { return };
    let Ok(window) = window_q.get_single() else { return };

    let next = follow_target(
        cam_tf.translation.truncate(),
        player_tf.translation.truncate(),
        Vec2::new(window.width(), window.height()) * 0.5,
        Vec2::new(terrain.pixel_width(), terrain.pixel_height()),
    );

    cam_tf.translation.x = snap(next.x);
    cam_tf.translation.y = snap(next.y);
}

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
