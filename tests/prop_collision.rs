use bevy::math::Vec2;
use block_sandbox::collision::{clamp_to_world, resolve, Body};
use block_sandbox::constants::{GRAVITY, MAX_FALL_SPEED};
use block_sandbox::terrain::{BlockKind, Terrain};
use proptest::prelude::*;

const FLOOR_ROW: usize = 20;

/// 32×32 world: floor from row 20, walls in columns 0 and 31
fn pit() -> Terrain {
    let (w, h) = (32usize, 32usize);
    let mut blocks = vec![BlockKind::Air; w * h];
    for y in 0..h {
        for x in 0..w {
            if y >= FLOOR_ROW || x == 0 || x == w - 1 {
                blocks[y * w + x] = BlockKind::Stone;
            }
        }
    }
    Terrain::from_blocks(w, h, 16, blocks, vec![FLOOR_ROW; w]).unwrap()
}

fn size() -> impl Strategy<Value = Vec2> {
    (4.0f32..=16.0, 4.0f32..=30.0).prop_map(|(w, h)| Vec2::new(w, h))
}

proptest! {
    // whatever the walk, a falling body ends up resting on the floor inside the pit
    #[test]
    fn bodies_settle_inside_the_pit(
        x in 16.0f32..480.0,
        y in 0.0f32..280.0,
        size in size(),
        walk in -6.0f32..6.0,
    ) {
        let t = pit();
        let floor = (FLOOR_ROW * 16) as f32;
        prop_assume!(x + size.x <= 496.0 && y + size.y <= floor);

        let mut b = Body::new(Vec2::new(x, y), size);
        for _ in 0..300 {
            b.vel.x = walk;
            b.vel.y = (b.vel.y + GRAVITY).min(MAX_FALL_SPEED);
            resolve(&t, &mut b);
            clamp_to_world(&t, &mut b);

            prop_assert!(b.bottom() <= floor + 1e-3);
            prop_assert!(b.pos.x >= 16.0 - 1e-3);
            prop_assert!(b.pos.x + b.size.x <= 496.0 + 1e-3);
        }
        prop_assert!(b.grounded);
        prop_assert!((b.bottom() - floor).abs() < 1e-3);
    }

    // with nothing to hit, a pass moves the body by exactly its velocity
    #[test]
    fn open_air_is_free_movement(vx in -10.0f32..10.0, vy in -10.0f32..10.0) {
        let t = pit();
        let start = Vec2::new(200.0, 150.0);
        let mut b = Body::new(start, Vec2::new(12.0, 20.0));
        b.vel = Vec2::new(vx, vy);
        resolve(&t, &mut b);
        prop_assert_eq!(b.pos, start + Vec2::new(vx, vy));
        prop_assert!(!b.grounded);
    }
}
