//! world generation: height field, layering, beaches, water & trees
use bevy::prelude::*;

use crate::constants::*;
use crate::rng::SeededRng;
use crate::terrain::{BlockKind, Terrain, WorldError};

/* -------- config -------- */
#[derive(Resource, Clone, Debug)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,
    pub tile_size: u32,
    pub seed: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            tile_size: TILE_SIZE,
            seed: "default_seed".to_owned(),
        }
    }
}

impl WorldConfig {
    pub fn with_seed(seed: impl std::fmt::Display) -> Self {
        Self {
            seed: seed.to_string(),
            ..default()
        }
    }

    pub fn validate(&self) -> Result<(), WorldError> {
        if self.width == 0 || self.height < MIN_WORLD_HEIGHT || self.tile_size == 0 {
            return Err(WorldError::InvalidDimensions {
                width: self.width,
                height: self.height,
                tile_size: self.tile_size,
            });
        }
        Ok(())
    }

    /// row the rolling surface oscillates around
    pub fn base_surface(&self) -> usize {
        self.height / 2
    }

    /// air at or below this row floods
    pub fn water_level(&self) -> usize {
        self.base_surface() + WATER_LEVEL_OFFSET
    }
}

/// Surface row of column `x`: two sinusoids around the base row, so
/// neighbouring columns never jump by more than the curve's slope.
pub fn surface_row(config: &WorldConfig, x: usize) -> usize {
    let (fa, aa) = SURFACE_WAVE_A;
    let (fb, ab) = SURFACE_WAVE_B;
    let x = x as f64;
    let y = config.base_surface() as f64 + (x * fa).sin() * aa + (x * fb).cos() * ab;
    (y.floor().max(0.0) as usize).min(config.height.saturating_sub(1))
}

/// Build a whole world from `config.seed`. Only tree placement consumes the
/// seeded stream; the terrain shape is the same for every seed.
pub fn generate(config: &WorldConfig) -> Result<Terrain, WorldError> {
    config.validate()?;
    let (w, h) = (config.width, config.height);
    let base = config.base_surface();

    /* -------- height field -------- */
    let height_map: Vec<usize> = (0..w).map(|x| surface_row(config, x)).collect();

    /* -------- layering + beaches -------- */
    let mut blocks = vec![BlockKind::Air; w * h];
    for (x, &ground) in height_map.iter().enumerate() {
        for y in ground..h {
            blocks[y * w + x] = if y == ground {
                BlockKind::Grass
            } else if y <= ground + DIRT_DEPTH {
                BlockKind::Dirt
            } else {
                BlockKind::Stone
            };
        }

        if ground > base + BEACH_THRESHOLD {
            for y in (ground + 1)..(ground + 1 + SAND_DEPTH).min(h) {
                blocks[y * w + x] = BlockKind::Sand;
            }
        }
    }

    /* -------- water in leftover pockets -------- */
    let flooded = flood_below(&mut blocks, w, h, config.water_level());

    /* -------- trees -------- */
    let mut rng = SeededRng::new(&config.seed);
    let trees = plant_trees(&mut blocks, w, h, &mut rng);

    let terrain = Terrain::from_blocks(w, h, config.tile_size, blocks, height_map)?;
    info!(
        "world generated: {}x{} tiles, {} trees, {} water cells, seed `{}`",
        w, h, trees, flooded, config.seed
    );
    Ok(terrain)
}

/// Turn every air cell at or below row `level` into water; returns the
/// number of cells flooded.
pub fn flood_below(blocks: &mut [BlockKind], w: usize, h: usize, level: usize) -> usize {
    let mut flooded = 0;
    for y in level.min(h)..h {
        for cell in &mut blocks[y * w..(y + 1) * w] {
            if *cell == BlockKind::Air {
                *cell = BlockKind::Water;
                flooded += 1;
            }
        }
    }
    flooded
}

/// trunks & canopies on the surface, returns how many were planted
fn plant_trees(blocks: &mut [BlockKind], w: usize, h: usize, rng: &mut SeededRng) -> usize {
    let mut planted = 0;
    let mut x = TREE_MARGIN;

    while x < w.saturating_sub(TREE_MARGIN) {
        // the air cell resting on the first non‑air row
        let first_filled = (0..h).find(|&y| blocks[y * w + x] != BlockKind::Air);
        if let Some(base) = first_filled.and_then(|y| y.checked_sub(1)) {
            if base > TREE_MIN_CLEARANCE && base < h - TREE_MIN_CLEARANCE {
                let trunk = TRUNK_MIN_HEIGHT + rng.below(TRUNK_HEIGHT_JITTER);
                for i in 0..trunk {
                    blocks[(base - i) * w + x] = BlockKind::Wood;
                }

                let canopy_start = base as i32 - trunk as i32;
                for dx in -CANOPY_RADIUS_X..=CANOPY_RADIUS_X {
                    for dy in 0..=CANOPY_HEIGHT as i32 {
                        let (px, py) = (x as i32 + dx, canopy_start - dy);
                        if px < 0 || py < 0 || px >= w as i32 || py >= h as i32 {
                            continue;
                        }
                        let cell = &mut blocks[py as usize * w + px as usize];
                        if *cell == BlockKind::Air {
                            *cell = BlockKind::Leaf;
                        }
                    }
                }
                planted += 1;
            }
        }

        x += TREE_STRIDE + rng.below(TREE_STRIDE_JITTER);
    }
    planted
}

/* ---------- startup ---------- */

/// build the Terrain resource from WorldConfig; a bad config ends the app
pub fn generate_world_system(
    mut commands: Commands,
    config: Res<WorldConfig>,
    mut exit: EventWriter<AppExit>,
) {
    match generate(&config) {
        Ok(terrain) => commands.insert_resource(terrain),
        Err(err) => {
            error!("world generation failed: {err}");
            exit.send(AppExit::error());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(seed: &str) -> Terrain {
        generate(&WorldConfig::with_seed(seed)).unwrap()
    }

    #[test]
    fn grid_is_complete() {
        let t = world("complete");
        assert_eq!(t.blocks().len(), t.width * t.height);
        assert_eq!(t.height_map.len(), t.width);
    }

    #[test]
    fn height_field_is_continuous() {
        let config = WorldConfig::default();
        for x in 0..config.width - 1 {
            let a = surface_row(&config, x) as i32;
            let b = surface_row(&config, x + 1) as i32;
            // slope of 8 sin(0.05x) + 5 cos(0.03x) is below 0.55 rows / column
            assert!((a - b).abs() <= 1, "jump between columns {x} and {}", x + 1);
        }
    }

    #[test]
    fn columns_are_layered() {
        let t = world("layers");
        let config = WorldConfig::default();
        let base = config.base_surface();
        for x in 0..t.width as i32 {
            let g = t.height_map[x as usize];
            assert_eq!(t.get(x, g as i32), Some(BlockKind::Grass), "column {x}");
            let beach = g > base + BEACH_THRESHOLD;
            for y in g + 1..t.height {
                let expected = if beach && y <= g + SAND_DEPTH {
                    BlockKind::Sand
                } else if y <= g + DIRT_DEPTH {
                    BlockKind::Dirt
                } else {
                    BlockKind::Stone
                };
                assert_eq!(t.get(x, y as i32), Some(expected), "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn above_ground_holds_only_sky_things() {
        let t = world("sky");
        for x in 0..t.width {
            for y in 0..t.height_map[x] {
                let kind = t.get(x as i32, y as i32).unwrap();
                assert!(
                    matches!(
                        kind,
                        BlockKind::Air | BlockKind::Water | BlockKind::Wood | BlockKind::Leaf
                    ),
                    "({x}, {y}) is {kind}"
                );
            }
        }
    }

    #[test]
    fn trees_stand_on_the_surface() {
        let t = world("forest");
        let trunks: Vec<usize> = (0..t.width)
            .filter(|&x| t.get(x as i32, t.height_map[x] as i32 - 1) == Some(BlockKind::Wood))
            .collect();
        assert!(!trunks.is_empty());
        for x in trunks {
            assert!(x >= TREE_MARGIN && x < t.width - TREE_MARGIN);
            let g = t.height_map[x];
            let height = (1..=g)
                .take_while(|&i| t.get(x as i32, (g - i) as i32) == Some(BlockKind::Wood))
                .count();
            assert!((TRUNK_MIN_HEIGHT..TRUNK_MIN_HEIGHT + TRUNK_HEIGHT_JITTER).contains(&height));
            // canopy sits right above the trunk top
            let top = (g - height) as i32;
            assert_eq!(t.get(x as i32, top - 1), Some(BlockKind::Leaf));
        }
    }

    #[test]
    fn pockets_below_the_level_flood() {
        // 4×6: ground at row 2 with an air pocket at (1, 4) and (2, 4)
        let (w, h) = (4usize, 6usize);
        let mut blocks = vec![BlockKind::Air; w * h];
        for y in 2..h {
            for x in 0..w {
                blocks[y * w + x] = BlockKind::Stone;
            }
        }
        blocks[4 * w + 1] = BlockKind::Air;
        blocks[4 * w + 2] = BlockKind::Air;

        assert_eq!(flood_below(&mut blocks, w, h, 4), 2);
        assert_eq!(blocks[4 * w + 1], BlockKind::Water);
        assert_eq!(blocks[4 * w + 2], BlockKind::Water);
        // sky above the level stays dry, solid cells are untouched
        assert!(blocks[..2 * w].iter().all(|&k| k == BlockKind::Air));
        assert_eq!(blocks[4 * w], BlockKind::Stone);
    }

    #[test]
    fn flooding_never_touches_rows_above_the_level() {
        let (w, h) = (3usize, 4usize);
        let mut blocks = vec![BlockKind::Air; w * h];
        assert_eq!(flood_below(&mut blocks, w, h, 3), 3);
        assert_eq!(blocks.iter().filter(|&&k| k == BlockKind::Water).count(), 3);
        assert!(blocks[..3 * w].iter().all(|&k| k == BlockKind::Air));
        // a level below the grid floods nothing
        assert_eq!(flood_below(&mut blocks, w, h, 10), 0);
    }

    #[test]
    fn generated_world_has_no_air_at_or_below_water_level() {
        let config = WorldConfig::with_seed("low");
        let t = generate(&config).unwrap();
        for y in config.water_level()..t.height {
            for x in 0..t.width {
                assert_ne!(t.get(x as i32, y as i32), Some(BlockKind::Air));
            }
        }
    }

    #[test]
    fn same_seed_same_world() {
        assert_eq!(world("again").blocks(), world("again").blocks());
    }

    #[test]
    fn seed_only_moves_trees() {
        let a = world("alpha");
        let b = world("beta");
        assert_eq!(a.height_map, b.height_map);
        for (ka, kb) in a.blocks().iter().zip(b.blocks()) {
            if ka != kb {
                assert!(matches!(ka, BlockKind::Air | BlockKind::Wood | BlockKind::Leaf));
                assert!(matches!(kb, BlockKind::Air | BlockKind::Wood | BlockKind::Leaf));
            }
        }
    }

    #[test]
    fn degenerate_configs_are_rejected() {
        let tiny = WorldConfig {
            height: MIN_WORLD_HEIGHT - 1,
            ..default()
        };
        assert!(matches!(
            generate(&tiny),
            Err(WorldError::InvalidDimensions { .. })
        ));
        let no_tiles = WorldConfig {
            tile_size: 0,
            ..default()
        };
        assert!(generate(&no_tiles).is_err());
    }
}
