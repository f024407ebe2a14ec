//! the block grid: query, mining & placing
//!
//! Generation itself lives in `world_gen.rs`. Everything that changes a
//! cell after generation goes through [`Terrain::try_mine`] /
//! [`Terrain::try_place`].
use bevy::prelude::*;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/* -------- blocks -------- */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Air,
    Dirt,
    Stone,
    Grass,
    Sand,
    Water,
    Wood,
    Leaf,
}

impl BlockKind {
    pub const ALL: [BlockKind; 8] = [
        BlockKind::Air,
        BlockKind::Dirt,
        BlockKind::Stone,
        BlockKind::Grass,
        BlockKind::Sand,
        BlockKind::Water,
        BlockKind::Wood,
        BlockKind::Leaf,
    ];

    /// air & water never block movement
    #[inline]
    pub fn is_solid(self) -> bool {
        !matches!(self, BlockKind::Air | BlockKind::Water)
    }

    /// kinds the player may put back into the world
    #[inline]
    pub fn is_placeable(self) -> bool {
        self.is_solid()
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Air => "air",
            BlockKind::Dirt => "dirt",
            BlockKind::Stone => "stone",
            BlockKind::Grass => "grass",
            BlockKind::Sand => "sand",
            BlockKind::Water => "water",
            BlockKind::Wood => "wood",
            BlockKind::Leaf => "leaf",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlockKind {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| WorldError::UnknownBlock(s.to_owned()))
    }
}

/* -------- errors -------- */
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error("tile ({x}, {y}) is outside the world")]
    OutOfBounds { x: i32, y: i32 },
    #[error("tile ({x}, {y}) holds {found}, which cannot be changed that way")]
    InvalidMutation { x: i32, y: i32, found: BlockKind },
    #[error("invalid world dimensions {width}x{height} (tile size {tile_size})")]
    InvalidDimensions {
        width: usize,
        height: usize,
        tile_size: u32,
    },
    #[error("grid storage holds {actual} cells, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("unknown block kind `{0}`")]
    UnknownBlock(String),
}

/* -------- coordinate helpers (pixel space, y down) -------- */
#[inline]
pub fn pixel_to_tile(px: f32, tile_size: u32) -> i32 {
    (px / tile_size as f32).floor() as i32
}

#[inline]
pub fn tile_to_pixel(t: i32, tile_size: u32) -> f32 {
    (t * tile_size as i32) as f32
}

/* -------- resource -------- */
#[derive(Resource, Clone, Debug)]
pub struct Terrain {
    pub width: usize,
    pub height: usize,
    pub tile_size: u32,
    /// generation‑time surface row per column
    pub height_map: Vec<usize>,
    blocks: Vec<BlockKind>,
    changed_tiles: VecDeque<(usize, usize)>,
}

impl Terrain {
    /// Wrap existing storage. Fails fast when `blocks` does not cover the
    /// declared grid exactly.
    pub fn from_blocks(
        width: usize,
        height: usize,
        tile_size: u32,
        blocks: Vec<BlockKind>,
        height_map: Vec<usize>,
    ) -> Result<Self, WorldError> {
        if width == 0 || height == 0 || tile_size == 0 {
            return Err(WorldError::InvalidDimensions {
                width,
                height,
                tile_size,
            });
        }
        let expected = width * height;
        if blocks.len() != expected {
            return Err(WorldError::DimensionMismatch {
                expected,
                actual: blocks.len(),
            });
        }
        if height_map.len() != width {
            return Err(WorldError::DimensionMismatch {
                expected: width,
                actual: height_map.len(),
            });
        }
        Ok(Self {
            width,
            height,
            tile_size,
            height_map,
            blocks,
            changed_tiles: VecDeque::new(),
        })
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn checked_idx(&self, x: i32, y: i32) -> Result<usize, WorldError> {
        if self.in_bounds(x, y) {
            Ok(self.idx(x as usize, y as usize))
        } else {
            Err(WorldError::OutOfBounds { x, y })
        }
    }

    pub fn blocks(&self) -> &[BlockKind] {
        &self.blocks
    }

    pub fn pixel_width(&self) -> f32 {
        (self.width as u32 * self.tile_size) as f32
    }

    pub fn pixel_height(&self) -> f32 {
        (self.height as u32 * self.tile_size) as f32
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<BlockKind> {
        self.checked_idx(x, y).ok().map(|i| self.blocks[i])
    }

    /// out‑of‑bounds is open space
    #[inline]
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(BlockKind::is_solid)
    }

    /// solidity of the tile containing a pixel
    #[inline]
    pub fn is_solid_at_pixel(&self, px: f32, py: f32) -> bool {
        self.is_solid(
            pixel_to_tile(px, self.tile_size),
            pixel_to_tile(py, self.tile_size),
        )
    }

    /// Dig out a solid cell, returning what was there.
    pub fn try_mine(&mut self, x: i32, y: i32) -> Result<BlockKind, WorldError> {
        let i = self.checked_idx(x, y)?;
        let found = self.blocks[i];
        if !found.is_solid() {
            return Err(WorldError::InvalidMutation { x, y, found });
        }
        self.blocks[i] = BlockKind::Air;
        self.changed_tiles.push_back((x as usize, y as usize));
        Ok(found)
    }

    /// Fill an air cell. Which kinds are placeable is the caller's call.
    pub fn try_place(&mut self, x: i32, y: i32, kind: BlockKind) -> Result<(), WorldError> {
        let i = self.checked_idx(x, y)?;
        let found = self.blocks[i];
        if found != BlockKind::Air {
            return Err(WorldError::InvalidMutation { x, y, found });
        }
        self.blocks[i] = kind;
        self.changed_tiles.push_back((x as usize, y as usize));
        Ok(())
    }

    pub fn mine(&mut self, x: i32, y: i32) -> bool {
        self.try_mine(x, y).is_ok()
    }

    pub fn place(&mut self, x: i32, y: i32, kind: BlockKind) -> bool {
        self.try_place(x, y, kind).is_ok()
    }

    /// first solid row in a column of the live grid
    pub fn surface_at(&self, x: usize) -> Option<usize> {
        if x >= self.width {
            return None;
        }
        (0..self.height).find(|&y| self.blocks[self.idx(x, y)].is_solid())
    }

    /// cells touched by mine/place since the last drain
    pub fn drain_changes(&mut self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.changed_tiles.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(width: usize, height: usize, ground: usize) -> Terrain {
        let mut blocks = vec![BlockKind::Air; width * height];
        for y in ground..height {
            for x in 0..width {
                blocks[y * width + x] = if y == ground {
                    BlockKind::Grass
                } else {
                    BlockKind::Stone
                };
            }
        }
        Terrain::from_blocks(width, height, 16, blocks, vec![ground; width]).unwrap()
    }

    #[test]
    fn storage_must_match_dimensions() {
        let err = Terrain::from_blocks(4, 4, 16, vec![BlockKind::Air; 15], vec![0; 4]).unwrap_err();
        assert_eq!(
            err,
            WorldError::DimensionMismatch {
                expected: 16,
                actual: 15
            }
        );
        assert!(matches!(
            Terrain::from_blocks(0, 4, 16, vec![], vec![]),
            Err(WorldError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn water_and_air_are_not_solid() {
        for kind in BlockKind::ALL {
            let expected = !matches!(kind, BlockKind::Air | BlockKind::Water);
            assert_eq!(kind.is_solid(), expected, "{kind}");
        }
    }

    #[test]
    fn names_round_trip() {
        for kind in BlockKind::ALL {
            assert_eq!(kind.name().parse::<BlockKind>().unwrap(), kind);
        }
        assert!("lava".parse::<BlockKind>().is_err());
    }

    #[test]
    fn out_of_bounds_is_open_space() {
        let t = flat(8, 8, 4);
        assert!(!t.is_solid(-1, 5));
        assert!(!t.is_solid(8, 5));
        assert!(!t.is_solid(3, 8));
        assert!(t.is_solid(3, 4));
        assert_eq!(t.get(0, -1), None);
    }

    #[test]
    fn mine_then_place_restores_cell() {
        let mut t = flat(8, 8, 4);
        assert_eq!(t.try_mine(2, 5), Ok(BlockKind::Stone));
        assert_eq!(t.get(2, 5), Some(BlockKind::Air));
        assert!(!t.mine(2, 5));
        assert!(t.place(2, 5, BlockKind::Stone));
        assert_eq!(t.get(2, 5), Some(BlockKind::Stone));
        assert!(!t.place(2, 5, BlockKind::Wood));
        assert_eq!(t.get(2, 5), Some(BlockKind::Stone));
    }

    #[test]
    fn mutations_report_reason() {
        let mut t = flat(8, 8, 4);
        assert_eq!(t.try_mine(9, 0), Err(WorldError::OutOfBounds { x: 9, y: 0 }));
        assert_eq!(
            t.try_mine(0, 0),
            Err(WorldError::InvalidMutation {
                x: 0,
                y: 0,
                found: BlockKind::Air
            })
        );
        assert_eq!(
            t.try_place(0, 4, BlockKind::Dirt),
            Err(WorldError::InvalidMutation {
                x: 0,
                y: 4,
                found: BlockKind::Grass
            })
        );
    }

    #[test]
    fn water_cannot_be_mined_or_built_over() {
        let mut t = flat(8, 8, 4);
        let i = t.idx(3, 3);
        t.blocks[i] = BlockKind::Water;
        let before = t.blocks().to_vec();

        assert!(!t.is_solid(3, 3));
        assert!(!t.mine(3, 3));
        assert_eq!(
            t.try_mine(3, 3),
            Err(WorldError::InvalidMutation {
                x: 3,
                y: 3,
                found: BlockKind::Water
            })
        );
        assert!(!t.place(3, 3, BlockKind::Stone));

        assert_eq!(t.blocks(), &before[..]);
        assert_eq!(t.get(3, 3), Some(BlockKind::Water));
        assert_eq!(t.drain_changes().count(), 0);
    }

    #[test]
    fn change_log_tracks_successful_edits_only() {
        let mut t = flat(8, 8, 4);
        t.mine(1, 4);
        t.mine(1, 0);
        t.place(1, 3, BlockKind::Dirt);
        let changes: Vec<_> = t.drain_changes().collect();
        assert_eq!(changes, vec![(1, 4), (1, 3)]);
        assert_eq!(t.drain_changes().count(), 0);
    }

    #[test]
    fn pixel_conversion_floors() {
        assert_eq!(pixel_to_tile(0.0, 16), 0);
        assert_eq!(pixel_to_tile(15.99, 16), 0);
        assert_eq!(pixel_to_tile(16.0, 16), 1);
        assert_eq!(pixel_to_tile(-0.5, 16), -1);
        assert_eq!(tile_to_pixel(3, 16), 48.0);
    }

    #[test]
    fn surface_follows_live_grid() {
        let mut t = flat(8, 8, 4);
        assert_eq!(t.surface_at(3), Some(4));
        t.mine(3, 4);
        assert_eq!(t.surface_at(3), Some(5));
        assert_eq!(t.surface_at(8), None);
    }
}
