use bevy::prelude::*;

use crate::constants::{MAX_CARRY, XP_PER_LEVEL};
use crate::crafting::{CraftedItem, ItemCategory};
use crate::terrain::BlockKind;

/* ===========================================================
   shared components
   =========================================================== */
#[derive(Component, Clone, Copy, Debug)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    /// true once the hit drops health to zero
    pub fn take(&mut self, amount: f32) -> bool {
        self.current = (self.current - amount).max(0.0);
        self.current <= 0.0
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

/* ===========================================================
   player
   =========================================================== */
#[derive(Component)]
pub struct Player {
    pub spawn: Vec2,
    pub hunger: f32,
}

/* ===========================================================
   inventory
   =========================================================== */
#[derive(Clone, Debug, PartialEq)]
pub enum ItemKind {
    Block(BlockKind),
    Tool { name: String, damage: f32 },
    Drop(&'static str),
    Crafted(CraftedItem),
}

impl ItemKind {
    pub fn name(&self) -> &str {
        match self {
            ItemKind::Block(kind) => kind.name(),
            ItemKind::Tool { name, .. } => name,
            ItemKind::Drop(name) => name,
            ItemKind::Crafted(item) => &item.name,
        }
    }

    /// raw resources a recipe can consume
    pub fn is_material(&self) -> bool {
        matches!(self, ItemKind::Block(_) | ItemKind::Drop(_))
    }

    fn is_equippable(&self) -> bool {
        match self {
            ItemKind::Tool { .. } => true,
            ItemKind::Crafted(item) => {
                matches!(item.category, ItemCategory::Weapon | ItemCategory::Tool)
            }
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub kind: ItemKind,
    pub weight: f32,
}

#[derive(Component, Debug)]
pub struct Inventory {
    pub items: Vec<Item>,
    pub carrying: f32,
    pub max_carry: f32,
    pub equipped: Option<usize>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            carrying: 0.0,
            max_carry: MAX_CARRY,
            equipped: None,
        }
    }
}

impl Inventory {
    /// refuses items that would exceed the carry limit
    pub fn add(&mut self, item: Item) -> bool {
        if self.carrying + item.weight > self.max_carry {
            return false;
        }
        self.carrying += item.weight;
        self.items.push(item);
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<Item> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        self.carrying = (self.carrying - item.weight).max(0.0);
        self.equipped = match self.equipped {
            Some(e) if e == index => None,
            Some(e) if e > index => Some(e - 1),
            other => other,
        };
        Some(item)
    }

    /// only tools and crafted weapons/tools can be equipped
    pub fn equip(&mut self, index: usize) -> bool {
        match self.items.get(index) {
            Some(item) if item.kind.is_equippable() => {
                self.equipped = Some(index);
                true
            }
            _ => false,
        }
    }

    pub fn equipped_item(&self) -> Option<&Item> {
        self.items.get(self.equipped?)
    }

    pub fn equipped_damage(&self) -> Option<f32> {
        match &self.equipped_item()?.kind {
            ItemKind::Tool { damage, .. } => Some(*damage),
            ItemKind::Crafted(item) => Some(item.damage),
            _ => None,
        }
    }

    /// index of the first block the player could put down
    pub fn first_placeable(&self) -> Option<(usize, BlockKind)> {
        self.items.iter().enumerate().find_map(|(i, item)| match item.kind {
            ItemKind::Block(kind) if kind.is_placeable() => Some((i, kind)),
            _ => None,
        })
    }

    pub fn carry_ratio(&self) -> f32 {
        (self.carrying / self.max_carry).min(1.0)
    }
}

#[derive(Component, Default, Debug)]
pub struct Experience {
    pub mining: u32,
    pub building: u32,
    pub combat: u32,
}

impl Experience {
    pub fn level(&self) -> u32 {
        1 + (self.mining + self.building + self.combat) / XP_PER_LEVEL
    }
}

/* ===========================================================
   terrain helper components
   =========================================================== */
#[derive(Component)]
pub struct TileSprite {
    pub x: usize,
    pub y: usize,
}

#[derive(Component)]
pub struct WaterTile {
    pub base_y: f32,
}

#[derive(Component)]
pub struct TileCursor;

/* ===========================================================
   ui
   =========================================================== */
#[derive(Component)]
pub struct HudText;
