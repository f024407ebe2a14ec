//! prompt‑driven crafting: validate, derive stats, consume materials
//!
//! A recipe is a free‑text item name plus every raw resource the player
//! carries. The item type comes from keywords in the name, the numbers from
//! the materials. Results are memoised per (name, materials) pair.
use std::collections::HashMap;

use bevy::input::ButtonInput;
use bevy::prelude::*;

use crate::components::{Inventory, Item, ItemKind, Player};
use crate::constants::*;
use crate::interaction::ActionError;
use crate::terrain::BlockKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemCategory {
    Weapon,
    Tool,
    Armor,
    Food,
    Consumable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CraftedItem {
    pub name: String,
    pub description: String,
    pub category: ItemCategory,
    pub damage: f32,
    pub defense: f32,
    pub durability: u32,
    pub rarity: Rarity,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CraftStats {
    pub category: ItemCategory,
    pub damage: f32,
    pub defense: f32,
    pub durability: u32,
    pub rarity: Rarity,
    pub weight: f32,
}

/* ===========================================================
   pure rules
   =========================================================== */
pub fn validate(prompt: &str, materials: &[&Item]) -> Result<(), ActionError> {
    if prompt.trim().chars().count() < 2 {
        return Err(ActionError::InvalidItemName);
    }
    if materials.is_empty() {
        return Err(ActionError::NoMaterials);
    }
    Ok(())
}

/// (damage, defense, durability) one unit of a resource contributes
fn material_stats(kind: &ItemKind) -> (f32, f32, f32) {
    match kind {
        ItemKind::Block(BlockKind::Stone) => (1.0, 0.5, 1.5),
        ItemKind::Block(BlockKind::Wood) => (0.5, 0.0, 1.0),
        ItemKind::Block(BlockKind::Dirt | BlockKind::Sand | BlockKind::Grass | BlockKind::Leaf) => {
            (0.0, 0.0, 0.25)
        }
        ItemKind::Drop("scrap") => (2.0, 1.0, 2.0),
        _ => (0.0, 0.0, 0.0),
    }
}

/// item type and base damage from keywords, first match wins
fn classify(prompt: &str) -> (ItemCategory, f32) {
    let p = prompt.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| p.contains(w));
    if has(&["sword", "blade"]) {
        (ItemCategory::Weapon, 15.0)
    } else if has(&["axe", "hatchet"]) {
        (ItemCategory::Tool, 12.0)
    } else if has(&["pick", "pickaxe"]) {
        (ItemCategory::Tool, 10.0)
    } else if has(&["hammer", "mallet"]) {
        (ItemCategory::Tool, 14.0)
    } else if has(&["shield", "armor"]) {
        (ItemCategory::Armor, 0.0)
    } else if has(&["food", "meal"]) {
        (ItemCategory::Food, 0.0)
    } else if has(&["potion"]) {
        (ItemCategory::Consumable, 0.0)
    } else {
        (ItemCategory::Tool, 5.0)
    }
}

pub fn calculate_stats(materials: &[&Item], prompt: &str) -> CraftStats {
    let (damage, mut defense, durability) = materials
        .iter()
        .map(|m| material_stats(&m.kind))
        .fold((0.0, 0.0, 0.0), |(a, b, c), (d, e, f)| (a + d, b + e, c + f));

    let (category, base_damage) = classify(prompt);
    if category == ItemCategory::Armor {
        defense = 10.0;
    }

    let rarity = match materials.len() {
        0 | 1 => Rarity::Common,
        2 => Rarity::Uncommon,
        _ => Rarity::Rare,
    };

    CraftStats {
        category,
        damage: base_damage.max((damage * CRAFT_DAMAGE_SCALE).round()),
        defense: defense.max((defense * CRAFT_DEFENSE_SCALE).round()),
        durability: CRAFT_MIN_DURABILITY.max((durability * CRAFT_DURABILITY_SCALE).round()) as u32,
        rarity,
        weight: (materials.len() as f32 * CRAFT_WEIGHT_PER_MATERIAL).max(1.0),
    }
}

/* ===========================================================
   generator with result cache
   =========================================================== */
#[derive(Resource, Default)]
pub struct Crafter {
    cache: HashMap<String, (CraftedItem, f32)>,
}

impl Crafter {
    fn cache_key(prompt: &str, materials: &[&Item]) -> String {
        let mut names: Vec<&str> = materials.iter().map(|m| m.kind.name()).collect();
        names.sort_unstable();
        format!("{prompt}:{}", names.join("|"))
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// the item and its weight
    pub fn generate(
        &mut self,
        prompt: &str,
        materials: &[&Item],
    ) -> Result<(CraftedItem, f32), ActionError> {
        let key = Self::cache_key(prompt, materials);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit.clone());
        }
        validate(prompt, materials)?;

        let stats = calculate_stats(materials, prompt);
        let names: Vec<&str> = materials.iter().map(|m| m.kind.name()).collect();
        let item = CraftedItem {
            name: prompt.trim().to_owned(),
            description: format!("Crafted from {}", names.join(", ")),
            category: stats.category,
            damage: stats.damage,
            defense: stats.defense,
            durability: stats.durability,
            rarity: stats.rarity,
        };
        self.cache.insert(key, (item.clone(), stats.weight));
        Ok((item, stats.weight))
    }
}

/// Turn every raw resource in `inventory` into one item named `prompt`.
/// Nothing is consumed when the result would not fit.
pub fn craft(
    crafter: &mut Crafter,
    inventory: &mut Inventory,
    prompt: &str,
) -> Result<CraftedItem, ActionError> {
    let slots: Vec<usize> = inventory
        .items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.kind.is_material())
        .map(|(i, _)| i)
        .collect();
    if slots.is_empty() {
        return Err(ActionError::NoMaterials);
    }

    let materials: Vec<&Item> = slots.iter().map(|&i| &inventory.items[i]).collect();
    let (item, weight) = crafter.generate(prompt, &materials)?;

    if !inventory.add(Item {
        kind: ItemKind::Crafted(item.clone()),
        weight,
    }) {
        return Err(ActionError::InventoryFull);
    }
    for &i in slots.iter().rev() {
        inventory.remove(i);
    }
    Ok(item)
}

/* ===========================================================
   input (C crafts the default recipe and equips it)
   =========================================================== */
pub fn crafting_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut crafter: ResMut<Crafter>,
    mut player_q: Query<&mut Inventory, With<Player>>,
) {
    if !keys.just_pressed(KeyCode::KeyC) {
        return;
    }
    let Ok(mut inventory) = player_q.get_single_mut() else { return };

    match craft(&mut crafter, &mut inventory, CRAFT_PROMPT) {
        Ok(item) => {
            let slot = inventory.items.len() - 1;
            let equipped = inventory.equip(slot);
            info!(
                "crafted {} ({:?}, {:?}, damage {}){}",
                item.name,
                item.category,
                item.rarity,
                item.damage,
                if equipped { ", equipped" } else { "" }
            );
        }
        Err(err) => info!("crafting refused: {err}"),
    }
}
