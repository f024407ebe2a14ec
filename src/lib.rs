//! Seeded 2‑D block sandbox: tile grid, generation, tile collision & mobs.
//!
//! The simulation modules (`rng`, `terrain`, `world_gen`, `collision`) have
//! no rendering dependency beyond bevy's ECS derives and can be driven
//! directly; the rest wires them into a bevy app.

pub mod camera;
pub mod collision;
pub mod components;
pub mod constants;
pub mod crafting;
pub mod interaction;
pub mod mobs;
pub mod player;
pub mod render;
pub mod rng;
pub mod terrain;
pub mod world_gen;
