//! mob spawn, wandering, the adaptive aggression heuristic & physics
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::collision::{clamp_to_world, resolve, Body};
use crate::components::{Experience, Health, Inventory, Player};
use crate::constants::*;
use crate::rng::SeededRng;
use crate::terrain::{tile_to_pixel, Terrain};
use crate::world_gen::WorldConfig;

/* ===========================================================
   kinds
   =========================================================== */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassiveSpecies {
    Sheep,
    Cow,
    Chicken,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemySpecies {
    Goblin,
    Orc,
    ShadowCreature,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MobAction {
    Attack,
    Retreat,
    Idle,
}

#[derive(Clone, Debug)]
pub struct PassiveBrain {
    pub species: PassiveSpecies,
    wander_ticks: u32,
    heading: f32,
}

#[derive(Clone, Debug)]
pub struct EnemyBrain {
    pub species: EnemySpecies,
    pub damage: f32,
    pub action: MobAction,
    cooldown: u32,
}

#[derive(Clone, Debug)]
pub enum MobKind {
    Passive(PassiveBrain),
    Enemy(EnemyBrain),
}

#[derive(Component, Clone, Debug)]
pub struct Mob {
    pub kind: MobKind,
    /// last tick's walk was cut short by a wall
    pub stalled: bool,
}

/// what a mob sees of the world this tick
pub struct MobContext<'a> {
    pub player: Vec2,
    pub player_stats: PlayerStats,
    /// mean position of nearby mobs of the same species
    pub herd_center: Option<Vec2>,
    pub ai: &'a EnemyAi,
}

#[derive(Clone, Copy, Debug)]
pub struct PlayerStats {
    pub carry_ratio: f32,
    pub health: f32,
    pub level: u32,
}

/* ===========================================================
   adaptive aggression
   =========================================================== */
#[derive(Resource, Clone, Debug)]
pub struct EnemyAi {
    pub base_aggression: f32,
}

impl Default for EnemyAi {
    fn default() -> Self {
        Self {
            base_aggression: BASE_AGGRESSION,
        }
    }
}

impl EnemyAi {
    /// 0 = struggling, 1 = thriving
    pub fn fitness(stats: &PlayerStats) -> f32 {
        stats.carry_ratio * 0.4
            + (stats.health / PLAYER_MAX_HEALTH) * 0.4
            + (stats.level as f32 / 20.0) * 0.2
    }

    pub fn aggression(&self, fitness: f32) -> f32 {
        (self.base_aggression + (1.0 - fitness) * 0.3).clamp(0.0, 1.0)
    }

    pub fn decide_action(&self, distance: f32, stats: &PlayerStats) -> MobAction {
        if distance >= ENEMY_DETECTION_RANGE {
            return MobAction::Idle;
        }
        let fitness = Self::fitness(stats);
        let aggression = self.aggression(fitness);
        if fitness > 0.7 {
            if aggression > 0.4 {
                MobAction::Attack
            } else {
                MobAction::Retreat
            }
        } else if fitness < 0.3 || aggression > 0.5 {
            MobAction::Attack
        } else {
            MobAction::Idle
        }
    }

    /// `won` = the enemies got the player
    pub fn adapt_after_encounter(&mut self, won: bool) {
        self.base_aggression = if won {
            (self.base_aggression + 0.1).min(1.0)
        } else {
            (self.base_aggression - 0.15).max(0.2)
        };
    }
}

/* ===========================================================
   per‑tick brains
   =========================================================== */
impl Mob {
    pub fn passive(species: PassiveSpecies) -> Self {
        Self {
            kind: MobKind::Passive(PassiveBrain {
                species,
                wander_ticks: 0,
                heading: 0.0,
            }),
            stalled: false,
        }
    }

    pub fn enemy(species: EnemySpecies) -> Self {
        Self {
            kind: MobKind::Enemy(EnemyBrain {
                species,
                damage: ENEMY_DAMAGE,
                action: MobAction::Idle,
                cooldown: 0,
            }),
            stalled: false,
        }
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, MobKind::Enemy(_))
    }

    /// Set this tick's velocity. Returns damage dealt to the player.
    pub fn update(&mut self, body: &mut Body, ctx: &MobContext, rng: &mut impl Rng) -> f32 {
        let damage = match &mut self.kind {
            MobKind::Passive(brain) => {
                brain.think(body, ctx, rng);
                0.0
            }
            MobKind::Enemy(brain) => brain.think(body, ctx, rng),
        };

        // hop over one‑tile steps we walked into
        if self.stalled && body.grounded {
            body.vel.y = -JUMP_SPEED;
            body.grounded = false;
        }
        damage
    }

    /// feed a fallen buff to the survivor of a player kill
    pub fn empower(&mut self, health: &mut Health) {
        if let MobKind::Enemy(brain) = &mut self.kind {
            health.max += 5.0;
            health.current = health.max;
            brain.damage += 2.0;
        }
    }

    /// what the player collects, `(name, count)`
    pub fn drops(&self, rng: &mut impl Rng) -> (&'static str, usize) {
        match self.kind {
            MobKind::Passive(_) => ("meat", rng.gen_range(1..=2)),
            MobKind::Enemy(_) => ("scrap", rng.gen_range(1..=3)),
        }
    }
}

impl PassiveBrain {
    fn think(&mut self, body: &mut Body, ctx: &MobContext, rng: &mut impl Rng) {
        let here = body.center();
        if let Some(center) = ctx.herd_center {
            let dx = center.x - here.x;
            if dx.abs() > HERD_SLACK {
                body.vel.x = dx.signum() * PASSIVE_SPEED;
                return;
            }
        }

        if self.wander_ticks == 0 {
            self.heading = rng.gen_range(0.0..TAU);
            self.wander_ticks = rng.gen_range(60..120);
        }
        self.wander_ticks -= 1;
        body.vel.x = self.heading.cos() * PASSIVE_SPEED;
    }
}

impl EnemyBrain {
    fn think(&mut self, body: &mut Body, ctx: &MobContext, rng: &mut impl Rng) -> f32 {
        self.cooldown = self.cooldown.saturating_sub(1);
        let here = body.center();
        let to_player = ctx.player - here;
        let dist = to_player.length();

        self.action = ctx.ai.decide_action(dist, &ctx.player_stats);
        match self.action {
            MobAction::Attack if dist < ENEMY_SIGHT_RANGE => {
                if to_player.x.abs() > 5.0 {
                    body.vel.x = ENEMY_SPEED * to_player.x.signum();
                } else {
                    body.vel.x = 0.0;
                }
                // hop if player clearly higher (y grows downward)
                if body.grounded && to_player.y < -(TILE_SIZE as f32) * 0.5 && rng.gen_bool(0.15) {
                    body.vel.y = -JUMP_SPEED;
                    body.grounded = false;
                }
                if dist < ENEMY_REACH && self.cooldown == 0 {
                    self.cooldown = ENEMY_ATTACK_COOLDOWN;
                    return self.damage;
                }
            }
            MobAction::Retreat => {
                body.vel.x = -to_player.x.signum() * ENEMY_SPEED * 0.7;
            }
            _ => body.vel.x *= 0.9,
        }
        0.0
    }
}

/* ===========================================================
   resources & start‑up
   =========================================================== */
#[derive(Resource)]
pub struct MobRng(pub SeededRng);

/// drop passive & enemy mobs on the surface of random columns
pub fn spawn_mobs(mut commands: Commands, terrain: Res<Terrain>, config: Res<WorldConfig>) {
    let mut rng = SeededRng::new(format!("{}:mobs", config.seed));
    let mut spawned = 0;

    let passive = [PassiveSpecies::Sheep, PassiveSpecies::Cow, PassiveSpecies::Chicken];
    let enemies = [EnemySpecies::Goblin, EnemySpecies::Orc, EnemySpecies::ShadowCreature];

    let roster = (0..PASSIVE_MOB_COUNT)
        .map(|i| Mob::passive(passive[i % passive.len()]))
        .chain((0..ENEMY_MOB_COUNT).map(|i| Mob::enemy(enemies[i % enemies.len()])));

    for mob in roster {
        let Some(pos) = find_spawn(&terrain, &mut rng) else {
            continue;
        };
        let (color, health) = match &mob.kind {
            MobKind::Passive(b) => (passive_color(b.species), PASSIVE_HEALTH),
            MobKind::Enemy(b) => (enemy_color(b.species), ENEMY_HEALTH),
        };
        commands.spawn((
            Sprite {
                color,
                custom_size: Some(Vec2::new(MOB_WIDTH, MOB_HEIGHT)),
                ..default()
            },
            Transform::from_xyz(0.0, 0.0, 9.0),
            Body::new(pos, Vec2::new(MOB_WIDTH, MOB_HEIGHT)),
            Health::full(health),
            mob,
        ));
        spawned += 1;
    }

    info!("spawned {spawned} mobs");
    commands.insert_resource(MobRng(rng));
}

/// a few tries at a column with solid ground, standing on top of it
pub fn find_spawn(terrain: &Terrain, rng: &mut SeededRng) -> Option<Vec2> {
    let ts = terrain.tile_size;
    let margin = 5.min(terrain.width / 2);
    if margin >= terrain.width - margin {
        return None;
    }
    for _ in 0..20 {
        let x = rng.gen_range(margin..terrain.width - margin);
        if let Some(ground) = terrain.surface_at(x) {
            return Some(Vec2::new(
                tile_to_pixel(x as i32, ts),
                tile_to_pixel(ground as i32, ts) - MOB_HEIGHT,
            ));
        }
    }
    None
}

fn passive_color(species: PassiveSpecies) -> Color {
    match species {
        PassiveSpecies::Sheep => Color::srgb(0.92, 0.92, 0.92),
        PassiveSpecies::Cow => Color::srgb(0.45, 0.30, 0.20),
        PassiveSpecies::Chicken => Color::srgb(1.0, 0.95, 0.6),
    }
}

fn enemy_color(species: EnemySpecies) -> Color {
    match species {
        EnemySpecies::Goblin => Color::srgb(0.3, 0.7, 0.2),
        EnemySpecies::Orc => Color::srgb(0.2, 0.45, 0.15),
        EnemySpecies::ShadowCreature => Color::srgb(0.25, 0.1, 0.35),
    }
}

/* ===========================================================
   AI tick
   =========================================================== */
pub fn mob_ai_system(
    mut ai: ResMut<EnemyAi>,
    mut rng: ResMut<MobRng>,
    mut mobs: Query<(Entity, &mut Mob, &mut Body, &mut Health), Without<Player>>,
    mut player_q: Query<(&Body, &mut Health, &Inventory, &Experience), With<Player>>,
) {
    let Ok((player_body, mut player_health, inventory, xp)) = player_q.get_single_mut() else {
        return;
    };
    if player_health.is_dead() {
        return;
    }
    let stats = PlayerStats {
        carry_ratio: inventory.carry_ratio(),
        health: player_health.current,
        level: xp.level(),
    };

    let herd: Vec<(Entity, PassiveSpecies, Vec2)> = mobs
        .iter()
        .filter_map(|(e, mob, body, _)| match &mob.kind {
            MobKind::Passive(b) => Some((e, b.species, body.center())),
            _ => None,
        })
        .collect();

    let mut damage = 0.0;
    let mut hitters = Vec::new();
    for (e, mut mob, mut body, _) in &mut mobs {
        let herd_center = match &mob.kind {
            MobKind::Passive(b) => herd_center(&herd, e, b.species, body.center()),
            _ => None,
        };
        let ctx = MobContext {
            player: player_body.center(),
            player_stats: stats,
            herd_center,
            ai: &ai,
        };
        let dealt = mob.update(&mut body, &ctx, &mut rng.0);
        if dealt > 0.0 {
            damage += dealt;
            hitters.push(e);
        }
    }

    if damage <= 0.0 {
        return;
    }
    debug!("player hit for {damage}");
    if player_health.take(damage) {
        ai.adapt_after_encounter(true);
        info!(
            "player killed by mobs; enemy aggression now {:.2}",
            ai.base_aggression
        );
        for e in hitters {
            if let Ok((_, mut mob, _, mut health)) = mobs.get_mut(e) {
                mob.empower(&mut health);
            }
        }
    }
}

/// mean of `me` and its same‑species mates within the herd radius
pub fn herd_center(
    herd: &[(Entity, PassiveSpecies, Vec2)],
    me: Entity,
    species: PassiveSpecies,
    at: Vec2,
) -> Option<Vec2> {
    let (sum, n) = herd
        .iter()
        .filter(|(e, s, p)| *e != me && *s == species && p.distance(at) < HERD_RADIUS)
        .fold((Vec2::ZERO, 0u32), |(sum, n), (_, _, p)| (sum + *p, n + 1));
    (n > 0).then(|| (sum + at) / (n + 1) as f32)
}

/* ===========================================================
   physics (gravity + tile collision)
   =========================================================== */
pub fn mob_physics_system(
    mut commands: Commands,
    terrain: Res<Terrain>,
    mut q: Query<(Entity, &mut Body, &mut Mob)>,
) {
    for (e, mut body, mut mob) in &mut q {
        body.vel.y = (body.vel.y + GRAVITY).min(MAX_FALL_SPEED);
        let wanted = body.vel.x;
        resolve(&terrain, &mut body);
        clamp_to_world(&terrain, &mut body);
        mob.stalled = wanted != 0.0 && body.vel.x == 0.0;

        if body.pos.y > terrain.pixel_height() {
            debug!("mob {e} fell out of the world");
            commands.entity(e).despawn();
        }
    }
}
