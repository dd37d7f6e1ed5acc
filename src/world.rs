//! The simulation root: owns every store, both RNG streams, and drives the
//! per-frame control flow in a fixed order:
//! input snapshot -> state-machine dispatch -> (if Playing) player ->
//! enemies -> boss -> combat -> projectiles -> aoe -> pickups -> camera ->
//! particles -> status -> combo decay -> scene collection.

use crate::combat::Aabb;
use crate::data::DataTables;
use crate::enums::{Archetype, Difficulty, EnemyState, GameState, OwnerTag};
use crate::error::{EngineError, EngineResult};
use crate::events::{Event, EventQueue};
use crate::generator::{self, GeneratedFloor};
use crate::grid::{Tile, TileGrid};
use crate::input::InputSnapshot;
use crate::model::item::{FloatingText, Particle};
use crate::model::{AoeField, Boss, Enemy, Player, Projectile, Swing, Weapon};
use crate::rng::Rng;
use crate::save::{Checkpoint, RunStats, SaveState};
use crate::scene::{self, AoeSprite, Camera, EnemySprite, FloatingTextSprite, Hud, ParticleSprite, PlayerSprite, ProjectileSprite, Scene, TileView};
use crate::state_machine::{self, StateTransition};
use crate::store::Store;

const ENEMY_STORE_CAP: usize = 500;
const PROJECTILE_STORE_CAP: usize = 400;
const AOE_STORE_CAP: usize = 200;
const PARTICLE_STORE_CAP: usize = 2000;
const FLOAT_STORE_CAP: usize = 100;
pub const FINAL_FLOOR: u32 = 15;
const PARRY_STAMINA_REFUND: f64 = 15.0;
const STAGGER_DURATION: f64 = 1.0;

/// Who a parried hit's stagger status should land on.
enum Attacker {
    Enemy(u32),
    Boss,
}

fn stagger_status() -> crate::model::StatusEffect {
    crate::model::StatusEffect {
        kind: crate::enums::StatusKind::Stagger,
        remaining_duration: STAGGER_DURATION,
        tick_amount: 0.0,
        tick_interval: STAGGER_DURATION,
        tick_accumulator: 0.0,
        source: None,
        source_is_player: true,
    }
}

pub struct World {
    gen_rng: Rng,
    ai_rng: Rng,
    run_seed: u64,
    difficulty: Difficulty,
    floor: u32,
    tables: DataTables,

    grid: TileGrid,
    player: Player,
    boss: Option<Boss>,
    enemies: Store<Enemy>,
    projectiles: Store<Projectile>,
    aoe_fields: Store<AoeField>,
    particles: Store<Particle>,
    floating_texts: Store<FloatingText>,
    swings: Vec<Swing>,

    camera_x: f64,
    camera_y: f64,
    game_state: GameState,
    save: SaveState,
    events: EventQueue,
}

impl World {
    /// Begins a fresh run: seeds both RNG streams from `run_seed`, generates
    /// floor 1, and places the player at its spawn point.
    pub fn new_run(run_seed: u64, difficulty: Difficulty, tables: DataTables) -> World {
        let gen_rng = Rng::seed(run_seed);
        let ai_rng = Rng::seed(run_seed ^ 0x5bd1_e995);
        let mut player = Player::new(Weapon::starter_sword());

        let floor = generator::generate(1, run_seed, difficulty, &tables);
        let (px, py) = floor.grid.tile_center_pixel(floor.spawn.0, floor.spawn.1);
        player.x = px;
        player.y = py;

        let mut world = World {
            gen_rng,
            ai_rng,
            run_seed,
            difficulty,
            floor: 1,
            tables,
            grid: TileGrid::new(1, 1),
            player: player.clone(),
            boss: None,
            enemies: Store::new(ENEMY_STORE_CAP),
            projectiles: Store::new(PROJECTILE_STORE_CAP),
            aoe_fields: Store::new(AOE_STORE_CAP),
            particles: Store::new(PARTICLE_STORE_CAP),
            floating_texts: Store::new(FLOAT_STORE_CAP),
            swings: Vec::new(),
            camera_x: px,
            camera_y: py,
            game_state: GameState::Playing,
            save: SaveState::new_run(run_seed, player, difficulty),
            events: EventQueue::default(),
        };
        world.install_floor(floor);
        world
    }

    /// Reconstructs a `World` from a previously serialized `SaveState` blob.
    /// The floor is regenerated from `run_seed` and
    /// the saved floor number rather than stored, since generation is
    /// deterministic; tile-level mutations made after the last checkpoint
    /// (opened chests, sprung traps) are not preserved, matching the
    /// checkpoint's own scope.
    pub fn load(save_json: &str, tables: DataTables) -> EngineResult<World> {
        let save = SaveState::from_json(save_json)?;
        let run_seed = save.run_seed;
        let difficulty = save.checkpoint.difficulty;
        let floor_num = save.checkpoint.floor;
        let player = save.checkpoint.player.clone();

        let gen_rng = Rng::seed(run_seed);
        let ai_rng = Rng::seed(run_seed ^ 0x5bd1_e995);
        let generated = generator::generate(floor_num, run_seed, difficulty, &tables);

        let mut world = World {
            gen_rng,
            ai_rng,
            run_seed,
            difficulty,
            floor: floor_num,
            tables,
            grid: TileGrid::new(1, 1),
            player,
            boss: None,
            enemies: Store::new(ENEMY_STORE_CAP),
            projectiles: Store::new(PROJECTILE_STORE_CAP),
            aoe_fields: Store::new(AOE_STORE_CAP),
            particles: Store::new(PARTICLE_STORE_CAP),
            floating_texts: Store::new(FLOAT_STORE_CAP),
            swings: Vec::new(),
            camera_x: 0.0,
            camera_y: 0.0,
            game_state: GameState::Playing,
            save,
            events: EventQueue::default(),
        };
        world.install_floor(generated);
        world.camera_x = world.player.x;
        world.camera_y = world.player.y;
        Ok(world)
    }

    /// Serializes the current `SaveState` (checkpoint plus run stats) for the
    /// host to persist through its own storage.
    pub fn save_full_json(&self) -> EngineResult<String> {
        self.save.to_json()
    }

    fn install_floor(&mut self, floor: GeneratedFloor) {
        self.enemies = Store::new(ENEMY_STORE_CAP);
        self.projectiles = Store::new(PROJECTILE_STORE_CAP);
        self.aoe_fields = Store::new(AOE_STORE_CAP);
        self.swings.clear();
        self.boss = None;

        for spawn in &floor.enemy_spawns {
            if let Some(def) = self.tables.archetype(&spawn.archetype_id) {
                let (x, y) = floor.grid.tile_center_pixel(spawn.x, spawn.y);
                let enemy = Enemy {
                    archetype_id: def.id.clone(),
                    x,
                    y,
                    hp: def.base_hp,
                    max_hp: def.base_hp,
                    damage: def.base_damage,
                    speed: def.speed,
                    archetype: def.archetype,
                    attack_range: def.attack_range,
                    aggro_range: def.aggro_range,
                    state: EnemyState::Idle,
                    pre_hurt_state: EnemyState::Idle,
                    state_timer: 0.0,
                    attack_cooldown: 0.0,
                    hit_flash_timer: 0.0,
                    params: {
                        let mut p = def.params.clone();
                        if def.archetype == Archetype::Patrol && p.patrol_anchor.is_none() {
                            p.patrol_anchor = Some((x, y));
                            if p.patrol_radius <= 0.0 {
                                p.patrol_radius = 96.0;
                            }
                        }
                        if def.archetype == Archetype::Guard && p.patrol_anchor.is_none() {
                            p.patrol_anchor = Some((x, y));
                            if p.patrol_radius <= 0.0 {
                                p.patrol_radius = 160.0;
                            }
                        }
                        p
                    },
                    statuses: Vec::new(),
                    elemental_affinity: def.elemental_affinity,
                    resistances: def.resistances.clone(),
                    xp_reward: def.xp_reward,
                    loot_chance: def.loot_chance,
                    attacks: def.attacks.clone(),
                };
                self.enemies.spawn(enemy);
            }
        }

        if let Some(boss_spawn) = &floor.boss_spawn {
            if let Some(def) = self.tables.boss(&boss_spawn.boss_id) {
                let (x, y) = floor.grid.tile_center_pixel(boss_spawn.x, boss_spawn.y);
                let arena = Aabb::centered(x, y, floor.grid.width as f64 * 16.0, floor.grid.height as f64 * 16.0);
                self.boss = Some(Boss {
                    base: Enemy {
                        archetype_id: def.base.id.clone(),
                        x,
                        y,
                        hp: def.base.base_hp,
                        max_hp: def.base.base_hp,
                        damage: def.base.base_damage,
                        speed: def.base.speed,
                        archetype: def.base.archetype,
                        attack_range: def.base.attack_range,
                        aggro_range: def.base.aggro_range,
                        state: EnemyState::Idle,
                        pre_hurt_state: EnemyState::Idle,
                        state_timer: 0.0,
                        attack_cooldown: 0.0,
                        hit_flash_timer: 0.0,
                        params: def.base.params.clone(),
                        statuses: Vec::new(),
                        elemental_affinity: def.base.elemental_affinity,
                        resistances: def.base.resistances.clone(),
                        xp_reward: def.base.xp_reward,
                        loot_chance: def.base.loot_chance,
                        attacks: def.phases[0].attacks.clone(),
                    },
                    id: def.id.clone(),
                    phases: def.phases.clone(),
                    phase_index: 0,
                    special_move_queue: Vec::new(),
                    dialogue_cursor: 0,
                    invincible: false,
                    arena_bounds: arena,
                });
            }
        }

        self.grid = floor.grid;
        self.events.push(Event::FloorGenerated { floor: self.floor });
    }

    /// Spawns a fresh enemy of `archetype_id` near `(x, y)`, jittered by a
    /// few pixels so stacked summons don't overlap exactly. Used by the
    /// `SummonAllies` boss special move; silently does nothing if the
    /// archetype isn't in the loaded data tables.
    fn spawn_summoned_enemy(&mut self, archetype_id: &str, near: (f64, f64)) {
        let Some(def) = self.tables.archetype(archetype_id).cloned() else { return };
        let jitter_x = self.ai_rng.range_int(-40, 40) as f64;
        let jitter_y = self.ai_rng.range_int(-40, 40) as f64;
        let enemy = Enemy {
            archetype_id: def.id.clone(),
            x: near.0 + jitter_x,
            y: near.1 + jitter_y,
            hp: def.base_hp,
            max_hp: def.base_hp,
            damage: def.base_damage,
            speed: def.speed,
            archetype: def.archetype,
            attack_range: def.attack_range,
            aggro_range: def.aggro_range,
            state: EnemyState::Idle,
            pre_hurt_state: EnemyState::Idle,
            state_timer: 0.0,
            attack_cooldown: 0.0,
            hit_flash_timer: 0.0,
            params: def.params.clone(),
            statuses: Vec::new(),
            elemental_affinity: def.elemental_affinity,
            resistances: def.resistances.clone(),
            xp_reward: def.xp_reward,
            loot_chance: def.loot_chance,
            attacks: def.attacks.clone(),
        };
        self.enemies.spawn(enemy);
    }

    /// Resolves one incoming melee/projectile hit against the player: an
    /// open parry window absorbs it (stamina refund, `ParrySuccess`, the
    /// attacker is staggered), an i-framed player takes nothing, otherwise
    /// damage applies normally.
    fn resolve_hit_against_player(&mut self, source: (f64, f64), element: crate::enums::Element, damage: f64, attacker: Attacker) {
        if self.player.parry_window_timer > 0.0 {
            self.player.stamina = (self.player.stamina + PARRY_STAMINA_REFUND).min(self.player.max_stamina);
            self.player.parry_window_timer = 0.0;
            self.events.push(Event::ParrySuccess);
            self.spawn_floating_text(self.player.x, self.player.y - 24.0, "Parry!".to_string(), "#ffd24a");
            let target_id = match attacker {
                Attacker::Enemy(id) => {
                    if let Some(enemy) = self.enemies.get_mut(id) {
                        crate::status::apply_status(&mut enemy.statuses, stagger_status());
                    }
                    Some(id)
                }
                Attacker::Boss => {
                    if let Some(boss) = self.boss.as_mut() {
                        crate::status::apply_status(&mut boss.base.statuses, stagger_status());
                    }
                    None
                }
            };
            self.events.push(Event::StatusApplied { target_id, kind: crate::enums::StatusKind::Stagger });
            return;
        }
        if self.player.is_iframed() {
            return;
        }
        let outcome = crate::combat_system::apply_hit_to_player(&mut self.player, source, element, damage);
        self.events.push(Event::Hit { attacker_is_player: false, target_id: None, damage: outcome.damage, is_crit: false, element });
    }

    pub fn dispatch(&mut self, transition: StateTransition) {
        if let Some(next) = state_machine::apply(self.game_state, transition) {
            self.game_state = next;
            if next == GameState::Death {
                self.events.push(Event::PlayerDied);
            }
            if next == GameState::Victory {
                self.events.push(Event::Victory);
            }
        }
    }

    /// Advances the simulation by one frame. `raw_dt` is clamped internally.
    pub fn tick(&mut self, input: &InputSnapshot, raw_dt: f64) {
        let dt = state_machine::clamp_dt(raw_dt);

        if input.pause && self.game_state == GameState::Playing {
            self.dispatch(StateTransition::Pause);
        } else if input.pause && self.game_state == GameState::Paused {
            self.dispatch(StateTransition::Resume);
        }
        if input.inventory {
            if self.game_state == GameState::Playing {
                self.dispatch(StateTransition::OpenInventory);
            } else if self.game_state == GameState::Inventory {
                self.dispatch(StateTransition::CloseInventory);
            }
        }

        if !self.game_state.advances_world_simulation() {
            return;
        }

        let player_outcome = crate::player_controller::update(&mut self.player, &self.grid, input, dt);
        if player_outcome.attack_triggered {
            if let Some(swing) = crate::player_controller::trigger_attack(&mut self.player) {
                self.swings.push(swing);
            }
        }

        self.update_enemies(dt);
        self.update_boss(dt);
        self.resolve_combat(dt);
        self.advance_projectiles(dt);
        self.tick_aoe_fields(dt);
        self.collect_pickups();
        self.follow_camera();
        self.advance_particles(dt);
        self.tick_statuses(dt);

        self.enemies.retain_alive(Enemy::is_alive);
        self.floating_texts.values_mut().for_each(|t| t.advance(dt));
        self.floating_texts.retain_alive(|t| !t.expired());

        if self.player.hp <= 0.0 && self.game_state == GameState::Playing {
            self.dispatch(StateTransition::PlayerDied);
            self.save.stats.deaths += 1;
        }

        self.save.stats.playtime_seconds += dt;
        self.save.stats.resource_caps_hit = self.enemies.dropped
            + self.projectiles.dropped
            + self.aoe_fields.dropped
            + self.particles.dropped
            + self.floating_texts.dropped;
        self.save.stats.score = self.save.stats.kills * 100
            + self.save.stats.gold_collected
            + self.save.stats.floors_cleared * 500;
    }

    fn update_enemies(&mut self, dt: f64) {
        let player_pos = (self.player.x, self.player.y);
        let ally_positions: Vec<(f64, f64)> = self.enemies.iter().filter(|(_, e)| e.is_alive()).map(|(_, e)| (e.x, e.y)).collect();
        let mut spawns = Vec::new();
        let mut hits: Vec<((f64, f64), crate::enums::Element, f64, u32)> = Vec::new();
        for (id, enemy) in self.enemies.iter_mut() {
            if !enemy.is_alive() {
                continue;
            }
            let action = crate::enemy_ai::update(enemy, &self.grid, player_pos, &ally_positions, &mut self.ai_rng, dt);
            match action {
                crate::enemy_ai::AiAction::MeleeAttack { attack_index } => {
                    if let Some(attack) = enemy.attacks.get(attack_index) {
                        let hitbox = Aabb::centered(enemy.x, enemy.y, attack.range_px, attack.range_px);
                        if hitbox.overlaps(&crate::combat_system::player_aabb(&self.player)) {
                            hits.push(((enemy.x, enemy.y), enemy.elemental_affinity, attack.damage, id));
                        }
                    }
                }
                crate::enemy_ai::AiAction::SpawnProjectile { attack_index, dx, dy } => {
                    if let Some(p) = crate::enemy_ai::spawn_projectile_for_attack(enemy, attack_index, dx, dy, Some(id)) {
                        spawns.push(p);
                    }
                }
                crate::enemy_ai::AiAction::None => {}
            }
        }
        for p in spawns {
            self.projectiles.spawn(p);
        }
        for (source, element, damage, id) in hits {
            self.resolve_hit_against_player(source, element, damage, Attacker::Enemy(id));
        }
    }

    fn update_boss(&mut self, dt: f64) {
        let player_pos = (self.player.x, self.player.y);
        let Some(boss) = self.boss.as_mut() else { return };
        if !boss.base.is_alive() {
            return;
        }
        let action = crate::boss_ai::update(boss, &self.grid, player_pos, &mut self.ai_rng, dt);
        let boss_id = boss.id.clone();
        let boss_pos = (boss.base.x, boss.base.y);
        match action {
            crate::boss_ai::BossAction::PhaseChanged { phase, dialogue } => {
                self.events.push(Event::PhaseChanged { boss_id: boss_id.clone(), phase });
                self.events.push(Event::DialogueLine { speaker: boss_id, text: dialogue });
            }
            crate::boss_ai::BossAction::SpecialMove(mv) => {
                if mv == crate::enums::BossSpecialMove::SummonAllies {
                    self.spawn_summoned_enemy("skeleton_warrior", boss_pos);
                    self.spawn_summoned_enemy("skeleton_warrior", boss_pos);
                }
                self.events.push(Event::BossSpecialMove { boss_id, special: mv });
            }
            crate::boss_ai::BossAction::MeleeAttack { attack_index } => {
                let hit = boss.base.attacks.get(attack_index).and_then(|attack| {
                    let hitbox = Aabb::centered(boss.base.x, boss.base.y, attack.range_px, attack.range_px);
                    if hitbox.overlaps(&crate::combat_system::player_aabb(&self.player)) {
                        Some((boss_pos, boss.base.elemental_affinity, attack.damage))
                    } else {
                        None
                    }
                });
                if let Some((source, element, damage)) = hit {
                    self.resolve_hit_against_player(source, element, damage, Attacker::Boss);
                }
            }
            crate::boss_ai::BossAction::SpawnProjectile { attack_index, dx, dy } => {
                if let Some(p) = crate::boss_ai::spawn_projectile_for_attack(boss, attack_index, dx, dy) {
                    self.projectiles.spawn(p);
                }
            }
            crate::boss_ai::BossAction::None => {}
        }
    }

    fn resolve_combat(&mut self, dt: f64) {
        for swing in &mut self.swings {
            swing.remaining -= dt;
            let hits = crate::combat_system::resolve_swing_vs_enemies(swing, &self.player, &mut self.enemies, &mut self.ai_rng);
            for (id, outcome) in hits {
                if outcome.killed {
                    if let Some(enemy) = self.enemies.get(id) {
                        self.events.push(Event::EntityDied { target_id: Some(id), xp_awarded: enemy.xp_reward });
                        self.save.stats.kills += 1;
                    }
                }
                self.events.push(Event::Hit {
                    attacker_is_player: true,
                    target_id: Some(id),
                    damage: outcome.damage,
                    is_crit: outcome.is_crit,
                    element: outcome.element,
                });
                self.floating_texts.spawn(FloatingText {
                    x: self.player.x,
                    y: self.player.y - 20.0,
                    text: format!("{}", outcome.damage as i64),
                    color: "#ffffff".to_string(),
                    remaining_lifetime: 0.8,
                    vertical_velocity: -40.0,
                });
            }

            if let Some(boss) = self.boss.as_mut() {
                if let Some(outcome) = crate::combat_system::resolve_swing_vs_boss(swing, &self.player, boss, &mut self.ai_rng) {
                    if outcome.killed {
                        self.events.push(Event::EntityDied { target_id: None, xp_awarded: boss.base.xp_reward });
                    self.save.stats.kills += 1;
                    }
                    self.events.push(Event::Hit {
                        attacker_is_player: true,
                        target_id: None,
                        damage: outcome.damage,
                        is_crit: outcome.is_crit,
                        element: outcome.element,
                    });
                }
            }
        }
        self.swings.retain(Swing::is_active);
    }

    fn advance_projectiles(&mut self, dt: f64) {
        let player_box = crate::combat_system::player_aabb(&self.player);
        let mut player_hits = Vec::new();
        let mut enemy_hits: Vec<(u32, u32, f64, crate::enums::Element)> = Vec::new();
        let mut exploding: Vec<u32> = Vec::new();

        for (id, projectile) in self.projectiles.iter_mut() {
            if let Some(target_id) = projectile.homing_target {
                // Degrades to straight flight automatically once the target
                // is dead or gone, since `get` then returns `None`.
                if let Some(enemy) = self.enemies.get(target_id.0) {
                    if enemy.is_alive() {
                        projectile.steer_toward(enemy.x, enemy.y);
                    }
                }
            }
            projectile.integrate(dt);
            projectile.lifetime -= dt;

            let (tx, ty) = self.grid.pixel_to_tile(projectile.x, projectile.y);
            if !self.grid.is_walkable(tx, ty) && !projectile.piercing {
                projectile.lifetime = 0.0;
            }
            if projectile.expired() && projectile.explode_radius.is_some() {
                exploding.push(id);
            }

            match projectile.owner {
                OwnerTag::Enemy => {
                    let pbox = Aabb::centered(projectile.x, projectile.y, 8.0, 8.0);
                    if pbox.overlaps(&player_box) {
                        player_hits.push(id);
                    }
                }
                OwnerTag::Player => {
                    for (eid, enemy) in self.enemies.iter() {
                        if !enemy.is_alive() || projectile.pierced.contains(&eid) {
                            continue;
                        }
                        let ebox = crate::combat_system::enemy_aabb(enemy);
                        let pbox = Aabb::centered(projectile.x, projectile.y, 8.0, 8.0);
                        if pbox.overlaps(&ebox) {
                            enemy_hits.push((id, eid, projectile.damage, projectile.element));
                            if !projectile.piercing {
                                break;
                            }
                        }
                    }
                }
            }
        }

        let mut projectile_player_hits: Vec<((f64, f64), crate::enums::Element, f64, Attacker)> = Vec::new();
        for id in player_hits {
            if let Some(projectile) = self.projectiles.get_mut(id) {
                let damage = projectile.damage;
                let element = projectile.element;
                let source = (projectile.x, projectile.y);
                let attacker = match projectile.source_id {
                    Some(eid) => Attacker::Enemy(eid),
                    None => Attacker::Boss,
                };
                if !projectile.piercing {
                    projectile.lifetime = 0.0;
                    if projectile.explode_radius.is_some() && !exploding.contains(&id) {
                        exploding.push(id);
                    }
                }
                projectile_player_hits.push((source, element, damage, attacker));
            }
        }
        for (source, element, damage, attacker) in projectile_player_hits {
            self.resolve_hit_against_player(source, element, damage, attacker);
        }

        for (proj_id, eid, damage, element) in enemy_hits {
            if let Some(enemy) = self.enemies.get_mut(eid) {
                if !enemy.is_alive() {
                    continue;
                }
                let resistance = enemy.resistance_to(element);
                let mitigated = (damage * (1.0 - resistance)).max(1.0);
                enemy.hp = (enemy.hp - mitigated).max(0.0);
                if enemy.hp <= 0.0 {
                    enemy.transition(EnemyState::Dead);
                    self.events.push(Event::EntityDied { target_id: Some(eid), xp_awarded: enemy.xp_reward });
                    self.save.stats.kills += 1;
                } else {
                    enemy.transition(EnemyState::Hurt);
                }
                self.events.push(Event::Hit { attacker_is_player: true, target_id: Some(eid), damage: mitigated, is_crit: false, element });
            }
            if let Some(projectile) = self.projectiles.get_mut(proj_id) {
                if projectile.piercing {
                    projectile.pierced.insert(eid);
                } else {
                    projectile.lifetime = 0.0;
                    if projectile.explode_radius.is_some() && !exploding.contains(&proj_id) {
                        exploding.push(proj_id);
                    }
                }
            }
        }

        for id in exploding {
            let Some(projectile) = self.projectiles.get(id) else { continue };
            let projectile = projectile.clone();
            let (hits, player_hit) =
                crate::combat_system::resolve_projectile_explosion(&projectile, &self.enemies, &self.player, &mut self.ai_rng);
            for hit in hits {
                let Some(eid) = hit.enemy_id else { continue };
                if let Some(enemy) = self.enemies.get_mut(eid) {
                    if !enemy.is_alive() {
                        continue;
                    }
                    enemy.hp = (enemy.hp - hit.damage).max(0.0);
                    if enemy.hp <= 0.0 {
                        enemy.transition(EnemyState::Dead);
                        self.events.push(Event::EntityDied { target_id: Some(eid), xp_awarded: enemy.xp_reward });
                        self.save.stats.kills += 1;
                    } else {
                        enemy.transition(EnemyState::Hurt);
                    }
                    self.events.push(Event::Hit {
                        attacker_is_player: true,
                        target_id: Some(eid),
                        damage: hit.damage,
                        is_crit: false,
                        element: projectile.element,
                    });
                }
            }
            if let Some(damage) = player_hit {
                if !self.player.is_iframed() {
                    self.player.hp = (self.player.hp - damage).max(0.0);
                    self.events.push(Event::Hit { attacker_is_player: false, target_id: None, damage, is_crit: false, element: projectile.element });
                }
            }
            self.aoe_fields.spawn(AoeField {
                center_x: projectile.x,
                center_y: projectile.y,
                radius: projectile.explode_radius.unwrap_or(0.0),
                damage: 0.0,
                element: projectile.element,
                owner: projectile.owner,
                delay: 0.0,
                tick_interval: 1.0,
                lifetime: 0.2,
                tick_timer: 0.0,
                periodic: false,
                detonated: true,
            });
        }

        self.projectiles.retain_alive(|p| !p.expired());
    }

    fn tick_aoe_fields(&mut self, dt: f64) {
        let player_box = crate::combat_system::player_aabb(&self.player);
        let mut enemy_damage: Vec<(u32, f64, crate::enums::Element)> = Vec::new();
        let mut player_damage: Vec<(f64, crate::enums::Element, (f64, f64))> = Vec::new();

        for (_, field) in self.aoe_fields.iter_mut() {
            if !field.tick(dt) {
                continue;
            }
            match field.owner {
                OwnerTag::Player => {
                    for (eid, enemy) in self.enemies.iter() {
                        if enemy.is_alive() && field.contains_point(enemy.x, enemy.y) {
                            enemy_damage.push((eid, field.damage, field.element));
                        }
                    }
                }
                OwnerTag::Enemy => {
                    if field.contains_point(self.player.x, self.player.y) || player_box.contains_point(field.center_x, field.center_y) {
                        player_damage.push((field.damage, field.element, (field.center_x, field.center_y)));
                    }
                }
            }
        }

        for (eid, damage, element) in enemy_damage {
            if let Some(enemy) = self.enemies.get_mut(eid) {
                let resistance = enemy.resistance_to(element);
                let mitigated = (damage * (1.0 - resistance)).max(1.0);
                enemy.hp = (enemy.hp - mitigated).max(0.0);
                if enemy.hp <= 0.0 {
                    enemy.transition(EnemyState::Dead);
                    self.events.push(Event::EntityDied { target_id: Some(eid), xp_awarded: enemy.xp_reward });
                    self.save.stats.kills += 1;
                }
            }
        }
        if !self.player.is_iframed() {
            for (damage, element, source) in player_damage {
                let outcome = crate::combat_system::apply_hit_to_player(&mut self.player, source, element, damage);
                self.events.push(Event::Hit { attacker_is_player: false, target_id: None, damage: outcome.damage, is_crit: false, element });
            }
        }

        self.aoe_fields.retain_alive(|f| !f.expired());
    }

    fn collect_pickups(&mut self) {
        let (tx, ty) = self.grid.pixel_to_tile(self.player.x, self.player.y);
        match self.grid.get(tx, ty) {
            Tile::Chest { opened: false } => {
                self.grid.open_chest(tx, ty);
                let gold = 10 + (self.gen_rng.next_f64() * 20.0) as u32;
                self.player.gold += gold;
                self.save.stats.gold_collected += gold;
            }
            Tile::Trap { triggered: false } => {
                self.grid.trigger_trap(tx, ty);
                self.player.hp = (self.player.hp - 8.0).max(0.0);
            }
            _ => {}
        }
    }

    fn follow_camera(&mut self) {
        const LERP: f64 = 0.12;
        self.camera_x += (self.player.x - self.camera_x) * LERP;
        self.camera_y += (self.player.y - self.camera_y) * LERP;
    }

    fn advance_particles(&mut self, dt: f64) {
        self.particles.values_mut().for_each(|p| p.advance(dt));
        self.particles.retain_alive(|p| !p.expired());
    }

    fn tick_statuses(&mut self, dt: f64) {
        let pulses = crate::status::tick_statuses(&mut self.player.statuses, dt);
        for (_kind, amount, is_heal, _source_is_player) in pulses {
            if is_heal {
                self.player.hp = (self.player.hp + amount).min(self.player.max_hp);
            } else {
                self.player.hp = (self.player.hp - amount).max(0.0);
            }
        }

        for (_, enemy) in self.enemies.iter_mut() {
            let pulses = crate::status::tick_statuses(&mut enemy.statuses, dt);
            for (kind, amount, is_heal, _source_is_player) in pulses {
                if is_heal {
                    enemy.hp = (enemy.hp + amount).min(enemy.max_hp);
                } else {
                    enemy.hp = (enemy.hp - amount).max(0.0);
                    if enemy.hp <= 0.0 {
                        enemy.transition(EnemyState::Dead);
                    }
                }
                let _ = kind;
            }
        }
    }

    fn spawn_floating_text(&mut self, x: f64, y: f64, text: String, color: &str) {
        self.floating_texts.spawn(FloatingText { x, y, text, color: color.to_string(), remaining_lifetime: 0.8, vertical_velocity: -40.0 });
    }

    /// Regenerates the next floor in place, or declares victory past the
    /// final floor.
    pub fn descend_stairs(&mut self) -> EngineResult<()> {
        let (tx, ty) = self.grid.pixel_to_tile(self.player.x, self.player.y);
        if self.grid.get(tx, ty) != Tile::StairsDown {
            return Err(EngineError::InvariantBroken("player is not standing on stairs down".to_string()));
        }
        self.save.stats.floors_cleared += 1;
        if self.floor >= FINAL_FLOOR {
            self.dispatch(StateTransition::Victory);
            return Ok(());
        }
        self.floor += 1;
        let floor = generator::generate(self.floor, self.run_seed, self.difficulty, &self.tables);
        let (px, py) = floor.grid.tile_center_pixel(floor.spawn.0, floor.spawn.1);
        self.install_floor(floor);
        self.player.x = px;
        self.player.y = py;
        Ok(())
    }

    pub fn save_checkpoint(&mut self) {
        self.save.checkpoint(self.floor, self.player.clone(), self.difficulty);
        self.events.push(Event::CheckpointSaved { floor: self.floor });
    }

    pub fn rollback_checkpoint(&mut self) -> EngineResult<()> {
        self.save.rollback()?;
        let checkpoint: &Checkpoint = &self.save.checkpoint;
        self.player = checkpoint.player.clone();
        self.floor = checkpoint.floor;
        self.difficulty = checkpoint.difficulty;
        let floor = generator::generate(self.floor, self.run_seed, self.difficulty, &self.tables);
        self.install_floor(floor);
        // Respawn always returns to Playing, independent of the menu-state
        // graph in `state_machine` - Death has no transition back into it.
        self.game_state = GameState::Playing;
        Ok(())
    }

    pub fn run_stats_mut(&mut self) -> &mut RunStats {
        &mut self.save.stats
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    pub fn scene(&self) -> Scene {
        let (ptx, pty) = self.grid.pixel_to_tile(self.camera_x, self.camera_y);
        let bounds = scene::visible_tile_bounds((ptx, pty), self.grid.width, self.grid.height);
        let mut visible_tiles = Vec::new();
        for y in bounds.1..=bounds.3 {
            for x in bounds.0..=bounds.2 {
                visible_tiles.push(TileView { x, y, tile: self.grid.get(x, y) });
            }
        }

        let mut enemies: Vec<EnemySprite> = self
            .enemies
            .iter()
            .map(|(id, e)| EnemySprite {
                id,
                x: e.x,
                y: e.y,
                hp_fraction: if e.max_hp > 0.0 { e.hp / e.max_hp } else { 0.0 },
                state: e.state,
                archetype_id: e.archetype_id.clone(),
                hit_flash: e.hit_flash_timer > 0.0,
                is_boss: false,
            })
            .collect();
        if let Some(boss) = &self.boss {
            enemies.push(EnemySprite {
                id: u32::MAX,
                x: boss.base.x,
                y: boss.base.y,
                hp_fraction: boss.hp_fraction(),
                state: boss.base.state,
                archetype_id: boss.id.clone(),
                hit_flash: boss.base.hit_flash_timer > 0.0,
                is_boss: true,
            });
        }

        Scene {
            game_state: self.game_state,
            tile_bounds: bounds,
            visible_tiles,
            player: PlayerSprite {
                x: self.player.x,
                y: self.player.y,
                facing: self.player.facing,
                is_iframed: self.player.is_iframed(),
                is_dodging: self.player.is_dodging(),
                combo_counter: self.player.combo_counter,
            },
            enemies,
            projectiles: self
                .projectiles
                .iter()
                .map(|(id, p)| ProjectileSprite { id, x: p.x, y: p.y, element: p.element })
                .collect(),
            aoe_fields: self
                .aoe_fields
                .iter()
                .map(|(id, f)| AoeSprite { id, x: f.center_x, y: f.center_y, radius: f.radius, element: f.element })
                .collect(),
            particles: self.particles.iter().map(|(id, p)| ParticleSprite { id, x: p.x, y: p.y, tag: p.tag.clone() }).collect(),
            floating_texts: self
                .floating_texts
                .iter()
                .map(|(id, t)| FloatingTextSprite { id, x: t.x, y: t.y, text: t.text.clone(), color: t.color.clone() })
                .collect(),
            camera: Camera { center_x: self.camera_x, center_y: self.camera_y },
            hud: Hud {
                hp: self.player.hp,
                max_hp: self.player.max_hp,
                mana: self.player.mana,
                max_mana: self.player.max_mana,
                stamina: self.player.stamina,
                max_stamina: self.player.max_stamina,
                level: self.player.level,
                xp: self.player.xp,
                gold: self.player.gold,
                floor: self.floor,
            },
        }
    }
}
