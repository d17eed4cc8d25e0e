//! Local player simulation: input, collision, pickups, animation and intents

use std::sync::Arc;

use tracing::{debug, info, trace};

use super::actor::{Actor, ActorView};
use super::animation::AnimationState;
use super::bonus::{BonusKind, BonusPickup, BonusSet};
use super::collision::{CollisionResolver, TriggerResolver};
use super::input::{Direction, InputState, KeyBinding};
use super::pool::MoveObjectPool;
use super::throttle::{ActionThrottle, CooldownGate};
use super::tuning::PlayerTuning;
use crate::util::time::Clock;
use crate::ws::channel::IntentSink;
use crate::ws::protocol::{BonusData, ClientMsg, Position};

/// Whether the frame loop should be running for this player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No frame scheduled
    Idle,
    /// A frame is scheduled after every displacing tick
    Moving,
}

/// What a key-down edge did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Unmapped key, or swallowed by the lock
    Ignored,
    /// Direction latched; `resume` asks the host to start the frame loop
    Direction { resume: bool },
    /// Bomb key handled; `dropped` is false when the throttle refused it
    Bomb { dropped: bool },
}

/// Result of one simulation tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Position changed and a move intent went out
    Moved,
    /// Nothing moved; the controller is now idle
    Stationary,
}

/// World collaborators a tick reads and the pickups it may consume
pub struct World<'a> {
    pub collision: &'a dyn CollisionResolver,
    pub triggers: &'a dyn TriggerResolver,
    pub bonuses: &'a mut BonusSet,
}

/// Full simulation for the player owned by this client
pub struct LocalPlayerController {
    actor: Actor,
    tuning: PlayerTuning,
    input: InputState,
    animation: AnimationState,
    bombs: ActionThrottle,
    damage: CooldownGate,
    pool: MoveObjectPool,
    state: ControllerState,
    bomb_type: u32,
    blast_range_bonus: u32,
    can_escape: bool,
    clock: Arc<dyn Clock>,
    sink: Box<dyn IntentSink>,
}

impl LocalPlayerController {
    pub fn new(
        actor: Actor,
        tuning: PlayerTuning,
        clock: Arc<dyn Clock>,
        sink: Box<dyn IntentSink>,
    ) -> Self {
        Self {
            actor,
            animation: AnimationState::new(tuning.animation_cadence),
            bombs: ActionThrottle::new(tuning.initial_max_bombs, tuning.bomb_cooldown),
            damage: CooldownGate::new(tuning.damage_cooldown),
            tuning,
            input: InputState::default(),
            pool: MoveObjectPool::new(),
            state: ControllerState::Idle,
            bomb_type: 0,
            blast_range_bonus: 0,
            can_escape: false,
            clock,
            sink,
        }
    }

    /// Key-down edge from the input surface
    pub fn on_key_down(&mut self, key: &str) -> KeyOutcome {
        match KeyBinding::lookup(key) {
            Some(KeyBinding::Move(direction)) => {
                if !self.input.press(direction) {
                    return KeyOutcome::Ignored;
                }
                let resume = self.state == ControllerState::Idle;
                if resume {
                    self.state = ControllerState::Moving;
                }
                KeyOutcome::Direction { resume }
            }
            Some(KeyBinding::DropBomb) => KeyOutcome::Bomb {
                dropped: self.drop_bomb(),
            },
            None => KeyOutcome::Ignored,
        }
    }

    /// Key-up edge from the input surface
    pub fn on_key_up(&mut self, key: &str) {
        if let Some(KeyBinding::Move(direction)) = KeyBinding::lookup(key) {
            self.input.release(direction);
        }
    }

    /// `lock` / `unlock` from the authority. Held flags are left alone, so an
    /// unlock while a direction is still held asks the host to resume.
    pub fn set_locked(&mut self, locked: bool) -> bool {
        debug!(player = %self.actor.name, locked, "Input lock changed");
        self.input.set_locked(locked);
        let resume = !locked && self.input.any_held() && self.state == ControllerState::Idle;
        if resume {
            self.state = ControllerState::Moving;
        }
        resume
    }

    /// Run one simulation tick
    pub fn step(&mut self, world: &mut World<'_>) -> TickOutcome {
        let origin = self.actor.position();

        if self.actor.alive {
            self.collect_bonuses(world);
        }

        let mut active = None;
        if !self.input.is_locked() {
            let bounds = self.actor.bounds(&self.tuning);
            let probe = world.collision.probe(&bounds, self.actor.speed);
            for direction in self.input.held() {
                let (dx, dy) = probe.step(direction, self.actor.speed);
                self.actor.x += dx;
                self.actor.y += dy;
                active = Some(direction);
            }
        }

        match active {
            Some(direction) => {
                self.actor.sprite.direction = Some(direction);
                self.actor.sprite.offset = self.animation.advance(direction);
            }
            // nothing moved: face the latest press without stepping the walk cycle
            None => {
                if let Some(direction) = self.input.last_pressed() {
                    self.actor.sprite.direction = Some(direction);
                }
            }
        }

        let position = self.actor.position();
        match active {
            Some(direction) if position != origin => {
                let record = self.pool.acquire(self.actor.name.clone(), direction, position);
                trace!(player = %self.actor.name, x = position.x, y = position.y, "Moved");
                if let Some(intent) = record.to_intent() {
                    self.sink.send(intent);
                }
                self.pool.release(record);
                self.state = ControllerState::Moving;
                TickOutcome::Moved
            }
            _ => {
                self.state = ControllerState::Idle;
                TickOutcome::Stationary
            }
        }
    }

    fn collect_bonuses(&mut self, world: &mut World<'_>) {
        let bounds = self.actor.bounds(&self.tuning);
        let triggers = world.triggers;
        let claimed = world
            .bonuses
            .claim_where(|cell| triggers.overlaps(&bounds, cell));

        for pickup in claimed {
            self.apply_bonus(&pickup);
            self.sink.send_after(
                self.tuning.bonus_notice_delay,
                ClientMsg::Bonus {
                    sender: self.actor.name.to_string(),
                    data: BonusData::from(&pickup),
                },
            );
        }
    }

    fn apply_bonus(&mut self, pickup: &BonusPickup) {
        debug!(player = %self.actor.name, kind = %pickup.kind, "Bonus consumed");
        match pickup.kind {
            BonusKind::Bomb => self.bombs.raise_limit(1),
            BonusKind::Blast => self.blast_range_bonus += 1,
            BonusKind::Speed => self.actor.speed += self.tuning.speed_step,
            BonusKind::Escape => self.can_escape = true,
            BonusKind::Life => self.actor.life += 1,
            BonusKind::Other(_) => {}
        }
    }

    /// Drop a bomb at the current position if the throttle allows it
    pub fn drop_bomb(&mut self) -> bool {
        if self.input.is_locked() || !self.actor.alive {
            return false;
        }
        if !self.bombs.try_fire(self.clock.now()) {
            return false;
        }

        debug!(
            player = %self.actor.name,
            in_flight = self.bombs.in_flight(),
            max = self.bombs.max_concurrent(),
            "Bomb dropped"
        );
        self.sink.send(ClientMsg::Bomb {
            sender: self.actor.name.to_string(),
            bomb_type: self.bomb_type,
            position: Position {
                x: self.actor.x,
                y: self.actor.y + self.tuning.bomb_offset_y,
            },
            date: self.clock.unix_millis(),
            blast_range_bonus: self.blast_range_bonus,
        });
        true
    }

    /// One of our bombs went off upstream
    pub fn bomb_exploded(&mut self) {
        self.bombs.resolve();
    }

    /// Register a damage tick, at most once per damage cooldown
    pub fn trigger_blast(&mut self) -> bool {
        if !self.actor.alive || !self.damage.try_pass(self.clock.now()) {
            return false;
        }
        debug!(player = %self.actor.name, "Damage tick");
        self.sink.send(ClientMsg::Degats {
            sender: self.actor.name.to_string(),
            nb: 1,
        });
        true
    }

    /// Death instructed by the authority. Only the first call reports it.
    pub fn player_death(&mut self) -> bool {
        if !self.actor.alive {
            return false;
        }
        self.actor.alive = false;
        info!(player = %self.actor.name, "Player died");
        self.sink.send(ClientMsg::Death {
            sender: self.actor.name.to_string(),
        });
        true
    }

    /// Use up the escape capability, if any
    pub fn take_escape(&mut self) -> bool {
        std::mem::take(&mut self.can_escape)
    }

    pub fn set_bomb_type(&mut self, bomb_type: u32) {
        self.bomb_type = bomb_type;
    }

    pub fn is_moving(&self) -> bool {
        self.state == ControllerState::Moving
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn bombs(&self) -> &ActionThrottle {
        &self.bombs
    }

    pub fn blast_range_bonus(&self) -> u32 {
        self.blast_range_bonus
    }

    pub fn can_escape(&self) -> bool {
        self.can_escape
    }
}

impl ActorView for LocalPlayerController {
    fn actor(&self) -> &Actor {
        &self.actor
    }
}
