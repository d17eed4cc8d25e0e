//! Per-session cooperative loop: input edges, authority messages, frames

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Notify};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::game::actor::{present, Actor, ActorView, RenderSurface};
use crate::game::bonus::{BonusPickup, BonusSet};
use crate::game::collision::{CollisionResolver, OpenField, TileMap, TriggerResolver};
use crate::game::controller::{KeyOutcome, LocalPlayerController, TickOutcome, World};
use crate::game::pool::MoveObjectPool;
use crate::game::remote::RemotePlayerView;
use crate::game::tuning::{PlayerTuning, SPRITE_SHEETS};
use crate::ws::protocol::{Position, ServerMsg};

/// Raw key edge from the input surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(String),
    KeyUp(String),
}

/// Sending half held by the host. Dropping `input_tx` unsubscribes input and
/// ends the session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub input_tx: mpsc::Sender<InputEvent>,
    pub inbound_tx: mpsc::Sender<ServerMsg>,
    shutdown: Arc<Notify>,
}

impl SessionHandle {
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }
}

/// Receiving half consumed by `Session::run`
#[derive(Debug)]
pub struct SessionInbox {
    input_rx: mpsc::Receiver<InputEvent>,
    inbound_rx: mpsc::Receiver<ServerMsg>,
    shutdown: Arc<Notify>,
}

/// Create the channels connecting a host to a session
pub fn session_channels(capacity: usize) -> (SessionHandle, SessionInbox) {
    let (input_tx, input_rx) = mpsc::channel(capacity);
    let (inbound_tx, inbound_rx) = mpsc::channel(capacity);
    let shutdown = Arc::new(Notify::new());
    (
        SessionHandle {
            input_tx,
            inbound_tx,
            shutdown: shutdown.clone(),
        },
        SessionInbox {
            input_rx,
            inbound_rx,
            shutdown,
        },
    )
}

/// State of the local player when the session ended
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub frames: u64,
    pub position: Position,
    pub alive: bool,
    pub life: u32,
    pub bombs_in_flight: u32,
}

/// One player's session: the local controller, replayed remotes, the pickup
/// working set and the render surface.
pub struct Session {
    controller: LocalPlayerController,
    remotes: HashMap<String, RemotePlayerView>,
    bonuses: BonusSet,
    map: Option<TileMap>,
    surface: Box<dyn RenderSurface>,
    pool: MoveObjectPool,
    tuning: PlayerTuning,
    frame_interval: Duration,
    frames: u64,
}

impl Session {
    pub fn new(
        controller: LocalPlayerController,
        map: Option<TileMap>,
        surface: Box<dyn RenderSurface>,
        tuning: PlayerTuning,
        frame_interval: Duration,
    ) -> Self {
        Self {
            controller,
            remotes: HashMap::new(),
            bonuses: BonusSet::new(),
            map,
            surface,
            pool: MoveObjectPool::new(),
            tuning,
            frame_interval,
            frames: 0,
        }
    }

    pub fn insert_bonus(&mut self, pickup: BonusPickup) {
        self.bonuses.insert(pickup);
    }

    /// Run until shutdown or until the host drops its handle
    pub async fn run(mut self, inbox: SessionInbox) -> SessionReport {
        let SessionInbox {
            mut input_rx,
            mut inbound_rx,
            shutdown,
        } = inbox;

        let name = self.controller.name().to_string();
        info!(player = %name, "Session started");
        present(&self.controller, self.surface.as_mut());

        let mut frames = interval(self.frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let moving = self.controller.is_moving();
            tokio::select! {
                biased;

                _ = shutdown.notified() => {
                    info!(player = %name, "Session shutdown requested");
                    break;
                }
                msg = inbound_rx.recv() => match msg {
                    Some(msg) => {
                        if self.handle_server_msg(msg) {
                            frames.reset();
                        }
                    }
                    None => {
                        debug!(player = %name, "Inbound channel closed");
                        break;
                    }
                },
                event = input_rx.recv() => match event {
                    Some(event) => {
                        if self.handle_input(event) {
                            // first frame runs on the edge itself
                            self.run_frame();
                            frames.reset();
                        }
                    }
                    None => {
                        debug!(player = %name, "Input subscription dropped");
                        break;
                    }
                },
                _ = frames.tick(), if moving => {
                    self.run_frame();
                }
            }
        }

        self.teardown()
    }

    /// Returns true when the edge asks for the frame loop to resume
    fn handle_input(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::KeyDown(key) => match self.controller.on_key_down(&key) {
                KeyOutcome::Direction { resume } => resume,
                KeyOutcome::Bomb { .. } | KeyOutcome::Ignored => false,
            },
            InputEvent::KeyUp(key) => {
                self.controller.on_key_up(&key);
                false
            }
        }
    }

    fn run_frame(&mut self) {
        let (collision, triggers): (&dyn CollisionResolver, &dyn TriggerResolver) =
            match &self.map {
                Some(map) => (map as &dyn CollisionResolver, map as &dyn TriggerResolver),
                None => (&OpenField as &dyn CollisionResolver, &OpenField as &dyn TriggerResolver),
            };
        let mut world = World {
            collision,
            triggers,
            bonuses: &mut self.bonuses,
        };

        self.frames += 1;
        match self.controller.step(&mut world) {
            TickOutcome::Moved => present(&self.controller, self.surface.as_mut()),
            TickOutcome::Stationary => {
                trace!(player = %self.controller.name(), "Stationary, frame loop suspended");
            }
        }
    }

    fn is_local(&self, sender: &str) -> bool {
        sender == self.controller.name()
    }

    /// Returns true when the message restarted the frame loop
    fn handle_server_msg(&mut self, msg: ServerMsg) -> bool {
        match msg {
            ServerMsg::Lock => {
                self.controller.set_locked(true);
            }
            ServerMsg::Unlock => {
                if self.controller.set_locked(false) {
                    self.run_frame();
                    return true;
                }
            }
            ServerMsg::Join {
                sender,
                index,
                position,
            } => {
                if self.is_local(&sender) || self.remotes.contains_key(&sender) {
                    return false;
                }
                if index >= SPRITE_SHEETS {
                    warn!(player = %sender, index, "Sprite sheet index out of range, clamping");
                }
                info!(player = %sender, index, "Remote player joined");
                let actor = Actor::new(sender.as_str(), index, position, &self.tuning);
                let view = RemotePlayerView::new(actor, &self.tuning);
                present(&view, self.surface.as_mut());
                self.remotes.insert(sender, view);
            }
            ServerMsg::Leave { sender } => {
                if self.remotes.remove(&sender).is_some() {
                    info!(player = %sender, "Remote player left");
                    self.surface.remove(&sender);
                }
            }
            ServerMsg::Move {
                sender,
                direction,
                position,
            } => {
                if self.is_local(&sender) {
                    // locally predicted already
                    return false;
                }
                let Some(view) = self.remotes.get_mut(&sender) else {
                    debug!(player = %sender, "Move for unknown remote player");
                    return false;
                };
                let record = self
                    .pool
                    .acquire(view.actor().name.clone(), direction, position);
                view.apply_move(&record);
                self.pool.release(record);
                present(&*view, self.surface.as_mut());
            }
            ServerMsg::BombExploded { sender } => {
                if self.is_local(&sender) {
                    self.controller.bomb_exploded();
                }
            }
            ServerMsg::Bonus { sender, data } => {
                let removed = self.bonuses.invalidate(data.cell());
                debug!(player = %sender, kind = %data.bonus, removed, "Bonus invalidated");
            }
            ServerMsg::SpawnBonus { data } => {
                let cell = data.cell();
                self.bonuses.insert(BonusPickup::new(data.bonus, cell));
            }
            ServerMsg::Blast { target } => {
                if self.is_local(&target) {
                    self.controller.trigger_blast();
                }
            }
            ServerMsg::Death { sender } => {
                if self.is_local(&sender) {
                    if self.controller.player_death() {
                        present(&self.controller, self.surface.as_mut());
                    }
                } else if let Some(view) = self.remotes.get_mut(&sender) {
                    view.die();
                    present(&*view, self.surface.as_mut());
                }
            }
            ServerMsg::Unknown => {
                debug!("Ignoring unknown server message");
            }
        }
        false
    }

    fn teardown(mut self) -> SessionReport {
        for name in self.remotes.keys() {
            self.surface.remove(name);
        }
        self.surface.remove(self.controller.name());

        let actor = self.controller.actor();
        let report = SessionReport {
            frames: self.frames,
            position: actor.position(),
            alive: actor.alive,
            life: actor.life,
            bombs_in_flight: self.controller.bombs().in_flight(),
        };
        info!(
            player = %actor.name,
            frames = report.frames,
            x = report.position.x,
            y = report.position.y,
            "Session ended"
        );
        report
    }
}
