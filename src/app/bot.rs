//! Seeded random input source for headless runs

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::debug;

use super::session::InputEvent;

const DIRECTION_KEYS: [&str; 4] = ["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight"];
const BOMB_KEY: &str = " ";

/// Produces key edges the way a restless player would: hold one direction
/// for a while, switch, occasionally drop a bomb.
#[derive(Debug)]
pub struct InputBot {
    rng: ChaCha8Rng,
    held: Option<&'static str>,
    bomb_chance: f64,
}

impl InputBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            held: None,
            bomb_chance: 0.15,
        }
    }

    /// Edges for the next decision point
    pub fn next_edges(&mut self) -> Vec<InputEvent> {
        let mut edges = Vec::with_capacity(3);

        let key = DIRECTION_KEYS[self.rng.gen_range(0..DIRECTION_KEYS.len())];
        if self.held != Some(key) {
            if let Some(previous) = self.held.take() {
                edges.push(InputEvent::KeyUp(previous.to_string()));
            }
            edges.push(InputEvent::KeyDown(key.to_string()));
            self.held = Some(key);
        }

        if self.rng.gen_bool(self.bomb_chance) {
            edges.push(InputEvent::KeyDown(BOMB_KEY.to_string()));
            edges.push(InputEvent::KeyUp(BOMB_KEY.to_string()));
        }

        edges
    }

    /// Feed edges into a session every `pace` until the session goes away
    pub async fn run(mut self, input_tx: mpsc::Sender<InputEvent>, pace: Duration) {
        let mut ticker = interval(pace);
        loop {
            ticker.tick().await;
            for edge in self.next_edges() {
                if input_tx.send(edge).await.is_err() {
                    debug!("Session gone, bot stopping");
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_edges() {
        let mut a = InputBot::new(99);
        let mut b = InputBot::new(99);
        for _ in 0..50 {
            assert_eq!(a.next_edges(), b.next_edges());
        }
    }

    #[test]
    fn switching_direction_releases_the_previous_key() {
        let mut bot = InputBot::new(3);
        let mut held: Option<String> = None;
        for _ in 0..100 {
            for edge in bot.next_edges() {
                match edge {
                    InputEvent::KeyDown(key) if key != BOMB_KEY => {
                        assert!(held.is_none(), "pressed {key} while holding {held:?}");
                        held = Some(key);
                    }
                    InputEvent::KeyUp(key) if key != BOMB_KEY => {
                        assert_eq!(held.as_deref(), Some(key.as_str()));
                        held = None;
                    }
                    _ => {}
                }
            }
        }
    }
}
