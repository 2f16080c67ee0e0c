//! Per-tick input sources and the stdin key reader thread.

pub mod events;
pub mod manager;

use crate::input::events::{PressedDirections, RawInputEvent};
use crate::input::manager::InputManager;
use crate::models::engine::Chart;
use crossbeam_channel::{Receiver, Sender};
use std::io::BufRead;
use std::sync::Arc;
use std::thread;

/// Collaborator queried once per tick for newly pressed directions.
pub trait InputSource {
    fn poll(&mut self, position_beats: f64) -> PressedDirections;

    /// Called after a transport seek.
    fn seek(&mut self, _position_beats: f64) {}
}

/// Presses nothing, ever.
#[derive(Debug, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self, _position_beats: f64) -> PressedDirections {
        PressedDirections::empty()
    }
}

/// Drains queued key events through an `InputManager`.
pub struct KeyboardInput {
    manager: InputManager,
    events: Receiver<RawInputEvent>,
}

impl KeyboardInput {
    pub fn new(manager: InputManager, events: Receiver<RawInputEvent>) -> Self {
        Self { manager, events }
    }
}

impl InputSource for KeyboardInput {
    fn poll(&mut self, _position_beats: f64) -> PressedDirections {
        for event in self.events.try_iter() {
            self.manager.process(&event);
        }
        self.manager.take_pressed()
    }
}

/// Presses every note's direction on the first tick its onset is reached.
pub struct Autoplay {
    chart: Arc<Chart>,
    next: usize,
}

impl Autoplay {
    pub fn new(chart: Arc<Chart>) -> Self {
        Self { chart, next: 0 }
    }
}

impl InputSource for Autoplay {
    fn poll(&mut self, position_beats: f64) -> PressedDirections {
        let mut pressed = PressedDirections::empty();
        while let Some(note) = self.chart.note(self.next) {
            if note.onset_beat > position_beats {
                break;
            }
            pressed.press(note.direction);
            self.next += 1;
        }
        pressed
    }

    fn seek(&mut self, position_beats: f64) {
        self.next = self
            .chart
            .notes()
            .iter()
            .take_while(|note| note.onset_beat < position_beats)
            .count();
    }
}

/// Reads key labels from stdin, one per line, and forwards each as a
/// press followed by a release. Stops at end of input or when the
/// receiving side is gone.
pub fn start_stdin_thread(tx: Sender<RawInputEvent>) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("Input Thread".to_string())
        .spawn(move || {
            log::info!("INPUT: Thread started");

            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                let key = line.trim();
                if key.is_empty() {
                    continue;
                }
                let sent = tx
                    .send(RawInputEvent::pressed(key))
                    .and_then(|_| tx.send(RawInputEvent::released(key)));
                if let Err(e) = sent {
                    log::error!("INPUT: Failed to send key (Logic thread died?): {}", e);
                    break;
                }
            }

            log::info!("INPUT: Thread stopped");
        })
        .expect("Failed to spawn Input thread")
}
