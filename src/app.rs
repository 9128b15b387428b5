//! Session: one engine plus the collaborators that draw it, feed it input
//! and display its score.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::GameConfig;
use crate::error::Result;
use crate::game::{Game, GameEvent, Snapshot};
use crate::input::Command;

/// Everything a renderer needs for one frame.
#[derive(Clone, Copy, Debug)]
pub struct View<'a> {
    pub snapshot: Snapshot<'a>,
    pub lines_cleared: u32,
    pub last_event: Option<&'a GameEvent>,
}

pub trait Renderer {
    fn draw(&mut self, view: &View<'_>) -> Result<()>;
}

pub trait InputSource {
    /// Waits up to `timeout` for the next command. `Ok(None)` means nothing
    /// arrived in time.
    fn next_command(&mut self, timeout: Duration) -> Result<Option<Command>>;
}

pub trait ScoreSink {
    fn show_score(&mut self, score: u32) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Cloneable request to end [`App::run`] after the current step.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct App<R, I, S> {
    game: Game,
    renderer: R,
    input: I,
    score_sink: S,
    frame: Duration,
    stop: StopHandle,
    reported_score: Option<u32>,
    lines_cleared: u32,
    last_event: Option<GameEvent>,
}

impl<R: Renderer, I: InputSource, S: ScoreSink> App<R, I, S> {
    pub fn new(game: Game, renderer: R, input: I, score_sink: S, config: &GameConfig) -> Self {
        Self {
            game,
            renderer,
            input,
            score_sink,
            frame: config.frame_duration(),
            stop: StopHandle::default(),
            reported_score: None,
            lines_cleared: 0,
            last_event: None,
        }
    }

    /// One pass of the loop: apply queued commands in order, advance the drop
    /// timer by `elapsed`, publish the score if it moved, then draw.
    pub fn step(&mut self, elapsed: Duration) -> Result<Flow> {
        let mut wait = self.frame;
        while let Some(command) = self.input.next_command(wait)? {
            wait = Duration::ZERO;
            if command == Command::Quit {
                self.render()?;
                return Ok(Flow::Quit);
            }
            command.apply(&mut self.game);
            self.drain_events();
        }

        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.game.tick(elapsed_ms);
        self.drain_events();

        let score = self.game.score();
        if self.reported_score != Some(score) {
            self.score_sink.show_score(score)?;
            self.reported_score = Some(score);
        }

        self.render()?;
        Ok(Flow::Continue)
    }

    /// Steps with wall-clock time until a quit command or a stop request.
    pub fn run(&mut self) -> Result<()> {
        let mut last = Instant::now();
        while !self.stop.is_stopped() {
            let now = Instant::now();
            let elapsed = now.duration_since(last);
            last = now;
            if self.step(elapsed)? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn score_sink(&self) -> &S {
        &self.score_sink
    }

    pub fn into_game(self) -> Game {
        self.game
    }

    fn drain_events(&mut self) {
        for event in self.game.take_events() {
            if let GameEvent::LinesCleared(n) = event {
                self.lines_cleared += n;
            }
            self.last_event = Some(event);
        }
    }

    fn render(&mut self) -> Result<()> {
        let view = View {
            snapshot: self.game.snapshot(),
            lines_cleared: self.lines_cleared,
            last_event: self.last_event.as_ref(),
        };
        self.renderer.draw(&view)
    }
}
