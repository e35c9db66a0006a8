//! Key handling and the frame loop.

use std::time::{Duration, Instant};

use aurora_synth::{
    engine::{CARD_BASE_PITCH, EXPLORE_PITCH},
    platform::CpalPlatform,
    visual::{RenderLoop, VisualFrame},
    voices::equal_tempered,
    Engine, EngineConfig, EngineError,
};
use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{layout::Rect, DefaultTerminal};
use tracing::info;

use crate::ui::{self, Status, View};

const LEVEL_STEP: f32 = 0.05;

pub struct App {
    engine: Engine<CpalPlatform>,
    render: RenderLoop,
    frame_interval: Duration,
    pixel_ratio: f32,
    frame: Option<VisualFrame>,
    scope: Vec<f32>,
    notice: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(config: EngineConfig, fps: u32, pixel_ratio: f32) -> EyreResult<Self> {
        let engine = Engine::new(CpalPlatform::new(), config)?;
        Ok(Self {
            engine,
            render: RenderLoop::new(),
            frame_interval: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            pixel_ratio,
            frame: None,
            scope: Vec::new(),
            notice: Some("press [S] to start audio".into()),
            should_quit: false,
        })
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        let size = terminal.size()?;
        self.render
            .mount(ui::spectrum_viewport(Rect::new(0, 0, size.width, size.height), self.pixel_ratio));

        while !self.should_quit {
            let started = Instant::now();

            // Before activation there is no snapshot, just the background
            let snapshot = self.engine.is_active().then(|| self.engine.snapshot());
            self.frame = self.render.tick(snapshot.as_deref());
            self.scope.clear();
            if let Some(snapshot) = &snapshot {
                self.scope.extend_from_slice(snapshot.time_domain());
            }

            terminal.draw(|frame| {
                let view = View {
                    frame: self.frame.as_ref(),
                    scope: &self.scope,
                    status: self.status(),
                };
                ui::render(frame, &view);
            })?;

            let timeout = self.frame_interval.saturating_sub(started.elapsed());
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key.code),
                    Event::Resize(width, height) => self.render.resize(ui::spectrum_viewport(
                        Rect::new(0, 0, width, height),
                        self.pixel_ratio,
                    )),
                    _ => {}
                }
            }
        }

        self.render.cancel();
        Ok(())
    }

    fn status(&self) -> Status<'_> {
        Status {
            running: self.engine.is_active(),
            mic: self.engine.capture_enabled(),
            pad: self.engine.pad_active(),
            level: self.engine.level(),
            sample_rate: self.engine.output_config().map(|c| c.sample_rate),
            notice: self.notice.as_deref(),
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let result = match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                Ok(())
            }
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Enter => self.engine.activate().map(|_| ()),
            KeyCode::Char(' ') => self.engine.pluck(EXPLORE_PITCH),
            KeyCode::Char(c @ '1'..='9') => {
                let card = c as i32 - '1' as i32;
                self.engine.pluck(equal_tempered(CARD_BASE_PITCH, card))
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                if self.engine.capture_enabled() {
                    self.engine.disable_capture()
                } else {
                    self.engine.enable_capture()
                }
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                if self.engine.pad_active() {
                    self.engine.pad_stop()
                } else {
                    self.engine.pad_start()
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => {
                self.nudge_level(LEVEL_STEP);
                Ok(())
            }
            KeyCode::Char('-') | KeyCode::Down => {
                self.nudge_level(-LEVEL_STEP);
                Ok(())
            }
            _ => Ok(()),
        };

        self.notice = match result {
            Ok(()) if self.engine.is_active() => None,
            Ok(()) => self.notice.take(),
            Err(EngineError::Inactive) => Some("press [S] to start audio".into()),
            Err(err) => Some(err.to_string()),
        };
    }

    fn nudge_level(&mut self, delta: f32) {
        let level = self.engine.set_level(self.engine.level() + delta);
        info!(level, "level changed");
    }
}
