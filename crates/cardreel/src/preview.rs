//! Live preview: a carousel bound to a rendering surface.
//!
//! [`LivePreviewHost`] owns one [`CarouselEngine`] over the current vendor
//! list and presents a [`Frame`] to its [`Surface`] whenever what is shown
//! changes. The host itself is synchronous and takes time explicitly, which
//! is how tests drive it. [`spawn`] moves a host onto a worker thread that
//! waits on a command channel with the engine's next deadline as timeout.
//!
//! Teardown is deterministic: dropping the [`PreviewHandle`] sends
//! [`Command::Shutdown`] and joins the thread, and the engine is paused
//! before the thread exits.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use cardreel_render::{center_to_width, layout_card, registry, render_card_term, CardLayout};
use console::{Style, Term};

use crate::carousel::CarouselEngine;
use crate::vendor::Vendor;

/// How long the worker waits for commands while nothing is scheduled.
const IDLE_WAIT: Duration = Duration::from_millis(250);

/// Everything a surface needs to draw the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub layout: CardLayout,
    pub index: Option<usize>,
    pub total: usize,
    pub playing: bool,
    pub style_key: String,
}

/// A place frames are presented to.
pub trait Surface: Send {
    fn present(&mut self, frame: &Frame) -> io::Result<()>;
}

/// Messages accepted by a running preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play,
    Pause,
    Toggle,
    Next,
    Prev,
    JumpTo(usize),
    SetVendors(Vec<Vendor>),
    SetStyle(String),
    SetDuration(Duration),
    Shutdown,
}

pub struct LivePreviewHost<S: Surface> {
    engine: CarouselEngine<Vendor>,
    surface: S,
    presented: usize,
}

impl<S: Surface> LivePreviewHost<S> {
    pub fn new(vendors: Vec<Vendor>, style_key: &str, duration: Duration, surface: S) -> Self {
        Self {
            engine: CarouselEngine::new(vendors, style_key, duration),
            surface,
            presented: 0,
        }
    }

    pub fn engine(&self) -> &CarouselEngine<Vendor> {
        &self.engine
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> usize {
        self.presented
    }

    /// The frame for the current state.
    pub fn frame(&self) -> Frame {
        let style = registry().get(self.engine.style_key());
        let layout = match self.engine.current() {
            Some(vendor) => layout_card(&vendor.card_source(), style),
            None => CardLayout::empty(style),
        };
        Frame {
            layout,
            index: self.engine.current_index(),
            total: self.engine.len(),
            playing: self.engine.is_playing(),
            style_key: style.key.clone(),
        }
    }

    /// Presents the current frame. Surface failures are logged, not fatal.
    pub fn present(&mut self) {
        let frame = self.frame();
        match self.surface.present(&frame) {
            Ok(()) => self.presented += 1,
            Err(err) => log::warn!("preview surface failed to present: {}", err),
        }
    }

    /// Applies one command at time `now` and re-presents.
    ///
    /// Returns `false` once the host has shut down.
    pub fn handle(&mut self, command: Command, now: Duration) -> bool {
        log::debug!("preview command {:?}", command);
        match command {
            Command::Play => self.engine.play(now),
            Command::Pause => self.engine.pause(),
            Command::Toggle => self.engine.toggle(now),
            Command::Next => self.engine.advance(now),
            Command::Prev => self.engine.retreat(now),
            Command::JumpTo(index) => self.engine.jump_to(index, now),
            Command::SetVendors(vendors) => self.engine.set_items(vendors),
            Command::SetStyle(key) => self.engine.set_style(key),
            Command::SetDuration(duration) => self.engine.set_duration(duration, now),
            Command::Shutdown => {
                self.shutdown();
                return false;
            }
        }
        self.present();
        true
    }

    /// Fires advances already due at `now`, then applies `command`.
    ///
    /// An overdue advance is never postponed by a busy command channel.
    pub fn receive(&mut self, command: Command, now: Duration) -> bool {
        self.tick(now);
        self.handle(command, now)
    }

    /// Fires due advances and re-presents if anything changed.
    pub fn tick(&mut self, now: Duration) {
        if self.engine.poll(now) > 0 {
            self.present();
        }
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.engine.next_deadline()
    }

    /// Pauses the engine so nothing stays scheduled.
    pub fn shutdown(&mut self) {
        self.engine.pause();
    }
}

/// Handle to a preview running on its own thread.
pub struct PreviewHandle<S: Surface + 'static> {
    sender: Sender<Command>,
    thread: Option<JoinHandle<LivePreviewHost<S>>>,
}

impl<S: Surface + 'static> PreviewHandle<S> {
    /// Sends a command. Returns `false` if the preview has already stopped.
    pub fn send(&self, command: Command) -> bool {
        self.sender.send(command).is_ok()
    }

    /// Stops the preview and returns the host for inspection.
    pub fn join(mut self) -> Option<LivePreviewHost<S>> {
        self.stop()
    }

    fn stop(&mut self) -> Option<LivePreviewHost<S>> {
        let thread = self.thread.take()?;
        let _ = self.sender.send(Command::Shutdown);
        match thread.join() {
            Ok(host) => Some(host),
            Err(_) => {
                log::error!("preview thread panicked");
                None
            }
        }
    }
}

impl<S: Surface + 'static> Drop for PreviewHandle<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Runs `host` on a worker thread, starting playback unless `paused`.
pub fn spawn<S: Surface + 'static>(mut host: LivePreviewHost<S>, paused: bool) -> PreviewHandle<S> {
    let (sender, receiver) = mpsc::channel::<Command>();
    let thread = thread::spawn(move || {
        let epoch = Instant::now();
        if !paused {
            host.engine.play(Duration::ZERO);
        }
        host.present();
        loop {
            let now = epoch.elapsed();
            let wait = host
                .next_deadline()
                .map(|deadline| deadline.saturating_sub(now))
                .unwrap_or(IDLE_WAIT);
            match receiver.recv_timeout(wait) {
                Ok(command) => {
                    if !host.receive(command, epoch.elapsed()) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => host.tick(epoch.elapsed()),
                Err(RecvTimeoutError::Disconnected) => {
                    host.shutdown();
                    break;
                }
            }
        }
        log::debug!("preview thread exiting");
        host
    });
    PreviewHandle {
        sender,
        thread: Some(thread),
    }
}

/// Renders a frame as terminal text: the card followed by a status line.
pub fn render_frame_text(frame: &Frame, width: usize, styled: bool) -> String {
    let style = registry().get(&frame.style_key);
    let mut out = render_card_term(&frame.layout, style, width, styled);

    let position = match frame.index {
        Some(index) => format!("{}/{}", index + 1, frame.total),
        None => "0/0".to_string(),
    };
    let state = if frame.playing { "▶" } else { "❚❚" };
    let status = format!(
        "{} {}  ·  {} {}  ·  共 {} 位廠商",
        state, position, style.label, style.sub_label, frame.total
    );
    let hint = "space 播放/暫停  ←/→ 切換  q 離開";
    let muted = Style::new().fg(style.muted.to_console()).force_styling(styled);

    out.push('\n');
    out.push_str(&center_to_width(&status, width));
    out.push('\n');
    out.push_str(&muted.apply_to(center_to_width(hint, width)).to_string());
    out.push('\n');
    out
}

/// Draws frames in place on a terminal.
pub struct TerminalSurface {
    term: Term,
    drawn_lines: usize,
}

impl TerminalSurface {
    pub fn stdout() -> Self {
        Self {
            term: Term::stdout(),
            drawn_lines: 0,
        }
    }
}

impl Surface for TerminalSurface {
    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        let (_, columns) = self.term.size();
        let styled = self.term.features().colors_supported();
        let text = render_frame_text(frame, columns as usize, styled);
        if self.drawn_lines > 0 {
            self.term.clear_last_lines(self.drawn_lines)?;
        }
        self.term.write_str(&text)?;
        self.drawn_lines = text.lines().count();
        Ok(())
    }
}

/// Keeps every presented frame; shares them with clones.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    frames: Arc<Mutex<Vec<Frame>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<Frame> {
        self.frames
            .lock()
            .map(|frames| frames.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Frame> {
        self.frames().pop()
    }
}

impl Surface for RecordingSurface {
    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        let mut frames = self
            .frames
            .lock()
            .map_err(|_| io::Error::other("recording poisoned"))?;
        frames.push(frame.clone());
        Ok(())
    }
}
