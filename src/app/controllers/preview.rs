//! Debounced live preview.
//!
//! [`RenderScheduler`] is a two-state machine (Idle / PendingRender) over an
//! injected [`Clock`]. Every document change re-arms the full delay, so a burst
//! of keystrokes produces one render once typing pauses. The host event loop
//! calls [`PreviewController::tick`] periodically; the render itself always
//! reads the document as it is at that moment.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::app::domain::{AppSettings, Document};
use crate::app::infrastructure::clock::Clock;
use crate::app::infrastructure::error::Result;
use crate::app::infrastructure::preview_surface::PreviewSurface;
use crate::app::services::assembler::ShellOptions;
use crate::app::services::pipeline::render_document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    PendingRender { deadline: Instant },
}

pub struct RenderScheduler<C: Clock> {
    clock: C,
    delay: Duration,
    state: SchedulerState,
}

impl<C: Clock> RenderScheduler<C> {
    pub fn new(clock: C, delay: Duration) -> Self {
        Self {
            clock,
            delay,
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, SchedulerState::PendingRender { .. })
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Arm the timer, or push an armed one back to the full delay.
    pub fn notify_change(&mut self) {
        let deadline = self.clock.now() + self.delay;
        if self.is_pending() {
            debug!("render timer reset");
        } else {
            debug!(delay_ms = self.delay.as_millis() as u64, "render timer armed");
        }
        self.state = SchedulerState::PendingRender { deadline };
    }

    /// Time until the pending render fires; `None` when idle.
    pub fn time_remaining(&self) -> Option<Duration> {
        match self.state {
            SchedulerState::Idle => None,
            SchedulerState::PendingRender { deadline } => {
                Some(deadline.saturating_duration_since(self.clock.now()))
            }
        }
    }

    /// Returns true exactly once per armed timer, when it has expired.
    pub fn poll(&mut self) -> bool {
        match self.state {
            SchedulerState::PendingRender { deadline } if self.clock.now() >= deadline => {
                self.state = SchedulerState::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.state = SchedulerState::Idle;
    }
}

/// Derived preview state for one editor session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderState {
    pub last_html: Option<String>,
    /// Document changed since the last completed render.
    pub dirty: bool,
    pub render_count: usize,
}

pub struct PreviewController<S: PreviewSurface, C: Clock> {
    scheduler: RenderScheduler<C>,
    surface: S,
    options: ShellOptions,
    state: RenderState,
}

impl<S: PreviewSurface, C: Clock> PreviewController<S, C> {
    pub fn new(surface: S, clock: C, settings: &AppSettings) -> Self {
        Self {
            scheduler: RenderScheduler::new(clock, settings.debounce()),
            surface,
            options: ShellOptions::from_settings(settings),
            state: RenderState::default(),
        }
    }

    pub fn apply_settings(&mut self, settings: &AppSettings) {
        self.scheduler.set_delay(settings.debounce());
        self.options = ShellOptions::from_settings(settings);
    }

    pub fn on_document_changed(&mut self) {
        self.state.dirty = true;
        self.scheduler.notify_change();
    }

    /// Render if the debounce timer has expired. Returns whether a pass ran.
    /// A failed publish re-arms the timer so the next tick retries.
    pub fn tick(&mut self, doc: &Document) -> Result<bool> {
        if !self.scheduler.poll() {
            return Ok(false);
        }
        if let Err(e) = self.render(doc) {
            self.scheduler.notify_change();
            return Err(e);
        }
        Ok(true)
    }

    /// Render immediately, dropping any pending timer.
    pub fn render_now(&mut self, doc: &Document) -> Result<()> {
        self.scheduler.cancel();
        self.render(doc)
    }

    pub fn time_until_render(&self) -> Option<Duration> {
        self.scheduler.time_remaining()
    }

    pub fn scheduler(&self) -> &RenderScheduler<C> {
        &self.scheduler
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn render(&mut self, doc: &Document) -> Result<()> {
        let hint = doc.path().and_then(|p| p.to_str());
        let output = render_document(doc.text(), hint, &self.options);
        self.surface.show(&output.html)?;

        self.state.last_html = Some(output.html);
        self.state.dirty = false;
        self.state.render_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::infrastructure::clock::ManualClock;
    use crate::app::infrastructure::error::AppError;
    use crate::app::infrastructure::preview_surface::MemoryPreviewSurface;

    const DELAY: Duration = Duration::from_millis(150);

    fn controller(clock: &ManualClock) -> PreviewController<MemoryPreviewSurface, ManualClock> {
        PreviewController::new(MemoryPreviewSurface::new(), clock.clone(), &AppSettings::default())
    }

    #[test]
    fn test_scheduler_starts_idle() {
        let clock = ManualClock::new();
        let mut scheduler = RenderScheduler::new(clock, DELAY);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.time_remaining(), None);
        assert!(!scheduler.poll());
    }

    #[test]
    fn test_scheduler_fires_after_delay() {
        let clock = ManualClock::new();
        let mut scheduler = RenderScheduler::new(clock.clone(), DELAY);
        scheduler.notify_change();
        assert_eq!(scheduler.time_remaining(), Some(DELAY));

        clock.advance(Duration::from_millis(149));
        assert!(!scheduler.poll());
        assert_eq!(scheduler.time_remaining(), Some(Duration::from_millis(1)));

        clock.advance(Duration::from_millis(1));
        assert!(scheduler.poll());
        assert!(!scheduler.is_pending());
        assert!(!scheduler.poll());
    }

    #[test]
    fn test_scheduler_reset_extends_deadline() {
        let clock = ManualClock::new();
        let mut scheduler = RenderScheduler::new(clock.clone(), DELAY);
        scheduler.notify_change();
        clock.advance(Duration::from_millis(100));
        scheduler.notify_change();
        clock.advance(Duration::from_millis(100));
        assert!(!scheduler.poll());
        clock.advance(Duration::from_millis(50));
        assert!(scheduler.poll());
    }

    #[test]
    fn test_scheduler_cancel() {
        let clock = ManualClock::new();
        let mut scheduler = RenderScheduler::new(clock.clone(), DELAY);
        scheduler.notify_change();
        scheduler.cancel();
        clock.advance(DELAY * 2);
        assert!(!scheduler.poll());
    }

    #[test]
    fn test_burst_coalesces_into_one_render_of_latest_state() {
        let clock = ManualClock::new();
        let mut preview = controller(&clock);
        let mut doc = Document::new_untitled();

        for c in "# Hello".chars() {
            doc.insert_text(&c.to_string());
            preview.on_document_changed();
            clock.advance(Duration::from_millis(40));
            assert!(!preview.tick(&doc).unwrap());
        }
        assert!(preview.state().dirty);

        clock.advance(DELAY);
        assert!(preview.tick(&doc).unwrap());
        assert!(!preview.tick(&doc).unwrap());

        assert_eq!(preview.surface().pages().len(), 1);
        assert_eq!(preview.state().render_count, 1);
        assert!(!preview.state().dirty);
        assert!(preview.surface().last().unwrap().contains("<h1>Hello</h1>"));
    }

    #[test]
    fn test_render_reflects_document_when_timer_fires() {
        let clock = ManualClock::new();
        let mut preview = controller(&clock);
        let mut doc = Document::new_untitled();
        doc.insert_text("first");
        preview.on_document_changed();
        clock.advance(DELAY);
        // Edited after arming but before the tick: the tick sees the new text.
        doc.set_text("second", true);
        assert!(preview.tick(&doc).unwrap());
        let html = preview.state().last_html.clone().unwrap();
        assert!(html.contains("second"));
        assert!(!html.contains("first"));
    }

    #[test]
    fn test_render_now_bypasses_timer() {
        let clock = ManualClock::new();
        let mut preview = controller(&clock);
        let doc = Document::new_untitled();
        preview.on_document_changed();
        preview.render_now(&doc).unwrap();
        assert!(!preview.scheduler().is_pending());
        assert!(preview.surface().last().unwrap().contains("class=\"welcome\""));
        clock.advance(DELAY);
        assert!(!preview.tick(&doc).unwrap());
        assert_eq!(preview.surface().pages().len(), 1);
    }

    #[test]
    fn test_mdx_file_hint_used() {
        let clock = ManualClock::new();
        let mut preview = controller(&clock);
        let doc = Document::new_from_file("page.mdx".into(), "<Hero />\n");
        preview.render_now(&doc).unwrap();
        assert!(preview.surface().last().unwrap().contains("language-jsx"));
    }

    struct FailingSurface;

    impl PreviewSurface for FailingSurface {
        fn show(&mut self, _html: &str) -> Result<()> {
            Err(AppError::Export("surface gone".to_string()))
        }
    }

    #[test]
    fn test_failed_publish_keeps_dirty_and_retries() {
        let clock = ManualClock::new();
        let mut preview = PreviewController::new(FailingSurface, clock.clone(), &AppSettings::default());
        let doc = Document::new_untitled();
        preview.on_document_changed();
        clock.advance(DELAY);
        assert!(preview.tick(&doc).is_err());
        assert!(preview.state().dirty);
        assert!(preview.state().last_html.is_none());

        // Retried after another full delay, without a further edit.
        assert!(preview.scheduler().is_pending());
        assert!(!preview.tick(&doc).unwrap());
        clock.advance(DELAY);
        assert!(preview.tick(&doc).is_err());
        assert!(preview.scheduler().is_pending());
    }

    #[test]
    fn test_apply_settings_changes_delay() {
        let clock = ManualClock::new();
        let mut preview = controller(&clock);
        let settings = AppSettings {
            debounce_ms: 500,
            ..AppSettings::default()
        };
        preview.apply_settings(&settings);
        assert_eq!(preview.scheduler().delay(), Duration::from_millis(500));
    }
}
