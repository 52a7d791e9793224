//! Proportional scroll coupling between the source pane and the preview.
//!
//! Moving one pane programmatically makes it emit its own scroll event. The
//! synchronizer keeps a single-slot lock naming the pane that started the
//! current cycle and drops events from the other pane until the initiator has
//! been quiet for the cooldown. The lock expires by itself; scroll gestures
//! have no reliable "ended" signal.

use std::time::Duration;

use inkdown_common::config::ScrollConfig;
use web_time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Editor,
    Preview,
}

impl Pane {
    pub fn other(self) -> Self {
        match self {
            Pane::Editor => Pane::Preview,
            Pane::Preview => Pane::Editor,
        }
    }
}

/// Geometry of one scrollable pane, in any consistent unit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PaneMetrics {
    pub offset: f64,
    /// Total scrollable content size.
    pub extent: f64,
    /// Visible size.
    pub viewport: f64,
}

impl PaneMetrics {
    pub fn new(offset: f64, extent: f64, viewport: f64) -> Self {
        Self {
            offset,
            extent,
            viewport,
        }
    }

    /// Maximum offset. Zero or less means nothing to scroll.
    pub fn range(&self) -> f64 {
        self.extent - self.viewport
    }

    /// Offset as a fraction of the range, or `None` when not scrollable.
    pub fn ratio(&self) -> Option<f64> {
        let range = self.range();
        (range > 0.0).then(|| (self.offset / range).clamp(0.0, 1.0))
    }
}

/// Offset the host should apply to `pane`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollUpdate {
    pub pane: Pane,
    pub offset: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScrollLock {
    pane: Pane,
    expires: Instant,
}

#[derive(Debug, Clone)]
pub struct ScrollSync {
    cooldown: Duration,
    lock: Option<ScrollLock>,
}

impl Default for ScrollSync {
    fn default() -> Self {
        Self::new(&ScrollConfig::default())
    }
}

impl ScrollSync {
    pub fn new(config: &ScrollConfig) -> Self {
        Self {
            cooldown: config.cooldown(),
            lock: None,
        }
    }

    /// Pane currently in control, if the lock has not expired.
    pub fn controlling_pane(&self, now: Instant) -> Option<Pane> {
        self.lock
            .filter(|lock| now < lock.expires)
            .map(|lock| lock.pane)
    }

    /// Handle a scroll event from `pane`.
    ///
    /// `source` is the geometry of the pane that scrolled, `target` that of
    /// the other pane. Returns the offset to apply to the other pane, or
    /// `None` when the event is an echo or there is nothing to synchronize.
    pub fn on_scroll(
        &mut self,
        pane: Pane,
        source: PaneMetrics,
        target: PaneMetrics,
        now: Instant,
    ) -> Option<ScrollUpdate> {
        if let Some(owner) = self.controlling_pane(now).filter(|&owner| owner != pane) {
            tracing::trace!(?pane, ?owner, "scroll echo suppressed");
            return None;
        }

        let ratio = source.ratio()?;
        let range = target.range();
        if range <= 0.0 {
            return None;
        }

        self.lock = Some(ScrollLock {
            pane,
            expires: now + self.cooldown,
        });

        Some(ScrollUpdate {
            pane: pane.other(),
            offset: ratio * range,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_ratio_maps_between_panes() {
        let t0 = Instant::now();
        let mut sync = ScrollSync::default();
        let editor = PaneMetrics::new(250.0, 1000.0, 500.0);
        let preview = PaneMetrics::new(0.0, 800.0, 400.0);

        let update = sync.on_scroll(Pane::Editor, editor, preview, t0).unwrap();
        assert_eq!(update.pane, Pane::Preview);
        assert_eq!(update.offset, 200.0);

        // The preview's echo inside the cooldown is ignored.
        let echo = PaneMetrics::new(200.0, 800.0, 400.0);
        assert_eq!(sync.on_scroll(Pane::Preview, echo, editor, t0 + ms(50)), None);
        assert_eq!(sync.controlling_pane(t0 + ms(50)), Some(Pane::Editor));
    }

    #[test]
    fn test_initiator_keeps_lock_alive() {
        let t0 = Instant::now();
        let mut sync = ScrollSync::default();
        let editor = PaneMetrics::new(100.0, 1000.0, 500.0);
        let preview = PaneMetrics::new(0.0, 800.0, 400.0);

        sync.on_scroll(Pane::Editor, editor, preview, t0);
        sync.on_scroll(Pane::Editor, editor, preview, t0 + ms(90));
        assert_eq!(sync.on_scroll(Pane::Preview, preview, editor, t0 + ms(150)), None);

        // Cooldown elapsed with no editor input: the preview can take over.
        let update = sync
            .on_scroll(Pane::Preview, preview, editor, t0 + ms(200))
            .unwrap();
        assert_eq!(update.pane, Pane::Editor);
        assert_eq!(sync.controlling_pane(t0 + ms(200)), Some(Pane::Preview));
    }

    #[test]
    fn test_unscrollable_panes_are_skipped() {
        let t0 = Instant::now();
        let mut sync = ScrollSync::default();
        let short = PaneMetrics::new(0.0, 300.0, 500.0);
        let long = PaneMetrics::new(0.0, 900.0, 400.0);

        assert_eq!(sync.on_scroll(Pane::Editor, short, long, t0), None);
        assert_eq!(sync.on_scroll(Pane::Editor, long, short, t0), None);
        assert_eq!(sync.controlling_pane(t0), None);
    }

    #[test]
    fn test_ratio_is_clamped() {
        let overscrolled = PaneMetrics::new(700.0, 1000.0, 500.0);
        assert_eq!(overscrolled.ratio(), Some(1.0));
        let negative = PaneMetrics::new(-20.0, 1000.0, 500.0);
        assert_eq!(negative.ratio(), Some(0.0));
    }
}
