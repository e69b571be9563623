//! Redraw throttling keyed on the store's snapshot version.
//!
//! A frame is drawn when the snapshot version changed, and otherwise at
//! most once per `idle_interval_ms` (so a resize or a lost frame is repaired
//! without redrawing at the full update rate).

#[derive(Debug, Clone)]
pub struct RenderThrottle {
    idle_interval_ms: u64,
    last_render_ms: u64,
    last_version: Option<u64>,
}

impl RenderThrottle {
    pub fn new(idle_interval_ms: u64) -> Self {
        Self {
            idle_interval_ms,
            last_render_ms: 0,
            last_version: None,
        }
    }

    /// Decide whether to draw at `now_ms` for a snapshot at `version`.
    pub fn should_render(&mut self, now_ms: u64, version: u64) -> bool {
        let changed = self.last_version != Some(version);
        let stale = now_ms.saturating_sub(self.last_render_ms) >= self.idle_interval_ms;
        if changed || stale {
            self.last_render_ms = now_ms;
            self.last_version = Some(version);
            return true;
        }
        false
    }

    /// Draw on the next call regardless of version
    pub fn invalidate(&mut self) {
        self.last_version = None;
    }
}
