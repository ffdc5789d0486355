//! One streaming session: the state owned between a connect and its EOF.
//!
//! [`Session`] owns a fresh [`WorldModel`], [`SlotAssignment`] and
//! [`RenderDriver`], and applies events strictly in arrival order.  Every
//! event is fully applied and rendered before the next one is read.

use crate::config::LayoutConfig;
use crate::driver::RenderDriver;
use crate::event::{decode_line, Event};
use crate::model::WorldModel;
use crate::palette::Palette;
use crate::planner;
use crate::slots::SlotAssignment;
use crate::traits::RenderTarget;
use log::debug;

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub applied: usize,
    pub ignored: usize,
    pub malformed: usize,
}

/// Per-connection state machine from event lines to render commands.
pub struct Session<'t, R: RenderTarget> {
    model: WorldModel,
    slots: SlotAssignment,
    driver: RenderDriver<'t, R>,
    palette: Palette,
    num_tags: u8,
    stats: SessionStats,
}

impl<'t, R: RenderTarget> Session<'t, R> {
    /// Start a session rendering onto `target`.
    pub fn new(target: &'t R, layout: &LayoutConfig, palette: Palette) -> Self {
        let style = layout.style(&palette);
        let num_tags = style.num_tags;
        Self {
            model: WorldModel::new(),
            slots: SlotAssignment::new(layout.max_slots),
            driver: RenderDriver::new(target, style),
            palette,
            num_tags,
            stats: SessionStats::default(),
        }
    }

    pub fn model(&self) -> &WorldModel {
        &self.model
    }

    pub fn slots(&self) -> &SlotAssignment {
        &self.slots
    }

    pub fn driver(&self) -> &RenderDriver<'t, R> {
        &self.driver
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Decode and handle one raw line.  Blank and malformed lines are
    /// skipped.
    pub fn handle_line(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        match decode_line(line) {
            Ok(event) => self.handle_event(event),
            Err(e) => {
                self.stats.malformed += 1;
                debug!("{}: {}", e, line);
            }
        }
    }

    /// Count a line that could not even be read as text.
    pub fn skip_undecodable(&mut self, reason: &dyn std::fmt::Display) {
        self.stats.malformed += 1;
        debug!("skipping undecodable line: {}", reason);
    }

    /// Apply one event and push the resulting render deltas.
    pub fn handle_event(&mut self, event: Event) {
        let kind = event.kind();
        let topology = event.changes_topology();
        if !self.model.apply_event(event) {
            self.stats.ignored += 1;
            debug!("ignoring {} event", kind);
            return;
        }
        self.stats.applied += 1;
        if topology {
            self.slots.reassign(self.model.live_displays());
            self.driver.reconcile(&self.slots);
        }
        self.render();
    }

    /// Set every tag of every rendered slot from the current model.
    fn render(&self) {
        let plans = planner::plan(&self.model, &self.slots, &self.palette, self.num_tags);
        self.driver.apply(&plans);
    }

    /// End the session, removing everything it put on the bar.
    pub fn finish(mut self) -> SessionStats {
        self.driver.teardown();
        self.stats
    }
}
