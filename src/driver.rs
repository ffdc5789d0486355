//! Pushes planned state to a [`RenderTarget`].
//!
//! The driver remembers which slots it has built elements for (the bar
//! cannot be queried) and keeps that set equal to the slot assignment:
//! [`reconcile`](RenderDriver::reconcile) tears down vanished slots before
//! it builds new ones, and [`apply`](RenderDriver::apply) sets the style of
//! every tag on every rendered slot, changed or not.

use crate::event::DisplayId;
use crate::planner::SlotPlan;
use crate::render::{self, ElementKind, Layout, LayoutStyle, RenderCommand};
use crate::slots::{Slot, SlotAssignment};
use crate::traits::RenderTarget;
use log::{error, info, warn};
use std::collections::BTreeMap;

/// Creates, updates and removes slot elements on a render target.
pub struct RenderDriver<'t, R: RenderTarget> {
    target: &'t R,
    layout: LayoutStyle,
    /// Slots with live elements, and the display each was built for.
    rendered: BTreeMap<Slot, DisplayId>,
}

impl<'t, R: RenderTarget> RenderDriver<'t, R> {
    /// A driver that has rendered nothing yet.
    pub fn new(target: &'t R, layout: LayoutStyle) -> Self {
        Self {
            target,
            layout,
            rendered: BTreeMap::new(),
        }
    }

    /// Slots that currently have elements, ascending.
    pub fn rendered_slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.rendered.keys().copied()
    }

    /// Fire one command; failures are logged and otherwise ignored.
    fn send(&self, command: &RenderCommand) {
        if let Err(e) = self.target.send(command) {
            warn!("render command for {} failed: {}", command.name(), e);
        }
    }

    fn remove_slot(&mut self, slot: Slot) {
        info!("tearing down slot {}", slot);
        for cmd in render::teardown(slot, self.layout.num_tags) {
            self.send(&cmd);
        }
        self.rendered.remove(&slot);
    }

    /// Make the set of rendered slots match `slots`.
    ///
    /// A slot that is still occupied but now holds a different display is
    /// rebuilt, so its container is bound to the right display.
    pub fn reconcile(&mut self, slots: &SlotAssignment) {
        let stale: Vec<Slot> = self
            .rendered
            .iter()
            .filter(|(slot, display)| slots.display_for(**slot) != Some(*display))
            .map(|(slot, _)| *slot)
            .collect();
        for slot in stale {
            self.remove_slot(slot);
        }

        for (slot, display) in slots.iter() {
            if self.rendered.contains_key(&slot) {
                continue;
            }
            let commands = match Layout::new(&self.layout).build(slot, display) {
                Ok(commands) => commands,
                Err(e) => {
                    error!("cannot lay out slot {}: {}", slot, e);
                    continue;
                }
            };
            info!("creating slot {} for display {}", slot, display);
            for cmd in &commands {
                self.send(cmd);
            }
            self.rendered.insert(slot, display.clone());
        }
    }

    /// Set the style of every tag in `plans`.  Plans for slots without
    /// elements are skipped.
    pub fn apply(&self, plans: &[SlotPlan]) {
        for plan in plans {
            if !self.rendered.contains_key(&plan.slot) {
                continue;
            }
            for tag in &plan.tags {
                let name = render::tag_name(plan.slot, tag.tag);
                match RenderCommand::set(name, ElementKind::Item, tag.style.attrs()) {
                    Ok(cmd) => self.send(&cmd),
                    Err(e) => error!("{}", e),
                }
            }
        }
    }

    /// Remove every element this driver created.
    pub fn teardown(&mut self) {
        let slots: Vec<Slot> = self.rendered_slots().collect();
        for slot in slots {
            self.remove_slot(slot);
        }
    }
}
