//! Selection state for the strategy builder.
//!
//! The composer owns the ordered list of selected block ids and the active
//! template marker. Aggregates are never cached here — they are recomputed
//! from the catalog on demand, so there is nothing to invalidate.

use serde::Serialize;

use crate::catalog::{self, StrategyBlock};
use crate::metrics::{self, StrategyMetrics};

#[derive(Debug, Clone, Serialize)]
pub struct Composer {
    selection: Vec<String>,
    active_template: Option<String>,
}

impl Composer {
    /// The builder's initial state: the basis-trade preset.
    pub fn new() -> Self {
        Self {
            selection: vec!["spot-long".to_string(), "perp-short".to_string()],
            active_template: Some("basis".to_string()),
        }
    }

    pub fn empty() -> Self {
        Self { selection: Vec::new(), active_template: None }
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn active_template(&self) -> Option<&str> {
        self.active_template.as_deref()
    }

    /// Toggle a block id: present → remove, absent → append. Returns true
    /// when the id is selected afterwards. Any manual toggle leaves template
    /// mode — even a toggle that reconstructs a template's exact block list.
    /// Ids the catalog doesn't know are kept verbatim and drop out at
    /// resolution, so toggling one on and off round-trips cleanly.
    pub fn toggle(&mut self, id: &str) -> bool {
        self.active_template = None;
        if let Some(pos) = self.selection.iter().position(|x| x == id) {
            self.selection.remove(pos);
            false
        } else {
            self.selection.push(id.to_string());
            true
        }
    }

    /// Replace the selection with a template's block list. Unknown template
    /// ids are a no-op (returns false).
    pub fn apply_template(&mut self, template_id: &str) -> bool {
        match catalog::find_template(template_id) {
            Some(tpl) => {
                self.selection = tpl.blocks.iter().map(|s| s.to_string()).collect();
                self.active_template = Some(tpl.id.to_string());
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.selection.clear();
        self.active_template = None;
    }

    /// Resolve the selection against the catalog (unknown ids drop out).
    pub fn blocks(&self) -> Vec<&'static StrategyBlock> {
        catalog::resolve(&self.selection)
    }

    /// Fresh aggregate for the current selection.
    pub fn metrics(&self) -> StrategyMetrics {
        metrics::compute_for_ids(&self.selection)
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}
