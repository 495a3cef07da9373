//! In-sync gauge set for the selected resource.
//!
//! Entries persist across ticks. Each tick the desired volume set is
//! reconciled against the current one: entries are created or dropped only
//! for the difference and the rest get their percentage updated in place.
//! Switching to another resource always starts from an empty set.

use std::collections::BTreeMap;

use tracing::debug;

use crate::fmt::device_path;
use crate::stats::{InSync, volume_in_sync};
use crate::store::ResourceSnapshot;

/// Label and percentage of one volume's gauge row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaugeEntry {
    pub label: String,
    pub in_sync: InSync,
}

/// Outcome of a reconcile pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeChange {
    /// Rows were added or removed: layout must be rebuilt.
    Rebuilt,
    /// Same rows, at least one label or percentage changed.
    Updated,
    Unchanged,
}

#[derive(Debug, Default)]
pub struct GaugeSet {
    resource: Option<String>,
    entries: BTreeMap<String, GaugeEntry>,
}

fn label(id: &str, minor: u32) -> String {
    format!("Vol {} ({})", id, device_path(minor))
}

impl GaugeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resource the entries belong to.
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// Rows in volume-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GaugeEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Drops every entry.
    pub fn clear(&mut self) -> GaugeChange {
        let had = !self.entries.is_empty();
        self.entries.clear();
        self.resource = None;
        if had {
            GaugeChange::Rebuilt
        } else {
            GaugeChange::Unchanged
        }
    }

    /// Brings the set in line with `res`.
    pub fn reconcile(&mut self, res: &ResourceSnapshot) -> GaugeChange {
        let mut rebuilt = false;
        if self.resource.as_deref() != Some(res.name.as_str()) {
            debug!(from = ?self.resource, to = %res.name, "gauge set discarded");
            self.entries = BTreeMap::new();
            self.resource = Some(res.name.clone());
            rebuilt = true;
        }

        let desired: BTreeMap<&str, (u32, InSync)> = if res.unconfigured {
            BTreeMap::new()
        } else {
            res.device
                .volumes
                .iter()
                .map(|(id, v)| (id.as_str(), (v.minor, volume_in_sync(res, id))))
                .collect()
        };

        let before = self.entries.len();
        self.entries.retain(|id, _| desired.contains_key(id.as_str()));
        rebuilt |= self.entries.len() != before;

        let mut updated = false;
        for (id, (minor, in_sync)) in desired {
            match self.entries.get_mut(id) {
                Some(entry) => {
                    let label = label(id, minor);
                    if entry.label != label || entry.in_sync != in_sync {
                        entry.label = label;
                        entry.in_sync = in_sync;
                        updated = true;
                    }
                }
                None => {
                    self.entries.insert(
                        id.to_string(),
                        GaugeEntry {
                            label: label(id, minor),
                            in_sync,
                        },
                    );
                    rebuilt = true;
                }
            }
        }

        if rebuilt {
            debug!(resource = %res.name, rows = self.entries.len(), "gauge set rebuilt");
            GaugeChange::Rebuilt
        } else if updated {
            GaugeChange::Updated
        } else {
            GaugeChange::Unchanged
        }
    }
}
