use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::types::AccountMeta;

/// A tracked account: its X handle plus the group and label it reports under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub handle: String,
    pub group: String,
    pub label: String,
}

impl RosterEntry {
    pub fn new(
        handle: impl Into<String>,
        group: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            handle: handle.into(),
            group: group.into(),
            label: label.into(),
        }
    }
}

// (handle, group, label)
const BUILTIN_ACCOUNTS: &[(&str, &str, &str)] = &[
    // Hadash-Ta'al
    ("AyOdeh", "Hadash-Ta'al", "Ayman Odeh"),
    ("Ahmad_tibi", "Hadash-Ta'al", "Ahmad Tibi"),
    ("AidaTuma", "Hadash-Ta'al", "Aida Touma-Sliman"),
    ("ofercass", "Hadash-Ta'al", "Ofer Cassif"),
    ("DrJabareen", "Hadash-Ta'al", "Yousef Jabareen"),
    // Ra'am
    ("mnsorabbas", "Ra'am", "Mansour Abbas"),
    ("Waleedt68", "Ra'am", "Waleed Taha"),
    ("WalidAlhwashla", "Ra'am", "Walid Al-Hawashla"),
    ("IbrahimSarsour", "Ra'am", "Ibrahim Sarsour"),
    ("TalalAlkrinawi", "Ra'am", "Talal Al-Qrenawi"),
    // Islamic Movement / Independents
    ("RaedSalah", "Islamic/Independent", "Sheikh Raed Salah"),
    ("MasarwaAmna", "Islamic/Independent", "Amna Masarwa"),
    ("HassanJabareen", "Islamic/Independent", "Hassan Jabareen"),
    ("SuhailDiab", "Islamic/Independent", "Suhail Diab"),
    // Activists (outside parties)
    ("SSinijlawi", "Activist", "Sawsan Sinijlawi"),
    ("HowidyHamza", "Activist", "Hamza Howidy"),
    ("YousefMunayyer", "Activist", "Yousef Munayyer"),
    ("LeanneMohamad", "Activist", "Leanne Mohamad"),
    ("HaneenZoabi", "Activist", "Haneen Zoabi"),
];

/// Immutable handle → metadata table. Lookups ignore case.
#[derive(Debug, Clone)]
pub struct Roster {
    entries: Vec<RosterEntry>,
    by_handle: HashMap<String, usize>,
}

impl Roster {
    /// The compiled-in account list.
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN_ACCOUNTS
                .iter()
                .map(|(handle, group, label)| RosterEntry::new(*handle, *group, *label))
                .collect(),
        )
    }

    /// Build a roster from explicit entries. A later duplicate handle wins.
    pub fn from_entries(entries: Vec<RosterEntry>) -> Self {
        let by_handle = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.handle.to_lowercase(), i))
            .collect();
        Self { entries, by_handle }
    }

    /// Load a roster from a JSON array of `{handle, group, label}` objects.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        if !path.exists() {
            return Err(PipelineError::MissingInput {
                path: path.to_path_buf(),
            });
        }
        let raw = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        let entries: Vec<RosterEntry> = serde_json::from_str(&raw)?;
        if entries.is_empty() {
            return Err(PipelineError::Roster(format!(
                "{} contains no accounts",
                path.display()
            )));
        }
        Ok(Self::from_entries(entries))
    }

    /// Group/label for a handle, or the "Unknown" sentinel.
    pub fn lookup(&self, handle: &str) -> AccountMeta {
        self.by_handle
            .get(&handle.to_lowercase())
            .map(|&i| {
                let entry = &self.entries[i];
                AccountMeta {
                    group: entry.group.clone(),
                    label: entry.label.clone(),
                }
            })
            .unwrap_or_else(AccountMeta::unknown)
    }

    pub fn handles(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.handle.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
