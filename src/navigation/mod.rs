//! Role-gated navigation
//!
//! Derives what a viewer may see from a static section definition and keeps
//! per-section expand/collapse state for the session.

pub mod catalog;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Cashier,
    Manager,
    Admin,
}

const ROLE_NAMES: [(Role, &str); 3] = [
    (Role::Cashier, "cashier"),
    (Role::Manager, "manager"),
    (Role::Admin, "admin"),
];

impl Role {
    pub fn as_str(&self) -> &'static str {
        ROLE_NAMES
            .iter()
            .find(|(role, _)| role == self)
            .map(|(_, name)| *name)
            .unwrap_or("unknown")
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ROLE_NAMES
            .iter()
            .find(|(_, name)| *name == wanted)
            .map(|(role, _)| *role)
            .ok_or_else(|| {
                format!(
                    "unknown role '{}', expected one of: cashier, manager, admin",
                    s
                )
            })
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItem {
    pub label: String,
    pub path: String,
    #[serde(alias = "required_roles")]
    pub required_roles: Vec<Role>,
    #[serde(default)]
    pub description: String,
}

impl NavigationItem {
    pub fn new(label: &str, path: &str, required_roles: &[Role], description: &str) -> Self {
        Self {
            label: label.to_string(),
            path: path.to_string(),
            required_roles: required_roles.to_vec(),
            description: description.to_string(),
        }
    }

    pub fn is_visible_to(&self, viewer: Option<Role>) -> bool {
        viewer.is_some_and(|role| self.required_roles.contains(&role))
    }

    /// Exact path match; `/sales` does not highlight for `/sales/today`.
    pub fn is_active(&self, location: &str) -> bool {
        self.path == location
    }
}

fn default_expanded() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationSection {
    pub id: String,
    pub label: String,
    pub items: Vec<NavigationItem>,
    #[serde(default = "default_expanded")]
    pub expanded: bool,
}

/// Sections holding at least one item the viewer may see, restricted to those
/// items. Order is preserved; no role sees nothing.
pub fn visible_sections(
    all_sections: &[NavigationSection],
    viewer: Option<Role>,
) -> Vec<NavigationSection> {
    all_sections
        .iter()
        .filter_map(|section| {
            let items: Vec<NavigationItem> = section
                .items
                .iter()
                .filter(|item| item.is_visible_to(viewer))
                .cloned()
                .collect();
            (!items.is_empty()).then(|| NavigationSection {
                items,
                ..section.clone()
            })
        })
        .collect()
}

/// First item whose path equals `location`.
pub fn active_item<'a>(
    sections: &'a [NavigationSection],
    location: &str,
) -> Option<&'a NavigationItem> {
    sections
        .iter()
        .flat_map(|section| section.items.iter())
        .find(|item| item.is_active(location))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationAction {
    ToggleSection(String),
    ToggleCollapsed,
    SetCollapsed(bool),
}

/// Session-scoped expand/collapse state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    /// Iconified mode: every section behaves as expanded and toggles are ignored.
    pub collapsed: bool,
    expanded: HashMap<String, bool>,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reduce(mut self, action: NavigationAction) -> Self {
        match action {
            NavigationAction::ToggleSection(id) => {
                self.toggle_section(&id);
            }
            NavigationAction::ToggleCollapsed => self.collapsed = !self.collapsed,
            NavigationAction::SetCollapsed(collapsed) => self.collapsed = collapsed,
        }
        self
    }

    /// Returns false when the request was ignored because the navigation is collapsed.
    pub fn toggle_section(&mut self, id: &str) -> bool {
        if self.collapsed {
            return false;
        }
        let entry = self.expanded.entry(id.to_string()).or_insert(true);
        *entry = !*entry;
        true
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.collapsed || self.expanded.get(id).copied().unwrap_or(true)
    }

    pub fn apply(&self, sections: Vec<NavigationSection>) -> Vec<NavigationSection> {
        sections
            .into_iter()
            .map(|section| NavigationSection {
                expanded: self.is_expanded(&section.id),
                ..section
            })
            .collect()
    }

    pub fn view(
        &self,
        all_sections: &[NavigationSection],
        viewer: Option<Role>,
        location: &str,
    ) -> NavigationView {
        let sections = self.apply(visible_sections(all_sections, viewer));
        let active_path = active_item(&sections, location).map(|item| item.path.clone());
        NavigationView {
            role: viewer,
            collapsed: self.collapsed,
            active_path,
            sections,
        }
    }
}

/// Plain navigation tree handed to whatever renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationView {
    pub role: Option<Role>,
    pub collapsed: bool,
    pub active_path: Option<String>,
    pub sections: Vec<NavigationSection>,
}
