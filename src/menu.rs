use std::collections::BTreeMap;

use crate::routes::{RouteKind, RouteNode};

/// AccordionState
///
/// Which side-menu group is currently expanded. Keys are the group-root path
/// segments of the tree's top-level groups; plain top-level leaves are never
/// represented and no transition affects them.
///
/// Invariant: at most one entry is `true` at any time. Zero open groups is a
/// valid state (the active location is a top-level leaf).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccordionState {
    open: BTreeMap<String, bool>,
}

impl AccordionState {
    /// from_location
    ///
    /// Initial state at mount: each group is expanded exactly when the current
    /// location falls under one of its descendant leaf paths, so the menu
    /// opens already revealing the active item.
    pub fn from_location(tree: &[RouteNode], location: &str) -> Self {
        let mut state = Self::default();
        state.sync_to_location(tree, location);
        state
    }

    /// sync_to_location
    ///
    /// Location-change transition: recomputes the whole state from scratch
    /// with the same containment rule. This runs on **every** navigation and
    /// unconditionally overwrites manual toggles: a user-expanded but
    /// inactive group collapses on the next navigation.
    pub fn sync_to_location(&mut self, tree: &[RouteNode], location: &str) {
        self.open.clear();
        for node in tree {
            if let RouteKind::Group { .. } = node.kind {
                let contains = group_contains_location(node, &node.layout, location);
                self.open.insert(node.path.clone(), contains);
            }
        }
    }

    /// toggle
    ///
    /// Manual-toggle transition: every group closes except the toggled one,
    /// which negates its previous value. Toggling does not itself navigate,
    /// and toggling the same group twice restores the pre-toggle state.
    pub fn toggle(&mut self, group_path: &str) {
        if !self.open.contains_key(group_path) {
            tracing::debug!(group = group_path, "toggle for unknown menu group ignored");
            return;
        }
        let previous = self.open[group_path];
        for value in self.open.values_mut() {
            *value = false;
        }
        self.open.insert(group_path.to_string(), !previous);
    }

    pub fn is_open(&self, group_path: &str) -> bool {
        self.open.get(group_path).copied().unwrap_or(false)
    }

    /// expanded
    ///
    /// The single open group, if any.
    pub fn expanded(&self) -> Option<&str> {
        self.open
            .iter()
            .find(|(_, open)| **open)
            .map(|(path, _)| path.as_str())
    }
}

/// group_contains_location
///
/// Containment is decided against the group's descendant leaf paths (its
/// landing page included), not by string prefixing: "/x/ab" must not count
/// as falling under the group "/x/a".
fn group_contains_location(group: &RouteNode, prefix: &str, location: &str) -> bool {
    let full_path = format!("{}{}", prefix, group.path);
    match &group.kind {
        RouteKind::Group { landing, children } => {
            if landing.is_some() && full_path == location {
                return true;
            }
            children
                .iter()
                .any(|child| group_contains_location(child, &full_path, location))
        }
        RouteKind::Leaf { .. } => full_path == location,
        RouteKind::Redirect { .. } => false,
    }
}

// --- Sidebar Menu Model ---

/// MenuItem
///
/// One clickable menu line: display metadata plus the flattened target path.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub name: String,
    pub icon: Option<String>,
    pub full_path: String,
}

/// MenuEntry
///
/// A top-level sidebar entry: either a plain item or a collapsible group of
/// items. Redirect markers never appear here.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuEntry {
    Item(MenuItem),
    Group {
        name: String,
        icon: Option<String>,
        /// Accordion key for this group.
        path: String,
        /// Navigation target of the group header, when the group owns a
        /// landing page.
        landing: Option<String>,
        items: Vec<MenuItem>,
    },
}

/// build_menu
///
/// Derives the sidebar model from the same authored tree the route table is
/// built from, so menu and routing can never disagree about what exists.
pub fn build_menu(tree: &[RouteNode]) -> Vec<MenuEntry> {
    let mut entries = Vec::new();
    for node in tree {
        let full_path = format!("{}{}", node.layout, node.path);
        match &node.kind {
            RouteKind::Leaf { .. } => entries.push(MenuEntry::Item(MenuItem {
                name: node.name.clone(),
                icon: node.icon.clone(),
                full_path,
            })),
            RouteKind::Group { landing, children } => {
                let mut items = Vec::new();
                collect_items(children, &full_path, &mut items);
                entries.push(MenuEntry::Group {
                    name: node.name.clone(),
                    icon: node.icon.clone(),
                    path: node.path.clone(),
                    landing: landing.map(|_| full_path.clone()),
                    items,
                });
            }
            RouteKind::Redirect { .. } => {}
        }
    }
    entries
}

fn collect_items(children: &[RouteNode], prefix: &str, out: &mut Vec<MenuItem>) {
    for child in children {
        let full_path = format!("{}{}", prefix, child.path);
        match &child.kind {
            RouteKind::Leaf { .. } => out.push(MenuItem {
                name: child.name.clone(),
                icon: child.icon.clone(),
                full_path,
            }),
            RouteKind::Group { children, .. } => collect_items(children, &full_path, out),
            RouteKind::Redirect { .. } => {}
        }
    }
}
