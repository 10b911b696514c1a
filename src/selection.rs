//! User-chosen subsets of a polled collection.
//!
//! The set only stores identities. Whether everything is selected is always
//! computed against the collection passed in, so a refresh that grows or
//! shrinks the collection can never leave a stale answer behind.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An item that can be selected. Identity is the only equality that matters.
pub trait Selectable {
    fn identity(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionAction {
    Toggle(String),
    SelectAll,
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    identities: BTreeSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership and return the new membership. Identities the collection
    /// does not (yet) contain are accepted and stay invisible until it does.
    pub fn toggle(&mut self, identity: impl Into<String>) -> bool {
        let identity = identity.into();
        if self.identities.remove(&identity) {
            false
        } else {
            self.identities.insert(identity);
            true
        }
    }

    pub fn select_all<T: Selectable>(&mut self, items: &[T]) {
        self.identities = items
            .iter()
            .map(|item| item.identity().to_string())
            .collect();
    }

    pub fn clear(&mut self) {
        self.identities.clear();
    }

    pub fn reduce<T: Selectable>(&mut self, action: SelectionAction, items: &[T]) {
        match action {
            SelectionAction::Toggle(identity) => {
                self.toggle(identity);
            }
            SelectionAction::SelectAll => self.select_all(items),
            SelectionAction::Clear => self.clear(),
        }
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.identities.contains(identity)
    }

    pub fn is_all_selected<T: Selectable>(&self, items: &[T]) -> bool {
        !items.is_empty() && items.iter().all(|item| self.contains(item.identity()))
    }

    /// Items of `items` that are selected, in collection order.
    pub fn selected_in<'a, T: Selectable>(&self, items: &'a [T]) -> Vec<&'a T> {
        items
            .iter()
            .filter(|item| self.contains(item.identity()))
            .collect()
    }

    /// Drop identities that no longer appear in `items`. Returns how many went.
    pub fn prune<T: Selectable>(&mut self, items: &[T]) -> usize {
        let before = self.identities.len();
        self.identities
            .retain(|identity| items.iter().any(|item| item.identity() == identity.as_str()));
        before - self.identities.len()
    }

    /// Prune against the current collection, then return the selected items.
    pub fn selected<'a, T: Selectable>(&mut self, items: &'a [T]) -> Vec<&'a T> {
        self.prune(items);
        self.selected_in(items)
    }

    /// Raw membership count, stale identities included.
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.identities.iter().map(String::as_str)
    }
}
