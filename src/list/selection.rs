//! Multi-selection of list rows by id

use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<String>,
    /// Set by "select all"; cleared by any manual change
    all_selected: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one id and report whether it is now selected
    pub fn toggle(&mut self, id: &str) -> bool {
        self.all_selected = false;
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn select_many<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
    }

    /// Replace the selection with every id of the collection
    pub fn select_all<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = ids.into_iter().map(Into::into).collect();
        self.all_selected = true;
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.all_selected = false;
        self.ids.remove(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.all_selected = false;
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn all_selected(&self) -> bool {
        self.all_selected
    }

    /// Selected ids in stable order
    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }
}
