//! # Display Handles
//!
//! Front ends often need one piece of per-row state for each visible todo: a
//! widget reference, an animation slot, a short label to type. That state is
//! not part of the domain model, so it lives here instead of on [`Todo`].
//!
//! [`DisplayHandles`] maps ids to handles. On every [`sync`](DisplayHandles::sync)
//! with the current visible set:
//! - ids seen for the first time get a fresh handle from the `make` callback,
//! - ids still visible keep the handle they already had,
//! - ids no longer visible lose theirs.
//!
//! A todo that leaves the visible set and comes back later is treated as new.

use crate::model::{Todo, TodoId};
use std::collections::HashMap;

#[derive(Debug)]
pub struct DisplayHandles<H> {
    handles: HashMap<TodoId, H>,
}

impl<H> Default for DisplayHandles<H> {
    fn default() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }
}

impl<H> DisplayHandles<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Brings the registry in line with `visible`, calling `make` for newcomers
    /// in the order they appear.
    pub fn sync<'a, I, F>(&mut self, visible: I, mut make: F)
    where
        I: IntoIterator<Item = &'a Todo>,
        F: FnMut(TodoId) -> H,
    {
        let ids: Vec<TodoId> = visible.into_iter().map(|t| t.id).collect();
        self.handles.retain(|id, _| ids.contains(id));
        for id in ids {
            self.handles.entry(id).or_insert_with(|| make(id));
        }
    }

    pub fn get(&self, id: TodoId) -> Option<&H> {
        self.handles.get(&id)
    }

    /// Reverse lookup: the id whose handle satisfies `pred`.
    pub fn find<P>(&self, mut pred: P) -> Option<TodoId>
    where
        P: FnMut(&H) -> bool,
    {
        self.handles
            .iter()
            .find(|(_, h)| pred(h))
            .map(|(id, _)| *id)
    }
}
