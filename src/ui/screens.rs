use std::sync::mpsc::{Receiver, TryRecvError};

use crate::lyrics::{layout, Stanza};
use crate::models::{Category, Hymn, Reflection};

/// Top-level navigation tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tab {
    Home,
    Categories,
    Favorites,
    Info,
}

impl Tab {
    pub(crate) const ALL: [Tab; 4] = [Tab::Home, Tab::Categories, Tab::Favorites, Tab::Info];

    pub(crate) fn label(self) -> &'static str {
        match self {
            Tab::Home => "সূচী",
            Tab::Categories => "বিষয়",
            Tab::Favorites => "প্রিয়",
            Tab::Info => "তথ্য",
        }
    }

    pub(crate) fn index(self) -> usize {
        Tab::ALL.iter().position(|tab| *tab == self).unwrap_or(0)
    }

    pub(crate) fn offset(self, step: isize) -> Tab {
        let len = Tab::ALL.len() as isize;
        let index = (self.index() as isize + step).rem_euclid(len);
        Tab::ALL[index as usize]
    }
}

/// Cursor over a list of known length. Shared by the hymn and category lists.
#[derive(Debug, Default)]
pub(crate) struct Selection {
    pub(crate) selected: usize,
    len: usize,
}

impl Selection {
    pub(crate) fn set_len(&mut self, len: usize) {
        self.len = len;
        self.ensure_in_bounds();
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.len == 0 {
            return;
        }
        let last = self.len as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.len.saturating_sub(1);
    }

    pub(crate) fn reset(&mut self) {
        self.selected = 0;
    }

    fn ensure_in_bounds(&mut self) {
        if self.len == 0 {
            self.selected = 0;
        } else if self.selected >= self.len {
            self.selected = self.len - 1;
        }
    }
}

/// Results currently shown in the hymn list, held as ids into the catalog.
#[derive(Debug, Default)]
pub(crate) struct HymnList {
    pub(crate) ids: Vec<u32>,
    pub(crate) selection: Selection,
}

impl HymnList {
    pub(crate) fn set_ids(&mut self, ids: Vec<u32>) {
        self.selection.set_len(ids.len());
        self.ids = ids;
    }

    pub(crate) fn current_id(&self) -> Option<u32> {
        self.ids.get(self.selection.selected).copied()
    }
}

/// Category overview with its own cursor.
#[derive(Debug, Default)]
pub(crate) struct CategoryList {
    pub(crate) categories: Vec<Category>,
    pub(crate) selection: Selection,
}

impl CategoryList {
    pub(crate) fn new(categories: Vec<Category>) -> Self {
        let mut selection = Selection::default();
        selection.set_len(categories.len());
        Self {
            categories,
            selection,
        }
    }

    pub(crate) fn current(&self) -> Option<&Category> {
        self.categories.get(self.selection.selected)
    }
}

/// Progress of the reflection request for the open hymn.
pub(crate) enum ReflectionState {
    Idle,
    Loading(Receiver<Reflection>),
    Ready(Reflection),
}

/// Backing state for the lyrics view of a single hymn.
pub(crate) struct DetailScreen {
    pub(crate) hymn: Hymn,
    pub(crate) stanzas: Vec<Stanza>,
    pub(crate) scroll: u16,
    pub(crate) reflection: ReflectionState,
}

impl DetailScreen {
    pub(crate) fn new(hymn: Hymn) -> Self {
        let stanzas = layout(&hymn.lyrics);
        Self {
            hymn,
            stanzas,
            scroll: 0,
            reflection: ReflectionState::Idle,
        }
    }

    pub(crate) fn scroll_by(&mut self, offset: i32) {
        self.scroll = (self.scroll as i32 + offset).clamp(0, u16::MAX as i32) as u16;
    }

    pub(crate) fn is_loading_reflection(&self) -> bool {
        matches!(self.reflection, ReflectionState::Loading(_))
    }

    /// Pick up a finished reflection, if the worker has delivered one. Returns
    /// true when the state changed.
    pub(crate) fn poll_reflection(&mut self) -> bool {
        let ReflectionState::Loading(rx) = &self.reflection else {
            return false;
        };
        match rx.try_recv() {
            Ok(reflection) => {
                self.reflection = ReflectionState::Ready(reflection);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.reflection = ReflectionState::Idle;
                true
            }
        }
    }
}
