// src/cache/string_table.rs
//! String interning for cached declaration indices
//!
//! Thousands of cached documents repeat the same container names
//! (`System.Collections.Generic`, ...). Interning them keeps one allocation
//! per distinct string for as long as the cache lives.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::symbols::{DeclaredSymbolInfo, DocumentIndex};

#[derive(Debug, Default)]
pub struct StringTable {
    strings: Mutex<HashSet<Arc<str>>>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the shared copy of `value`, adding it if it is new
    pub fn intern(&self, value: &Arc<str>) -> Arc<str> {
        let mut strings = self.strings.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Self::intern_locked(&mut strings, value)
    }

    fn intern_locked(strings: &mut HashSet<Arc<str>>, value: &Arc<str>) -> Arc<str> {
        if let Some(existing) = strings.get(value.as_ref()) {
            return existing.clone();
        }
        strings.insert(value.clone());
        value.clone()
    }

    /// Rewrite every string of `index` to its interned copy
    ///
    /// Takes the lock once for the whole document.
    pub fn intern_index(&self, index: DocumentIndex) -> DocumentIndex {
        let mut strings = self.strings.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let declarations = index
            .into_declarations()
            .into_iter()
            .map(|info| DeclaredSymbolInfo {
                name: Self::intern_locked(&mut strings, &info.name),
                name_suffix: Self::intern_locked(&mut strings, &info.name_suffix),
                container_display_name: Self::intern_locked(&mut strings, &info.container_display_name),
                fully_qualified_container_name: Self::intern_locked(
                    &mut strings,
                    &info.fully_qualified_container_name,
                ),
                ..info
            })
            .collect();
        DocumentIndex::new(declarations)
    }

    pub fn len(&self) -> usize {
        self.strings.lock().map(|strings| strings.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
