//! Type graph service
//!
//! Aliases, subclass-of edges and generic icons. Subclass data comes from
//! external files, so traversals never assume the graph is acyclic.

use crate::domain::entities::MimeType;
use std::collections::{HashMap, HashSet, VecDeque};

/// Alias map, subclass graph and generic-icon table
#[derive(Debug, Default)]
pub struct TypeGraph {
    aliases: HashMap<MimeType, MimeType>,
    parents: HashMap<MimeType, Vec<MimeType>>,
    generic_icons: HashMap<MimeType, String>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `alias` as another name for `canonical`
    pub fn add_alias(&mut self, alias: MimeType, canonical: MimeType) {
        self.aliases.insert(alias, canonical);
    }

    /// Records that `mime` is a subclass of `parent`
    pub fn add_parent(&mut self, mime: MimeType, parent: MimeType) {
        let parents = self.parents.entry(mime).or_default();
        if !parents.contains(&parent) {
            parents.push(parent);
        }
    }

    pub fn add_generic_icon(&mut self, mime: MimeType, icon: impl Into<String>) {
        self.generic_icons.insert(mime, icon.into());
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    pub fn subclass_count(&self) -> usize {
        self.parents.values().map(Vec::len).sum()
    }

    /// Follows one alias hop; types without an alias are returned unchanged
    pub fn canonicalize(&self, mime: &MimeType) -> MimeType {
        self.aliases.get(mime).unwrap_or(mime).clone()
    }

    /// Returns the canonical type `mime` is an alias of, if it is one
    pub fn alias_of(&self, mime: &MimeType) -> Option<&MimeType> {
        self.aliases.get(mime)
    }

    /// Returns every alias registered for `mime`, sorted
    pub fn aliases_of(&self, mime: &MimeType) -> Vec<&MimeType> {
        let mut aliases: Vec<&MimeType> = self
            .aliases
            .iter()
            .filter(|(_, canonical)| *canonical == mime)
            .map(|(alias, _)| alias)
            .collect();
        aliases.sort();
        aliases
    }

    /// Direct parents in declaration order
    pub fn parents(&self, mime: &MimeType) -> &[MimeType] {
        self.parents.get(mime).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All transitive parents, breadth-first, each listed once
    pub fn ancestors(&self, mime: &MimeType) -> Vec<MimeType> {
        let start = self.canonicalize(mime);
        let mut seen: HashSet<MimeType> = HashSet::from([start.clone()]);
        let mut queue = VecDeque::from([start]);
        let mut ancestors = Vec::new();

        while let Some(current) = queue.pop_front() {
            for parent in self.parents(&current) {
                let parent = self.canonicalize(parent);
                if seen.insert(parent.clone()) {
                    ancestors.push(parent.clone());
                    queue.push_back(parent);
                }
            }
        }
        ancestors
    }

    /// Whether `mime` equals `ancestor` or descends from it
    pub fn is_instance(&self, mime: &MimeType, ancestor: &MimeType) -> bool {
        let start = self.canonicalize(mime);
        let target = self.canonicalize(ancestor);
        if start == target {
            return true;
        }

        let mut seen: HashSet<MimeType> = HashSet::from([start.clone()]);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for parent in self.parents(&current) {
                let parent = self.canonicalize(parent);
                if parent == target {
                    return true;
                }
                if seen.insert(parent.clone()) {
                    queue.push_back(parent);
                }
            }
        }
        false
    }

    /// Icon for the category of `mime`, e.g. `text-x-generic`
    pub fn generic_icon(&self, mime: &MimeType) -> String {
        self.generic_icons
            .get(mime)
            .or_else(|| self.generic_icons.get(&self.canonicalize(mime)))
            .cloned()
            .unwrap_or_else(|| mime.generic_mime().icon())
    }
}
