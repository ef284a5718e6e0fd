//! Configuration Overlays
//!
//! An [`Overlay`] is one contributor's fragment: section name -> path -> value.
//! Sections start flat and are normalized into tree form the first time the
//! overlay is rendered. The rendered form is kept, so rendering twice yields
//! the same document, and later `set` calls merge into the rendered tree.
//!
//! Overlays are single-owner values; nothing here is synchronized.

use crate::error::{ComposeError, PathError};
use crate::merge::{merge_documents, merge_entries, merge_value};
use crate::path::{parse_tree_path, Path, PathSegment};
use crate::tree::group::split_numeric_suffix;
use crate::tree::{group_numeric_suffix, node_at_path, render};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// How a section's flat keys become a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionLayout {
    /// Keys are tree paths (`a.b[0].c`)
    #[default]
    Tree,
    /// Keys follow the `<Base>.<N>` convention and render to a sequence of mappings
    Grouped,
}

#[derive(Debug, Clone, PartialEq)]
enum SectionState {
    Flat(BTreeMap<String, Value>),
    Rendered(Value),
}

#[derive(Debug, Clone, PartialEq)]
struct Section {
    layout: SectionLayout,
    state: SectionState,
}

impl Section {
    fn new(layout: SectionLayout) -> Self {
        Self {
            layout,
            state: SectionState::Flat(BTreeMap::new()),
        }
    }

    fn kind(&self) -> &'static str {
        match (&self.state, self.layout) {
            (SectionState::Flat(_), SectionLayout::Tree) => "flat section",
            (SectionState::Flat(_), SectionLayout::Grouped) => "flat grouped section",
            (SectionState::Rendered(_), SectionLayout::Tree) => "rendered section",
            (SectionState::Rendered(_), SectionLayout::Grouped) => "rendered grouped section",
        }
    }

    fn compatible_with(&self, other: &Section) -> bool {
        self.layout == other.layout
            && matches!(
                (&self.state, &other.state),
                (SectionState::Flat(_), SectionState::Flat(_))
                    | (SectionState::Rendered(_), SectionState::Rendered(_))
            )
    }

    /// Convert the flat entries into tree form (once) and return the tree.
    fn normalize(&mut self, name: &str) -> Result<Value, PathError> {
        let tree = match &self.state {
            SectionState::Rendered(tree) => return Ok(tree.clone()),
            SectionState::Flat(entries) => match self.layout {
                SectionLayout::Tree => render(entries)?,
                SectionLayout::Grouped => render_grouped(name, entries)?,
            },
        };
        debug!(section = name, "Normalized section into tree form");
        self.state = SectionState::Rendered(tree.clone());
        Ok(tree)
    }
}

fn render_grouped(name: &str, entries: &BTreeMap<String, Value>) -> Result<Value, PathError> {
    let Some(groups) = group_numeric_suffix(entries) else {
        return render(entries);
    };

    let leftovers: Vec<&str> = entries
        .keys()
        .map(String::as_str)
        .filter(|key| split_numeric_suffix(key).is_none())
        .collect();
    if !leftovers.is_empty() {
        warn!(
            section = name,
            keys = ?leftovers,
            "Keys without a numeric suffix collide with the grouped sequence and are dropped"
        );
    }

    let items = groups
        .into_iter()
        .map(|group| render(&group.into_iter().collect()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Array(items))
}

/// One contributor's configuration fragment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    sections: BTreeMap<String, Section>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Mark `section` as numeric-suffix grouped.
    ///
    /// Has no effect on a section that already holds entries.
    pub fn declare_grouped(&mut self, section: &str) -> Result<(), ComposeError> {
        parse_tree_path(section)?;
        let entry = self
            .sections
            .entry(section.to_string())
            .or_insert_with(|| Section::new(SectionLayout::Grouped));
        if let SectionState::Flat(entries) = &entry.state {
            if entries.is_empty() {
                entry.layout = SectionLayout::Grouped;
            }
        }
        Ok(())
    }

    /// Upsert `value` at `section` / `path`.
    ///
    /// Paths are stored in normalized form, so `a[00]` and `a[0]` address
    /// the same entry.
    ///
    /// Sequence values append to an existing sequence and de-duplicate;
    /// anything else overwrites.
    pub fn set(
        &mut self,
        section: &str,
        path: &str,
        value: impl Into<Value>,
    ) -> Result<(), ComposeError> {
        parse_tree_path(section)?;
        let parsed = parse_tree_path(path)?;
        let value = value.into();

        let entry = self
            .sections
            .entry(section.to_string())
            .or_insert_with(|| Section::new(SectionLayout::Tree));

        match (&mut entry.state, entry.layout) {
            (SectionState::Flat(entries), _) => {
                let key = parsed.to_string();
                match entries.get_mut(&key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        entries.insert(key, value);
                    }
                }
            }
            (SectionState::Rendered(tree), SectionLayout::Tree) => {
                merge_value(node_at_path(tree, &parsed), value);
            }
            (SectionState::Rendered(_), SectionLayout::Grouped) => {
                return Err(ComposeError::IncompatibleMerge {
                    section: section.to_string(),
                    base: "rendered grouped section",
                    incoming: "flat entry",
                });
            }
        }
        Ok(())
    }

    /// Look up the value stored at `section` / `path`.
    ///
    /// Grouped sections are only addressable before rendering.
    pub fn get(&self, section: &str, path: &str) -> Option<&Value> {
        let section = self.sections.get(section)?;
        match (&section.state, section.layout) {
            (SectionState::Flat(entries), _) => {
                entries.get(&parse_tree_path(path).ok()?.to_string())
            }
            (SectionState::Rendered(tree), SectionLayout::Tree) => {
                lookup(tree, &parse_tree_path(path).ok()?)
            }
            (SectionState::Rendered(_), SectionLayout::Grouped) => None,
        }
    }

    /// Merge `incoming` into this overlay.
    ///
    /// Sections only present here are kept. Shared sections must have the
    /// same layout and representation; otherwise nothing is merged and
    /// [`ComposeError::IncompatibleMerge`] is returned.
    pub fn merge(&mut self, incoming: Overlay) -> Result<(), ComposeError> {
        for (name, section) in &incoming.sections {
            if let Some(base) = self.sections.get(name) {
                if !base.compatible_with(section) {
                    return Err(ComposeError::IncompatibleMerge {
                        section: name.clone(),
                        base: base.kind(),
                        incoming: section.kind(),
                    });
                }
            }
        }

        for (name, section) in incoming.sections {
            match self.sections.get_mut(&name) {
                None => {
                    self.sections.insert(name, section);
                }
                Some(base) => match (&mut base.state, section.state) {
                    (SectionState::Flat(base_entries), SectionState::Flat(entries)) => {
                        merge_entries(base_entries, entries)
                    }
                    (SectionState::Rendered(base_tree), SectionState::Rendered(tree)) => {
                        merge_documents(base_tree, tree)
                    }
                    _ => unreachable!("section compatibility checked above"),
                },
            }
        }
        Ok(())
    }

    /// Render every section into one document, spliced at the section's path.
    ///
    /// `seed` may hold a partially built document from another source; the
    /// sections are merged into it.
    pub fn render_to_tree(&mut self, seed: Option<Value>) -> Result<Value, ComposeError> {
        let mut document = seed.unwrap_or_else(|| Value::Object(Map::new()));
        for (name, section) in self.sections.iter_mut() {
            let tree = section.normalize(name)?;
            merge_documents(node_at_path(&mut document, &parse_tree_path(name)?), tree);
        }
        Ok(document)
    }

    /// Render and serialize to YAML.
    pub fn render_bytes(&mut self) -> Result<Vec<u8>, ComposeError> {
        let document = self.render_to_tree(None)?;
        Ok(serde_yaml::to_string(&document)?.into_bytes())
    }

    /// Render and hand the document to serde for a typed consumer.
    pub fn decode<T: DeserializeOwned>(&mut self) -> Result<T, ComposeError> {
        let document = self.render_to_tree(None)?;
        Ok(serde_json::from_value(document)?)
    }
}

fn lookup<'a>(tree: &'a Value, path: &Path) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(tree, |node, segment| match segment {
            PathSegment::FieldName(name) => node.get(name.as_str()),
            PathSegment::Index(index) => node.get(*index),
        })
}
