//! Aggregate statistics over an assembled [Project].
use crate::prelude::*;
use serde::Serialize;

/// Number of component types listed by [ProjectSummary::from_project].
pub const DEFAULT_TOP_TYPES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub name: String,
    pub screens: usize,
    pub extensions: usize,
    pub assets: usize,
    /// Total size of all assets, in bytes.
    pub asset_bytes: u64,
    pub components: usize,
    pub faulty: usize,
    pub builtin_components: usize,
    pub extension_components: usize,
    /// Most used component types, most frequent first.
    pub top_types: Vec<TypeCount>,
    /// Assets per lower-cased type, in first-seen order.
    pub asset_types: Vec<TypeCount>,
}

impl ProjectSummary {
    pub fn from_project(project: &Project) -> Self {
        Self::with_top_types(project, DEFAULT_TOP_TYPES)
    }

    pub fn with_top_types(project: &Project, top: usize) -> Self {
        let components = || project.screens.iter().flat_map(Screen::components);

        let mut top_types = tally(components().map(|component| component.type_name.clone()));
        // Stable, so ties keep their first-seen order.
        top_types.sort_by(|a, b| b.count.cmp(&a.count));
        top_types.truncate(top);

        Self {
            name: project.name.clone(),
            screens: project.screens.len(),
            extensions: project.extensions.len(),
            assets: project.assets.len(),
            asset_bytes: project.assets.iter().map(|asset| asset.size).sum(),
            components: components().count(),
            faulty: components().filter(|component| component.faulty).count(),
            builtin_components: components()
                .filter(|component| component.origin == Origin::BuiltIn)
                .count(),
            extension_components: components()
                .filter(|component| component.origin == Origin::Extension)
                .count(),
            top_types,
            asset_types: tally(project.assets.iter().map(|asset| asset.kind.to_lowercase())),
        }
    }
}

/// Counts occurrences, keeping first-seen order.
fn tally(names: impl Iterator<Item = String>) -> Vec<TypeCount> {
    let mut counts: Vec<TypeCount> = vec![];
    for name in names {
        match counts.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.count += 1,
            None => counts.push(TypeCount { name, count: 1 }),
        }
    }
    counts
}
