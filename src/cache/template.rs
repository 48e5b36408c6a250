use serde::{Deserialize, Serialize};

use crate::loot::catalog::ItemFilter;

/// Index into the template registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub u32);

/// Immutable cache configuration, registered once at content-load time.
///
/// `appearance` is an opaque handle the presentation layer maps to a prefab or
/// sprite; the engine never interprets it. A `spawn_weight` of zero keeps the
/// template registered but it will never be selected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheTemplate {
    pub name: String,
    pub appearance: String,
    #[serde(default)]
    pub item_filter: Option<ItemFilter>,
    pub spawn_weight: f32,
}

#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: Vec<CacheTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, template: CacheTemplate) -> TemplateId {
        let id = TemplateId(self.templates.len() as u32);
        self.templates.push(template);
        id
    }

    pub fn get(&self, id: TemplateId) -> Option<&CacheTemplate> {
        self.templates.get(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TemplateId, &CacheTemplate)> {
        self.templates
            .iter()
            .enumerate()
            .map(|(index, template)| (TemplateId(index as u32), template))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
