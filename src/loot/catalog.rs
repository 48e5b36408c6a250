use serde::{Deserialize, Serialize};

/// Index into the catalog's ordered entry list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemTypeId(pub u32);

/// How an item type turns value into something droppable.
///
/// Instanced types produce one item whose quality and durability encode the
/// realized value; stacked types produce a count of identical units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    Instanced { value_min: f32, value_max: f32 },
    Stacked { unit_value: f32, stack_limit: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemTypeDescriptor {
    pub name: String,
    #[serde(flatten)]
    pub kind: ItemKind,
    /// Relative pick weight against other eligible types.
    pub carry_chance: f32,
    /// Reserved for a specific owner class; reserved instanced types never
    /// drop. Stacked types ignore this on decomposition.
    #[serde(default)]
    pub exclusive: Option<String>,
    /// Whether this type can be instantiated directly.
    #[serde(default = "default_concrete")]
    pub concrete: bool,
    /// Concrete variant an abstract type resolves to, by catalog name.
    #[serde(default)]
    pub resolves_to: Option<String>,
}

fn default_concrete() -> bool {
    true
}

impl ItemTypeDescriptor {
    /// Map a realized value back to the (quality, durability) pair that encodes
    /// it. Only meaningful for instanced types; the value factor is split evenly
    /// between the two axes so neither dominates.
    pub fn value_to_quality(&self, value: f32) -> Option<(f32, f32)> {
        match self.kind {
            ItemKind::Instanced {
                value_min,
                value_max,
            } => {
                let clamped = value.clamp(value_min, value_max);
                let span = value_max - value_min;
                let norm = if span > 0.0 {
                    (clamped - value_min) / span
                } else {
                    0.0
                };
                let axis = norm.sqrt();
                Some((axis, axis))
            }
            ItemKind::Stacked { .. } => None,
        }
    }
}

/// Name-set predicate over item types. Absent filter means unrestricted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemFilter {
    pub allowed: Vec<String>,
}

impl ItemFilter {
    pub fn includes(&self, descriptor: &ItemTypeDescriptor) -> bool {
        self.allowed.iter().any(|name| name == &descriptor.name)
    }
}

/// Ordered, immutable item type registry. Identity is positional.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<ItemTypeDescriptor>,
}

impl Catalog {
    pub fn new(entries: Vec<ItemTypeDescriptor>) -> Self {
        Self { entries }
    }

    pub fn get(&self, id: ItemTypeId) -> Option<&ItemTypeDescriptor> {
        self.entries.get(id.0 as usize)
    }

    pub fn entries(&self) -> impl Iterator<Item = (ItemTypeId, &ItemTypeDescriptor)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (ItemTypeId(index as u32), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn id_by_name(&self, name: &str) -> Option<ItemTypeId> {
        self.entries
            .iter()
            .position(|entry| entry.name == name)
            .map(|index| ItemTypeId(index as u32))
    }

    /// Follow an abstract type to its concrete variant. Concrete types resolve
    /// to themselves; an abstract type without a usable target resolves to None,
    /// which callers treat as "ineligible".
    pub fn resolve_concrete(&self, id: ItemTypeId) -> Option<ItemTypeId> {
        let entry = self.get(id)?;
        if entry.concrete {
            return Some(id);
        }
        let target_name = entry.resolves_to.as_deref()?;
        let target_id = self.id_by_name(target_name)?;
        let target = self.get(target_id)?;
        if target.concrete {
            Some(target_id)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instanced(name: &str, min: f32, max: f32) -> ItemTypeDescriptor {
        ItemTypeDescriptor {
            name: name.to_string(),
            kind: ItemKind::Instanced {
                value_min: min,
                value_max: max,
            },
            carry_chance: 1.0,
            exclusive: None,
            concrete: true,
            resolves_to: None,
        }
    }

    #[test]
    fn value_curve_inversion_spans_unit_range() {
        let sword = instanced("sword", 2.0, 10.0);
        let (q_low, d_low) = sword.value_to_quality(2.0).unwrap();
        let (q_high, d_high) = sword.value_to_quality(10.0).unwrap();
        assert_eq!((q_low, d_low), (0.0, 0.0));
        assert!((q_high - 1.0).abs() < 1e-6 && (d_high - 1.0).abs() < 1e-6);

        // product of the axes reproduces the normalized value factor
        let (q, d) = sword.value_to_quality(6.0).unwrap();
        assert!(((q * d) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn value_curve_clamps_out_of_range_values() {
        let sword = instanced("sword", 2.0, 10.0);
        assert_eq!(sword.value_to_quality(0.5).unwrap(), (0.0, 0.0));
        let (q, d) = sword.value_to_quality(50.0).unwrap();
        assert!((q - 1.0).abs() < 1e-6 && (d - 1.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_value_range_inverts_to_zero() {
        let token = instanced("token", 5.0, 5.0);
        assert_eq!(token.value_to_quality(5.0).unwrap(), (0.0, 0.0));
    }

    #[test]
    fn stacked_types_have_no_quality_curve() {
        let coins = ItemTypeDescriptor {
            name: "coins".to_string(),
            kind: ItemKind::Stacked {
                unit_value: 1.0,
                stack_limit: 100,
            },
            carry_chance: 1.0,
            exclusive: None,
            concrete: true,
            resolves_to: None,
        };
        assert_eq!(coins.value_to_quality(3.0), None);
    }

    #[test]
    fn resolve_concrete_follows_one_hop() {
        let mut blade = instanced("blade", 1.0, 4.0);
        blade.concrete = false;
        blade.resolves_to = Some("iron blade".to_string());
        let iron = instanced("iron blade", 1.0, 4.0);
        let catalog = Catalog::new(vec![blade, iron]);

        let abstract_id = catalog.id_by_name("blade").unwrap();
        let concrete_id = catalog.id_by_name("iron blade").unwrap();
        assert_eq!(catalog.resolve_concrete(abstract_id), Some(concrete_id));
        assert_eq!(catalog.resolve_concrete(concrete_id), Some(concrete_id));
    }

    #[test]
    fn unresolvable_abstract_type_yields_none() {
        let mut ghost = instanced("ghost", 1.0, 2.0);
        ghost.concrete = false;
        let catalog = Catalog::new(vec![ghost]);
        assert_eq!(catalog.resolve_concrete(ItemTypeId(0)), None);
    }

    #[test]
    fn filter_matches_by_name() {
        let sword = instanced("sword", 1.0, 2.0);
        let shield = instanced("shield", 1.0, 2.0);
        let filter = ItemFilter {
            allowed: vec!["sword".to_string()],
        };
        assert!(filter.includes(&sword));
        assert!(!filter.includes(&shield));
    }

    #[test]
    fn catalog_yaml_round_shape() {
        let yaml = r#"
- name: coins
  kind: stacked
  unit_value: 1.0
  stack_limit: 100
  carry_chance: 2.0
- name: sword
  kind: instanced
  value_min: 2.0
  value_max: 10.0
  carry_chance: 1.0
  exclusive: knight
"#;
        let entries: Vec<ItemTypeDescriptor> = serde_yaml::from_str(yaml).expect("parse");
        let catalog = Catalog::new(entries);
        assert_eq!(catalog.len(), 2);
        let sword = catalog.get(ItemTypeId(1)).unwrap();
        assert_eq!(sword.exclusive.as_deref(), Some("knight"));
        assert!(sword.concrete, "concrete defaults to true");
    }
}
