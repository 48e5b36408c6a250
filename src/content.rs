use std::path::Path;

use crate::cache::template::CacheTemplate;
use crate::loot::catalog::{Catalog, ItemKind, ItemTypeDescriptor};

/// Outcome of checking a content root, in the same spirit as the script
/// validation reports: counts of what parsed plus every problem found, so the
/// operator sees all of them at once instead of one per run.
#[derive(Debug, Default)]
pub struct ContentReport {
    pub item_types: usize,
    pub templates: usize,
    pub errors: Vec<String>,
}

pub const ITEMS_FILE: &str = "items.yaml";
pub const CACHES_FILE: &str = "caches.yaml";

pub fn load_catalog(root: &Path) -> Result<Catalog, String> {
    let path = root.join(ITEMS_FILE);
    let text = std::fs::read_to_string(&path)
        .map_err(|err| format!("read {} failed: {}", path.display(), err))?;
    let entries: Vec<ItemTypeDescriptor> = serde_yaml::from_str(&text)
        .map_err(|err| format!("parse {} failed: {}", path.display(), err))?;
    Ok(Catalog::new(entries))
}

pub fn load_templates(root: &Path) -> Result<Vec<CacheTemplate>, String> {
    let path = root.join(CACHES_FILE);
    let text = std::fs::read_to_string(&path)
        .map_err(|err| format!("read {} failed: {}", path.display(), err))?;
    serde_yaml::from_str(&text).map_err(|err| format!("parse {} failed: {}", path.display(), err))
}

/// Parse both content files and collect every structural problem.
pub fn validate_content(root: &Path) -> ContentReport {
    let mut report = ContentReport::default();

    match load_catalog(root) {
        Ok(catalog) => {
            report.item_types = catalog.len();
            validate_catalog(&catalog, &mut report.errors);
        }
        Err(err) => report.errors.push(err),
    }

    match load_templates(root) {
        Ok(templates) => {
            report.templates = templates.len();
            validate_templates(&templates, &mut report.errors);
        }
        Err(err) => report.errors.push(err),
    }

    report
}

fn validate_catalog(catalog: &Catalog, errors: &mut Vec<String>) {
    for (id, entry) in catalog.entries() {
        let name = &entry.name;
        if name.trim().is_empty() {
            errors.push(format!("item type {} has an empty name", id.0));
        }
        if entry.carry_chance < 0.0 || !entry.carry_chance.is_finite() {
            errors.push(format!("item type '{}' has invalid carry_chance", name));
        }
        match entry.kind {
            ItemKind::Instanced {
                value_min,
                value_max,
            } => {
                if value_min > value_max {
                    errors.push(format!(
                        "item type '{}' has inverted value range [{}, {}]",
                        name, value_min, value_max
                    ));
                }
                if value_min < 0.0 {
                    errors.push(format!("item type '{}' has a negative value range", name));
                }
            }
            ItemKind::Stacked {
                unit_value,
                stack_limit,
            } => {
                if unit_value <= 0.0 {
                    errors.push(format!(
                        "item type '{}' has non-positive unit_value {}",
                        name, unit_value
                    ));
                }
                if stack_limit == 0 {
                    errors.push(format!("item type '{}' has a zero stack_limit", name));
                }
            }
        }
        if !entry.concrete && catalog.resolve_concrete(id).is_none() {
            errors.push(format!(
                "abstract item type '{}' does not resolve to a concrete type",
                name
            ));
        }
        if catalog.id_by_name(name) != Some(id) {
            errors.push(format!("duplicate item type name '{}'", name));
        }
    }
}

fn validate_templates(templates: &[CacheTemplate], errors: &mut Vec<String>) {
    for template in templates {
        if template.name.trim().is_empty() {
            errors.push("cache template has an empty name".to_string());
        }
        if template.spawn_weight < 0.0 || !template.spawn_weight.is_finite() {
            errors.push(format!(
                "cache template '{}' has invalid spawn_weight",
                template.name
            ));
        }
        if let Some(filter) = &template.item_filter {
            if filter.allowed.is_empty() {
                errors.push(format!(
                    "cache template '{}' has an item filter that allows nothing",
                    template.name
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_root(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("supplydrop-content-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create temp root");
        dir
    }

    const GOOD_ITEMS: &str = r#"
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
"#;

    const GOOD_CACHES: &str = r#"
- name: dropped supplies
  appearance: supply_crate
  spawn_weight: 1.0
"#;

    #[test]
    fn valid_content_reports_no_errors() {
        let root = temp_root("ok");
        fs::write(root.join(ITEMS_FILE), GOOD_ITEMS).unwrap();
        fs::write(root.join(CACHES_FILE), GOOD_CACHES).unwrap();

        let report = validate_content(&root);
        assert_eq!(report.item_types, 2);
        assert_eq!(report.templates, 1);
        assert!(report.errors.is_empty(), "errors: {:?}", report.errors);

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_files_are_reported_not_fatal() {
        let root = temp_root("missing");
        let report = validate_content(&root);
        assert_eq!(report.errors.len(), 2);

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn bad_values_are_collected() {
        let root = temp_root("bad");
        fs::write(
            root.join(ITEMS_FILE),
            r#"
- name: coins
  kind: stacked
  unit_value: 0.0
  stack_limit: 0
  carry_chance: -1.0
- name: relic
  kind: instanced
  value_min: 10.0
  value_max: 2.0
  carry_chance: 1.0
- name: phantom
  kind: instanced
  value_min: 1.0
  value_max: 2.0
  carry_chance: 1.0
  concrete: false
"#,
        )
        .unwrap();
        fs::write(
            root.join(CACHES_FILE),
            r#"
- name: cursed stash
  appearance: crate
  spawn_weight: -2.0
  item_filter:
    allowed: []
"#,
        )
        .unwrap();

        let report = validate_content(&root);
        // coins: unit_value, stack_limit, carry_chance; relic: inverted range;
        // phantom: unresolvable; stash: weight + empty filter
        assert_eq!(report.errors.len(), 7, "errors: {:?}", report.errors);

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn duplicate_item_names_are_rejected() {
        let root = temp_root("dup");
        fs::write(
            root.join(ITEMS_FILE),
            r#"
- name: coins
  kind: stacked
  unit_value: 1.0
  stack_limit: 10
  carry_chance: 1.0
- name: coins
  kind: stacked
  unit_value: 2.0
  stack_limit: 10
  carry_chance: 1.0
"#,
        )
        .unwrap();
        fs::write(root.join(CACHES_FILE), GOOD_CACHES).unwrap();

        let report = validate_content(&root);
        assert!(report
            .errors
            .iter()
            .any(|err| err.contains("duplicate item type name")));

        let _ = fs::remove_dir_all(&root);
    }
}
