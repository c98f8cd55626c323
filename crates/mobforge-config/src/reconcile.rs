//! The two ways a configuration section is reconciled with its template.
//!
//! - [`synchronize_with_template`] is for *structural* sections (global
//!   settings, per-arena settings). Their key set must always match the
//!   template: missing keys are added with the template's default,
//!   unknown keys are removed. Values the user already set are kept.
//! - [`fill_if_empty`] is for *content* sections (classes, waves,
//!   rewards). The template is only a seed: it is copied in when the
//!   section has no keys at all, and otherwise the section is left alone.
//!
//! Swapping one for the other either deletes user content or leaves
//! obsolete keys behind, so callers pick deliberately.

use serde_json::{Map, Value};

/// What a reconciliation pass changed, as dotted paths relative to the
/// reconciled section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Keys copied in from the template.
    pub added: Vec<String>,
    /// Keys removed because the template doesn't have them.
    pub removed: Vec<String>,
}

impl Reconciliation {
    /// Returns `true` if the section was not modified.
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Adds every template key missing from `section` (with the template's
/// value) and removes every key of `section` the template lacks.
///
/// Nested sections present on both sides are reconciled recursively.
/// When the template has a scalar where the user has a section (or the
/// other way round) the user's value is kept.
pub fn synchronize_with_template(
    section: &mut Map<String, Value>,
    template: &Map<String, Value>,
) -> Reconciliation {
    let mut report = Reconciliation::default();
    synchronize_into(section, template, "", &mut report);
    report
}

fn synchronize_into(
    section: &mut Map<String, Value>,
    template: &Map<String, Value>,
    prefix: &str,
    report: &mut Reconciliation,
) {
    for (key, default) in template {
        let path = join(prefix, key);
        match section.get_mut(key) {
            None => {
                section.insert(key.clone(), default.clone());
                report.added.push(path);
            }
            Some(Value::Object(child)) => {
                if let Value::Object(child_template) = default {
                    synchronize_into(child, child_template, &path, report);
                }
            }
            Some(_) => {}
        }
    }

    let obsolete: Vec<String> = section
        .keys()
        .filter(|key| !template.contains_key(*key))
        .cloned()
        .collect();
    for key in obsolete {
        section.shift_remove(&key);
        report.removed.push(join(prefix, &key));
    }
}

/// Copies the whole template into `section` if, and only if, `section`
/// has no keys. Returns `true` if anything was copied.
pub fn fill_if_empty(section: &mut Map<String, Value>, template: &Map<String, Value>) -> bool {
    if !section.is_empty() {
        return false;
    }
    for (key, value) in template {
        section.insert(key.clone(), value.clone());
    }
    !template.is_empty()
}
