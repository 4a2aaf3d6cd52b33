//! Population phase: embed related sub-entities along relation paths.
//!
//! All I/O an evaluation performs happens here, before resolution, so the
//! decision core stays pure. A string field registered as a relation is
//! replaced by the referenced document; arrays populate element-wise; a
//! missing target or an unregistered relation field leaves the branch as-is
//! and resolution later reports it Unresolved.

use serde_json::Value;

use crate::error::Result;
use crate::loader::EntityLoader;
use crate::path::RelationPath;
use crate::registry::ModelRegistry;

/// Populate `entity` (loaded from `model`) along every path in `paths`.
pub fn populate<L: EntityLoader>(
    loader: &L,
    registry: &ModelRegistry,
    model: &str,
    entity: Value,
    paths: &[RelationPath],
) -> Result<Value> {
    let mut document = entity;
    for path in paths {
        embed(loader, registry, model, &mut document, path.segments())?;
    }
    Ok(document)
}

fn embed<L: EntityLoader>(
    loader: &L,
    registry: &ModelRegistry,
    model: &str,
    value: &mut Value,
    segments: &[String],
) -> Result<()> {
    let Some((field, rest)) = segments.split_first() else {
        return Ok(());
    };

    match value {
        Value::Array(items) => {
            for item in items {
                embed(loader, registry, model, item, segments)?;
            }
        }
        Value::Object(map) => {
            // Unregistered model or non-relation field: nothing to embed,
            // the raw value stays in place.
            let Some(target) = registry
                .get(model)
                .and_then(|schema| schema.target_of(field))
                .map(str::to_string)
            else {
                return Ok(());
            };
            let Some(child) = map.get_mut(field.as_str()) else {
                return Ok(());
            };
            fetch_refs(loader, &target, child)?;
            embed(loader, registry, &target, child, rest)?;
        }
        _ => {}
    }

    Ok(())
}

/// Replace raw id references with their documents. A dangling reference is
/// left as the raw id; the claim extractor still compares it as an id.
fn fetch_refs<L: EntityLoader>(loader: &L, target_model: &str, child: &mut Value) -> Result<()> {
    match child {
        Value::String(id) => {
            if let Some(doc) = loader.load_by_id(target_model, id)? {
                *child = doc;
            }
        }
        Value::Array(items) => {
            for item in items {
                fetch_refs(loader, target_model, item)?;
            }
        }
        _ => {}
    }
    Ok(())
}
