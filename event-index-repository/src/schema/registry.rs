//! The frozen, validated schema.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use super::alias::AliasResolver;
use super::field::{DynamicTemplate, FieldDescriptor, FieldType};
use super::projection::ProjectionRule;
use crate::utils;

/// Validated field registry, read-only after [`SchemaBuilder::build`].
///
/// Share it behind an `Arc`; every accessor takes `&self`.
///
/// [`SchemaBuilder::build`]: super::SchemaBuilder::build
#[derive(Debug, Clone)]
pub struct Schema {
    fields: BTreeMap<String, FieldDescriptor>,
    projections: Vec<ProjectionRule>,
    dynamic_templates: Vec<DynamicTemplate>,
    full_text_field: Option<String>,
    aliases: AliasResolver,
}

impl Schema {
    pub(crate) fn new(
        fields: BTreeMap<String, FieldDescriptor>,
        projections: Vec<ProjectionRule>,
        dynamic_templates: Vec<DynamicTemplate>,
        full_text_field: Option<String>,
        aliases: AliasResolver,
    ) -> Self {
        Self {
            fields,
            projections,
            dynamic_templates,
            full_text_field,
            aliases,
        }
    }

    pub fn field(&self, path: &str) -> Option<&FieldDescriptor> {
        self.fields.get(path)
    }

    /// Declared fields ordered by canonical path.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    pub fn aliases(&self) -> &AliasResolver {
        &self.aliases
    }

    pub fn projections(&self) -> &[ProjectionRule] {
        &self.projections
    }

    pub fn dynamic_templates(&self) -> &[DynamicTemplate] {
        &self.dynamic_templates
    }

    pub fn full_text_field(&self) -> Option<&str> {
        self.full_text_field.as_deref()
    }

    /// Apply every projection rule to a document, the way the engine's
    /// `copy_to` would populate the targets at index time.
    pub fn project_document(&self, document: &mut Value) {
        for rule in &self.projections {
            rule.apply(document);
        }
    }

    /// Render the OpenSearch `mappings` body.
    ///
    /// The root is closed (`dynamic: false`); only objects explicitly marked
    /// dynamic accept unmapped keys. Undeclared intermediate path segments are
    /// rendered as plain objects.
    pub fn to_mapping(&self) -> Value {
        let mut properties = Map::new();
        // BTreeMap order puts every parent before its children.
        for field in self.fields.values() {
            let Some(segments) = utils::split_path(&field.path) else {
                continue;
            };
            insert_property(&mut properties, &segments, field.to_mapping());
        }

        let templates: Vec<Value> = self
            .dynamic_templates
            .iter()
            .map(DynamicTemplate::to_mapping)
            .collect();

        let mut mapping = json!({
            "dynamic": false,
            "properties": properties
        });
        if !templates.is_empty() {
            mapping["dynamic_templates"] = Value::Array(templates);
        }
        mapping
    }
}

fn insert_property(root: &mut Map<String, Value>, segments: &[&str], mapping: Value) {
    let Some((leaf, parents)) = segments.split_last() else {
        return;
    };

    let mut properties = root;
    for segment in parents {
        let entry = properties
            .entry(segment.to_string())
            .or_insert_with(|| json!({ "type": FieldType::Object.as_str() }));
        let Some(object) = entry.as_object_mut() else {
            return;
        };
        let children = object
            .entry("properties")
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(children) = children.as_object_mut() else {
            return;
        };
        properties = children;
    }

    properties.insert(leaf.to_string(), mapping);
}
