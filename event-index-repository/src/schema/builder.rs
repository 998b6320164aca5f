//! Schema declaration and validation.
//!
//! Declarations are collected incrementally (and may come from several
//! contributors); [`SchemaBuilder::build`] validates the whole set at once and
//! either returns a frozen [`Schema`] or the first conflict it finds.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use super::alias::AliasResolver;
use super::field::{DynamicTemplate, FieldDescriptor, FieldOptions, FieldType};
use super::projection::{ProjectionOptions, ProjectionRule};
use super::registry::Schema;
use crate::errors::EventIndexError;
use crate::utils;

/// The catch-all field that receives every "include in full text" value.
#[derive(Debug, Clone, PartialEq)]
pub struct FullTextField {
    pub path: String,
    pub analyzer: Option<String>,
    pub search_analyzer: Option<String>,
}

impl Default for FullTextField {
    fn default() -> Self {
        Self {
            path: "all".to_string(),
            analyzer: None,
            search_analyzer: None,
        }
    }
}

/// Collects field declarations, projections and dynamic templates.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    declarations: Vec<FieldDescriptor>,
    projections: Vec<ProjectionRule>,
    dynamic_templates: Vec<DynamicTemplate>,
    full_text: FullTextField,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the catch-all full-text field.
    pub fn full_text_field(&mut self, full_text: FullTextField) -> &mut Self {
        self.full_text = full_text;
        self
    }

    /// Declare a field. Validation is deferred to [`build`](Self::build).
    pub fn declare(
        &mut self,
        path: impl Into<String>,
        field_type: FieldType,
        options: FieldOptions,
    ) -> &FieldDescriptor {
        let index = self.declarations.len();
        self.declarations
            .push(FieldDescriptor::new(path, field_type, options));
        &self.declarations[index]
    }

    /// Declare that the values at `sources` feed the target field `target_alias`.
    ///
    /// The target is declared at the path equal to its alias. Each source is
    /// stored but excluded from independent indexing.
    pub fn project<I, S>(
        &mut self,
        sources: I,
        target_alias: &str,
        options: ProjectionOptions,
    ) -> &ProjectionRule
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.declarations.push(FieldDescriptor::new(
            target_alias,
            options.field_type,
            options.target_options(target_alias),
        ));

        let mut rule = ProjectionRule::new(target_alias);
        for source in sources {
            rule.add_source(source.as_ref());
        }

        let index = self.projections.len();
        self.projections.push(rule);
        &self.projections[index]
    }

    /// Add a dynamic template for unmapped strings inside dynamic objects.
    pub fn dynamic_template(&mut self, template: DynamicTemplate) -> &mut Self {
        self.dynamic_templates.push(template);
        self
    }

    /// Validate every declaration and freeze the schema.
    ///
    /// # Errors
    ///
    /// `EventIndexError::SchemaConflict` when:
    /// - two fields share an alias, or an alias is empty or padded
    /// - a path is redeclared with a different type or a different alias
    /// - a field sits under a path declared with a non-object type
    /// - a projection source is declared with a non-string type or its own alias
    /// - a path is empty or has empty segments
    pub fn build(self) -> Result<Schema, EventIndexError> {
        let SchemaBuilder {
            declarations,
            projections,
            dynamic_templates,
            full_text,
        } = self;

        let mut fields = merge_declarations(declarations)?;
        let projections = merge_projections(projections);

        for rule in &projections {
            apply_projection(&mut fields, rule)?;
        }

        let full_text_path = apply_full_text(&mut fields, &full_text)?;
        check_ancestors(&fields)?;

        let mut aliases = AliasResolver::default();
        for field in fields.values_mut() {
            if field.options.dynamic && field.field_type != FieldType::Object {
                warn!(
                    path = %field.path,
                    field_type = field.field_type.as_str(),
                    "Dynamic flag ignored on non-object field"
                );
                field.options.dynamic = false;
            }
            if let Some(alias) = field.options.alias.as_deref() {
                aliases.insert(alias, &field.path)?;
            }
        }

        debug!(
            field_count = fields.len(),
            alias_count = aliases.len(),
            projection_count = projections.len(),
            "Schema built"
        );

        Ok(Schema::new(
            fields,
            projections,
            dynamic_templates,
            full_text_path,
            aliases,
        ))
    }
}

/// Collapse redeclarations of the same path, rejecting incompatible ones.
fn merge_declarations(
    declarations: Vec<FieldDescriptor>,
) -> Result<BTreeMap<String, FieldDescriptor>, EventIndexError> {
    let mut fields: BTreeMap<String, FieldDescriptor> = BTreeMap::new();

    for declaration in declarations {
        if utils::split_path(&declaration.path).is_none() {
            return Err(EventIndexError::schema_conflict(format!(
                "Invalid field path '{}'",
                declaration.path
            )));
        }

        let Some(existing) = fields.get_mut(&declaration.path) else {
            fields.insert(declaration.path.clone(), declaration);
            continue;
        };

        if existing.field_type != declaration.field_type {
            return Err(EventIndexError::schema_conflict(format!(
                "Field '{}' declared as both {} and {}",
                declaration.path,
                existing.field_type.as_str(),
                declaration.field_type.as_str()
            )));
        }

        match (existing.alias(), declaration.alias()) {
            (Some(first), Some(second)) if first != second => {
                return Err(EventIndexError::schema_conflict(format!(
                    "Field '{}' declared with aliases '{}' and '{}'",
                    declaration.path, first, second
                )));
            }
            (None, Some(second)) => existing.options.alias = Some(second.to_string()),
            _ => {}
        }
    }

    Ok(fields)
}

/// Merge rules that share a target, keeping first-seen source order.
fn merge_projections(projections: Vec<ProjectionRule>) -> Vec<ProjectionRule> {
    let mut merged: Vec<ProjectionRule> = Vec::with_capacity(projections.len());
    for rule in projections {
        match merged.iter_mut().find(|existing| existing.target == rule.target) {
            Some(existing) => {
                for source in &rule.sources {
                    existing.add_source(source);
                }
            }
            None => merged.push(rule),
        }
    }
    merged
}

fn apply_projection(
    fields: &mut BTreeMap<String, FieldDescriptor>,
    rule: &ProjectionRule,
) -> Result<(), EventIndexError> {
    for source in &rule.sources {
        if source == &rule.target {
            return Err(EventIndexError::schema_conflict(format!(
                "Field '{}' cannot be projected into itself",
                source
            )));
        }
        if utils::split_path(source).is_none() {
            return Err(EventIndexError::schema_conflict(format!(
                "Invalid projection source '{}'",
                source
            )));
        }

        let field = fields.entry(source.clone()).or_insert_with(|| {
            FieldDescriptor::new(source.clone(), FieldType::Text, FieldOptions::new())
        });

        if !field.field_type.is_string() {
            return Err(EventIndexError::schema_conflict(format!(
                "Projection source '{}' is declared as {}",
                source,
                field.field_type.as_str()
            )));
        }
        // The target is the only searchable form of a source.
        if let Some(alias) = field.alias() {
            return Err(EventIndexError::schema_conflict(format!(
                "Projection source '{}' into '{}' cannot carry its own alias '{}'",
                source, rule.target, alias
            )));
        }

        field.options.indexed = false;
        if !field.copy_to.contains(&rule.target) {
            field.copy_to.push(rule.target.clone());
        }
    }
    Ok(())
}

/// Route "include in full text" fields into the catch-all field, declaring it
/// when first referenced. Returns the catch-all path if it is in use.
///
/// `copy_to` does not chain, so sources of a full-text projection target copy
/// into the catch-all field themselves.
fn apply_full_text(
    fields: &mut BTreeMap<String, FieldDescriptor>,
    full_text: &FullTextField,
) -> Result<Option<String>, EventIndexError> {
    let full_text_targets: HashSet<String> = fields
        .values()
        .filter(|field| field.options.include_in_all)
        .map(|field| field.path.clone())
        .collect();

    let mut referenced = false;
    for field in fields.values_mut() {
        if field.field_type == FieldType::Object || field.path == full_text.path {
            continue;
        }
        let feeds_full_text_target = field
            .copy_to
            .iter()
            .any(|target| full_text_targets.contains(target));
        if field.options.include_in_all || feeds_full_text_target {
            field.copy_to.push(full_text.path.clone());
            referenced = true;
        }
    }

    if !referenced {
        return Ok(None);
    }

    match fields.get(&full_text.path) {
        Some(existing) if existing.field_type != FieldType::Text => {
            return Err(EventIndexError::schema_conflict(format!(
                "Full-text field '{}' declared as {}",
                full_text.path,
                existing.field_type.as_str()
            )));
        }
        Some(_) => {}
        None => {
            let options = FieldOptions {
                analyzer: full_text.analyzer.clone(),
                search_analyzer: full_text.search_analyzer.clone(),
                ..FieldOptions::default()
            };
            fields.insert(
                full_text.path.clone(),
                FieldDescriptor::new(full_text.path.clone(), FieldType::Text, options),
            );
        }
    }

    Ok(Some(full_text.path.clone()))
}

/// Every declared ancestor of a field must be an object.
fn check_ancestors(fields: &BTreeMap<String, FieldDescriptor>) -> Result<(), EventIndexError> {
    for path in fields.keys() {
        for ancestor in utils::ancestor_paths(path) {
            if let Some(parent) = fields.get(ancestor) {
                if parent.field_type != FieldType::Object {
                    return Err(EventIndexError::schema_conflict(format!(
                        "Field '{}' is nested under '{}', which is declared as {}",
                        path,
                        ancestor,
                        parent.field_type.as_str()
                    )));
                }
            }
        }
    }
    Ok(())
}
