//! Field declarations for the event index.
//!
//! Top-level event fields, the well-known data bag sub-documents, and the
//! derived fields (`ip`, `os`, `error.*`) that the engine populates through
//! projections and the error flattening pipeline.

use event_index_shared::known_keys;

use super::analysis;
use super::builder::{FullTextField, SchemaBuilder};
use super::field::{DynamicTemplate, FieldOptions, FieldType, KEYWORD_IGNORE_ABOVE};
use super::projection::ProjectionOptions;
use super::registry::Schema;
use crate::errors::EventIndexError;

/// Query-facing field aliases.
pub mod alias {
    pub const CREATED_UTC: &str = "created";
    pub const ORGANIZATION_ID: &str = "organization";
    pub const PROJECT_ID: &str = "project";
    pub const STACK_ID: &str = "stack";
    pub const ID: &str = "id";
    pub const REFERENCE_ID: &str = "reference";
    pub const DATE: &str = "date";
    pub const TYPE: &str = "type";
    pub const SOURCE: &str = "source";
    pub const MESSAGE: &str = "message";
    pub const TAGS: &str = "tag";
    pub const GEO: &str = "geo";
    pub const VALUE: &str = "value";
    pub const COUNT: &str = "count";
    pub const IS_FIRST_OCCURRENCE: &str = "first";
    pub const IS_FIXED: &str = "fixed";
    pub const IS_HIDDEN: &str = "hidden";
    pub const IDX: &str = "idx";

    pub const VERSION: &str = "version";
    pub const LEVEL: &str = "level";
    pub const SUBMISSION_METHOD: &str = "submission";

    pub const IP_ADDRESS: &str = "ip";

    pub const REQUEST_USER_AGENT: &str = "useragent";
    pub const REQUEST_PATH: &str = "path";

    pub const BROWSER: &str = "browser";
    pub const BROWSER_VERSION: &str = "browser.version";
    pub const BROWSER_MAJOR_VERSION: &str = "browser.major";
    pub const REQUEST_IS_BOT: &str = "bot";

    pub const DEVICE: &str = "device";

    pub const OPERATING_SYSTEM: &str = "os";
    pub const OPERATING_SYSTEM_VERSION: &str = "os.version";
    pub const OPERATING_SYSTEM_MAJOR_VERSION: &str = "os.major";

    pub const MACHINE_NAME: &str = "machine";
    pub const MACHINE_ARCHITECTURE: &str = "architecture";

    pub const USER: &str = "user";
    pub const USER_NAME: &str = "user.name";
    pub const USER_EMAIL: &str = "user.email";
    pub const USER_DESCRIPTION: &str = "user.description";

    pub const LOCATION_COUNTRY: &str = "country";
    pub const LOCATION_LEVEL1: &str = "level1";
    pub const LOCATION_LEVEL2: &str = "level2";
    pub const LOCATION_LOCALITY: &str = "locality";

    pub const ERROR_CODE: &str = "error.code";
    pub const ERROR_TYPE: &str = "error.type";
    pub const ERROR_MESSAGE: &str = "error.message";
    pub const ERROR_TARGET_TYPE: &str = "error.targettype";
    pub const ERROR_TARGET_METHOD: &str = "error.targetmethod";
}

/// Root of the flattened error fields written by the pipeline.
pub const ERROR_FIELD: &str = "error";

/// Build the complete event schema.
pub fn event_schema() -> Result<Schema, EventIndexError> {
    let mut builder = SchemaBuilder::new();
    builder.full_text_field(FullTextField {
        path: "all".to_string(),
        analyzer: Some(analysis::STANDARDPLUS.to_string()),
        search_analyzer: Some(analysis::WHITESPACE_LOWERCASE.to_string()),
    });
    builder.dynamic_template(DynamicTemplate {
        name: "idx_reference".to_string(),
        match_pattern: "*-r".to_string(),
        path_match: None,
        field_type: FieldType::Keyword,
        ignore_above: Some(KEYWORD_IGNORE_ABOVE),
    });

    add_event_fields(&mut builder);
    add_data_bag_fields(&mut builder);
    add_derived_fields(&mut builder);

    builder.build()
}

/// Canonical path of a key inside the data bag.
pub fn data_path(segments: &[&str]) -> String {
    let mut path = String::from("data");
    for segment in segments {
        path.push('.');
        path.push_str(segment);
    }
    path
}

fn aliased(alias: &str) -> FieldOptions {
    FieldOptions::new().alias(alias)
}

fn add_event_fields(builder: &mut SchemaBuilder) {
    builder.declare("created_utc", FieldType::Date, aliased(alias::CREATED_UTC));
    builder.declare("id", FieldType::Keyword, aliased(alias::ID).include_in_all());
    builder.declare("organization_id", FieldType::Keyword, aliased(alias::ORGANIZATION_ID));
    builder.declare("project_id", FieldType::Keyword, aliased(alias::PROJECT_ID));
    builder.declare("stack_id", FieldType::Keyword, aliased(alias::STACK_ID));
    builder.declare("reference_id", FieldType::Keyword, aliased(alias::REFERENCE_ID));
    builder.declare("type", FieldType::Keyword, aliased(alias::TYPE));
    builder.declare(
        "source",
        FieldType::Text,
        aliased(alias::SOURCE).include_in_all().keyword(),
    );
    builder.declare("date", FieldType::Date, aliased(alias::DATE));
    builder.declare("message", FieldType::Text, aliased(alias::MESSAGE).include_in_all());
    builder.declare(
        "tags",
        FieldType::Text,
        aliased(alias::TAGS).include_in_all().boost(1.2).keyword(),
    );
    builder.declare("geo", FieldType::GeoPoint, aliased(alias::GEO));
    builder.declare("value", FieldType::Double, aliased(alias::VALUE));
    builder.declare("count", FieldType::Integer, aliased(alias::COUNT));
    builder.declare(
        "is_first_occurrence",
        FieldType::Boolean,
        aliased(alias::IS_FIRST_OCCURRENCE),
    );
    builder.declare("is_fixed", FieldType::Boolean, aliased(alias::IS_FIXED));
    builder.declare("is_hidden", FieldType::Boolean, aliased(alias::IS_HIDDEN));
    builder.declare("idx", FieldType::Object, aliased(alias::IDX).dynamic());
}

fn add_data_bag_fields(builder: &mut SchemaBuilder) {
    use known_keys::data;

    builder.declare("data", FieldType::Object, FieldOptions::new());

    builder.declare(
        data_path(&[data::VERSION]),
        FieldType::Text,
        aliased(alias::VERSION)
            .analyzer(analysis::VERSION_INDEX)
            .search_analyzer(analysis::VERSION_SEARCH)
            .keyword(),
    );
    builder.declare(
        data_path(&[data::LEVEL]),
        FieldType::Text,
        aliased(alias::LEVEL).keyword(),
    );
    builder.declare(
        data_path(&[data::SUBMISSION_METHOD]),
        FieldType::Text,
        aliased(alias::SUBMISSION_METHOD).keyword(),
    );

    add_location_fields(builder);
    add_request_info_fields(builder);
    add_environment_info_fields(builder);
    add_user_description_fields(builder);
    add_user_info_fields(builder);
}

fn add_location_fields(builder: &mut SchemaBuilder) {
    let location = known_keys::data::LOCATION;
    builder.declare(
        data_path(&[location, "country"]),
        FieldType::Keyword,
        aliased(alias::LOCATION_COUNTRY),
    );
    builder.declare(
        data_path(&[location, "level1"]),
        FieldType::Keyword,
        aliased(alias::LOCATION_LEVEL1),
    );
    builder.declare(
        data_path(&[location, "level2"]),
        FieldType::Keyword,
        aliased(alias::LOCATION_LEVEL2),
    );
    builder.declare(
        data_path(&[location, "locality"]),
        FieldType::Keyword,
        aliased(alias::LOCATION_LOCALITY),
    );
}

fn add_request_info_fields(builder: &mut SchemaBuilder) {
    use known_keys::request;
    let info = known_keys::data::REQUEST_INFO;

    builder.declare(
        data_path(&[info, "user_agent"]),
        FieldType::Text,
        aliased(alias::REQUEST_USER_AGENT).keyword(),
    );
    builder.declare(
        data_path(&[info, "path"]),
        FieldType::Text,
        aliased(alias::REQUEST_PATH).include_in_all().keyword(),
    );
    builder.declare(
        data_path(&[info, "data", request::BROWSER]),
        FieldType::Text,
        aliased(alias::BROWSER).keyword(),
    );
    builder.declare(
        data_path(&[info, "data", request::BROWSER_VERSION]),
        FieldType::Text,
        aliased(alias::BROWSER_VERSION).keyword(),
    );
    builder.declare(
        data_path(&[info, "data", request::BROWSER_MAJOR_VERSION]),
        FieldType::Text,
        aliased(alias::BROWSER_MAJOR_VERSION),
    );
    builder.declare(
        data_path(&[info, "data", request::DEVICE]),
        FieldType::Text,
        aliased(alias::DEVICE).keyword(),
    );
    builder.declare(
        data_path(&[info, "data", request::OS_VERSION]),
        FieldType::Text,
        aliased(alias::OPERATING_SYSTEM_VERSION).keyword(),
    );
    builder.declare(
        data_path(&[info, "data", request::OS_MAJOR_VERSION]),
        FieldType::Text,
        aliased(alias::OPERATING_SYSTEM_MAJOR_VERSION),
    );
    builder.declare(
        data_path(&[info, "data", request::IS_BOT]),
        FieldType::Boolean,
        aliased(alias::REQUEST_IS_BOT),
    );
}

fn add_environment_info_fields(builder: &mut SchemaBuilder) {
    let info = known_keys::data::ENVIRONMENT_INFO;
    builder.declare(
        data_path(&[info, "machine_name"]),
        FieldType::Text,
        aliased(alias::MACHINE_NAME)
            .include_in_all()
            .boost(1.1)
            .keyword(),
    );
    builder.declare(
        data_path(&[info, "architecture"]),
        FieldType::Keyword,
        aliased(alias::MACHINE_ARCHITECTURE),
    );
}

fn add_user_description_fields(builder: &mut SchemaBuilder) {
    let description = known_keys::data::USER_DESCRIPTION;
    builder.declare(
        data_path(&[description, "description"]),
        FieldType::Text,
        aliased(alias::USER_DESCRIPTION).include_in_all(),
    );
    builder.declare(
        data_path(&[description, "email_address"]),
        FieldType::Text,
        aliased(alias::USER_EMAIL)
            .analyzer(analysis::EMAIL)
            .search_analyzer(analysis::SIMPLE)
            .include_in_all()
            .boost(1.1)
            .keyword(),
    );
}

fn add_user_info_fields(builder: &mut SchemaBuilder) {
    let user = known_keys::data::USER_INFO;
    builder.declare(
        data_path(&[user, "identity"]),
        FieldType::Text,
        aliased(alias::USER)
            .analyzer(analysis::EMAIL)
            .search_analyzer(analysis::WHITESPACE_LOWERCASE)
            .include_in_all()
            .boost(1.1)
            .keyword(),
    );
    builder.declare(
        data_path(&[user, "name"]),
        FieldType::Text,
        aliased(alias::USER_NAME).include_in_all().keyword(),
    );
}

/// Projection targets plus the `error.*` fields written by the flattening pipeline.
fn add_derived_fields(builder: &mut SchemaBuilder) {
    use known_keys::data;
    use known_keys::error::TARGET_INFO;

    builder.project(
        [
            data_path(&[data::REQUEST_INFO, "client_ip_address"]),
            data_path(&[data::ENVIRONMENT_INFO, "ip_address"]),
        ],
        alias::IP_ADDRESS,
        ProjectionOptions::new()
            .analyzer(analysis::COMMA_WHITESPACE)
            .include_in_all(),
    );
    builder.project(
        [
            data_path(&[data::REQUEST_INFO, "data", known_keys::request::OS]),
            data_path(&[data::ENVIRONMENT_INFO, "os_name"]),
        ],
        alias::OPERATING_SYSTEM,
        ProjectionOptions::new().keyword(),
    );

    builder.declare(ERROR_FIELD, FieldType::Object, FieldOptions::new());
    builder.declare(
        alias::ERROR_CODE,
        FieldType::Keyword,
        aliased(alias::ERROR_CODE).include_in_all().boost(1.1),
    );
    builder.declare(
        alias::ERROR_MESSAGE,
        FieldType::Text,
        aliased(alias::ERROR_MESSAGE).include_in_all().keyword(),
    );
    builder.declare(
        alias::ERROR_TYPE,
        FieldType::Text,
        aliased(alias::ERROR_TYPE)
            .analyzer(analysis::TYPENAME)
            .search_analyzer(analysis::WHITESPACE_LOWERCASE)
            .include_in_all()
            .boost(1.1)
            .keyword(),
    );

    let target_options = ProjectionOptions::new()
        .analyzer(analysis::TYPENAME)
        .search_analyzer(analysis::WHITESPACE_LOWERCASE)
        .include_in_all()
        .boost(1.2)
        .keyword();
    builder.project(
        [
            data_path(&[data::ERROR, "data", TARGET_INFO, "ExceptionType"]),
            data_path(&[data::SIMPLE_ERROR, "data", TARGET_INFO, "ExceptionType"]),
        ],
        alias::ERROR_TARGET_TYPE,
        target_options.clone(),
    );
    builder.project(
        [data_path(&[data::ERROR, "data", TARGET_INFO, "Method"])],
        alias::ERROR_TARGET_METHOD,
        target_options,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_schema_builds() {
        let schema = event_schema().unwrap();

        assert_eq!(schema.full_text_field(), Some("all"));
        assert_eq!(schema.projections().len(), 4);
    }

    #[test]
    fn test_every_alias_round_trips() {
        let schema = event_schema().unwrap();
        let aliases = schema.aliases();

        for field in schema.fields() {
            if let Some(alias) = field.alias() {
                assert_eq!(aliases.resolve(alias), Some(field.path.as_str()));
                assert_eq!(aliases.alias_of(&field.path), Some(alias));
            }
        }
        for (alias, path) in aliases.iter() {
            assert_eq!(aliases.alias_of(path), Some(alias));
        }
    }

    #[test]
    fn test_known_aliases() {
        let schema = event_schema().unwrap();
        let aliases = schema.aliases();

        assert_eq!(aliases.resolve(alias::VERSION), Some("data.@version"));
        assert_eq!(
            aliases.resolve(alias::BROWSER_VERSION),
            Some("data.@request.data.@browser_version")
        );
        assert_eq!(
            aliases.resolve(alias::USER_EMAIL),
            Some("data.@user_description.email_address")
        );
        assert_eq!(aliases.resolve(alias::OPERATING_SYSTEM), Some("os"));
        assert_eq!(aliases.resolve(alias::ERROR_TYPE), Some("error.type"));
        assert_eq!(aliases.resolve(alias::TAGS), Some("tags"));
    }

    #[test]
    fn test_projection_sources_not_indexed() {
        let schema = event_schema().unwrap();

        for path in [
            "data.@request.client_ip_address",
            "data.@environment.ip_address",
            "data.@request.data.@os",
            "data.@environment.os_name",
            "data.@error.data.@target.ExceptionType",
            "data.@simple_error.data.@target.ExceptionType",
            "data.@error.data.@target.Method",
        ] {
            let field = schema.field(path).unwrap();
            assert!(!field.options.indexed, "{} should not be indexed", path);
            assert!(schema.aliases().alias_of(path).is_none());
        }
    }

    #[test]
    fn test_unknown_data_keys_not_promoted() {
        let schema = event_schema().unwrap();
        let mapping = schema.to_mapping();

        assert_eq!(mapping["dynamic"], false);
        assert!(mapping["properties"]["data"].get("dynamic").is_none());
        assert_eq!(mapping["properties"]["idx"]["dynamic"], true);
        assert_eq!(
            mapping["dynamic_templates"][0]["idx_reference"]["mapping"]["type"],
            "keyword"
        );
    }

    #[test]
    fn test_error_fields_mapping() {
        let mapping = event_schema().unwrap().to_mapping();
        let error = &mapping["properties"]["error"]["properties"];

        assert_eq!(error["code"]["type"], "keyword");
        assert_eq!(error["code"]["boost"], 1.1);
        assert_eq!(error["type"]["analyzer"], "typename");
        assert_eq!(error["type"]["search_analyzer"], "whitespace_lowercase");
        assert_eq!(error["message"]["fields"]["keyword"]["type"], "keyword");
        assert_eq!(error["targettype"]["boost"], 1.2);
        assert_eq!(error["code"]["copy_to"], json!(["all"]));
    }

    #[test]
    fn test_os_projection_from_environment_only() {
        let schema = event_schema().unwrap();
        let mut doc = json!({
            "id": "1",
            "data": { "@environment": { "os_name": "Ubuntu 24.04" } }
        });

        schema.project_document(&mut doc);

        assert_eq!(doc["os"], "Ubuntu 24.04");
    }

    #[test]
    fn test_os_projection_absent() {
        let schema = event_schema().unwrap();
        let mut doc = json!({
            "id": "1",
            "data": { "@request": { "path": "/checkout" } }
        });

        schema.project_document(&mut doc);

        assert!(doc.get("os").is_none());
    }

    #[test]
    fn test_data_path() {
        assert_eq!(data_path(&["@version"]), "data.@version");
        assert_eq!(
            data_path(&["@request", "data", "@os"]),
            "data.@request.data.@os"
        );
    }
}
