use rowgraph_core::schema::{Discriminator, FieldMapping, MappedStatement, ResultMap, Schema};
use rowgraph_core::stmt::Type;

use pretty_assertions::assert_eq;

fn blog_map() -> ResultMap {
    ResultMap::builder("blogMap", Type::object("Blog"))
        .mapping(FieldMapping::new("id", "blog_id").id())
        .mapping(FieldMapping::new("title", "blog_title"))
        .mapping(
            FieldMapping::property("posts")
                .nested_result_map("postMap")
                .column_prefix("post_"),
        )
        .build()
}

fn post_map() -> ResultMap {
    ResultMap::builder("postMap", Type::object("Post"))
        .mapping(FieldMapping::new("id", "id"))
        .mapping(FieldMapping::new("subject", "subject"))
        .build()
}

// ---------------------------------------------------------------------------
// Partitions
// ---------------------------------------------------------------------------

#[test]
fn partitions_mappings() {
    let rm = blog_map();

    assert_eq!(rm.mappings().len(), 3);
    assert_eq!(rm.id_mappings().len(), 1);
    assert_eq!(rm.id_mappings()[0].property.as_deref(), Some("id"));
    assert!(rm.constructor_mappings().is_empty());
    assert_eq!(rm.property_mappings().len(), 3);
    assert!(rm.has_nested_result_maps());
    assert!(!rm.has_nested_queries());
}

#[test]
fn id_mappings_default_to_all() {
    let rm = post_map();
    assert_eq!(rm.id_mappings(), rm.mappings());
}

#[test]
fn mapped_columns_are_upper_case() {
    let rm = blog_map();

    assert!(rm.mapped_columns().contains("BLOG_ID"));
    assert!(rm.mapped_columns().contains("BLOG_TITLE"));
    assert!(!rm.mapped_columns().contains("blog_id"));
    assert_eq!(rm.mapped_columns().len(), 2);
}

#[test]
fn composite_columns_are_mapped() {
    let rm = ResultMap::builder("m", Type::object("Blog"))
        .mapping(
            FieldMapping::property("author")
                .nested_query("selectAuthor")
                .composite("id", "author_id")
                .composite("name", "author_name"),
        )
        .build();

    assert!(rm.has_nested_queries());
    assert!(rm.mapped_columns().contains("AUTHOR_ID"));
    assert!(rm.mapped_columns().contains("AUTHOR_NAME"));
}

#[test]
fn result_set_mapping_is_not_a_nested_result_map() {
    let rm = ResultMap::builder("m", Type::object("Blog"))
        .mapping(FieldMapping::new("id", "id"))
        .mapping(
            FieldMapping::new("posts", "id")
                .nested_result_map("postMap")
                .result_set("posts")
                .foreign_column("blog_id"),
        )
        .build();

    assert!(!rm.has_nested_result_maps());
}

#[test]
fn constructor_arguments_are_partitioned() {
    let rm = ResultMap::builder("m", Type::object("Point"))
        .mapping(FieldMapping::arg("x", Type::I64))
        .mapping(FieldMapping::arg("y", Type::I64))
        .mapping(FieldMapping::new("label", "label"))
        .build();

    assert_eq!(rm.constructor_mappings().len(), 2);
    assert_eq!(rm.property_mappings().len(), 1);
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

#[test]
fn builds_valid_schema() {
    let mut builder = Schema::builder();
    builder
        .result_map(blog_map())
        .result_map(post_map())
        .statement(MappedStatement::new("selectBlog").result_map("blogMap"));

    let schema = builder.build().unwrap();
    assert!(schema.has_result_map("blogMap"));
    assert_eq!(schema.statement("selectBlog").unwrap().result_maps, ["blogMap"]);
}

#[test]
fn unknown_nested_result_map_is_configuration_error() {
    let mut builder = Schema::builder();
    builder.result_map(blog_map());

    let err = builder.build().unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("postMap"), "{err}");
}

#[test]
fn discriminator_case_to_unknown_map_is_ambiguous_type() {
    let rm = ResultMap::builder("vehicle", Type::object("Vehicle"))
        .mapping(FieldMapping::new("id", "id"))
        .discriminator(Discriminator::new("kind", Type::String).case("car", "carMap"))
        .build();

    let mut builder = Schema::builder();
    builder.result_map(rm);

    let err = builder.build().unwrap_err();
    assert!(err.is_ambiguous_type());
}

#[test]
fn discriminated_nested_result_maps_force_nested_mode() {
    let base = || {
        ResultMap::builder("blogBase", Type::object("Blog"))
            .mapping(FieldMapping::new("id", "blog_id").id())
            .discriminator(Discriminator::new("kind", Type::String).case("x", "blogStep"))
            .build()
    };
    // Reaches `blogMap` only through a second discriminator
    let step = ResultMap::builder("blogStep", Type::object("Blog"))
        .mapping(FieldMapping::new("id", "blog_id").id())
        .discriminator(Discriminator::new("kind", Type::String).case("y", "blogMap"))
        .build();
    let plain = ResultMap::builder("plain", Type::object("Blog"))
        .mapping(FieldMapping::new("id", "blog_id").id())
        .discriminator(Discriminator::new("kind", Type::String).case("x", "postMap"))
        .build();

    assert!(!base().has_nested_result_maps());

    let mut builder = Schema::builder();
    builder
        .result_map(base())
        .result_map(step)
        .result_map(plain)
        .result_map(blog_map())
        .result_map(post_map());
    let schema = builder.build().unwrap();

    assert!(schema.result_map("blogBase").unwrap().has_nested_result_maps());
    assert!(schema.result_map("blogStep").unwrap().has_nested_result_maps());
    assert!(!schema.result_map("plain").unwrap().has_nested_result_maps());
    assert!(!schema.result_map("postMap").unwrap().has_nested_result_maps());
}

#[test]
fn duplicate_result_map_is_rejected() {
    let mut builder = Schema::builder();
    builder.result_map(post_map()).result_map(post_map());

    assert!(builder.build().unwrap_err().is_configuration());
}

#[test]
fn statement_with_unknown_result_map_is_rejected() {
    let mut builder = Schema::builder();
    builder.statement(MappedStatement::new("s").result_map("missing"));

    let err = builder.build().unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn unknown_lookup_is_configuration_error() {
    let schema = Schema::builder().build().unwrap();
    assert!(schema.result_map("nope").unwrap_err().is_configuration());
    assert!(schema.statement("nope").unwrap_err().is_configuration());
}
