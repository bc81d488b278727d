mod support;

use rowgraph::{Discriminator, FieldMapping, MappedStatement, ResultMap, Row, Type, Value};
use support::{id, ids, table, MemDriver};

use pretty_assertions::assert_eq;

fn value(row: &Value, key: &str) -> Option<Value> {
    row.expect_object()
        .with(|row: &Row| row.value(key).cloned())
        .unwrap()
}

fn vehicles() -> rowgraph::driver::MemCursor {
    table(
        &["kind", "doors", "payload"],
        vec![
            vec!["car".into(), 4i64.into(), Value::Null],
            vec!["truck".into(), Value::Null, 10i64.into()],
            vec!["bike".into(), Value::Null, Value::Null],
        ],
    )
}

#[tokio::test]
async fn rows_pick_their_result_map() {
    let driver = MemDriver::new();
    driver.respond_any("selectVehicles", vec![vehicles()]);

    let mut builder = support::builder();
    builder
        .register_result_map(
            ResultMap::builder("vehicle", Type::Map)
                .mapping(FieldMapping::new("kind", "kind"))
                .discriminator(
                    Discriminator::new("kind", Type::String)
                        .case("car", "car")
                        .case("truck", "truck"),
                )
                .auto_mapping(false)
                .build(),
        )
        .register_result_map(
            ResultMap::builder("car", Type::Map)
                .mapping(FieldMapping::new("doors", "doors"))
                .auto_mapping(false)
                .build(),
        )
        .register_result_map(
            ResultMap::builder("truck", Type::Map)
                .mapping(FieldMapping::new("payload", "payload"))
                .auto_mapping(false)
                .build(),
        )
        .register_statement(MappedStatement::new("selectVehicles").result_map("vehicle"));
    let db = support::build(&mut builder, &driver);

    let rows = db.session().select("selectVehicles", Value::Null).await.unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(value(&rows[0], "doors"), Some(Value::I64(4)));
    assert_eq!(value(&rows[0], "payload"), None);

    assert_eq!(value(&rows[1], "payload"), Some(Value::I64(10)));
    assert_eq!(value(&rows[1], "doors"), None);

    // No case matches: the base result map applies
    assert_eq!(value(&rows[2], "kind"), Some(Value::from("bike")));
    assert_eq!(value(&rows[2], "doors"), None);
}

#[tokio::test]
async fn cycle_stops_at_the_last_new_result_map() {
    let driver = MemDriver::new();
    driver.respond_any(
        "selectLoop",
        vec![table(&["kind"], vec![vec!["x".into()]])],
    );

    let mut builder = support::builder();
    builder
        .register_result_map(
            ResultMap::builder("a", Type::Map)
                .mapping(FieldMapping::new("from_a", "kind"))
                .discriminator(Discriminator::new("kind", Type::String).case("x", "b"))
                .auto_mapping(false)
                .build(),
        )
        .register_result_map(
            ResultMap::builder("b", Type::Map)
                .mapping(FieldMapping::new("from_b", "kind"))
                .discriminator(Discriminator::new("kind", Type::String).case("x", "a"))
                .auto_mapping(false)
                .build(),
        )
        .register_statement(MappedStatement::new("selectLoop").result_map("a"));
    let db = support::build(&mut builder, &driver);

    let rows = db.session().select("selectLoop", Value::Null).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(value(&rows[0], "from_b"), Some(Value::from("x")));
    assert_eq!(value(&rows[0], "from_a"), None);
}

#[tokio::test]
async fn self_referencing_case_resolves_to_itself() {
    let driver = MemDriver::new();
    driver.respond_any(
        "selectSelf",
        vec![table(&["kind"], vec![vec!["x".into()]])],
    );

    let mut builder = support::builder();
    builder
        .register_result_map(
            ResultMap::builder("a", Type::Map)
                .mapping(FieldMapping::new("from_a", "kind"))
                .discriminator(Discriminator::new("kind", Type::String).case("x", "a"))
                .auto_mapping(false)
                .build(),
        )
        .register_statement(MappedStatement::new("selectSelf").result_map("a"));
    let db = support::build(&mut builder, &driver);

    let rows = db.session().select("selectSelf", Value::Null).await.unwrap();
    assert_eq!(value(&rows[0], "from_a"), Some(Value::from("x")));
}

#[tokio::test]
async fn discriminator_in_nested_result_map_reads_prefixed_column() {
    let driver = MemDriver::new();
    driver.respond_any(
        "selectBlogs",
        vec![table(
            &["blog_id", "post_id", "post_kind", "post_subject"],
            vec![
                vec![1i64.into(), 10i64.into(), "draft".into(), "x".into()],
                vec![1i64.into(), 11i64.into(), "final".into(), "y".into()],
            ],
        )],
    );

    let mut builder = support::builder();
    builder
        .register_result_map(
            ResultMap::builder("blogResult", Type::object("Blog"))
                .mapping(FieldMapping::new("id", "blog_id").id())
                .mapping(
                    FieldMapping::property("posts")
                        .nested_result_map("postResult")
                        .column_prefix("post_"),
                )
                .build(),
        )
        .register_result_map(
            ResultMap::builder("postResult", Type::object("Post"))
                .mapping(FieldMapping::new("id", "id").id())
                .discriminator(Discriminator::new("kind", Type::String).case("final", "finalPost"))
                .build(),
        )
        .register_result_map(
            ResultMap::builder("finalPost", Type::object("Post"))
                .mapping(FieldMapping::new("id", "id").id())
                .mapping(FieldMapping::new("subject", "subject"))
                .build(),
        )
        .register_statement(MappedStatement::new("selectBlogs").result_map("blogResult"));
    let db = support::build(&mut builder, &driver);

    let blogs = db.session().select("selectBlogs", Value::Null).await.unwrap();
    let posts = support::prop(&blogs[0], "posts");
    let posts = posts.expect_list();

    assert_eq!(posts.len(), 2);
    assert_eq!(support::prop(&posts[0], "subject"), Value::Null);
    assert_eq!(support::prop(&posts[1], "subject"), Value::from("y"));
}

#[tokio::test]
async fn case_with_nested_result_maps_merges_fan_out_rows() {
    let driver = MemDriver::new();
    driver.respond_any(
        "selectBlogs",
        vec![table(
            &["kind", "blog_id", "post_id"],
            vec![
                vec!["x".into(), 1i64.into(), 10i64.into()],
                vec!["x".into(), 1i64.into(), 11i64.into()],
                vec!["x".into(), 2i64.into(), 20i64.into()],
            ],
        )],
    );

    let mut builder = support::builder();
    builder
        .register_result_map(
            ResultMap::builder("blogBase", Type::object("Blog"))
                .mapping(FieldMapping::new("id", "blog_id").id())
                .discriminator(Discriminator::new("kind", Type::String).case("x", "blogWithPosts"))
                .build(),
        )
        .register_result_map(
            ResultMap::builder("blogWithPosts", Type::object("Blog"))
                .mapping(FieldMapping::new("id", "blog_id").id())
                .mapping(
                    FieldMapping::property("posts")
                        .nested_result_map("postResult")
                        .column_prefix("post_"),
                )
                .build(),
        )
        .register_result_map(
            ResultMap::builder("postResult", Type::object("Post"))
                .mapping(FieldMapping::new("id", "id").id())
                .build(),
        )
        .register_statement(MappedStatement::new("selectBlogs").result_map("blogBase"));
    let db = support::build(&mut builder, &driver);

    let blogs = db.session().select("selectBlogs", Value::Null).await.unwrap();

    assert_eq!(blogs.iter().map(id).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(ids(&blogs[0], "posts"), vec![10, 11]);
    assert_eq!(ids(&blogs[1], "posts"), vec![20]);
}

#[test]
fn unknown_case_target_is_rejected_on_build() {
    let mut builder = support::builder();
    builder
        .register_result_map(
            ResultMap::builder("vehicle", Type::Map)
                .discriminator(Discriminator::new("kind", Type::String).case("car", "missing"))
                .build(),
        )
        .register_statement(MappedStatement::new("selectVehicles").result_map("vehicle"));

    let err = builder.build(MemDriver::new()).unwrap_err();
    assert!(err.is_ambiguous_type());
}
