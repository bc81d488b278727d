mod support;

use rowgraph::{FieldMapping, MappedStatement, ResultMap, Settings, Type, Value};
use support::{id, ids, table, MemDriver};

use pretty_assertions::assert_eq;

fn blogs() -> rowgraph::driver::MemCursor {
    table(
        &["id", "title"],
        vec![
            vec![1i64.into(), "A".into()],
            vec![2i64.into(), "B".into()],
            vec![3i64.into(), "C".into()],
        ],
    )
}

fn posts() -> rowgraph::driver::MemCursor {
    table(
        &["post_id", "post_subject", "blog_id"],
        vec![
            vec![10i64.into(), "x".into(), 1i64.into()],
            vec![20i64.into(), "z".into(), 2i64.into()],
            vec![11i64.into(), "y".into(), 1i64.into()],
            // No blog 9 in the first result set
            vec![90i64.into(), "orphan".into(), 9i64.into()],
        ],
    )
}

fn db(driver: &MemDriver, settings: Settings) -> rowgraph::Db {
    let mut builder = support::builder();
    builder
        .settings(settings)
        .register_result_map(
            ResultMap::builder("blogResult", Type::object("Blog"))
                .mapping(FieldMapping::new("id", "id").id())
                .mapping(FieldMapping::new("title", "title"))
                .mapping(
                    FieldMapping::new("posts", "id")
                        .nested_result_map("postResult")
                        .result_set("posts")
                        .foreign_column("blog_id"),
                )
                .build(),
        )
        .register_result_map(
            ResultMap::builder("postResult", Type::object("Post"))
                .mapping(FieldMapping::new("id", "post_id").id())
                .mapping(FieldMapping::new("subject", "post_subject"))
                .build(),
        )
        .register_statement(
            MappedStatement::new("selectBlogs")
                .result_map("blogResult")
                .result_sets(["blogs", "posts"]),
        );
    support::build(&mut builder, driver)
}

// ---------------------------------------------------------------------------
// Named result sets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn child_rows_join_parents_by_foreign_column() {
    let driver = MemDriver::new();
    driver.respond_any("selectBlogs", vec![blogs(), posts()]);

    let db = db(&driver, Settings::default());
    let blogs = db.session().select("selectBlogs", Value::Null).await.unwrap();

    assert_eq!(blogs.iter().map(id).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(ids(&blogs[0], "posts"), vec![10, 11]);
    assert_eq!(ids(&blogs[1], "posts"), vec![20]);
    assert_eq!(ids(&blogs[2], "posts"), Vec::<i64>::new());
}

#[tokio::test]
async fn missing_child_result_set_leaves_collections_empty() {
    let driver = MemDriver::new();
    driver.respond_any("selectBlogs", vec![blogs()]);

    let db = db(&driver, Settings::default());
    let blogs = db.session().select("selectBlogs", Value::Null).await.unwrap();

    assert_eq!(blogs.len(), 3);
    assert_eq!(ids(&blogs[0], "posts"), Vec::<i64>::new());
}

#[tokio::test]
async fn disabled_multiple_result_sets_ignores_later_sets() {
    let driver = MemDriver::new();
    driver.respond_any("selectBlogs", vec![blogs(), posts()]);

    let settings = Settings {
        multiple_result_sets_enabled: false,
        ..Settings::default()
    };
    let db = db(&driver, settings);
    let blogs = db.session().select("selectBlogs", Value::Null).await.unwrap();

    assert_eq!(blogs.len(), 3);
    assert_eq!(ids(&blogs[0], "posts"), Vec::<i64>::new());
}

// ---------------------------------------------------------------------------
// Several result maps
// ---------------------------------------------------------------------------

#[tokio::test]
async fn one_list_per_result_map() {
    let driver = MemDriver::new();
    driver.respond_any("selectBoth", vec![blogs(), posts()]);

    let mut builder = support::builder();
    builder
        .register_result_map(
            ResultMap::builder("blogResult", Type::object("Blog"))
                .mapping(FieldMapping::new("id", "id").id())
                .build(),
        )
        .register_result_map(
            ResultMap::builder("postResult", Type::object("Post"))
                .mapping(FieldMapping::new("id", "post_id").id())
                .build(),
        )
        .register_statement(
            MappedStatement::new("selectBoth")
                .result_map("blogResult")
                .result_map("postResult"),
        );
    let db = support::build(&mut builder, &driver);

    let lists = db.session().select("selectBoth", Value::Null).await.unwrap();

    assert_eq!(lists.len(), 2);
    assert_eq!(
        lists[0].expect_list().iter().map(id).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert_eq!(
        lists[1].expect_list().iter().map(id).collect::<Vec<_>>(),
        vec![10, 20, 11, 90]
    );
}

#[tokio::test]
async fn two_properties_cannot_share_a_result_set() {
    let driver = MemDriver::new();
    driver.respond_any("selectBlogs", vec![blogs(), posts()]);

    let mut builder = support::builder();
    builder
        .register_result_map(
            ResultMap::builder("blogResult", Type::object("Blog"))
                .mapping(FieldMapping::new("id", "id").id())
                .mapping(
                    FieldMapping::new("posts", "id")
                        .nested_result_map("postResult")
                        .result_set("posts")
                        .foreign_column("blog_id"),
                )
                .mapping(
                    FieldMapping::new("author", "id")
                        .nested_result_map("postResult")
                        .result_set("posts")
                        .foreign_column("blog_id"),
                )
                .build(),
        )
        .register_result_map(
            ResultMap::builder("postResult", Type::object("Post"))
                .mapping(FieldMapping::new("id", "post_id").id())
                .build(),
        )
        .register_statement(
            MappedStatement::new("selectBlogs")
                .result_map("blogResult")
                .result_sets(["blogs", "posts"]),
        );
    let db = support::build(&mut builder, &driver);

    let err = db
        .session()
        .select("selectBlogs", Value::Null)
        .await
        .unwrap_err();

    assert!(err.is_configuration());
    assert!(err.to_string().contains("`posts`"));
}
