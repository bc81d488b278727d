#![allow(dead_code)]

use rowgraph::{
    db::Builder,
    driver::{async_trait, Cursor, Driver, MemCursor, Response},
    impl_entity, Db, MappedStatement, Object, Result, RowBounds, Type, Value,
};

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// Serves canned result sets and records every statement it runs.
#[derive(Debug, Clone, Default)]
pub struct MemDriver {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    /// `None` parameter answers any parameter without its own response
    responses: HashMap<(String, Option<Value>), Vec<MemCursor>>,
    queries: Vec<(String, Value)>,
    updates: usize,
}

impl MemDriver {
    pub fn new() -> MemDriver {
        MemDriver::default()
    }

    pub fn respond(&self, statement: &str, parameter: impl Into<Value>, result_sets: Vec<MemCursor>) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .responses
            .insert((statement.to_string(), Some(parameter.into())), result_sets);
        self
    }

    pub fn respond_any(&self, statement: &str, result_sets: Vec<MemCursor>) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .responses
            .insert((statement.to_string(), None), result_sets);
        self
    }

    /// Number of times `statement` reached the driver.
    pub fn executions(&self, statement: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .queries
            .iter()
            .filter(|(id, _)| id == statement)
            .count()
    }

    pub fn parameters(&self, statement: &str) -> Vec<Value> {
        self.inner
            .lock()
            .unwrap()
            .queries
            .iter()
            .filter(|(id, _)| id == statement)
            .map(|(_, parameter)| parameter.clone())
            .collect()
    }

    pub fn updates(&self) -> usize {
        self.inner.lock().unwrap().updates
    }
}

#[async_trait]
impl Driver for MemDriver {
    async fn query(
        &self,
        statement: &MappedStatement,
        parameter: &Value,
        _bounds: RowBounds,
    ) -> Result<Response> {
        let result_sets = {
            let mut inner = self.inner.lock().unwrap();
            inner
                .queries
                .push((statement.id.clone(), parameter.clone()));

            inner
                .responses
                .get(&(statement.id.clone(), Some(parameter.clone())))
                .or_else(|| inner.responses.get(&(statement.id.clone(), None)))
                .cloned()
                .unwrap_or_default()
        };

        Ok(Response::new(
            result_sets
                .into_iter()
                .map(|cursor| Box::new(cursor) as Box<dyn Cursor>)
                .collect(),
        ))
    }

    async fn update(&self, _statement: &MappedStatement, _parameter: &Value) -> Result<u64> {
        self.inner.lock().unwrap().updates += 1;
        Ok(1)
    }
}

pub fn table(columns: &[&str], rows: Vec<Vec<Value>>) -> MemCursor {
    MemCursor::from_rows(columns.iter().copied(), rows)
}

/// A builder with every test entity registered.
pub fn builder() -> Builder {
    let mut builder = Db::builder();
    builder
        .register_entity::<Blog>()
        .register_entity::<Post>()
        .register_entity::<Author>()
        .register_entity::<Comment>();
    builder
}

pub fn build(builder: &mut Builder, driver: &MemDriver) -> Db {
    builder.build(driver.clone()).unwrap()
}

/// Reads `property` of an object value, null when unset.
pub fn prop(value: &Value, property: &str) -> Value {
    value.expect_object().get(property).unwrap_or_default()
}

pub fn id(value: &Value) -> i64 {
    prop(value, "id").as_i64().unwrap()
}

/// The ids of the objects in a list property.
pub fn ids(value: &Value, property: &str) -> Vec<i64> {
    prop(value, property).expect_list().iter().map(id).collect()
}

#[derive(Debug, Default)]
pub struct Blog {
    pub id: i64,
    pub title: Option<String>,
    pub author: Option<Object>,
    pub posts: Vec<Object>,
}

impl_entity!(Blog as "Blog" {
    id: Type::I64,
    title: Type::String,
    author: Type::object("Author"),
    posts: Type::list(Type::object("Post")),
});

#[derive(Debug, Default)]
pub struct Post {
    pub id: i64,
    pub subject: Option<String>,
    pub blog: Option<Object>,
    pub comments: Vec<Object>,
}

impl_entity!(Post as "Post" {
    id: Type::I64,
    subject: Type::String,
    blog: Type::object("Blog"),
    comments: Type::list(Type::object("Comment")),
});

#[derive(Debug, Default)]
pub struct Author {
    pub id: i64,
    pub username: Option<String>,
    pub favorite: Option<Object>,
}

impl_entity!(Author as "Author" {
    id: Type::I64,
    username: Type::String,
    favorite: Type::object("Blog"),
});

#[derive(Debug, Default)]
pub struct Comment {
    pub id: i64,
    pub body: Option<String>,
}

impl_entity!(Comment as "Comment" {
    id: Type::I64,
    body: Type::String,
});
