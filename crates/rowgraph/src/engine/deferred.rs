use super::{extract_from_list, LocalCache};
use crate::ObjectFactory;

use rowgraph_core::{
    stmt::{Fingerprint, Type},
    Error, Object, Result,
};

/// Assigns a cached nested result to a property once the statement that
/// produces it has completed.
#[derive(Debug)]
pub(crate) struct DeferredLoad {
    owner: Object,
    property: String,
    key: Fingerprint,
    target: Type,
}

impl DeferredLoad {
    pub(crate) fn new(owner: Object, property: String, key: Fingerprint, target: Type) -> DeferredLoad {
        DeferredLoad {
            owner,
            property,
            key,
            target,
        }
    }

    pub(crate) fn can_load(&self, cache: &LocalCache) -> bool {
        cache.loaded(&self.key).is_some()
    }

    pub(crate) fn load(&self, cache: &LocalCache, factory: &dyn ObjectFactory) -> Result<()> {
        self.try_load(cache, factory).map_err(|err| {
            err.context(Error::deferred_load(self.owner.type_name(), &self.property))
        })
    }

    fn try_load(&self, cache: &LocalCache, factory: &dyn ObjectFactory) -> Result<()> {
        let Some(rows) = cache.loaded(&self.key) else {
            rowgraph_core::bail!("no completed result for `{}`", self.key);
        };

        let value = extract_from_list(rows.to_vec(), &self.target, factory)?;
        self.owner.set(&self.property, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DefaultObjectFactory;
    use rowgraph_core::{impl_entity, stmt::Value};

    #[derive(Debug, Default)]
    struct Post {
        id: i64,
        comments: Vec<Value>,
    }

    impl_entity!(Post as "Post" {
        id: Type::I64,
        comments: Type::list(Type::Any),
    });

    fn key() -> Fingerprint {
        Fingerprint::builder()
            .contribute("Comment.byPost")
            .contribute(1_i64)
            .build()
    }

    #[test]
    fn loads_once_cached() {
        let factory = DefaultObjectFactory::new();
        let post = Object::new(Post::default());
        let load = DeferredLoad::new(
            post.clone(),
            "comments".to_string(),
            key(),
            Type::list(Type::Any),
        );

        let mut cache = LocalCache::default();
        cache.put_placeholder(key());
        assert!(!load.can_load(&cache));

        cache.put(key(), vec![Value::from("first"), Value::from("second")]);
        assert!(load.can_load(&cache));

        load.load(&cache, &factory).unwrap();
        assert_eq!(
            post.get("comments"),
            Some(Value::List(vec![Value::from("first"), Value::from("second")]))
        );
    }

    #[test]
    fn failure_names_owner_and_property() {
        let factory = DefaultObjectFactory::new();
        let post = Object::new(Post::default());
        let load = DeferredLoad::new(post, "comments".to_string(), key(), Type::list(Type::Any));

        let err = load.load(&LocalCache::default(), &factory).unwrap_err();
        assert!(err.is_deferred_load());
        assert!(err.to_string().starts_with("deferred load of `Post.comments` failed"));
    }
}
