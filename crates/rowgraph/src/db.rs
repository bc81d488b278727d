mod builder;
pub use builder::Builder;

use crate::{Converters, ObjectFactory, Session, Settings};

use rowgraph_core::{Driver, Schema};

use std::sync::Arc;

/// Shared state between all `Db` clones and the sessions they open.
pub(crate) struct Shared {
    pub(crate) schema: Schema,
    pub(crate) settings: Settings,
    pub(crate) converters: Converters,
    pub(crate) factory: Arc<dyn ObjectFactory>,
    pub(crate) driver: Arc<dyn Driver>,
}

/// A configured materialization engine.
///
/// Cloning is cheap; every clone shares the same schema, converters and
/// driver. Query state lives in the [`Session`]s opened from it.
#[derive(Clone)]
pub struct Db {
    shared: Arc<Shared>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Opens a session with an empty local cache.
    pub fn session(&self) -> Session {
        Session::new(self.shared.clone())
    }

    pub fn schema(&self) -> &Schema {
        &self.shared.schema
    }

    pub fn settings(&self) -> &Settings {
        &self.shared.settings
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("schema", &self.shared.schema)
            .field("settings", &self.shared.settings)
            .field("driver", &self.shared.driver)
            .finish()
    }
}
