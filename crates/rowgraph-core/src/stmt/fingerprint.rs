use super::Value;
use crate::{Error, Result};

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

const DEFAULT_MULTIPLIER: u64 = 37;
const DEFAULT_HASHCODE: u64 = 17;

/// Composite identity built from an ordered sequence of values.
///
/// Fingerprints key the query-scoped cache and identify rows that describe
/// the same logical object. Two fingerprints are equal when they were built
/// from equal values in the same order.
///
/// Fingerprints are immutable; use [`FingerprintBuilder`] to create one.
#[derive(Clone)]
pub struct Fingerprint {
    inner: Arc<Inner>,
}

#[derive(PartialEq, Eq)]
struct Inner {
    hash: u64,
    checksum: u64,
    values: Vec<Value>,
    null: bool,
}

/// Accumulates values into a [`Fingerprint`].
#[derive(Debug, Clone)]
pub struct FingerprintBuilder {
    hash: u64,
    checksum: u64,
    values: Vec<Value>,
}

impl Fingerprint {
    pub fn builder() -> FingerprintBuilder {
        FingerprintBuilder::new()
    }

    /// The canonical "no identity" fingerprint.
    ///
    /// It is never equal to a fingerprint produced by a builder, even an
    /// empty one.
    pub fn null() -> Fingerprint {
        Fingerprint {
            inner: Arc::new(Inner {
                hash: DEFAULT_HASHCODE,
                checksum: 0,
                values: vec![],
                null: true,
            }),
        }
    }

    pub fn is_null(&self) -> bool {
        self.inner.null
    }

    pub fn hash_code(&self) -> u64 {
        self.inner.hash
    }

    pub fn checksum(&self) -> u64 {
        self.inner.checksum
    }

    /// Number of values contributed.
    pub fn count(&self) -> usize {
        self.inner.values.len()
    }

    pub fn values(&self) -> &[Value] {
        &self.inner.values
    }

    /// Returns a builder seeded with this fingerprint's contributions.
    pub fn to_builder(&self) -> FingerprintBuilder {
        FingerprintBuilder {
            hash: self.inner.hash,
            checksum: self.inner.checksum,
            values: self.inner.values.clone(),
        }
    }

    /// Combines a row key with its parent's key.
    ///
    /// The result is a new fingerprint with `other`'s values appended to
    /// `self`'s. When either side has fewer than two contributions the
    /// combination carries no identity and [`Fingerprint::null`] is
    /// returned. Neither input is modified.
    pub fn combine(&self, other: &Fingerprint) -> Fingerprint {
        if self.count() > 1 && other.count() > 1 {
            let mut builder = self.to_builder();
            builder.contribute_all(other.values().iter().cloned());
            builder.build()
        } else {
            Fingerprint::null()
        }
    }

    /// Like [`combine`](Self::combine), but fails instead of returning the
    /// null fingerprint.
    pub fn try_combine(&self, other: &Fingerprint) -> Result<Fingerprint> {
        let combined = self.combine(other);

        if combined.is_null() {
            return Err(Error::identity(format!(
                "cannot combine `{self}` with `{other}`; both sides need at least two contributions"
            )));
        }

        Ok(combined)
    }
}

impl PartialEq for Fingerprint {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner == other.inner
    }
}

impl Eq for Fingerprint {}

impl Hash for Fingerprint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.inner.hash);
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            return f.write_str("null");
        }

        write!(f, "{}:{}", self.inner.hash, self.inner.checksum)?;
        for value in &self.inner.values {
            write!(f, ":{value}")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fingerprint({self})")
    }
}

impl FingerprintBuilder {
    pub fn new() -> FingerprintBuilder {
        FingerprintBuilder {
            hash: DEFAULT_HASHCODE,
            checksum: 0,
            values: vec![],
        }
    }

    /// Contributes a value. A list contributes each of its items in order.
    pub fn contribute(&mut self, value: impl Into<Value>) -> &mut Self {
        match value.into() {
            Value::List(items) => {
                for item in items {
                    self.contribute_one(item);
                }
            }
            value => self.contribute_one(value),
        }
        self
    }

    pub fn contribute_all<I, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        for value in values {
            self.contribute(value);
        }
        self
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn build(&self) -> Fingerprint {
        Fingerprint {
            inner: Arc::new(Inner {
                hash: self.hash,
                checksum: self.checksum,
                values: self.values.clone(),
                null: false,
            }),
        }
    }

    fn contribute_one(&mut self, value: Value) {
        let base_hash = value_hash(&value);
        let count = self.values.len() as u64 + 1;

        self.checksum = self.checksum.wrapping_add(base_hash);
        self.hash = self
            .hash
            .wrapping_mul(DEFAULT_MULTIPLIER)
            .wrapping_add(base_hash.wrapping_mul(count));
        self.values.push(value);
    }
}

impl Default for FingerprintBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn value_hash(value: &Value) -> u64 {
    if value.is_null() {
        return 1;
    }

    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_contributes_items() {
        let mut a = Fingerprint::builder();
        a.contribute(vec![1i64, 2]);

        let mut b = Fingerprint::builder();
        b.contribute(1i64).contribute(2i64);

        assert_eq!(a.build(), b.build());
        assert_eq!(a.count(), 2);
    }

    #[test]
    fn null_differs_from_empty() {
        assert_ne!(Fingerprint::null(), Fingerprint::builder().build());
        assert!(Fingerprint::null().is_null());
    }

    #[test]
    fn display_includes_values() {
        let mut builder = Fingerprint::builder();
        builder.contribute("a").contribute(Value::Null);

        let key = builder.build();
        assert!(key.to_string().ends_with(":a:null"));
    }
}
