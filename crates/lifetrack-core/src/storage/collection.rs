//! Typed JSON collections over sled trees.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::{Db, IVec, Tree};

use crate::error::Result;

/// Key for a record with a numeric id (big-endian, so trees iterate in id order).
pub fn id_key(id: u64) -> [u8; 8] {
    id.to_be_bytes()
}

/// Encode a document.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Decode a document.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}

/// A sled tree holding JSON documents of type `T`.
pub struct Collection<T> {
    tree: Tree,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self::from_tree(self.tree.clone())
    }
}

impl<T> Collection<T> {
    /// Wrap an already opened tree.
    pub fn from_tree(tree: Tree) -> Self {
        Self {
            tree,
            _marker: PhantomData,
        }
    }

    /// Underlying tree (for transactions).
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

impl<T: Serialize + DeserializeOwned> Collection<T> {
    /// Open (or create) the named tree.
    pub fn open(db: &Db, name: &str) -> Result<Self> {
        Ok(Self::from_tree(db.open_tree(name)?))
    }

    /// Get a document by key.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<Option<T>> {
        self.tree
            .get(key)?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    /// Insert or replace a document.
    pub fn insert(&self, key: impl AsRef<[u8]>, value: &T) -> Result<()> {
        self.tree.insert(key.as_ref(), encode(value)?)?;
        Ok(())
    }

    /// Remove a document, returning it if present.
    pub fn remove(&self, key: impl AsRef<[u8]>) -> Result<Option<T>> {
        self.tree
            .remove(key)?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    /// Iterate over all documents in key order.
    pub fn values(&self) -> impl Iterator<Item = Result<T>> + '_ {
        self.tree.iter().values().map(|result| {
            let bytes: IVec = result?;
            decode(&bytes)
        })
    }

    /// Collect all documents matching `predicate`.
    pub fn filter(&self, mut predicate: impl FnMut(&T) -> bool) -> Result<Vec<T>> {
        let mut out = Vec::new();
        for value in self.values() {
            let value = value?;
            if predicate(&value) {
                out.push(value);
            }
        }
        Ok(out)
    }
}
