//! Image references and the store that backs them.
//!
//! An [`ImageReference`] is what a renderer uses as an image source. It is
//! either external (a URI the host handed in, e.g. the initial banner) or
//! issued by a [`ReferenceStore`], in which case it resolves to bytes until
//! it is revoked.
//!
//! The store plays the role object URLs play in a browser: the widget creates
//! a reference for a picked file so the crop editor can display it, and must
//! revoke it exactly once when the crop session ends. [`SourceLease`] ties
//! that revocation to a scope.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// URI scheme prefix for store-issued references.
pub const STORE_URI_PREFIX: &str = "blob:cropframe/";

/// Identifier of a store-issued reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReferenceId(u64);

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to image data usable as a display source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageReference {
    uri: String,
    id: Option<ReferenceId>,
}

impl ImageReference {
    /// Wrap a URI owned by the host.
    pub fn external(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            id: None,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The store id, or `None` for external references.
    pub fn id(&self) -> Option<ReferenceId> {
        self.id
    }

    pub fn is_external(&self) -> bool {
        self.id.is_none()
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

/// Bytes and MIME type behind a store-issued reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
}

#[derive(Debug, Default)]
struct StoreInner {
    next_id: u64,
    entries: HashMap<ReferenceId, StoredImage>,
    created: u64,
    revoked: u64,
}

/// Registry of live image references.
///
/// Cloning the store yields another handle to the same registry. The store is
/// single-threaded, matching the UI event loop that owns it.
#[derive(Debug, Clone, Default)]
pub struct ReferenceStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl ReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes and return a new reference to them.
    pub fn create(&self, mime_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> ImageReference {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = ReferenceId(inner.next_id);
        inner.entries.insert(
            id,
            StoredImage {
                mime_type: mime_type.into(),
                bytes: bytes.into(),
            },
        );
        inner.created += 1;
        log::trace!("created image reference {}", id);

        ImageReference {
            uri: format!("{}{}", STORE_URI_PREFIX, id),
            id: Some(id),
        }
    }

    /// Look up the data behind a reference.
    ///
    /// Returns `None` for external references and revoked ones.
    pub fn resolve(&self, reference: &ImageReference) -> Option<StoredImage> {
        let id = reference.id?;
        self.inner.borrow().entries.get(&id).cloned()
    }

    /// Find a live reference by its URI.
    pub fn lookup_uri(&self, uri: &str) -> Option<ImageReference> {
        let id = ReferenceId(uri.strip_prefix(STORE_URI_PREFIX)?.parse().ok()?);
        self.inner
            .borrow()
            .entries
            .contains_key(&id)
            .then(|| ImageReference {
                uri: uri.to_string(),
                id: Some(id),
            })
    }

    /// Release the data behind a reference.
    ///
    /// Returns `true` if the reference was live. Revoking twice, or revoking
    /// an external reference, is a no-op.
    pub fn revoke(&self, reference: &ImageReference) -> bool {
        let Some(id) = reference.id else {
            return false;
        };
        let mut inner = self.inner.borrow_mut();
        let removed = inner.entries.remove(&id).is_some();
        if removed {
            inner.revoked += 1;
            log::trace!("revoked image reference {}", id);
        }
        removed
    }

    pub fn is_live(&self, reference: &ImageReference) -> bool {
        reference
            .id
            .is_some_and(|id| self.inner.borrow().entries.contains_key(&id))
    }

    /// Number of references currently holding data.
    pub fn live_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Total references ever created by this store.
    pub fn created_count(&self) -> u64 {
        self.inner.borrow().created
    }

    /// Total references revoked by this store.
    pub fn revoked_count(&self) -> u64 {
        self.inner.borrow().revoked
    }

    /// Create a reference that is revoked when the lease is dropped.
    pub fn lease(&self, mime_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> SourceLease {
        SourceLease {
            reference: self.create(mime_type, bytes),
            store: self.clone(),
        }
    }
}

/// Scoped ownership of a store-issued reference.
///
/// The reference is revoked exactly once, when the lease is dropped.
#[derive(Debug)]
pub struct SourceLease {
    reference: ImageReference,
    store: ReferenceStore,
}

impl SourceLease {
    pub fn reference(&self) -> &ImageReference {
        &self.reference
    }
}

impl Drop for SourceLease {
    fn drop(&mut self) {
        self.store.revoke(&self.reference);
    }
}
