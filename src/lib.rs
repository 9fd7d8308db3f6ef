//! Typed, mutable key-value contexts whose slots hold either immediate values
//! or thunks evaluated on every read, with per-key defaults and reset.
//!
//! - [`Context`] returns stored literals as-is and invokes stored thunks.
//! - [`LazyContext`] is the same store, meant for derived keys: thunks that
//!   read sibling keys observe them at read time.
//! - [`ProxyContext`] adds per-field getters and name-based reads, and its
//!   `set` reports whether the key was new.
//!
//! Key spaces are declared with [`context_keys!`].

pub mod errors;
pub mod key;
pub mod storable;
mod state;
pub mod context;
pub mod lazy;
pub mod proxy;

pub use context::{Context, WeakContext};
pub use errors::{ContextError, Result};
pub use key::{Key, Space};
pub use lazy::LazyContext;
pub use proxy::ProxyContext;
pub use state::Defaults;
pub use storable::{Storable, Thunk};
