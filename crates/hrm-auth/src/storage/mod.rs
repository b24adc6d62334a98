//! Persistent storage for the session token pair.
//!
//! - [`FileTokenStore`] - JSON file under the user's home directory
//! - [`MemoryTokenStore`] - In-process store for tests and embedding

mod file;
mod memory;

use async_trait::async_trait;

use crate::error::AuthError;
use crate::token::TokenPair;

pub use file::{FileTokenStore, STATE_DIR};
pub use memory::MemoryTokenStore;

/// Storage for the access/refresh token pair.
///
/// Implementations must write the pair as a unit: a reader observes either
/// the previous pair or the new one, never a mix of both.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Loads the stored pair. Returns `None` when either token is absent.
    async fn load(&self) -> Result<Option<TokenPair>, AuthError>;

    /// Replaces the stored pair.
    async fn save(&self, tokens: &TokenPair) -> Result<(), AuthError>;

    /// Removes both tokens. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<(), AuthError>;
}
