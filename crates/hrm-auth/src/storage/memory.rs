use async_trait::async_trait;
use tokio::sync::RwLock;

use super::TokenStore;
use crate::error::AuthError;
use crate::token::TokenPair;

/// Token store that keeps the pair in memory only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds a pair.
    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: RwLock::new(Some(tokens)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<TokenPair>, AuthError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.as_ref().filter(|t| t.is_complete()).cloned())
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), AuthError> {
        *self.tokens.write().await = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), AuthError> {
        *self.tokens.write().await = None;
        Ok(())
    }
}
