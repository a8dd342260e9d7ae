//! Active account resolution

use std::sync::Arc;

use crate::services::ServiceContext;

/// Resolves the host wallet's active account
pub struct AccountResolver {
    ctx: Arc<ServiceContext>,
}

impl AccountResolver {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// First account exposed by the host.
    ///
    /// Never fails: no accounts, an empty identifier or a host error all yield
    /// `None`, meaning "no usable account".
    pub async fn current_account(&self) -> Option<String> {
        match self.ctx.account_provider().request_accounts().await {
            Ok(accounts) => match accounts.into_iter().next() {
                Some(account) if !account.is_empty() => Some(account),
                _ => {
                    log::warn!("Host returned no usable account");
                    None
                }
            },
            Err(e) => {
                log::error!("Error in current_account: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_context;

    #[tokio::test]
    async fn returns_first_account() {
        let (ctx, _, accounts, _) = create_test_context();
        accounts
            .set_accounts(vec!["0xaaa".to_string(), "0xbbb".to_string()])
            .await;

        let resolver = AccountResolver::new(ctx);
        assert_eq!(resolver.current_account().await.as_deref(), Some("0xaaa"));
    }

    #[tokio::test]
    async fn no_accounts_yields_none() {
        let (ctx, _, accounts, _) = create_test_context();
        accounts.set_accounts(Vec::new()).await;

        let resolver = AccountResolver::new(ctx);
        assert!(resolver.current_account().await.is_none());
    }

    #[tokio::test]
    async fn empty_identifier_yields_none() {
        let (ctx, _, accounts, _) = create_test_context();
        accounts.set_accounts(vec![String::new()]).await;

        let resolver = AccountResolver::new(ctx);
        assert!(resolver.current_account().await.is_none());
    }

    #[tokio::test]
    async fn host_error_yields_none() {
        let (ctx, _, accounts, _) = create_test_context();
        accounts.set_error(Some("wallet locked".to_string())).await;

        let resolver = AccountResolver::new(ctx);
        assert!(resolver.current_account().await.is_none());
    }
}
