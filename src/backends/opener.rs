// SPDX-License-Identifier: GPL-3.0-only

//! Resource opener abstraction
//!
//! Given a URI, performs the platform-level launch action. The action
//! settles asynchronously; a failure is logged by the controller and never
//! surfaced to the user.

use futures::future::BoxFuture;
use tracing::info;

use crate::errors::OpenError;

/// Launches a URI with the platform handler
pub trait ResourceOpener: Send + Sync {
    fn open(&self, uri: &str) -> BoxFuture<'static, Result<(), OpenError>>;
}

/// Opens URIs with the system's default handler via the `open` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl ResourceOpener for SystemOpener {
    fn open(&self, uri: &str) -> BoxFuture<'static, Result<(), OpenError>> {
        let uri = uri.to_string();
        Box::pin(async move {
            if uri.is_empty() {
                return Err(OpenError::EmptyUri);
            }
            match open::that_detached(&uri) {
                Ok(()) => {
                    info!(uri = %uri, "URI opened successfully");
                    Ok(())
                }
                Err(err) => Err(OpenError::LaunchFailed(err.to_string())),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_uri_is_rejected() {
        let result = SystemOpener.open("").await;
        assert!(matches!(result, Err(OpenError::EmptyUri)));
    }
}
