//! Login probe against the capabilities endpoint.

use crate::envelope;
use crate::error::{ClientError, Result, OCS_UNAUTHORISED};
use crate::transport::{routes, ApiRequest, Transport};
use crate::types::{Capabilities, Session};
use reqwest::Method;
use tracing::{debug, info, warn};

/// Authentication client.
pub struct AuthClient<'a> {
    transport: &'a dyn Transport,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    /// Check `session` by fetching the server capabilities with it.
    ///
    /// Returns the capabilities on success.
    pub async fn login(&self, session: &Session) -> Result<Capabilities> {
        debug!(username = %session.username, "Attempting login");

        let request = ApiRequest::new(Method::GET, routes::CAPABILITIES, session.clone());
        let response = self.transport.execute(request).await?;

        if response.status == 401 {
            warn!(username = %session.username, "Login failed: invalid credentials");
            return Err(ClientError::AuthFailed(
                "Invalid username or password".to_string(),
            ));
        }

        let capabilities: Capabilities = match envelope::decode(&response) {
            Ok(capabilities) => capabilities,
            Err(ClientError::Api(e)) if e.code == OCS_UNAUTHORISED => {
                warn!(username = %session.username, "Login failed: {}", e.message);
                return Err(ClientError::AuthFailed(e.message));
            }
            Err(e) => return Err(e),
        };

        info!(
            username = %session.username,
            version = %capabilities.version.string,
            "Login successful"
        );

        Ok(capabilities)
    }
}
