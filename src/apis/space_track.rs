use crate::constants::{
    REQUEST_CATALOG, REQUEST_CMD_ACTION, REQUEST_LOGIN, REQUEST_LOGOUT, URI_BASE,
};
use crate::domain::Credentials;
use crate::error::{Result, ScraperError};
use tracing::{debug, info, instrument};

/// Status and body of one HTTP exchange, as seen by the fetch logic
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// The session seam between the fetch logic and the wire. The production
/// implementation drives a cookie-backed reqwest client; tests substitute
/// canned replies.
#[async_trait::async_trait]
pub trait CatalogTransport: Send + Sync {
    async fn post_login(&self, credentials: &Credentials) -> Result<HttpReply>;
    async fn get_catalog(&self, query_path: &str) -> Result<HttpReply>;
    async fn get_logout(&self) -> Result<HttpReply>;
}

/// reqwest-backed transport for www.space-track.org. The login endpoint sets
/// a session cookie, so the client carries a cookie store for the lifetime
/// of the transport.
pub struct SpaceTrackTransport {
    client: reqwest::Client,
    base_url: String,
}

impl SpaceTrackTransport {
    pub fn new() -> Result<Self> {
        Self::with_base_url(URI_BASE)
    }

    /// Point the transport at an alternate base URL (mirrors, test servers)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    async fn reply_from(response: reqwest::Response) -> Result<HttpReply> {
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(HttpReply { status, body })
    }
}

#[async_trait::async_trait]
impl CatalogTransport for SpaceTrackTransport {
    async fn post_login(&self, credentials: &Credentials) -> Result<HttpReply> {
        let form = [
            ("identity", credentials.identity.as_str()),
            ("password", credentials.password.as_str()),
        ];
        let response = self
            .client
            .post(format!("{}{}", self.base_url, REQUEST_LOGIN))
            .form(&form)
            .send()
            .await?;
        Self::reply_from(response).await
    }

    async fn get_catalog(&self, query_path: &str) -> Result<HttpReply> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, query_path))
            .send()
            .await?;
        Self::reply_from(response).await
    }

    async fn get_logout(&self) -> Result<HttpReply> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, REQUEST_LOGOUT))
            .send()
            .await?;
        Self::reply_from(response).await
    }
}

/// Open the session by POSTing credentials to the login endpoint.
///
/// A 200 only confirms the site received the form; bad credentials surface
/// as a 401 on the catalog query that follows.
#[instrument(skip(transport, credentials))]
pub async fn authenticate(
    transport: &dyn CatalogTransport,
    credentials: &Credentials,
) -> Result<()> {
    let reply = transport.post_login(credentials).await?;
    if reply.status != 200 {
        return Err(ScraperError::Authentication {
            status: reply.status,
            body: reply.body_text(),
        });
    }
    debug!("login form accepted");
    Ok(())
}

/// Issue the single filtered catalog query and return the raw payload bytes.
/// Exactly one round trip; no pagination, no partial results.
#[instrument(skip(transport))]
pub async fn fetch_catalog(transport: &dyn CatalogTransport) -> Result<Vec<u8>> {
    let query_path = format!("{REQUEST_CMD_ACTION}{REQUEST_CATALOG}");
    let reply = transport.get_catalog(&query_path).await?;
    if reply.status != 200 {
        return Err(ScraperError::Fetch {
            status: reply.status,
            body: reply.body_text(),
        });
    }
    info!("fetched {} byte catalog payload", reply.body.len());
    Ok(reply.body)
}

/// Close the session. Logout failures are logged and swallowed so that the
/// run result is never masked by teardown.
pub async fn close_session(transport: &dyn CatalogTransport) {
    match transport.get_logout().await {
        Ok(reply) if reply.status == 200 => debug!("session closed"),
        Ok(reply) => tracing::warn!("logout returned HTTP {}", reply.status),
        Err(e) => tracing::warn!("logout request failed: {e}"),
    }
}
