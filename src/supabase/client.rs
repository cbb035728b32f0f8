//! PostgREST client scoped to a single caller's token.

use axum::http::StatusCode;
use serde_json::Value;
use std::fmt;
use url::Url;

/// Errors from the scoped data client.
#[derive(Debug)]
pub enum DataError {
    /// Transport-level failure talking to PostgREST
    Request(reqwest::Error),
    /// PostgREST answered with a non-success status (e.g. a row-level policy
    /// rejection surfacing as 401/403)
    Rejected { status: StatusCode, body: String },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(e) => write!(f, "data request failed: {}", e),
            Self::Rejected { status, body } => {
                write!(f, "data store rejected request ({}): {}", status, body)
            }
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(e) => Some(e),
            Self::Rejected { .. } => None,
        }
    }
}

impl From<reqwest::Error> for DataError {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e)
    }
}

/// Builds [`ScopedClient`]s for verified tokens.
///
/// Shared, request-independent pieces (HTTP connection pool, REST base URL,
/// anon key) live here; each request gets its own client bound to its own
/// token.
#[derive(Debug, Clone)]
pub struct ScopedClientFactory {
    http: reqwest::Client,
    rest_base: Url,
    anon_key: String,
}

impl ScopedClientFactory {
    pub fn new(http: reqwest::Client, rest_base: Url, anon_key: impl Into<String>) -> Self {
        Self {
            http,
            rest_base,
            anon_key: anon_key.into(),
        }
    }

    /// Bind a client to a raw verified token.
    ///
    /// Every query through the returned client carries the token, so the
    /// data store's row-level policy enforces that principal's restrictions.
    /// The client is owned by the request and never cached across requests.
    pub fn bind(&self, token: &str) -> ScopedClient {
        ScopedClient {
            http: self.http.clone(),
            rest_base: self.rest_base.clone(),
            anon_key: self.anon_key.clone(),
            token: token.to_string(),
        }
    }
}

/// Data-access handle carrying a verified caller token.
#[derive(Clone)]
pub struct ScopedClient {
    http: reqwest::Client,
    rest_base: Url,
    anon_key: String,
    token: String,
}

impl fmt::Debug for ScopedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the bearer token
        f.debug_struct("ScopedClient")
            .field("rest_base", &self.rest_base.as_str())
            .finish()
    }
}

impl ScopedClient {
    /// The raw token this client is bound to.
    pub fn token(&self) -> &str {
        &self.token
    }

    fn table_url(&self, table: &str) -> Result<Url, DataError> {
        // rest_base ends with a trailing slash, so join appends the table.
        self.rest_base.join(table).map_err(|_| DataError::Rejected {
            status: StatusCode::BAD_REQUEST,
            body: format!("invalid table name: {}", table),
        })
    }

    /// `GET /rest/v1/{table}?select={columns}&{filters}` under the bound
    /// token.
    ///
    /// Filter values use PostgREST operator syntax, e.g. `("id", "eq.u1")`.
    pub async fn select(
        &self,
        table: &str,
        columns: &str,
        filters: &[(&str, &str)],
    ) -> Result<Vec<Value>, DataError> {
        let mut url = self.table_url(table)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", columns);
            for (column, filter) in filters {
                pairs.append_pair(column, filter);
            }
        }

        let response = self
            .http
            .get(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::Rejected {
                status: StatusCode::from_u16(status.as_u16())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// `POST /rest/v1/{table}` with a JSON row, under the bound token.
    pub async fn insert(&self, table: &str, row: &Value) -> Result<(), DataError> {
        let url = self.table_url(table)?;

        let response = self
            .http
            .post(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.token)
            .json(row)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::Rejected {
                status: StatusCode::from_u16(status.as_u16())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                body,
            });
        }

        Ok(())
    }
}
