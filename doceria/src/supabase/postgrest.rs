//! PostgREST table access.
//!
//! [`Query`] is a small builder over the `/rest/v1/{table}` endpoints covering
//! the handful of shapes the repositories need: equality filters, ordering,
//! embedded resources via `select`, and the insert/update/delete verbs.
//! Filters become query parameters (`customer_name=eq.Maria`), ordering
//! becomes `order=col.desc`, and single-row reads use the
//! `application/vnd.pgrst.object+json` media type.
//!
//! Row absence is a first-class outcome here, not an error. PostgREST reports
//! "asked for one object, got zero rows" as error code `PGRST116`; the
//! single-row executors translate that into `Ok(None)` so callers can map it
//! to their own not-found handling.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use super::Supabase;

/// PostgREST code for a single-object request that matched no rows.
const NO_ROWS_CODE: &str = "PGRST116";

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Store API error ({status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl StoreError {
    /// True when PostgREST reported zero matching rows for a single-object
    /// request.
    pub fn is_no_rows(&self) -> bool {
        matches!(self, StoreError::Api { code: Some(code), .. } if code == NO_ROWS_CODE)
    }
}

impl Supabase {
    /// Start a query against a table.
    pub fn table<'a>(&'a self, name: &'a str) -> Query<'a> {
        Query {
            client: self,
            table: name,
            select: None,
            filters: Vec::new(),
            order: None,
        }
    }
}

/// A single request against one table, built up and then executed.
#[derive(Debug)]
pub struct Query<'a> {
    client: &'a Supabase,
    table: &'a str,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Option<String>,
}

impl Query<'_> {
    /// Columns to return. Embedded resources use the PostgREST syntax, e.g.
    /// `"*, order_items(*)"`.
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    /// Keep only rows where `column` equals `value`.
    pub fn eq(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Sort the result by `column`.
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.order = Some(format!("{column}.{direction}"));
        self
    }

    fn url(&self) -> Result<Url, url::ParseError> {
        self.client.endpoint(&format!("rest/v1/{}", self.table))
    }

    fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(select) = &self.select {
            params.push(("select".to_string(), select.clone()));
        }
        for (column, filter) in &self.filters {
            params.push((column.clone(), filter.clone()));
        }
        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.clone()));
        }
        params
    }

    fn request(&self, method: Method) -> Result<reqwest::RequestBuilder, StoreError> {
        let url = self.url()?;
        Ok(self
            .client
            .http
            .request(method, url)
            .query(&self.params())
            .header("apikey", &self.client.service_role_key)
            .bearer_auth(&self.client.service_role_key))
    }

    /// Run the query and decode every matching row.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, StoreError> {
        let response = self.request(Method::GET)?.send().await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        Ok(response.json().await?)
    }

    /// Run the query expecting a single row, `None` when nothing matched.
    pub async fn fetch_one<T: DeserializeOwned>(self) -> Result<Option<T>, StoreError> {
        let response = self
            .request(Method::GET)?
            .header(reqwest::header::ACCEPT, SINGLE_OBJECT)
            .send()
            .await?;
        if !response.status().is_success() {
            let err = error_from(response).await;
            if err.is_no_rows() {
                return Ok(None);
            }
            return Err(err);
        }
        Ok(Some(response.json().await?))
    }

    /// Insert one row and return it as stored.
    pub async fn insert_one<B: Serialize, T: DeserializeOwned>(self, row: &B) -> Result<T, StoreError> {
        let response = self
            .request(Method::POST)?
            .header("Prefer", "return=representation")
            .header(reqwest::header::ACCEPT, SINGLE_OBJECT)
            .json(row)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        Ok(response.json().await?)
    }

    /// Insert a batch of rows without reading them back.
    pub async fn insert_many<B: Serialize>(self, rows: &[B]) -> Result<(), StoreError> {
        let response = self
            .request(Method::POST)?
            .header("Prefer", "return=minimal")
            .json(&rows)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        Ok(())
    }

    /// Patch the matching row and return the updated version, `None` when
    /// nothing matched.
    pub async fn update_one<B: Serialize, T: DeserializeOwned>(self, patch: &B) -> Result<Option<T>, StoreError> {
        let response = self
            .request(Method::PATCH)?
            .header("Prefer", "return=representation")
            .header(reqwest::header::ACCEPT, SINGLE_OBJECT)
            .json(patch)
            .send()
            .await?;
        if !response.status().is_success() {
            let err = error_from(response).await;
            if err.is_no_rows() {
                return Ok(None);
            }
            return Err(err);
        }
        Ok(Some(response.json().await?))
    }

    /// Delete the matching rows without reading them back.
    pub async fn delete(self) -> Result<(), StoreError> {
        let response = self
            .request(Method::DELETE)?
            .header("Prefer", "return=minimal")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        Ok(())
    }

    /// Delete the matching row and return it, `None` when nothing matched.
    pub async fn delete_one<T: DeserializeOwned>(self) -> Result<Option<T>, StoreError> {
        let response = self
            .request(Method::DELETE)?
            .header("Prefer", "return=representation")
            .header(reqwest::header::ACCEPT, SINGLE_OBJECT)
            .send()
            .await?;
        if !response.status().is_success() {
            let err = error_from(response).await;
            if err.is_no_rows() {
                return Ok(None);
            }
            return Err(err);
        }
        Ok(Some(response.json().await?))
    }
}

async fn error_from(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    match response.json::<PostgrestErrorBody>().await {
        Ok(body) => StoreError::Api {
            status,
            code: body.code,
            message: body.message.unwrap_or_else(|| format!("HTTP {status}")),
        },
        Err(_) => StoreError::Api {
            status,
            code: None,
            message: format!("HTTP {status}"),
        },
    }
}

/// PostgREST error envelope. `details` and `hint` are decoded only so a full
/// body never fails to parse.
#[derive(Debug, serde::Deserialize)]
struct PostgrestErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    details: Option<serde_json::Value>,
    #[serde(default)]
    #[allow(dead_code)]
    hint: Option<String>,
}
