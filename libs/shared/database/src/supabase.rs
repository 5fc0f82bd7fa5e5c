use anyhow::{anyhow, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Thin PostgREST client. Every request is authenticated with the configured
/// database key (service role when present, anon otherwise).
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            api_key: config.database_key().to_string(),
        }
    }

    fn get_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.api_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("API error ({}): {}", status, text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", text),
                404 => anyhow!("Resource not found: {}", text),
                _ => anyhow!("API error ({}): {}", status, text),
            });
        }

        // `return=minimal` answers with an empty body
        let payload = if text.trim().is_empty() { "null" } else { text.as_str() };
        let data = serde_json::from_str::<T>(payload)?;
        Ok(data)
    }

    /// `GET /rest/v1/{table}?{query}`
    pub async fn select(&self, table: &str, query: &str) -> Result<Vec<Value>> {
        self.request(Method::GET, &table_path(table, query), None).await
    }

    pub async fn select_as<T>(&self, table: &str, query: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let rows = self.select(table, query).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(Into::into))
            .collect()
    }

    /// First row of a select, `None` when nothing matched.
    pub async fn select_one(&self, table: &str, query: &str) -> Result<Option<Value>> {
        let rows = self.select(table, &format!("{}&limit=1", query)).await?;
        Ok(rows.into_iter().next())
    }

    pub async fn insert(&self, table: &str, body: Value) -> Result<Vec<Value>> {
        self.request_with_headers(
            Method::POST,
            &table_path(table, ""),
            Some(body),
            Some(prefer("return=representation")),
        )
        .await
    }

    /// PATCH rows matching `filter`; returns the updated rows.
    pub async fn update(&self, table: &str, filter: &str, body: Value) -> Result<Vec<Value>> {
        self.request_with_headers(
            Method::PATCH,
            &table_path(table, filter),
            Some(body),
            Some(prefer("return=representation")),
        )
        .await
    }

    pub async fn delete(&self, table: &str, filter: &str) -> Result<()> {
        let _: Value = self
            .request_with_headers(
                Method::DELETE,
                &table_path(table, filter),
                None,
                Some(prefer("return=minimal")),
            )
            .await?;
        Ok(())
    }
}

fn prefer(value: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static(value));
    headers
}

fn table_path(table: &str, query: &str) -> String {
    if query.is_empty() {
        format!("/rest/v1/{}", table)
    } else {
        format!("/rest/v1/{}?{}", table, query)
    }
}

/// `column=eq.value` with the value percent-encoded.
pub fn eq(column: &str, value: &str) -> String {
    format!("{}=eq.{}", column, urlencoding::encode(value))
}

/// `column=in.("a","b")` with each value quoted and percent-encoded.
pub fn in_list<S: AsRef<str>>(column: &str, values: &[S]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|v| format!("%22{}%22", urlencoding::encode(v.as_ref())))
        .collect();
    format!("{}=in.({})", column, quoted.join(","))
}
