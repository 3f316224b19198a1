use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{LineItem, LineItemUpdate, PagedResults, Part, SalesOrder};

// Open sales orders the fulfillment screens care about: In Progress, Shipped.
const FULFILLABLE_STATUSES: &str = "15,20";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("not found")]
    NotFound,
    #[error("server rejected request: {detail}")]
    Validation { detail: String },
    #[error("unexpected response status {status}")]
    Unexpected { status: u16 },
}

#[derive(Serialize)]
struct BarcodeScanRequest<'a> {
    barcode: &'a str,
}

#[derive(Deserialize)]
struct BarcodeScanResponse {
    #[serde(default)]
    part: Option<Part>,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(server_url: &str, token: String) -> Self {
        ApiClient {
            http: reqwest::Client::new(),
            base_url: server_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header(reqwest::header::AUTHORIZATION, format!("Token {}", self.token))
    }

    // Barcode decode: a successful response without a nested part record is
    // an unrecognized code, as is a client-error status from the decoder.
    pub async fn scan_barcode(&self, barcode: &str) -> Result<Part, ApiError> {
        tracing::debug!(barcode, "submitting barcode for decode");
        let response = self
            .auth(self.http.post(self.endpoint("/api/barcode/")))
            .json(&BarcodeScanRequest { barcode })
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            return Err(ApiError::Unexpected {
                status: status.as_u16(),
            });
        }

        let body: BarcodeScanResponse = response.json().await?;
        body.part.ok_or(ApiError::NotFound)
    }

    // Free-text product search, first result only.
    pub async fn search_part(&self, query: &str) -> Result<Part, ApiError> {
        tracing::debug!(query, "searching for part");
        let page: PagedResults<Part> = self
            .get_json(
                "/api/part/",
                &[("search", query.to_string()), ("limit", "1".to_string())],
            )
            .await?;
        page.results.into_iter().next().ok_or(ApiError::NotFound)
    }

    pub async fn get_order(&self, order_id: i64) -> Result<SalesOrder, ApiError> {
        self.get_json(
            &format!("/api/order/so/{order_id}/"),
            &[("customer_detail", "true".to_string())],
        )
        .await
    }

    pub async fn list_fulfillable_orders(&self) -> Result<Vec<SalesOrder>, ApiError> {
        let page: PagedResults<SalesOrder> = self
            .get_json(
                "/api/order/so/",
                &[
                    ("outstanding", "true".to_string()),
                    ("status_in", FULFILLABLE_STATUSES.to_string()),
                    ("customer_detail", "true".to_string()),
                ],
            )
            .await?;
        Ok(page.results)
    }

    pub async fn list_order_lines(
        &self,
        order_id: i64,
        outstanding_only: bool,
    ) -> Result<Vec<LineItem>, ApiError> {
        let mut query = vec![
            ("order", order_id.to_string()),
            ("part_detail", "true".to_string()),
        ];
        if outstanding_only {
            query.push(("outstanding", "true".to_string()));
        }
        let page: PagedResults<LineItem> = self.get_json("/api/order/so-line/", &query).await?;
        Ok(page.results)
    }

    pub async fn update_line_item(
        &self,
        line_id: i64,
        update: &LineItemUpdate,
    ) -> Result<LineItem, ApiError> {
        tracing::debug!(line_id, shipped = update.shipped, substitute = ?update.part, "patching order line");
        let response = self
            .auth(
                self.http
                    .patch(self.endpoint(&format!("/api/order/so-line/{line_id}/"))),
            )
            .json(update)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    pub async fn ping(&self) -> Result<bool, ApiError> {
        let response = self.auth(self.http.get(self.endpoint("/api/"))).send().await?;
        Ok(response.status().is_success())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .auth(self.http.get(self.endpoint(path)))
            .query(query)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }
    if status.is_client_error() {
        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("client error").to_string());
        return Err(ApiError::Validation { detail });
    }
    Err(ApiError::Unexpected {
        status: status.as_u16(),
    })
}

// Error payloads carry a human-readable message under "detail" (or "error"
// from the barcode decoder).
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    for key in ["detail", "error"] {
        if let Some(detail) = value.get(key).and_then(Value::as_str) {
            return Some(detail.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_duplicate_slash() {
        let client = ApiClient::new("https://inventory.example.com/", "t0ken".to_string());
        assert_eq!(
            client.endpoint("/api/barcode/"),
            "https://inventory.example.com/api/barcode/"
        );
    }

    #[test]
    fn error_detail_prefers_detail_field() {
        assert_eq!(
            error_detail(r#"{"detail": "shipped quantity exceeds ordered quantity"}"#),
            Some("shipped quantity exceeds ordered quantity".to_string())
        );
        assert_eq!(
            error_detail(r#"{"error": "no match for barcode"}"#),
            Some("no match for barcode".to_string())
        );
        assert_eq!(error_detail("not json"), None);
        assert_eq!(error_detail(r#"{"other": 1}"#), None);
    }
}
