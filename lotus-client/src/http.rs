//! HTTP implementation of the remote collaborator interfaces
//!
//! Talks to the staff console's REST surface with the configured
//! bearer token. Every response arrives in the console's uniform
//! envelope (`code` 0 on success); domain codes map back onto
//! [`shared::error::ErrorCode`] so callers see the same typed
//! rejections the in-process fakes produce.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{CatalogItem, OrderStatus, OrderSummary, Table, TableUpdate, Voucher};
use std::time::Duration;

use crate::api::{CatalogApi, HoldApi, HoldGrant, OrderApi, TableApi, VoucherApi};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Uniform response envelope of the console REST surface
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    code: Option<u16>,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

/// Remote API client over HTTP
#[derive(Debug, Clone)]
pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(config: &ClientConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            http,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, self.url(path));
        if let Some(ref token) = self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Unwrap the console envelope into its data payload
    async fn parse_data<T: DeserializeOwned>(resp: reqwest::Response) -> ClientResult<T> {
        let body = Self::check(resp).await?;
        body.data
            .ok_or_else(|| AppError::internal("Response missing data").into())
    }

    /// Unwrap an acknowledge-only response
    async fn parse_ack(resp: reqwest::Response) -> ClientResult<()> {
        Self::check::<serde_json::Value>(resp).await.map(|_| ())
    }

    async fn check<T: DeserializeOwned>(resp: reqwest::Response) -> ClientResult<ApiResponse<T>> {
        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Auth("Bearer token rejected".to_string()));
        }
        let body: ApiResponse<T> = resp.json().await?;
        match body.code {
            Some(0) | None => Ok(body),
            Some(raw) => match ErrorCode::try_from(raw) {
                Ok(
                    code @ (ErrorCode::NotAuthenticated
                    | ErrorCode::TokenExpired
                    | ErrorCode::TokenInvalid),
                ) => Err(ClientError::Auth(format!("{} ({})", body.message, code))),
                Ok(code) => Err(AppError::with_message(code, body.message).into()),
                Err(_) => Err(AppError::with_message(ErrorCode::Unknown, body.message).into()),
            },
        }
    }
}

#[async_trait]
impl TableApi for HttpApi {
    async fn update_table(&self, id: &str, update: TableUpdate) -> ClientResult<Table> {
        let resp = self
            .request(reqwest::Method::PATCH, &format!("/api/tables/{}", id))
            .json(&update)
            .send()
            .await?;
        Self::parse_data(resp).await
    }
}

#[async_trait]
impl OrderApi for HttpApi {
    async fn check_in(&self, order_id: &str) -> ClientResult<()> {
        let resp = self
            .request(
                reqwest::Method::POST,
                &format!("/api/orders/{}/check-in", order_id),
            )
            .send()
            .await?;
        Self::parse_ack(resp).await
    }

    async fn set_order_status(&self, order_id: &str, status: OrderStatus) -> ClientResult<()> {
        let resp = self
            .request(
                reqwest::Method::PATCH,
                &format!("/api/orders/{}/status", order_id),
            )
            .json(&json!({ "status": status }))
            .send()
            .await?;
        Self::parse_ack(resp).await
    }

    async fn list_orders(&self) -> ClientResult<Vec<OrderSummary>> {
        let resp = self
            .request(reqwest::Method::GET, "/api/orders")
            .send()
            .await?;
        Self::parse_data(resp).await
    }
}

#[async_trait]
impl HoldApi for HttpApi {
    async fn acquire(&self, user_id: &str, table_id: &str) -> ClientResult<HoldGrant> {
        let resp = self
            .request(reqwest::Method::POST, "/api/holds")
            .json(&json!({ "user_id": user_id, "table_id": table_id }))
            .send()
            .await?;
        Self::parse_data(resp).await
    }

    async fn release(&self, user_id: &str, table_id: &str) -> ClientResult<()> {
        let resp = self
            .request(
                reqwest::Method::DELETE,
                &format!("/api/holds/{}/{}", user_id, table_id),
            )
            .send()
            .await?;
        Self::parse_ack(resp).await
    }

    async fn ttl(&self, user_id: &str, table_id: &str) -> ClientResult<i64> {
        let resp = self
            .request(
                reqwest::Method::GET,
                &format!("/api/holds/{}/{}/ttl", user_id, table_id),
            )
            .send()
            .await?;
        Self::parse_data(resp).await
    }
}

#[async_trait]
impl CatalogApi for HttpApi {
    async fn find_inactive(&self, ids: &[String]) -> ClientResult<Vec<String>> {
        let resp = self
            .request(reqwest::Method::POST, "/api/catalog/inactive")
            .json(&json!({ "ids": ids }))
            .send()
            .await?;
        Self::parse_data(resp).await
    }

    async fn fetch_combos(&self) -> ClientResult<Vec<CatalogItem>> {
        let resp = self
            .request(reqwest::Method::GET, "/api/catalog/combos")
            .send()
            .await?;
        Self::parse_data(resp).await
    }
}

#[async_trait]
impl VoucherApi for HttpApi {
    async fn eligible_vouchers(&self) -> ClientResult<Vec<Voucher>> {
        let resp = self
            .request(reqwest::Method::GET, "/api/vouchers/eligible")
            .send()
            .await?;
        Self::parse_data(resp).await
    }
}
