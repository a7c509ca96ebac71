//! HTTP client for the product API

use anyhow::{Context, Result};
use uuid::Uuid;

use crate::constants::{CHECKOUT_PATH, DEBT_ID_PREFIX, PRODUCTS_PATH, PRODUCT_PATH};
use crate::messages::{NetworkResponse, RequestKind};
use crate::models::{decode_products, CartItem, CheckoutResponse, Envelope, Product};

/// Thin wrapper around `reqwest::Client` bound to an API base URL
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiClient {
            client: create_client(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET read_all.php` → `{ "data": [Product] }`; malformed entries are skipped
    pub async fn fetch_products(&self) -> Result<Vec<Product>> {
        let envelope: Envelope<Vec<serde_json::Value>> = self
            .client
            .get(self.url(PRODUCTS_PATH))
            .send()
            .await
            .context("requesting product list")?
            .error_for_status()?
            .json()
            .await
            .context("decoding product list")?;
        Ok(decode_products(envelope.data))
    }

    /// `GET read_single.php/?id=..` → `{ "data": Product }`
    pub async fn fetch_product(&self, product_id: &str) -> Result<Product> {
        let envelope: Envelope<Product> = self
            .client
            .get(self.url(PRODUCT_PATH))
            .query(&[("id", product_id)])
            .send()
            .await
            .with_context(|| format!("requesting product {}", product_id))?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("decoding product {}", product_id))?;
        Ok(envelope.data)
    }

    /// Post the cart as a form and return the backend's reply
    pub async fn submit_checkout(&self, cart: &[CartItem], total: f64) -> Result<CheckoutResponse> {
        let debt_id = format!("{}{}", DEBT_ID_PREFIX, Uuid::new_v4());
        let cart_json = serde_json::to_string(cart)?;
        let total = total.to_string();
        let form = [
            ("debtId", debt_id.as_str()),
            ("checkCart", cart_json.as_str()),
            ("checkTotal", total.as_str()),
        ];

        tracing::info!(
            debt_id = %debt_id,
            items = cart.len(),
            total = %total,
            "Submitting checkout"
        );
        let response = self
            .client
            .post(self.url(CHECKOUT_PATH))
            .form(&form)
            .send()
            .await
            .context("submitting checkout")?
            .error_for_status()?
            .json()
            .await
            .context("decoding checkout reply")?;
        Ok(response)
    }
}

/// Map a result onto the message the app layer expects
fn into_response<T>(
    id: u64,
    kind: RequestKind,
    result: Result<T>,
    ok: impl FnOnce(T) -> NetworkResponse,
) -> NetworkResponse {
    match result {
        Ok(value) => ok(value),
        Err(e) => NetworkResponse::Error {
            id,
            kind,
            message: format!("{:#}", e),
        },
    }
}

pub async fn execute_fetch_products(api: &ApiClient, id: u64) -> NetworkResponse {
    into_response(id, RequestKind::Products, api.fetch_products().await, |products| {
        NetworkResponse::ProductsLoaded { id, products }
    })
}

pub async fn execute_fetch_product(api: &ApiClient, id: u64, product_id: &str) -> NetworkResponse {
    into_response(id, RequestKind::Product, api.fetch_product(product_id).await, |product| {
        NetworkResponse::ProductLoaded { id, product }
    })
}

pub async fn execute_checkout(
    api: &ApiClient,
    id: u64,
    cart: &[CartItem],
    total: f64,
) -> NetworkResponse {
    into_response(id, RequestKind::Checkout, api.submit_checkout(cart, total).await, |reply| {
        match reply.redirect_url() {
            Some(url) => NetworkResponse::CheckoutAccepted {
                id,
                url: url.to_string(),
            },
            None => NetworkResponse::CheckoutRejected { id },
        }
    })
}

/// Create an HTTP client with default configuration. No request timeout is set.
pub fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("phone-store/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
