use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use crate::constants::TAX_RATE;

/// A catalog product.
///
/// Only `id`, `title` and `price` mean anything to the store; every other
/// field the API sends is kept in `extra` and written back untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Price::is_absent")]
    pub price: Price,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    pub fn new(id: impl Into<String>, title: impl Into<String>, price: f64) -> Self {
        Product {
            id: ProductId::from(id.into()),
            title: title.into(),
            price: Price::from(price),
            extra: Map::new(),
        }
    }

    /// Case-insensitive substring match on the title
    pub fn matches(&self, search: &str) -> bool {
        self.title.to_lowercase().contains(&search.to_lowercase())
    }
}

/// Product identifier. Compared as text, so `3` and `"3"` are the same
/// product, but serialized exactly as the API sent it.
#[derive(Clone, Debug)]
pub struct ProductId {
    key: String,
    raw: Value,
}

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl From<String> for ProductId {
    fn from(key: String) -> Self {
        let raw = Value::String(key.clone());
        ProductId { key, raw }
    }
}

impl From<&str> for ProductId {
    fn from(key: &str) -> Self {
        ProductId::from(key.to_string())
    }
}

impl PartialEq for ProductId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl PartialEq<str> for ProductId {
    fn eq(&self, other: &str) -> bool {
        self.key == other
    }
}

impl PartialEq<&str> for ProductId {
    fn eq(&self, other: &&str) -> bool {
        self.key == *other
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.key)
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let key = match &raw {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => {
                return Err(D::Error::custom(format!(
                    "product id must be a string or number, got {}",
                    other
                )))
            }
        };
        Ok(ProductId { key, raw })
    }
}

/// A price as a number, keeping the JSON form it arrived in (PHP backends
/// often quote numbers). Null or missing prices count as zero.
#[derive(Clone, Debug, Default)]
pub struct Price {
    amount: f64,
    raw: Value,
}

impl Price {
    pub fn amount(&self) -> f64 {
        self.amount
    }

    fn is_absent(&self) -> bool {
        self.raw.is_null()
    }
}

impl From<f64> for Price {
    fn from(amount: f64) -> Self {
        Price {
            amount,
            raw: Value::from(amount),
        }
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        self.amount == other.amount
    }
}

impl PartialEq<f64> for Price {
    fn eq(&self, other: &f64) -> bool {
        self.amount == *other
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let amount = match &raw {
            Value::Null => 0.0,
            Value::Number(n) => n.as_f64().unwrap_or_default(),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid price {:?}", s)))?,
            other => return Err(D::Error::custom(format!("invalid price {}", other))),
        };
        Ok(Price { amount, raw })
    }
}

/// Decode a product list item by item, skipping entries that are not
/// products so one bad row does not hide the whole catalog.
pub fn decode_products(items: Vec<Value>) -> Vec<Product> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Product>(item) {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping malformed product");
                None
            }
        })
        .collect()
}

/// A product placed in the cart. There is no quantity: adding the same
/// product twice yields two items.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default)]
    pub total: Price,
}

impl From<Product> for CartItem {
    fn from(product: Product) -> Self {
        let total = product.price.clone();
        CartItem { product, total }
    }
}

impl CartItem {
    pub fn id(&self) -> &str {
        self.product.id.as_str()
    }
}

/// Figures derived from the cart. Tax is informational and not part of `total`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CartTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl CartTotals {
    pub fn compute(cart: &[CartItem]) -> Self {
        let subtotal: f64 = cart.iter().map(|item| item.total.amount()).sum();
        CartTotals {
            subtotal,
            tax: round_cents(subtotal * TAX_RATE),
            total: subtotal,
        }
    }
}

/// Round to two decimals on the exact binary value, ties going up
fn round_cents(value: f64) -> f64 {
    // Only multiples of 1/8 that are not multiples of 1/4 sit exactly on
    // a half cent; scaling by 100 is exact for them.
    let eighths = value * 8.0;
    let quarters = value * 4.0;
    if eighths.fract() == 0.0 && quarters.fract() != 0.0 {
        return (value * 100.0).round() / 100.0;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// `{ "data": ... }` envelope used by the product endpoints
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Reply of the checkout endpoint
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CheckoutResponse {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl CheckoutResponse {
    /// The redirect target, if the backend accepted the cart
    pub fn redirect_url(&self) -> Option<&str> {
        if self.error.as_ref().is_some_and(is_truthy) {
            return None;
        }
        self.url.as_deref().filter(|url| !url.is_empty())
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
