//! Network messages - communication between App and Network layers

use crate::models::{CartItem, Product};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Fetch the whole catalog
    FetchProducts { id: u64 },
    /// Fetch a single product for the detail view
    FetchProduct { id: u64, product_id: String },
    /// Submit the cart to the payment backend
    Checkout {
        id: u64,
        cart: Vec<CartItem>,
        total: f64,
    },
    /// Shutdown the network actor
    Shutdown,
}

/// Which call an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Products,
    Product,
    Checkout,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    ProductsLoaded {
        id: u64,
        products: Vec<Product>,
    },
    ProductLoaded {
        id: u64,
        product: Product,
    },
    /// Backend accepted the cart and handed back a payment page
    CheckoutAccepted {
        id: u64,
        url: String,
    },
    /// Backend answered but flagged an error or gave no URL
    CheckoutRejected {
        id: u64,
    },
    /// Transport or decoding failure
    Error {
        id: u64,
        kind: RequestKind,
        message: String,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::ProductsLoaded { id, .. } => *id,
            NetworkResponse::ProductLoaded { id, .. } => *id,
            NetworkResponse::CheckoutAccepted { id, .. } => *id,
            NetworkResponse::CheckoutRejected { id } => *id,
            NetworkResponse::Error { id, .. } => *id,
        }
    }

    pub fn kind(&self) -> RequestKind {
        match self {
            NetworkResponse::ProductsLoaded { .. } => RequestKind::Products,
            NetworkResponse::ProductLoaded { .. } => RequestKind::Product,
            NetworkResponse::CheckoutAccepted { .. } | NetworkResponse::CheckoutRejected { .. } => {
                RequestKind::Checkout
            }
            NetworkResponse::Error { kind, .. } => *kind,
        }
    }
}
