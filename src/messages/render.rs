//! Render state - snapshot sent from App layer to the shell after every event

use crate::models::{CartItem, CartTotals, Product};

/// Complete state needed by the shell to display the store
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // Catalog
    pub products: Vec<Product>,
    pub filtered_products: Vec<Product>,
    pub search: String,

    // Detail view
    pub detail_product: Option<Product>,
    pub loading: bool,

    // Cart preview modal
    pub modal_open: bool,
    pub modal_product: Option<Product>,

    // Cart
    pub cart: Vec<CartItem>,
    pub totals: CartTotals,
    pub checkout_pending: bool,

    // Notifications
    pub alert: Option<String>,
    pub redirect_url: Option<String>,
}

impl RenderState {
    pub fn is_in_cart(&self, product_id: &str) -> bool {
        self.cart.iter().any(|item| item.id() == product_id)
    }
}
