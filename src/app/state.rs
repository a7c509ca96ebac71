//! App state - pure data structure; the only I/O is the cart write-through

use crate::messages::RenderState;
use crate::models::{CartItem, CartTotals, Product};
use crate::storage::Storage;

/// Main application state
pub struct AppState {
    // Catalog
    pub products: Vec<Product>,
    pub filtered_products: Vec<Product>,
    pub search: String,

    // Detail view; `loading` stays true until a detail product arrives
    pub detail_product: Option<Product>,
    pub loading: bool,
    pub pending_detail_id: Option<u64>,

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

    pub next_request_id: u64,

    // Storage (persisted cart)
    pub storage: Storage,
}

impl AppState {
    /// Build the state, restoring the cart persisted in `storage`
    pub fn new(storage: Storage) -> Self {
        let cart = storage.load_cart();
        let totals = CartTotals::compute(&cart);
        AppState {
            products: Vec::new(),
            filtered_products: Vec::new(),
            search: String::new(),
            detail_product: None,
            loading: true,
            pending_detail_id: None,
            modal_open: false,
            modal_product: None,
            cart,
            totals,
            checkout_pending: false,
            alert: None,
            redirect_url: None,
            next_request_id: 1,
            storage,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Look a product up in the loaded catalog
    pub fn find_product(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn is_in_cart(&self, product_id: &str) -> bool {
        self.cart.iter().any(|item| item.id() == product_id)
    }

    /// Convert state to RenderState for the shell
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            products: self.products.clone(),
            filtered_products: self.filtered_products.clone(),
            search: self.search.clone(),
            detail_product: self.detail_product.clone(),
            loading: self.loading,
            modal_open: self.modal_open,
            modal_product: self.modal_product.clone(),
            cart: self.cart.clone(),
            totals: self.totals,
            checkout_pending: self.checkout_pending,
            alert: self.alert.clone(),
            redirect_url: self.redirect_url.clone(),
        }
    }
}
