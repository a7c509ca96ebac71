//! Command handlers - business logic for processing UI events and network responses

use crate::app::AppState;
use crate::constants::CHECKOUT_FAILED_ALERT;
use crate::messages::{NetworkCommand, NetworkResponse, RequestKind};
use crate::models::{CartItem, CartTotals};

impl AppState {
    // ========================
    // Catalog
    // ========================

    pub fn refresh_products(&mut self) -> NetworkCommand {
        NetworkCommand::FetchProducts { id: self.next_id() }
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.apply_filter();
    }

    pub fn clear_search(&mut self) {
        self.set_search(String::new());
    }

    /// Recompute `filtered_products` from `products` and `search`
    fn apply_filter(&mut self) {
        self.filtered_products = self
            .products
            .iter()
            .filter(|p| p.matches(&self.search))
            .cloned()
            .collect();
    }

    // ========================
    // Detail view
    // ========================

    pub fn show_detail(&mut self, product_id: impl Into<String>) -> NetworkCommand {
        let id = self.next_id();
        self.pending_detail_id = Some(id);
        NetworkCommand::FetchProduct {
            id,
            product_id: product_id.into(),
        }
    }

    pub fn close_detail(&mut self) {
        self.detail_product = None;
        self.loading = true;
        self.pending_detail_id = None;
    }

    // ========================
    // Cart preview modal
    // ========================

    pub fn open_modal(&mut self, product_id: &str) {
        match self.find_product(product_id).cloned() {
            Some(product) => {
                self.modal_product = Some(product);
                self.modal_open = true;
            }
            None => tracing::warn!(product_id, "Cannot preview unknown product"),
        }
    }

    pub fn close_modal(&mut self) {
        self.modal_open = false;
    }

    // ========================
    // Cart
    // ========================

    /// The cart is frozen while a checkout is in flight; the submitted
    /// items are cleared when it succeeds.
    fn cart_locked(&self) -> bool {
        if self.checkout_pending {
            tracing::warn!("Cart is locked while checkout is pending");
        }
        self.checkout_pending
    }

    /// Append the product to the cart. Adding twice yields two items.
    pub fn add_to_cart(&mut self, product_id: &str) -> Option<NetworkCommand> {
        if self.cart_locked() {
            return None;
        }
        let product = self
            .find_product(product_id)
            .or_else(|| self.detail_product.as_ref().filter(|p| p.id == product_id))
            .cloned();

        match product {
            Some(product) => {
                self.cart.push(CartItem::from(product));
                Some(self.commit_cart())
            }
            None => {
                tracing::warn!(product_id, "Cannot add unknown product to cart");
                None
            }
        }
    }

    /// Remove every cart item carrying this id
    pub fn remove_from_cart(&mut self, product_id: &str) -> Option<NetworkCommand> {
        if self.cart_locked() {
            return None;
        }
        self.cart.retain(|item| item.id() != product_id);
        Some(self.commit_cart())
    }

    pub fn clear_cart(&mut self) -> Option<NetworkCommand> {
        if self.cart_locked() {
            return None;
        }
        self.cart.clear();
        Some(self.commit_cart())
    }

    pub fn update_cart(&mut self) -> NetworkCommand {
        self.commit_cart()
    }

    /// Runs after every cart change and once at startup: write the cart
    /// through to storage, recompute totals, and refresh the catalog.
    pub fn commit_cart(&mut self) -> NetworkCommand {
        if let Err(e) = self.storage.save_cart(&self.cart) {
            tracing::error!(error = %e, "Failed to persist cart");
        }
        self.totals = CartTotals::compute(&self.cart);
        self.refresh_products()
    }

    // ========================
    // Checkout
    // ========================

    pub fn checkout(&mut self) -> Option<NetworkCommand> {
        if self.checkout_pending {
            tracing::debug!("Checkout already in flight");
            return None;
        }
        if self.cart.is_empty() {
            tracing::warn!("Checkout requested with an empty cart");
            return None;
        }

        self.checkout_pending = true;
        self.redirect_url = None;
        Some(NetworkCommand::Checkout {
            id: self.next_id(),
            cart: self.cart.clone(),
            total: self.totals.total,
        })
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    // ========================
    // Network responses
    // ========================

    pub fn handle_response(&mut self, response: NetworkResponse) {
        match response {
            NetworkResponse::ProductsLoaded { products, .. } => {
                self.products = products;
                self.apply_filter();
            }
            NetworkResponse::ProductLoaded { id, product } => {
                if self.pending_detail_id == Some(id) {
                    self.detail_product = Some(product);
                    self.loading = false;
                    self.pending_detail_id = None;
                } else {
                    tracing::debug!(id, "Dropping stale product detail");
                }
            }
            NetworkResponse::CheckoutAccepted { url, .. } => {
                self.checkout_pending = false;
                if let Err(e) = self.storage.remove_cart() {
                    tracing::error!(error = %e, "Failed to remove stored cart");
                }
                self.cart.clear();
                self.totals = CartTotals::default();
                tracing::info!(url = %url, "Checkout accepted, redirecting");
                self.redirect_url = Some(url);
            }
            NetworkResponse::CheckoutRejected { id } => {
                tracing::warn!(id, "Checkout rejected by backend");
                self.checkout_pending = false;
                self.alert = Some(String::from(CHECKOUT_FAILED_ALERT));
            }
            NetworkResponse::Error { id, kind, message } => {
                tracing::error!(id, ?kind, %message, "Request failed");
                match kind {
                    RequestKind::Products => {}
                    RequestKind::Product => {
                        if self.pending_detail_id == Some(id) {
                            self.pending_detail_id = None;
                        }
                    }
                    RequestKind::Checkout => {
                        self.checkout_pending = false;
                        self.alert = Some(String::from(CHECKOUT_FAILED_ALERT));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;
    use crate::storage::Storage;
    use tempfile::{tempdir, TempDir};

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("1", "iPhone 7", 700.0),
            Product::new("2", "Galaxy S8", 650.5),
            Product::new("3", "Google Pixel", 600.0),
        ]
    }

    fn loaded_state() -> (AppState, TempDir) {
        let dir = tempdir().unwrap();
        let mut state = AppState::new(Storage::new(dir.path()));
        state.handle_response(NetworkResponse::ProductsLoaded {
            id: 0,
            products: catalog(),
        });
        (state, dir)
    }

    #[test]
    fn test_products_loaded_fills_filter() {
        let (state, _dir) = loaded_state();
        assert_eq!(state.products.len(), 3);
        assert_eq!(state.filtered_products, state.products);
    }

    #[test]
    fn test_search_filters_by_title() {
        let (mut state, _dir) = loaded_state();
        state.set_search("GALAXY");
        assert_eq!(state.filtered_products.len(), 1);
        assert_eq!(state.filtered_products[0].id, "2");

        // filter follows catalog refreshes
        state.handle_response(NetworkResponse::ProductsLoaded {
            id: 9,
            products: vec![Product::new("4", "Galaxy Note", 900.0)],
        });
        assert_eq!(state.filtered_products.len(), 1);
        assert_eq!(state.filtered_products[0].id, "4");

        state.clear_search();
        assert_eq!(state.search, "");
        assert_eq!(state.filtered_products, state.products);
    }

    #[test]
    fn test_add_appends_duplicates_and_persists() {
        let (mut state, dir) = loaded_state();
        let cmd = state.add_to_cart("1");
        assert!(matches!(cmd, Some(NetworkCommand::FetchProducts { .. })));
        state.add_to_cart("1");
        state.add_to_cart("2");

        assert_eq!(state.cart.len(), 3);
        assert!(state.is_in_cart("1"));
        assert!(!state.is_in_cart("3"));
        assert_eq!(state.totals.subtotal, 2050.5);
        assert_eq!(state.totals.tax, 205.05);
        assert_eq!(state.totals.total, 2050.5);

        assert_eq!(Storage::new(dir.path()).load_cart(), state.cart);
    }

    #[test]
    fn test_add_unknown_product_is_ignored() {
        let (mut state, _dir) = loaded_state();
        assert!(state.add_to_cart("99").is_none());
        assert!(state.cart.is_empty());
    }

    #[test]
    fn test_add_from_detail_view() {
        let dir = tempdir().unwrap();
        let mut state = AppState::new(Storage::new(dir.path()));
        let NetworkCommand::FetchProduct { id, .. } = state.show_detail("5") else {
            panic!("expected FetchProduct");
        };
        state.handle_response(NetworkResponse::ProductLoaded {
            id,
            product: Product::new("5", "Moto G", 199.99),
        });
        assert!(!state.loading);

        assert!(state.add_to_cart("5").is_some());
        assert_eq!(state.cart[0].total, 199.99);
    }

    #[test]
    fn test_remove_drops_all_copies() {
        let (mut state, dir) = loaded_state();
        state.add_to_cart("1");
        state.add_to_cart("2");
        state.add_to_cart("1");

        state.remove_from_cart("1");
        assert_eq!(state.cart.len(), 1);
        assert_eq!(state.cart[0].id(), "2");
        assert_eq!(state.totals.total, 650.5);
        assert_eq!(Storage::new(dir.path()).load_cart().len(), 1);

        state.clear_cart();
        assert!(state.cart.is_empty());
        assert_eq!(state.totals, CartTotals::default());
        assert!(Storage::new(dir.path()).load_cart().is_empty());
    }

    #[test]
    fn test_cart_restored_on_startup() {
        let dir = tempdir().unwrap();
        {
            let mut state = AppState::new(Storage::new(dir.path()));
            state.handle_response(NetworkResponse::ProductsLoaded {
                id: 0,
                products: catalog(),
            });
            state.add_to_cart("3");
        }

        let state = AppState::new(Storage::new(dir.path()));
        assert_eq!(state.cart.len(), 1);
        assert_eq!(state.totals.subtotal, 600.0);
        assert_eq!(state.totals.tax, 60.0);
    }

    #[test]
    fn test_modal() {
        let (mut state, _dir) = loaded_state();
        state.open_modal("2");
        assert!(state.modal_open);
        assert_eq!(state.modal_product.as_ref().map(|p| p.id.as_str()), Some("2"));

        state.close_modal();
        assert!(!state.modal_open);

        state.open_modal("nope");
        assert!(!state.modal_open);
    }

    #[test]
    fn test_stale_detail_is_dropped() {
        let (mut state, _dir) = loaded_state();
        let NetworkCommand::FetchProduct { id, .. } = state.show_detail("1") else {
            panic!("expected FetchProduct");
        };
        state.close_detail();
        state.handle_response(NetworkResponse::ProductLoaded {
            id,
            product: Product::new("1", "iPhone 7", 700.0),
        });
        assert!(state.detail_product.is_none());
        assert!(state.loading);
    }

    #[test]
    fn test_detail_error_keeps_state() {
        let (mut state, _dir) = loaded_state();
        let NetworkCommand::FetchProduct { id, .. } = state.show_detail("1") else {
            panic!("expected FetchProduct");
        };
        state.handle_response(NetworkResponse::Error {
            id,
            kind: RequestKind::Product,
            message: "boom".into(),
        });
        assert!(state.detail_product.is_none());
        assert!(state.loading);
        assert!(state.alert.is_none());
    }

    #[test]
    fn test_products_error_keeps_catalog() {
        let (mut state, _dir) = loaded_state();
        state.handle_response(NetworkResponse::Error {
            id: 4,
            kind: RequestKind::Products,
            message: "connection refused".into(),
        });
        assert_eq!(state.products.len(), 3);
    }

    #[test]
    fn test_checkout_success_clears_cart() {
        let (mut state, dir) = loaded_state();
        state.add_to_cart("1");
        state.add_to_cart("2");

        let Some(NetworkCommand::Checkout { id, cart, total }) = state.checkout() else {
            panic!("expected Checkout");
        };
        assert_eq!(cart.len(), 2);
        assert_eq!(total, 1350.5);
        assert!(state.checkout_pending);
        assert!(state.checkout().is_none());

        state.handle_response(NetworkResponse::CheckoutAccepted {
            id,
            url: "https://pay.example/abc".into(),
        });
        assert_eq!(state.redirect_url.as_deref(), Some("https://pay.example/abc"));
        assert!(state.cart.is_empty());
        assert!(!state.checkout_pending);
        assert_eq!(
            Storage::new(dir.path()).get_item(crate::constants::CART_STORAGE_KEY).unwrap(),
            None
        );
    }

    #[test]
    fn test_checkout_failure_alerts_and_keeps_cart() {
        let (mut state, _dir) = loaded_state();
        state.add_to_cart("1");

        let Some(NetworkCommand::Checkout { id, .. }) = state.checkout() else {
            panic!("expected Checkout");
        };
        state.handle_response(NetworkResponse::CheckoutRejected { id });
        assert_eq!(state.alert.as_deref(), Some(CHECKOUT_FAILED_ALERT));
        assert_eq!(state.cart.len(), 1);
        assert!(state.redirect_url.is_none());

        state.dismiss_alert();
        let Some(NetworkCommand::Checkout { id, .. }) = state.checkout() else {
            panic!("expected Checkout");
        };
        state.handle_response(NetworkResponse::Error {
            id,
            kind: RequestKind::Checkout,
            message: "timeout".into(),
        });
        assert!(state.alert.is_some());
        assert!(!state.checkout_pending);
        assert_eq!(state.cart.len(), 1);
    }

    #[test]
    fn test_cart_frozen_during_checkout() {
        let (mut state, dir) = loaded_state();
        state.add_to_cart("1");
        let Some(NetworkCommand::Checkout { id, .. }) = state.checkout() else {
            panic!("expected Checkout");
        };

        assert!(state.add_to_cart("2").is_none());
        assert!(state.remove_from_cart("1").is_none());
        assert!(state.clear_cart().is_none());
        assert_eq!(state.cart.len(), 1);
        assert_eq!(Storage::new(dir.path()).load_cart().len(), 1);

        state.handle_response(NetworkResponse::CheckoutRejected { id });
        assert!(state.add_to_cart("2").is_some());
        assert_eq!(state.cart.len(), 2);
    }

    #[test]
    fn test_empty_cart_checkout_is_skipped() {
        let (mut state, _dir) = loaded_state();
        assert!(state.checkout().is_none());
        assert!(!state.checkout_pending);
    }
}
