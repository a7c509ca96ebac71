//! Application constants
//!
//! Centralized location for endpoint paths, storage keys and defaults.

/// Default base URL of the product API
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Directory (under the home directory) holding persisted state and logs
pub const DATA_DIR_NAME: &str = ".phone-store";

/// Log file written inside the data directory
pub const LOG_FILE_NAME: &str = "phone-store.log";

/// Optional YAML config file inside the data directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Local storage key the cart is persisted under
pub const CART_STORAGE_KEY: &str = "cart";

pub const PRODUCTS_PATH: &str = "/api/products/read_all.php";
pub const PRODUCT_PATH: &str = "/api/products/read_single.php/";
pub const CHECKOUT_PATH: &str = "/api/check-cart/index.php";

/// Tax rate applied to the subtotal (display only)
pub const TAX_RATE: f64 = 0.1;

/// Prefix of the checkout reference sent to the payment backend
pub const DEBT_ID_PREFIX: &str = "debt";

/// Alert raised when checkout does not yield a redirect
pub const CHECKOUT_FAILED_ALERT: &str = "Unexpected error happened, please try again later.";

/// Application name
pub const APP_NAME: &str = "Phone Store";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
