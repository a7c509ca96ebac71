//! Phone Store - actor-based storefront shell
//!
//! Architecture:
//! - Shell - line-oriented commands on stdin, plain text on stdout
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async REST calls

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use phone_store::constants::{APP_NAME, APP_VERSION, LOG_FILE_NAME};
use phone_store::messages::ui_events::parse_command;
use phone_store::{
    ApiClient, AppActor, AppState, NetworkActor, NetworkCommand, NetworkResponse, Product,
    RenderState, Storage, StoreConfig, UiEvent,
};

const HELP: &str = r#"Commands:
  products            Reload and list the catalog
  search <text>       Filter the catalog by title
  clear-search        Show the whole catalog again
  show <id>           Open the product detail view
  back                Leave the detail view
  preview <id>        Open the cart preview for a product
  close               Close the cart preview
  add <id>            Add a product to the cart
  remove <id>         Remove a product (all copies) from the cart
  clear               Empty the cart
  cart                Show the cart and totals
  checkout            Pay for the cart
  help                This text
  quit                Leave"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = StoreConfig::load()?;
    std::fs::create_dir_all(&config.data_dir)?;

    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(&config.data_dir, LOG_FILE_NAME);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    tracing::info!(
        api = %config.api_base_url,
        data_dir = %config.data_dir.display(),
        "Starting"
    );

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(ApiClient::new(&config.api_base_url), net_resp_tx);
    let network = tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let state = AppState::new(Storage::new(config.data_dir.clone()));
    let app_actor = AppActor::new(state, net_cmd_tx, render_tx);
    let app = tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    println!("{} {} - type 'help' for commands", APP_NAME, APP_VERSION);
    run_shell(ui_tx, &mut render_rx).await?;

    let _ = app.await;
    let _ = network.await;
    Ok(())
}

/// Read commands from stdin and print state updates until quit or EOF
async fn run_shell(
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut current = RenderState::default();
    // The view the last command asked for, shown on the next update
    let mut pending_view: Option<UiEvent> = None;
    // Set by `products` until the reloaded catalog arrives
    let mut awaiting_catalog = false;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    let _ = ui_tx.send(UiEvent::Quit);
                    break;
                };
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed.eq_ignore_ascii_case("help") {
                    println!("{}", HELP);
                    continue;
                }
                match parse_command(trimmed) {
                    Some(UiEvent::Quit) => {
                        let _ = ui_tx.send(UiEvent::Quit);
                        break;
                    }
                    Some(event) => {
                        awaiting_catalog |= event == UiEvent::RefreshProducts;
                        pending_view = Some(event.clone());
                        if ui_tx.send(event).is_err() {
                            break;
                        }
                    }
                    None => println!("Unknown command '{}', type 'help'", trimmed),
                }
            }
            Some(next) = render_rx.recv() => {
                print_changes(&current, &next, pending_view.take().as_ref());
                if awaiting_catalog && next.products != current.products {
                    awaiting_catalog = false;
                    print_products(&next);
                }
                current = next;
            }
        }
    }

    Ok(())
}

fn print_changes(prev: &RenderState, next: &RenderState, requested: Option<&UiEvent>) {
    if let Some(alert) = next.alert.as_deref().filter(|_| prev.alert.is_none()) {
        println!("!! {}", alert);
    }
    if let Some(url) = next.redirect_url.as_deref().filter(|_| prev.redirect_url.is_none()) {
        println!("Checkout accepted, continue payment at: {}", url);
    }
    if prev.detail_product.is_none() {
        if let Some(product) = &next.detail_product {
            print_detail(product, next);
        }
    }

    match requested {
        Some(UiEvent::RefreshProducts) => println!("Loading catalog..."),
        Some(UiEvent::Search(_) | UiEvent::ClearSearch) => print_products(next),
        Some(UiEvent::ShowDetail(_)) if next.loading => println!("Loading..."),
        Some(UiEvent::OpenModal(_)) if next.modal_open => {
            if let Some(product) = &next.modal_product {
                println!(
                    "[Cart preview] {} - {}",
                    product.title,
                    format_price(product.price.amount())
                );
            }
        }
        Some(
            UiEvent::AddToCart(_)
            | UiEvent::RemoveFromCart(_)
            | UiEvent::ClearCart
            | UiEvent::UpdateCart,
        ) => print_cart(next),
        Some(UiEvent::Checkout) if next.checkout_pending => println!("Submitting checkout..."),
        _ => {}
    }
}

fn print_products(state: &RenderState) {
    if state.filtered_products.is_empty() {
        println!("No products.");
        return;
    }
    for product in &state.filtered_products {
        let marker = if state.is_in_cart(product.id.as_str()) {
            " (in cart)"
        } else {
            ""
        };
        println!(
            "  {:>4}  {:<32} {:>10}{}",
            product.id,
            product.title,
            format_price(product.price.amount()),
            marker
        );
    }
}

fn print_detail(product: &Product, state: &RenderState) {
    println!("{} (#{})", product.title, product.id);
    println!("  Price: {}", format_price(product.price.amount()));
    for (key, value) in &product.extra {
        println!("  {}: {}", key, value);
    }
    if state.is_in_cart(product.id.as_str()) {
        println!("  Already in cart");
    }
}

fn print_cart(state: &RenderState) {
    if state.cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for item in &state.cart {
        println!(
            "  {:>4}  {:<32} {:>10}",
            item.id(),
            item.product.title,
            format_price(item.total.amount())
        );
    }
    println!("  Subtotal: {}", format_price(state.totals.subtotal));
    println!("  Tax:      {}", format_price(state.totals.tax));
    println!("  Total:    {}", format_price(state.totals.total));
}

fn format_price(amount: f64) -> String {
    format!("${:.2}", amount)
}
