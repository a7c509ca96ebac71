//! UI events - messages from the shell to App layer

/// Events generated from user input
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Catalog
    RefreshProducts,
    Search(String),
    ClearSearch,

    // Detail view
    ShowDetail(String),
    CloseDetail,

    // Cart preview modal
    OpenModal(String),
    CloseModal,

    // Cart
    AddToCart(String),
    RemoveFromCart(String),
    ClearCart,
    UpdateCart,
    Checkout,

    DismissAlert,

    // System
    Quit,
}

/// Map a line of shell input to an event.
///
/// Returns `None` for blank lines, unknown commands, and commands missing
/// their argument.
pub fn parse_command(line: &str) -> Option<UiEvent> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let arg = || (!rest.is_empty()).then(|| rest.to_string());

    match command.to_lowercase().as_str() {
        "products" | "ls" => Some(UiEvent::RefreshProducts),
        // An empty search shows everything, same as clear-search
        "search" | "/" => Some(UiEvent::Search(rest.to_string())),
        "clear-search" => Some(UiEvent::ClearSearch),
        "show" | "detail" => arg().map(UiEvent::ShowDetail),
        "back" => Some(UiEvent::CloseDetail),
        "preview" => arg().map(UiEvent::OpenModal),
        "close" => Some(UiEvent::CloseModal),
        "add" => arg().map(UiEvent::AddToCart),
        "remove" | "rm" => arg().map(UiEvent::RemoveFromCart),
        "clear" => Some(UiEvent::ClearCart),
        "cart" => Some(UiEvent::UpdateCart),
        "checkout" | "pay" => Some(UiEvent::Checkout),
        "ok" => Some(UiEvent::DismissAlert),
        "quit" | "exit" | "q" => Some(UiEvent::Quit),
        _ => None,
    }
}
