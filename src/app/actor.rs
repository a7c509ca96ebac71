//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Startup pass: re-persist the restored cart and load the catalog
        let startup = self.state.commit_cart();
        self.send(startup);
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn send(&self, cmd: NetworkCommand) {
        if self.network_tx.send(cmd).is_err() {
            tracing::warn!("Network actor is gone, dropping command");
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        // The alert blocks until the next interaction acknowledges it
        self.state.dismiss_alert();

        match event {
            // Catalog
            UiEvent::RefreshProducts => {
                let cmd = self.state.refresh_products();
                self.send(cmd);
            }
            UiEvent::Search(text) => self.state.set_search(text),
            UiEvent::ClearSearch => self.state.clear_search(),

            // Detail view
            UiEvent::ShowDetail(product_id) => {
                let cmd = self.state.show_detail(product_id);
                self.send(cmd);
            }
            UiEvent::CloseDetail => self.state.close_detail(),

            // Modal
            UiEvent::OpenModal(product_id) => self.state.open_modal(&product_id),
            UiEvent::CloseModal => self.state.close_modal(),

            // Cart
            UiEvent::AddToCart(product_id) => {
                if let Some(cmd) = self.state.add_to_cart(&product_id) {
                    self.send(cmd);
                }
            }
            UiEvent::RemoveFromCart(product_id) => {
                if let Some(cmd) = self.state.remove_from_cart(&product_id) {
                    self.send(cmd);
                }
            }
            UiEvent::ClearCart => {
                if let Some(cmd) = self.state.clear_cart() {
                    self.send(cmd);
                }
            }
            UiEvent::UpdateCart => {
                let cmd = self.state.update_cart();
                self.send(cmd);
            }
            UiEvent::Checkout => {
                if let Some(cmd) = self.state.checkout() {
                    self.send(cmd);
                }
            }

            UiEvent::DismissAlert => {}

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;
    use crate::storage::Storage;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_actor_round_trip() {
        let dir = tempdir().unwrap();
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (net_cmd_tx, mut net_cmd_rx) = mpsc::unbounded_channel();
        let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();

        let actor = AppActor::new(AppState::new(Storage::new(dir.path())), net_cmd_tx, render_tx);
        let handle = tokio::spawn(actor.run(ui_rx, net_resp_rx));

        // Startup loads the catalog
        let Some(NetworkCommand::FetchProducts { id }) = net_cmd_rx.recv().await else {
            panic!("expected initial FetchProducts");
        };
        render_rx.recv().await.unwrap();

        net_resp_tx
            .send(NetworkResponse::ProductsLoaded {
                id,
                products: vec![Product::new("1", "Nokia 3310", 50.0)],
            })
            .unwrap();
        let render = render_rx.recv().await.unwrap();
        assert_eq!(render.filtered_products.len(), 1);

        ui_tx.send(UiEvent::AddToCart("1".into())).unwrap();
        let render = render_rx.recv().await.unwrap();
        assert!(render.is_in_cart("1"));
        assert_eq!(render.totals.tax, 5.0);
        assert!(matches!(
            net_cmd_rx.recv().await,
            Some(NetworkCommand::FetchProducts { .. })
        ));

        ui_tx.send(UiEvent::Quit).unwrap();
        assert!(matches!(net_cmd_rx.recv().await, Some(NetworkCommand::Shutdown)));
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_next_event_dismisses_alert() {
        let dir = tempdir().unwrap();
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (net_cmd_tx, _net_cmd_rx) = mpsc::unbounded_channel();
        let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();

        let actor = AppActor::new(AppState::new(Storage::new(dir.path())), net_cmd_tx, render_tx);
        tokio::spawn(actor.run(ui_rx, net_resp_rx));
        render_rx.recv().await.unwrap();

        net_resp_tx
            .send(NetworkResponse::CheckoutRejected { id: 1 })
            .unwrap();
        assert!(render_rx.recv().await.unwrap().alert.is_some());

        ui_tx.send(UiEvent::DismissAlert).unwrap();
        assert!(render_rx.recv().await.unwrap().alert.is_none());
    }
}
