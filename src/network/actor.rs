//! Network actor - runs API calls in the Tokio async runtime

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::{
    execute_checkout, execute_fetch_product, execute_fetch_products, ApiClient,
};

/// Network actor that executes API commands concurrently
pub struct NetworkActor {
    api: ApiClient,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(api: ApiClient, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            api,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                // Handle incoming commands
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::FetchProducts { id }) => {
                            let response_tx = self.response_tx.clone();
                            let api = self.api.clone();

                            self.active_requests.spawn(async move {
                                tracing::info!(id, "Fetching products");
                                let result = execute_fetch_products(&api, id).await;
                                log_completed(&result);
                                let _ = response_tx.send(result);
                            });
                        }

                        Some(NetworkCommand::FetchProduct { id, product_id }) => {
                            let response_tx = self.response_tx.clone();
                            let api = self.api.clone();

                            self.active_requests.spawn(async move {
                                tracing::info!(id, product_id = %product_id, "Fetching product");
                                let result = execute_fetch_product(&api, id, &product_id).await;
                                log_completed(&result);
                                let _ = response_tx.send(result);
                            });
                        }

                        Some(NetworkCommand::Checkout { id, cart, total }) => {
                            let response_tx = self.response_tx.clone();
                            let api = self.api.clone();

                            self.active_requests.spawn(async move {
                                let result = execute_checkout(&api, id, &cart, total).await;
                                log_completed(&result);
                                let _ = response_tx.send(result);
                            });
                        }

                        Some(NetworkCommand::Shutdown) => {
                            self.active_requests.abort_all();
                            break;
                        }

                        None => break,
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {
                    // Task completed - results were already sent by the task
                }
            }
        }
    }
}

fn log_completed(result: &NetworkResponse) {
    tracing::info!(id = result.id(), kind = ?result.kind(), "Request completed");
}
