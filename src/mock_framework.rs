//! # Mock Framework
//!
//! Utilities for testing code that drives a [`CatalogClient`] without a running
//! catalog actor.
//!
//! Use [`create_mock_client`] to get a client and the receiver its requests
//! land on, then the `expect_*` helpers to assert each request and script the
//! reply.

use crate::catalog_actor::CatalogView;
use crate::clients::CatalogClient;
use crate::domain::{CartLine, ProductId};
use crate::messages::{CatalogRequest, Response};
use tokio::sync::mpsc;

/// Creates a client whose requests arrive on the returned receiver.
pub fn create_mock_client(buffer_size: usize) -> (CatalogClient, mpsc::Receiver<CatalogRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CatalogClient::new(sender), receiver)
}

/// Helper to verify that the next message is a View request
pub async fn expect_view(receiver: &mut mpsc::Receiver<CatalogRequest>) -> Option<Response<CatalogView>> {
    match receiver.recv().await {
        Some(CatalogRequest::View { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is an AddToCart request
pub async fn expect_add_to_cart(
    receiver: &mut mpsc::Receiver<CatalogRequest>,
) -> Option<(ProductId, Response<CartLine>)> {
    match receiver.recv().await {
        Some(CatalogRequest::AddToCart { product_id, respond_to }) => Some((product_id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a ToggleFavorite request
pub async fn expect_toggle_favorite(
    receiver: &mut mpsc::Receiver<CatalogRequest>,
) -> Option<(ProductId, Response<bool>)> {
    match receiver.recv().await {
        Some(CatalogRequest::ToggleFavorite { product_id, respond_to }) => Some((product_id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a GoToPage request
pub async fn expect_go_to_page(
    receiver: &mut mpsc::Receiver<CatalogRequest>,
) -> Option<(usize, Response<usize>)> {
    match receiver.recv().await {
        Some(CatalogRequest::GoToPage { page, respond_to }) => Some((page, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client(10);

        let add_task = tokio::spawn(async move { client.add_to_cart(ProductId(3)).await });

        let (product_id, responder) = expect_add_to_cart(&mut receiver).await.expect("Expected AddToCart request");
        assert_eq!(product_id, ProductId(3));
        responder.send(Ok(CartLine { product_id, quantity: 1 })).unwrap();

        let result = add_task.await.unwrap();
        assert_eq!(result, Ok(CartLine { product_id: ProductId(3), quantity: 1 }));
    }

    #[tokio::test]
    async fn test_dropped_responder_is_a_communication_error() {
        let (client, mut receiver) = create_mock_client(10);

        let toggle_task = tokio::spawn(async move { client.toggle_favorite(ProductId(1)).await });
        let (_, responder) = expect_toggle_favorite(&mut receiver).await.expect("Expected ToggleFavorite request");
        drop(responder);

        let result = toggle_task.await.unwrap();
        assert!(matches!(result, Err(CatalogError::ActorCommunication(_))));
    }

    #[tokio::test]
    async fn test_closed_actor_is_a_communication_error() {
        let (client, receiver) = create_mock_client(10);
        drop(receiver);

        let result = client.view().await;
        assert_eq!(result, Err(CatalogError::ActorCommunication("Actor closed".to_string())));
    }
}
