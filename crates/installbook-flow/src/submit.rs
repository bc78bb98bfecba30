//! Sequential cart submission.

use std::time::Duration;

use installbook_client::{CartClient, CartRequest, ClientError};
use thiserror::Error;

/// A cart submission that stopped part-way.
///
/// Line items already added stay in the cart; nothing is rolled back.
#[derive(Debug, Error)]
#[error(
    "cart submission failed at product {failed_product_id} after {count} added",
    count = .added.len()
)]
pub struct SubmissionError {
    /// Product ids added before the failure, in submission order.
    pub added: Vec<String>,
    pub failed_product_id: String,
    #[source]
    pub source: ClientError,
}

/// Adds each request to the cart in order, pausing `delay` between requests.
///
/// Stops at the first failure.
///
/// # Errors
///
/// Returns [`SubmissionError`] naming the failed product and the products
/// already added.
pub async fn submit_sequentially(
    cart: &CartClient,
    requests: &[CartRequest],
    delay: Duration,
) -> Result<Vec<String>, SubmissionError> {
    let mut added = Vec::with_capacity(requests.len());

    for (i, request) in requests.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Err(source) = cart.add(request).await {
            tracing::error!(
                product_id = %request.product_id,
                added = added.len(),
                remaining = requests.len() - i,
                error = %source,
                "cart submission stopped"
            );
            return Err(SubmissionError {
                added,
                failed_product_id: request.product_id.clone(),
                source,
            });
        }
        added.push(request.product_id.clone());
    }

    Ok(added)
}
