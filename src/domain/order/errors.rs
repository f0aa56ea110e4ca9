use uuid::Uuid;

// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Order is already cancelled")]
    AlreadyCancelled,

    #[error("Invalid item quantity: {0}")]
    InvalidQuantity(i32),

    #[error("Product not on order: {0}")]
    UnknownProduct(Uuid),
}
