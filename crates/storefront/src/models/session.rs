//! Session-stored visitor state.

use tower_sessions::Session;
use uuid::Uuid;

use supplement_store_core::CartId;

/// Session keys.
pub mod keys {
    /// Key for the visitor's cart ID.
    pub const CART_ID: &str = "cart_id";
}

/// The visitor's cart ID, if they have one.
pub async fn cart_id(session: &Session) -> Option<CartId> {
    session.get::<CartId>(keys::CART_ID).await.ok().flatten()
}

/// The visitor's cart ID, creating and storing a fresh one if needed.
///
/// # Errors
///
/// Returns an error if the session store cannot be written.
pub async fn ensure_cart_id(session: &Session) -> Result<CartId, tower_sessions::session::Error> {
    if let Some(id) = cart_id(session).await {
        return Ok(id);
    }
    let id = CartId::new(Uuid::new_v4().to_string());
    session.insert(keys::CART_ID, &id).await?;
    Ok(id)
}
