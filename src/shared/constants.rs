/// Quantity applied when an add-to-cart request omits one.
pub const DEFAULT_CART_QUANTITY: i32 = 1;

/// Prefix expected on the Authorization header.
pub const BEARER_PREFIX: &str = "Bearer ";
