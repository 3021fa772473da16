mod cart_service;

pub use cart_service::CartService;
