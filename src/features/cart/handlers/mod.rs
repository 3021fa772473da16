pub mod cart_handler;

pub use cart_handler::{
    __path_add_to_cart, __path_clear_cart, __path_list_cart, __path_remove_cart_item,
    __path_update_cart_item, add_to_cart, clear_cart, list_cart, remove_cart_item,
    update_cart_item,
};
