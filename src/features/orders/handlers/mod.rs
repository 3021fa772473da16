pub mod order_handler;

pub use order_handler::{
    __path_create_order, __path_list_orders, __path_update_order_status, create_order,
    list_orders, update_order_status,
};
