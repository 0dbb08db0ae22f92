pub mod cart_router;
pub mod inventory_router;
pub mod order_router;
pub mod product_router;
pub mod purchase_router;
pub mod user_router;
