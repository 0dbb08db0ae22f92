pub mod cart_handler;
pub mod inventory_handler;
pub mod order_handler;
pub mod product_handler;
pub mod purchase_handler;
pub mod user_handler;

use bson::oid::ObjectId;
use validator::Validate;

use crate::util::error::HandlerError;

pub fn parse_object_id(raw: &str) -> Result<ObjectId, HandlerError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| HandlerError::invalid_id(raw))
}

pub fn validate<T: Validate>(payload: &T) -> Result<(), HandlerError> {
    payload.validate().map_err(HandlerError::validation)
}
