pub mod date;
pub mod email;
pub mod error;
pub mod jwt;
pub mod logger;
pub mod otp;
pub mod password;
