pub mod notification;
pub mod sample;
pub mod verification;
