//! Domain types and the ports the payment flow depends on.

pub mod amount;
pub mod notification;
pub mod payment;
pub mod ports;
pub mod profile;
