//! Application layer: the payment flow controller and its helpers.
//!
//! `PaymentFlowController` owns one page session's state and orchestrates the
//! wallet, search and notification collaborators it is constructed with.

pub mod controller;
pub mod debounce;
pub mod session;
