#![allow(dead_code)]

use handlepay::application::controller::PaymentFlowController;
use handlepay::config::{Config, Environment};
use handlepay::domain::amount::NativeAmount;
use handlepay::domain::ports::{ProfileSearch, Wallet};
use handlepay::domain::profile::{Address, Profile};
use handlepay::infrastructure::in_memory::RecordingNotifier;

pub const PRODUCTION_CHAIN: u64 = 137;

pub fn address(tag: &str) -> Address {
    format!("0x{:0>40}", tag).parse().unwrap()
}

pub fn tokens(text: &str) -> NativeAmount {
    NativeAmount::parse_units(text, 18).unwrap()
}

pub fn profile(handle: &str, owner: &str) -> Profile {
    Profile {
        id: format!("0x{owner}"),
        name: None,
        handle: handle.to_string(),
        owned_by: address(owner),
        picture: None,
    }
}

pub struct Harness {
    pub controller: PaymentFlowController,
    pub notifier: RecordingNotifier,
}

/// Wires a production-configured controller around the given fakes.
pub fn harness(
    wallet: impl Wallet + 'static,
    search: impl ProfileSearch + 'static,
) -> Harness {
    let notifier = RecordingNotifier::new();
    let controller = PaymentFlowController::new(
        Config::for_environment(Environment::Production),
        Box::new(wallet),
        Box::new(search),
        Box::new(notifier.clone()),
    );
    Harness {
        controller,
        notifier,
    }
}
