//! The outbound half of the host contract.
//!
//! One [`ServiceCall`] per commit, carrying the mapped, quantized, clamped
//! value. Parameter names are whatever the host integration expects; the
//! widgets here use the common ones. Delivery failure is the host's to
//! surface — there is no queue and no retry, the next authoritative push is
//! the only feedback.

use core::fmt;

use heapless::{String, Vec};
use log::{debug, warn};

use crate::entity::{AttrValue, ENTITY_ID_MAX};

pub const CALL_ARGS_MAX: usize = 4;

#[derive(Clone, Debug, PartialEq)]
pub struct ServiceCall {
    pub domain: &'static str,
    pub action: &'static str,
    pub entity_id: String<ENTITY_ID_MAX>,
    pub args: Vec<(&'static str, AttrValue), CALL_ARGS_MAX>,
}

impl ServiceCall {
    pub fn new(domain: &'static str, action: &'static str, entity_id: &str) -> Self {
        let mut id = String::new();
        for ch in entity_id.chars() {
            if id.push(ch).is_err() {
                break;
            }
        }
        Self {
            domain,
            action,
            entity_id: id,
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, key: &'static str, value: AttrValue) -> Self {
        if self.args.push((key, value)).is_err() {
            debug!("service call arg list full, '{key}' dropped");
        }
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostError {
    /// The host connection is gone; nothing was delivered.
    Unreachable,
    /// The host refused the call (unknown service, bad entity).
    Rejected,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable => f.write_str("host unreachable"),
            Self::Rejected => f.write_str("call rejected by host"),
        }
    }
}

/// Implemented by the host; the only way anything leaves this crate.
pub trait HostLink {
    fn invoke(&mut self, call: &ServiceCall) -> Result<(), HostError>;
}

/// Forward a widget reaction's calls to the host. Failures are logged and
/// dropped on the floor by design: the authoritative push stream is the
/// feedback channel, not a delivery receipt.
pub fn dispatch(link: &mut impl HostLink, calls: &[ServiceCall]) {
    for call in calls {
        if let Err(err) = link.invoke(call) {
            warn!(
                "service call {}.{} for {} failed: {}",
                call.domain, call.action, call.entity_id, err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingLink {
        calls: std::vec::Vec<ServiceCall>,
        fail: bool,
    }

    impl HostLink for RecordingLink {
        fn invoke(&mut self, call: &ServiceCall) -> Result<(), HostError> {
            if self.fail {
                return Err(HostError::Unreachable);
            }
            self.calls.push(call.clone());
            Ok(())
        }
    }

    #[test]
    fn dispatch_forwards_each_call_once() {
        let mut link = RecordingLink::default();
        let calls = [
            ServiceCall::new("cover", "set_cover_position", "cover.kitchen")
                .arg("position", AttrValue::Num(80.0)),
            ServiceCall::new("cover", "stop_cover", "cover.kitchen"),
        ];
        dispatch(&mut link, &calls);
        assert_eq!(link.calls.len(), 2);
        assert_eq!(link.calls[0].args[0], ("position", AttrValue::Num(80.0)));
    }

    #[test]
    fn dispatch_swallows_failures_without_retry() {
        let mut link = RecordingLink {
            fail: true,
            ..Default::default()
        };
        let calls = [ServiceCall::new("light", "toggle", "light.desk")];
        dispatch(&mut link, &calls);
        assert!(link.calls.is_empty());
    }

    #[test]
    fn overflowing_args_are_dropped_not_panicked() {
        let call = ServiceCall::new("light", "turn_on", "light.desk")
            .arg("a", AttrValue::Int(1))
            .arg("b", AttrValue::Int(2))
            .arg("c", AttrValue::Int(3))
            .arg("d", AttrValue::Int(4))
            .arg("e", AttrValue::Int(5));
        assert_eq!(call.args.len(), CALL_ARGS_MAX);
    }
}
