//! Requester address port

/// Resolves the network address of the device making a request
pub trait AddressSource {
    /// The requester's address, or `None` when it cannot be determined
    fn requester_address(&self) -> Option<String>;
}
