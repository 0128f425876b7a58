use crate::error::Result;

/// Size of the raw key-data record exchanged with the controller, in bytes.
///
/// The kernel driver reads the record as an in-memory C struct and this is
/// its `sizeof`. Calls with any other size are rejected by the driver.
pub const KEY_DATA_LEN: usize = 80;

/// One raw key-data record, exactly as it crosses the kernel boundary.
pub type RawKeyData = [u8; KEY_DATA_LEN];

/// Selector identifying the controller's key/value operation class.
///
/// Implementations pass this as the method selector of the structured
/// device call (`IOConnectCallStructMethod` on macOS). The operation
/// itself is chosen by the command byte inside the record.
pub const SMC_KERNEL_INDEX: u32 = 2;

/// A connected management-controller port.
///
/// Implementations perform exactly one blocking structured call per
/// [`call`](SmcPort::call) invocation: the request record goes down, a
/// response record of the same size comes back. A port is not safe for
/// concurrent use; only one transaction may be in flight per port, and
/// callers needing shared access must serialize around it.
///
/// A transport-level `Ok` only means the kernel accepted and completed the
/// call. The controller reports its own failures through a result byte
/// inside the response record, which the layers above decode — this trait
/// never inspects record contents.
pub trait SmcPort {
    /// Issue one blocking call and return the response record.
    fn call(&mut self, request: &RawKeyData) -> Result<RawKeyData>;
}

impl<P: SmcPort + ?Sized> SmcPort for &mut P {
    fn call(&mut self, request: &RawKeyData) -> Result<RawKeyData> {
        (**self).call(request)
    }
}

impl<P: SmcPort + ?Sized> SmcPort for Box<P> {
    fn call(&mut self, request: &RawKeyData) -> Result<RawKeyData> {
        (**self).call(request)
    }
}
