//! The two-phase key read/write exchange.
//!
//! Every read and write starts with the same preamble: query the key's
//! metadata (`ReadKeyInfo`), then reuse the size the controller reported
//! verbatim in the byte-transfer request. The controller rejects transfers
//! whose size does not match its own idea of the key.

use bytes::Bytes;
use smckit_frame::codec::{Command, KeyInfo, TransactionFrame};
use smckit_frame::{decode_float, encode_float, FrameError, KeyName, PAYLOAD_LEN};
use smckit_transport::SmcPort;
use tracing::{debug, trace};

use crate::error::{FanError, Result};

/// A client for one controller port.
///
/// Not safe for concurrent use — one in-flight transaction per port.
pub struct SmcClient<P> {
    port: P,
}

impl<P> SmcClient<P> {
    /// Wrap a port.
    pub fn new(port: P) -> Self {
        Self { port }
    }

    /// Borrow the underlying port.
    pub fn get_ref(&self) -> &P {
        &self.port
    }

    /// Mutably borrow the underlying port.
    pub fn get_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Consume the client and return the port.
    pub fn into_port(self) -> P {
        self.port
    }
}

/// The decoded result of reading one key.
#[derive(Debug, Clone)]
pub struct KeyReading {
    /// The key that was read.
    pub key: KeyName,
    /// Metadata the controller reported for the key.
    pub info: KeyInfo,
    /// Exactly `info.data_size` value bytes.
    pub payload: Bytes,
}

impl KeyReading {
    /// Size in bytes of the key's value.
    pub fn size(&self) -> u32 {
        self.info.data_size
    }

    /// Interpret the value as a float using the key's reported width.
    pub fn as_f32(&self) -> Result<f32> {
        decode_float(&self.payload, self.info.data_size).map_err(FanError::from)
    }
}

impl<P: SmcPort> SmcClient<P> {
    /// One blocking transaction: encode, call, decode.
    fn transact(&mut self, request: &TransactionFrame) -> Result<TransactionFrame> {
        let raw = self.port.call(&request.encode())?;
        let response = TransactionFrame::decode(&raw);
        trace!(
            key = %request.key_name(),
            command = request.command,
            result = response.result,
            "transaction complete"
        );
        Ok(response)
    }

    /// Query a key's size, type and attributes (phase 1 of any exchange).
    pub fn key_info(&mut self, key: KeyName) -> Result<KeyInfo> {
        let response = self.transact(&TransactionFrame::request(key, Command::ReadKeyInfo))?;
        Ok(response.key_info)
    }

    /// Read a key's value bytes.
    pub fn read_key(&mut self, key: KeyName) -> Result<KeyReading> {
        let info = self.key_info(key)?;
        let size = info.data_size as usize;
        if size > PAYLOAD_LEN {
            return Err(FrameError::PayloadTooLarge {
                size,
                max: PAYLOAD_LEN,
            }
            .into());
        }

        let mut request = TransactionFrame::request(key, Command::ReadBytes);
        request.key_info.data_size = info.data_size;
        let response = self.transact(&request)?;

        let payload = Bytes::copy_from_slice(&response.payload[..size]);
        debug!(key = %key, size, "read key");
        Ok(KeyReading { key, info, payload })
    }

    /// Write value bytes to a key.
    ///
    /// Success requires both a successful transport call and a zero result
    /// byte in the response; a non-zero result means the controller
    /// accepted the request but refused the value.
    pub fn write_key(&mut self, key: KeyName, value: &[u8]) -> Result<()> {
        if value.len() > PAYLOAD_LEN {
            return Err(FrameError::PayloadTooLarge {
                size: value.len(),
                max: PAYLOAD_LEN,
            }
            .into());
        }

        let info = self.key_info(key)?;
        let mut request = TransactionFrame::request(key, Command::WriteBytes);
        request.key_info.data_size = info.data_size;
        request.payload[..value.len()].copy_from_slice(value);
        let response = self.transact(&request)?;

        if response.result != 0 {
            return Err(FanError::WriteRejected {
                key,
                code: response.result,
            });
        }
        debug!(key = %key, size = value.len(), "wrote key");
        Ok(())
    }

    /// Read a key and interpret its value as a float.
    pub fn read_float(&mut self, key: KeyName) -> Result<f32> {
        self.read_key(key)?.as_f32()
    }

    /// Encode a float with the key's discovered width and write it.
    pub fn write_float(&mut self, key: KeyName, value: f32) -> Result<()> {
        let info = self.key_info(key)?;
        let bytes = encode_float(value, info.data_size);
        self.write_key(key, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use smckit_transport::{RawKeyData, TransportError};

    use super::*;

    /// Replays a fixed sequence of responses and records every request.
    struct ScriptedPort {
        responses: VecDeque<std::result::Result<RawKeyData, TransportError>>,
        requests: Vec<TransactionFrame>,
    }

    impl ScriptedPort {
        fn new() -> Self {
            Self {
                responses: VecDeque::new(),
                requests: Vec::new(),
            }
        }

        fn push_frame(&mut self, frame: TransactionFrame) {
            self.responses.push_back(Ok(frame.encode()));
        }

        fn push_error(&mut self, err: TransportError) {
            self.responses.push_back(Err(err));
        }
    }

    impl SmcPort for ScriptedPort {
        fn call(&mut self, request: &RawKeyData) -> smckit_transport::Result<RawKeyData> {
            self.requests.push(TransactionFrame::decode(request));
            self.responses
                .pop_front()
                .unwrap_or(Err(TransportError::Closed))
        }
    }

    fn key(name: &str) -> KeyName {
        KeyName::new(name).unwrap()
    }

    fn info_response(name: &str, data_size: u32) -> TransactionFrame {
        let mut frame = TransactionFrame::default();
        frame.key = key(name).code();
        frame.key_info.data_size = data_size;
        frame
    }

    #[test]
    fn read_key_runs_the_two_phase_exchange() {
        let mut port = ScriptedPort::new();
        port.push_frame(info_response("F0Ac", 2));
        let mut bytes_resp = TransactionFrame::default();
        bytes_resp.payload[0] = 0x01;
        bytes_resp.payload[1] = 0x90;
        port.push_frame(bytes_resp);

        let mut client = SmcClient::new(port);
        let reading = client.read_key(key("F0Ac")).unwrap();

        assert_eq!(reading.size(), 2);
        assert_eq!(reading.payload.as_ref(), &[0x01, 0x90]);

        let requests = &client.get_ref().requests;
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].command, Command::ReadKeyInfo.code());
        assert_eq!(requests[0].key, key("F0Ac").code());
        assert_eq!(requests[1].command, Command::ReadBytes.code());
        assert_eq!(requests[1].key, key("F0Ac").code());
        // The discovered size must be echoed verbatim in phase 2.
        assert_eq!(requests[1].key_info.data_size, 2);
        assert_eq!(requests[1].result, 0);
    }

    #[test]
    fn read_copies_exactly_data_size_bytes() {
        let mut port = ScriptedPort::new();
        port.push_frame(info_response("FNum", 1));
        let mut bytes_resp = TransactionFrame::default();
        bytes_resp.payload[0] = 2;
        bytes_resp.payload[1] = 0xff;
        port.push_frame(bytes_resp);

        let mut client = SmcClient::new(port);
        let reading = client.read_key(key("FNum")).unwrap();
        assert_eq!(reading.payload.as_ref(), &[2]);
    }

    #[test]
    fn transport_failure_aborts_before_phase_two() {
        let mut port = ScriptedPort::new();
        port.push_error(TransportError::Call { code: 0x2c2 });

        let mut client = SmcClient::new(port);
        let err = client.read_key(key("F0Ac")).unwrap_err();
        assert!(matches!(err, FanError::Transport(TransportError::Call { code: 0x2c2 })));
        assert_eq!(client.get_ref().requests.len(), 1);
    }

    #[test]
    fn oversized_reported_size_is_an_error_not_a_truncation() {
        let mut port = ScriptedPort::new();
        port.push_frame(info_response("F0Ac", 64));

        let mut client = SmcClient::new(port);
        let err = client.read_key(key("F0Ac")).unwrap_err();
        assert!(matches!(
            err,
            FanError::Frame(FrameError::PayloadTooLarge { size: 64, max: 32 })
        ));
        assert_eq!(client.get_ref().requests.len(), 1);
    }

    #[test]
    fn write_succeeds_on_zero_result() {
        let mut port = ScriptedPort::new();
        port.push_frame(info_response("Ftst", 1));
        port.push_frame(TransactionFrame::default());

        let mut client = SmcClient::new(port);
        client.write_key(key("Ftst"), &[1]).unwrap();

        let requests = &client.get_ref().requests;
        assert_eq!(requests[1].command, Command::WriteBytes.code());
        assert_eq!(requests[1].key_info.data_size, 1);
        assert_eq!(requests[1].payload[0], 1);
    }

    #[test]
    fn write_with_nonzero_result_is_rejected_not_silently_ok() {
        let mut port = ScriptedPort::new();
        port.push_frame(info_response("F0Md", 1));
        let mut refused = TransactionFrame::default();
        refused.result = 1;
        port.push_frame(refused);

        let mut client = SmcClient::new(port);
        let err = client.write_key(key("F0Md"), &[1]).unwrap_err();
        assert!(matches!(err, FanError::WriteRejected { code: 1, .. }));
    }

    #[test]
    fn write_rejects_values_larger_than_the_payload_area() {
        let mut client = SmcClient::new(ScriptedPort::new());
        let err = client.write_key(key("F0Tg"), &[0u8; 33]).unwrap_err();
        assert!(matches!(
            err,
            FanError::Frame(FrameError::PayloadTooLarge { size: 33, max: 32 })
        ));
        assert!(client.get_ref().requests.is_empty());
    }

    #[test]
    fn read_float_uses_the_reported_width() {
        let mut port = ScriptedPort::new();
        port.push_frame(info_response("F0Ac", 2));
        let mut bytes_resp = TransactionFrame::default();
        bytes_resp.payload[0] = 0x24;
        bytes_resp.payload[1] = 0x34;
        port.push_frame(bytes_resp);

        let mut client = SmcClient::new(port);
        assert_eq!(client.read_float(key("F0Ac")).unwrap(), 2317.0);
    }

    #[test]
    fn write_float_encodes_with_the_discovered_width() {
        let mut port = ScriptedPort::new();
        // write_float queries the width, then write_key re-runs the
        // preamble itself: info, info, write.
        port.push_frame(info_response("F0Tg", 4));
        port.push_frame(info_response("F0Tg", 4));
        port.push_frame(TransactionFrame::default());

        let mut client = SmcClient::new(port);
        client.write_float(key("F0Tg"), 2317.0).unwrap();

        let requests = &client.get_ref().requests;
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[2].payload[..4], 2317.0f32.to_ne_bytes());
    }

    #[test]
    fn port_accessors() {
        let mut client = SmcClient::new(ScriptedPort::new());
        let _ = client.get_ref();
        let _ = client.get_mut();
        let _port = client.into_port();
    }
}
