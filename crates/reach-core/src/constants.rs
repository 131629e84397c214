/// The port used for `TCP` connect probes.
pub const TCP_PROBE_PORT: u16 = 80;

/// The size of the send timestamp carried in each echo request payload.
pub const TIMESTAMP_SIZE: usize = 8;

/// The maximum allowed echo request payload size.
///
/// The payload together with the 8 byte `ICMP` header must fit within the
/// maximum packet size.
pub const MAX_PAYLOAD_SIZE: usize = 1016;
