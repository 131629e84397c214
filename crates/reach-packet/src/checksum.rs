//! The internet checksum for `ICMP` over IPv4.
//!
//! This code is derived from [`libpnet`] which is available under the Apache 2.0 license.
//!
//! Note that the checksum for `ICMPv6` packets is not calculated here as it
//! requires an IPv6 pseudo-header and is filled in by the kernel for raw
//! `ICMPv6` sockets.
//!
//! [`libpnet`]: https://github.com/libpnet/libpnet

/// Calculate the checksum for an `IPv4` `ICMP` packet.
#[must_use]
pub fn icmp_ipv4_checksum(data: &[u8]) -> u16 {
    if data.is_empty() {
        return 0;
    }
    finalize_checksum(sum_be_words(data, 1))
}

/// Sum all big-endian 16 bit words, skipping the word at `ignore_word`.
fn sum_be_words(data: &[u8], ignore_word: usize) -> u32 {
    let len = data.len();
    let mut cur_data = data;
    let mut sum = 0u32;
    let mut i = 0;
    while cur_data.len() >= 2 {
        if i != ignore_word {
            sum += u32::from(u16::from_be_bytes([cur_data[0], cur_data[1]]));
        }
        cur_data = &cur_data[2..];
        i += 1;
    }
    if i != ignore_word && len & 1 != 0 {
        sum += u32::from(data[len - 1]) << 8;
    }
    sum
}

const fn finalize_checksum(mut sum: u32) -> u16 {
    while sum >> 16 != 0 {
        sum = (sum >> 16) + (sum & 0xFFFF);
    }
    !sum as u16
}
