use derive_more::{Add, AddAssign};

/// `Sequence` number newtype.
///
/// Sequence numbers are 1-based, the first probe of a run carries sequence 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Add, AddAssign)]
pub struct Sequence(pub u16);

/// `PingId` newtype.
///
/// The identifier carried in each echo request, used to discriminate replies
/// destined for other processes sharing the raw socket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd)]
pub struct PingId(pub u16);

impl From<Sequence> for usize {
    fn from(sequence: Sequence) -> Self {
        sequence.0 as Self
    }
}
