#![no_std]

//! Types and constants shared between the XDP program and user space.
//!
//! The kernel side reads frame headers through verifier-checked raw pointers;
//! user space gets a byte-slice mirror of the same decision so the steering
//! logic can be exercised on the host without a kernel.

use core::mem;

/// EtherType that marks a frame for the AF_XDP fast path.
///
/// 5401 (0x1519) is an application-defined discriminator, not an IANA
/// EtherType. Peers write it into frames they want steered; everything else
/// stays on the normal stack path.
pub const FASTPATH_ETHER_TYPE: u16 = 5401;

/// Capacity of the queue-index -> AF_XDP socket map.
///
/// Keys are receive queue indices, so this bounds the number of hardware
/// queues the fast path can fan out to.
pub const XSK_MAP_CAPACITY: u32 = 64;

/// Ethernet header as it sits at the start of every frame.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct EthHdr {
    pub dst_addr: [u8; 6],
    pub src_addr: [u8; 6],
    /// Big-endian on the wire; convert with [`EthHdr::ether_type`].
    pub ether_type: u16,
}

impl EthHdr {
    pub const LEN: usize = mem::size_of::<EthHdr>();

    /// EtherType in host byte order.
    #[inline(always)]
    pub fn ether_type(&self) -> u16 {
        u16::from_be(self.ether_type)
    }
}

/// What the classifier decided about a frame, before the socket table is
/// consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameVerdict {
    /// Leave the frame to the normal network stack.
    PassToStack,
    /// The frame carries [`FASTPATH_ETHER_TYPE`]; redirect it toward the
    /// socket bound to its arrival queue.
    RedirectFastPath,
}

/// Final outcome once the arrival queue has been resolved against the
/// socket table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteerOutcome {
    PassToStack,
    /// Frame is consumed by the AF_XDP socket with this handle.
    Redirect(u32),
}

/// User-space mirror of the in-kernel classification.
///
/// Frames too short to hold an Ethernet header are passed to the stack
/// without reading any field; this is indistinguishable from an EtherType
/// mismatch by design. The kernel program performs the same checks through
/// `XdpContext` bounds-checked pointers.
#[inline]
pub fn classify(frame: &[u8]) -> FrameVerdict {
    if frame.len() < EthHdr::LEN {
        return FrameVerdict::PassToStack;
    }
    let ether_type = u16::from_be_bytes([frame[12], frame[13]]);
    if ether_type == FASTPATH_ETHER_TYPE {
        FrameVerdict::RedirectFastPath
    } else {
        FrameVerdict::PassToStack
    }
}

/// User-space mirror of the full steering decision.
///
/// `queue_socket` is the socket table entry for the frame's arrival queue,
/// if any. Mirrors the `bpf_redirect_map` contract the kernel program relies
/// on: a fast-path frame on a queue with no bound socket falls back to the
/// stack instead of being dropped.
#[inline]
pub fn steer(frame: &[u8], queue_socket: Option<u32>) -> SteerOutcome {
    match classify(frame) {
        FrameVerdict::PassToStack => SteerOutcome::PassToStack,
        FrameVerdict::RedirectFastPath => match queue_socket {
            Some(socket) => SteerOutcome::Redirect(socket),
            None => SteerOutcome::PassToStack,
        },
    }
}
