use std::collections::HashMap;

use xsk_steer_common::{
    classify, steer, EthHdr, FrameVerdict, SteerOutcome, FASTPATH_ETHER_TYPE,
};

fn frame_with_ether_type(ether_type: u16) -> Vec<u8> {
    let mut frame = vec![0u8; 60];
    frame[..6].copy_from_slice(&[0x02, 0, 0, 0, 0, 0x01]);
    frame[6..12].copy_from_slice(&[0x02, 0, 0, 0, 0, 0x02]);
    frame[12..14].copy_from_slice(&ether_type.to_be_bytes());
    frame
}

#[test]
fn eth_header_layout_matches_the_wire() {
    assert_eq!(EthHdr::LEN, 14);
    assert_eq!(core::mem::offset_of!(EthHdr, ether_type), 12);

    let bytes = frame_with_ether_type(0x1519);
    let hdr = unsafe { &*(bytes.as_ptr() as *const EthHdr) };
    assert_eq!(hdr.ether_type(), 5401);
    assert_eq!(hdr.dst_addr, [0x02, 0, 0, 0, 0, 0x01]);
}

#[test]
fn short_frames_pass_to_stack_regardless_of_contents() {
    for len in 0..EthHdr::LEN {
        // All-0xff bytes would decode to a huge EtherType if anything
        // read past the bounds check.
        let frame = vec![0xff; len];
        assert_eq!(classify(&frame), FrameVerdict::PassToStack, "len {len}");
    }
}

#[test]
fn foreign_ether_types_pass_to_stack() {
    for ether_type in [0x0000, 0x0800, 0x86dd, 0x1518, 0x151a, 0xffff] {
        let frame = frame_with_ether_type(ether_type);
        assert_eq!(classify(&frame), FrameVerdict::PassToStack);
    }
}

#[test]
fn fastpath_ether_type_is_selected() {
    assert_eq!(FASTPATH_ETHER_TYPE, 5401);
    let frame = frame_with_ether_type(FASTPATH_ETHER_TYPE);
    assert_eq!(classify(&frame), FrameVerdict::RedirectFastPath);

    // A header-only frame (no payload) is still long enough.
    let frame = frame_with_ether_type(FASTPATH_ETHER_TYPE);
    assert_eq!(classify(&frame[..EthHdr::LEN]), FrameVerdict::RedirectFastPath);
}

#[test]
fn classification_reads_only_never_modify_the_frame() {
    let frame = frame_with_ether_type(0x0800);
    let before = frame.clone();
    let _ = classify(&frame);
    assert_eq!(frame, before);
}

#[test]
fn classification_is_stateless() {
    let frame = frame_with_ether_type(FASTPATH_ETHER_TYPE);
    assert_eq!(classify(&frame), classify(&frame));

    let table: HashMap<u32, u32> = HashMap::from([(2, 7)]);
    assert_eq!(
        steer(&frame, table.get(&2).copied()),
        steer(&frame, table.get(&2).copied()),
    );
}

#[test]
fn mapped_queue_redirects_unmapped_queue_falls_back() {
    let table: HashMap<u32, u32> = HashMap::from([(2, 0x2a)]);
    let frame = frame_with_ether_type(FASTPATH_ETHER_TYPE);

    assert_eq!(
        steer(&frame, table.get(&2).copied()),
        SteerOutcome::Redirect(0x2a)
    );
    // Queue 7 has no bound socket: degrade to the stack, never drop.
    assert_eq!(
        steer(&frame, table.get(&7).copied()),
        SteerOutcome::PassToStack
    );
}

#[test]
fn short_frame_passes_even_on_a_mapped_queue() {
    let table: HashMap<u32, u32> = HashMap::from([(2, 0x2a)]);
    let frame = vec![0u8; 10];
    assert_eq!(
        steer(&frame, table.get(&2).copied()),
        SteerOutcome::PassToStack
    );
}

#[test]
fn non_fastpath_frame_ignores_the_table() {
    let table: HashMap<u32, u32> = HashMap::from([(0, 1)]);
    let frame = frame_with_ether_type(0x0800);
    assert_eq!(
        steer(&frame, table.get(&0).copied()),
        SteerOutcome::PassToStack
    );
}
