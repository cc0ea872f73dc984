#![no_std]
#![no_main]

use core::mem;

use aya_ebpf::{
    bindings::xdp_action,
    macros::{map, xdp},
    maps::XskMap,
    programs::XdpContext,
};
use xsk_steer_common::{EthHdr, FASTPATH_ETHER_TYPE, XSK_MAP_CAPACITY};

/// queue index -> AF_XDP socket fd. Populated from user space when sockets
/// bind to their queues; this program only does the implicit lookup inside
/// bpf_redirect_map.
#[map(name = "XSKS")]
static XSKS: XskMap = XskMap::with_max_entries(XSK_MAP_CAPACITY, 0);

#[xdp]
pub fn xsk_steer(ctx: XdpContext) -> u32 {
    match try_xsk_steer(&ctx) {
        Ok(ret) => ret,
        // Frame too short for an Ethernet header: leave it to the stack.
        Err(_) => xdp_action::XDP_PASS,
    }
}

#[inline(always)]
fn ptr_at<T>(ctx: &XdpContext, offset: usize) -> Result<*const T, ()> {
    let start = ctx.data();
    let end = ctx.data_end();
    let len = mem::size_of::<T>();

    if start + offset + len > end {
        return Err(());
    }

    Ok((start + offset) as *const T)
}

fn try_xsk_steer(ctx: &XdpContext) -> Result<u32, ()> {
    let eth: *const EthHdr = ptr_at(ctx, 0)?;
    if unsafe { (*eth).ether_type() } != FASTPATH_ETHER_TYPE {
        return Ok(xdp_action::XDP_PASS);
    }

    let queue_id = unsafe { (*ctx.ctx).rx_queue_index };
    // The flags argument is the fallback action: a fast-path frame arriving
    // on a queue with no bound socket goes to the stack, not the floor.
    Ok(match XSKS.redirect(queue_id, xdp_action::XDP_PASS as u64) {
        Ok(action) => action,
        Err(action) => action,
    })
}

#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    unsafe { core::hint::unreachable_unchecked() }
}

#[link_section = "license"]
#[no_mangle]
static LICENSE: [u8; 4] = *b"GPL\0";
