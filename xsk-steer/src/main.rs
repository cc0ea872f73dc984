use std::path::PathBuf;

use anyhow::Context;
use aya::programs::{Xdp, XdpFlags};
use aya_log::EbpfLogger;
use clap::Parser;
use log::{info, warn};
use tokio::signal;
use xsk_steer_common::{FASTPATH_ETHER_TYPE, XSK_MAP_CAPACITY};

#[derive(Debug, Parser)]
struct Opt {
    /// Interface to attach the steering program to.
    #[clap(short, long, default_value = "eth0")]
    iface: String,
    /// Path to the built eBPF object (cargo xtask build-ebpf).
    #[clap(
        long,
        default_value = "target/bpfel-unknown-none/release/xsk-steer"
    )]
    prog: PathBuf,
    /// Attach in generic (SKB) mode instead of driver mode.
    #[clap(long)]
    skb_mode: bool,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let opt = Opt::parse();

    env_logger::init();

    let mut bpf = aya::Ebpf::load_file(&opt.prog)
        .with_context(|| format!("failed to load eBPF object {}", opt.prog.display()))?;
    if let Err(e) = EbpfLogger::init(&mut bpf) {
        // The steering program logs nothing on the hot path, so this is expected.
        warn!("failed to initialize eBPF logger: {}", e);
    }

    // The AF_XDP application populates this map when it binds sockets to
    // queues; we only verify the object carries it.
    bpf.map("XSKS")
        .context("eBPF object has no XSKS socket map")?;

    let program: &mut Xdp = bpf
        .program_mut("xsk_steer")
        .context("eBPF object has no xsk_steer program")?
        .try_into()?;
    program.load()?;
    let flags = if opt.skb_mode {
        XdpFlags::SKB_MODE
    } else {
        XdpFlags::default()
    };
    program.attach(&opt.iface, flags).context(
        "failed to attach the XDP program; driver may lack native XDP support, try --skb-mode",
    )?;

    info!(
        "steering EtherType {:#06x} frames on {} into AF_XDP sockets ({} queues max)",
        FASTPATH_ETHER_TYPE, opt.iface, XSK_MAP_CAPACITY
    );
    info!("Waiting for Ctrl-C...");
    signal::ctrl_c().await?;
    info!("Exiting...");

    Ok(())
}
