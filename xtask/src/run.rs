use std::{os::unix::process::CommandExt, process::Command};

use anyhow::Context;
use clap::Parser;

use crate::build_ebpf::{build_ebpf, Architecture, Options as BuildOptions};

#[derive(Debug, Parser)]
pub struct Options {
    /// Set the endianness of the BPF target
    #[clap(default_value = "bpfel-unknown-none", long)]
    pub bpf_target: Architecture,
    /// Build and run the release target
    #[clap(long)]
    pub release: bool,
    /// The command used to wrap the loader
    #[clap(short, long, default_value = "sudo -E")]
    pub runner: String,
    /// Arguments to pass to the loader
    #[clap(name = "args", last = true)]
    pub run_args: Vec<String>,
}

/// Build the project
fn build(opts: &Options) -> Result<(), anyhow::Error> {
    let mut args = vec!["build"];
    if opts.release {
        args.push("--release")
    }
    let status = Command::new("cargo")
        .args(&args)
        .status()
        .context("failed to build userspace")?;
    anyhow::ensure!(status.success(), "failed to build userspace program: {status}");
    Ok(())
}

/// Build and run the project
pub fn run(opts: Options) -> Result<(), anyhow::Error> {
    // build the eBPF program followed by the userspace loader
    build_ebpf(BuildOptions {
        target: opts.bpf_target,
        release: opts.release,
    })
    .context("error while building eBPF program")?;
    build(&opts).context("error while building userspace application")?;

    let profile = if opts.release { "release" } else { "debug" };
    let bin_path = format!("target/{profile}/xsk-steer");
    let prog_path = format!("target/bpfel-unknown-none/{profile}/xsk-steer");

    let mut run_args: Vec<_> = opts.run_args.iter().map(String::as_str).collect();
    run_args.push("--prog");
    run_args.push(&prog_path);

    // configure args
    let mut args: Vec<_> = opts.runner.trim().split_terminator(' ').collect();
    args.push(bin_path.as_str());
    args.append(&mut run_args);

    // spawn the command
    let err = Command::new(args.first().expect("No first argument"))
        .args(args.iter().skip(1))
        .exec();

    // we shouldn't get here unless the command failed to spawn
    Err(anyhow::Error::from(err).context(format!("failed to spawn {args:?}")))
}
