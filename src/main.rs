//! usbtree binary: print the USB device tree of the system or a dump
use clap::Parser;
use std::io;
use std::path::PathBuf;

use usbtree::config::Config;
use usbtree::error::{ErrorKind, Result};
use usbtree::lsusb::sysfs::{Sidecar, SysfsSidecar};
use usbtree::lsusb::tree::Tree;
use usbtree::profiler::{self, Device, Profiler, SystemDump};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, max_term_width = 80)]
struct Args {
    /// Path to user config file to use
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read devices and sidecar data from a json dump rather than the system
    #[arg(long)]
    from_json: Option<String>,

    /// Output the enumerated devices as a json dump that can be read with --from-json
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Directory of USB device nodes to read drivers and hub ports from; default /sys/bus/usb/devices
    #[arg(long)]
    sysfs_root: Option<PathBuf>,

    /// Turn debugging information on. Alternatively can use RUST_LOG env: INFO, DEBUG, TRACE
    #[arg(short = 'z', long, action = clap::ArgAction::Count)]
    debug: u8,
}

/// Print the tree to stdout and diagnostics for skipped devices to stderr
fn print_tree(tree: &Tree) -> Result<()> {
    for e in tree.errors() {
        eprintln!("{:#}", e);
    }
    tree.write_to(io::stdout().lock())?;
    Ok(())
}

fn print_json(probed: &[Result<Device>], sidecar: &dyn Sidecar) -> Result<()> {
    let dump = SystemDump::capture(probed, sidecar);
    println!("{}", serde_json::to_string_pretty(&dump)?);
    Ok(())
}

fn run(args: Args) -> Result<()> {
    usbtree::set_log_level(args.debug)?;

    let mut config = match &args.config {
        Some(p) => Config::from_file(p)?,
        None => Config::sys_config()?,
    };
    if args.sysfs_root.is_some() {
        config.sysfs_root = args.sysfs_root.to_owned();
    }
    log::debug!("{:?}", config);
    let names = config.names();

    if let Some(dump_path) = &args.from_json {
        let mut dump = profiler::read_json_dump(dump_path)?;
        let probed = dump.get_devices()?;
        if args.json {
            print_json(&probed, &dump)
        } else {
            print_tree(&Tree::build(probed, &names, &dump))
        }
    } else {
        let probed = profiler::get_devices()?;
        let sidecar: SysfsSidecar = config.sidecar();
        if args.json {
            print_json(&probed, &sidecar)
        } else {
            print_tree(&Tree::build(probed, &names, &sidecar))
        }
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        match e.kind() {
            ErrorKind::LibUSB | ErrorKind::Unsupported => {
                eprintln!("Unable to enumerate USB devices: {:#}", e)
            }
            _ => eprintln!("{}", e),
        }
        std::process::exit(1);
    }
}
