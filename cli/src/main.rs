//! CLI for discovering and live-monitoring devices on a LAN
//!
//! # Examples
//!
//! ```bash
//! # help menu
//! sudo netscope --help
//!
//! # scan a subnet once
//! sudo netscope -r 192.168.1.0/24 -n eth0
//!
//! # keep polling, log new devices, only show Apple hardware
//! sudo netscope -r 192.168.1.0/24 -n eth0 wlan0 -l -o devices.txt -m apple
//! ```
use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use itertools::Itertools;
use log::*;
use netscope_lib::{
    cancel::Cancellation,
    device::Device,
    discovery::Discovery,
    error::{NetScopeError, Result as LibResult},
    filter::filter_by_vendor,
    oui::{DEFAULT_OUI_DB_PATH, OUI_DB_ENV, OuiTable},
    output::DeviceLog,
    poller::{DisplaySink, LivePoller},
    prober::{ArpProber, DEFAULT_PROBE_TIMEOUT},
    targets::ScanTarget,
    vendor::{
        DEFAULT_LOOKUP_TIMEOUT, DEFAULT_LOOKUP_URL, LOOKUP_URL_ENV,
        RemoteLookup, RemoteVendorClient, VendorResolver,
    },
};
use prettytable::{Cell, Row, Table};
use std::{path::PathBuf, sync::Arc, time::Duration};

const CANCELLED_MESSAGE: &str = "User interrupted. Exiting...";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// Discover live hosts on a LAN segment and identify their manufacturers
struct Args {
    /// Target IP ranges or subnets (e.g. 192.168.1.0/24 10.0.0.1-10.0.0.20)
    #[arg(short = 'r', long, num_args = 1.., required = true)]
    ip_range: Vec<String>,

    /// Network interfaces to probe on (e.g. eth0 wlan0)
    #[arg(short = 'n', long, num_args = 1.., required = true)]
    interfaces: Vec<String>,

    /// Keep polling and refresh the table on every pass
    #[arg(short, long, default_value_t = false)]
    live: bool,

    /// Append discovered devices to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only show devices whose manufacturer contains this text (e.g. apple)
    #[arg(short, long)]
    manufacturer: Option<String>,

    /// Seconds between passes in live mode
    #[arg(
        short,
        long,
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    interval: u64,

    /// Milliseconds to wait for ARP replies after probing
    #[arg(long, default_value_t = DEFAULT_PROBE_TIMEOUT.as_millis() as u64)]
    timeout_ms: u64,

    /// Offline OUI database in IEEE oui.txt format
    #[arg(long, env = OUI_DB_ENV, default_value = DEFAULT_OUI_DB_PATH)]
    oui_db: PathBuf,

    /// Base URL of the remote vendor lookup service
    #[arg(long, env = LOOKUP_URL_ENV, default_value = DEFAULT_LOOKUP_URL)]
    vendor_url: String,

    /// Never query the remote vendor lookup service
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Print the initial scan as json instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Only print results and errors
    #[arg(short, long, default_value_t = false)]
    quiet: bool,

    /// Prints debug logs including those from netscope-lib
    #[arg(long, default_value_t = false)]
    debug: bool,
}

/// Redraws the device table in place on every live pass
#[derive(Default)]
struct TableDisplay;

impl DisplaySink for TableDisplay {
    fn render(&mut self, devices: &[Device]) -> LibResult<()> {
        // clear screen and home the cursor
        print!("\x1B[2J\x1B[1;1H");
        device_table(devices)
            .print_tty(false)
            .map_err(|e| NetScopeError::Render(e.to_string()))?;
        Ok(())
    }
}

#[doc(hidden)]
fn initialize_logger(args: &Args) -> Result<()> {
    let filter = if args.quiet {
        simplelog::LevelFilter::Error
    } else if args.debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    simplelog::TermLogger::init(
        filter,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[doc(hidden)]
fn print_args(args: &Args) {
    info!("configuration:");
    info!("ip_range:     {}", args.ip_range.iter().join(", "));
    info!("interfaces:   {}", args.interfaces.iter().join(", "));
    info!("live:         {}", args.live);
    info!("interval:     {}s", args.interval);
    info!("timeout_ms:   {}", args.timeout_ms);
    info!("manufacturer: {}", args.manufacturer.as_deref().unwrap_or("-"));
    info!(
        "output:       {}",
        args.output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    info!("oui_db:       {}", args.oui_db.display());
    if args.offline {
        info!("vendor_url:   disabled (offline)");
    } else {
        info!("vendor_url:   {}", args.vendor_url);
    }
}

#[doc(hidden)]
fn build_discovery(args: &Args) -> Result<Discovery> {
    let table = Arc::new(OuiTable::load(&args.oui_db));

    let remote: Option<Box<dyn RemoteLookup>> = if args.offline {
        None
    } else {
        Some(Box::new(RemoteVendorClient::new(
            args.vendor_url.clone(),
            DEFAULT_LOOKUP_TIMEOUT,
        )))
    };

    let prober = ArpProber::builder()
        .timeout(Duration::from_millis(args.timeout_ms))
        .build()?;

    Ok(Discovery::new(
        Box::new(prober),
        VendorResolver::new(Some(table), remote),
    ))
}

#[doc(hidden)]
fn device_table(devices: &[Device]) -> Table {
    let mut table = Table::new();

    table.add_row(Row::new(vec![
        Cell::new("IP ADDRESS").style_spec("bFm"),
        Cell::new("MAC ADDRESS").style_spec("bFm"),
        Cell::new("PACKET SIZE").style_spec("bFm"),
        Cell::new("MANUFACTURER").style_spec("bFm"),
    ]));

    for d in devices {
        table.add_row(Row::new(vec![
            Cell::new(&d.ip.to_string()).style_spec("bFr"),
            Cell::new(&d.mac).style_spec("bFb"),
            Cell::new(&d.probe_size.to_string()).style_spec("bFg"),
            Cell::new(&d.vendor).style_spec("bFy"),
        ]));
    }

    table
}

#[doc(hidden)]
fn print_devices(args: &Args, devices: &[Device]) -> Result<()> {
    if args.json {
        let j: String = serde_json::to_string(devices)?;
        println!("{}", j);
    } else {
        device_table(devices).print_tty(false)?;
    }

    Ok(())
}

// Returns None when interrupted before the pass completed
#[doc(hidden)]
fn scan_once(
    args: &Args,
    discovery: &Discovery,
    targets: &[ScanTarget],
    cancel: &Cancellation,
) -> Result<Option<Vec<Device>>> {
    info!("scanning {} targets...", targets.len());

    let devices = match discovery.scan_all(targets, cancel) {
        Ok(devices) => devices,
        Err(NetScopeError::Cancelled) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let filtered = filter_by_vendor(&devices, args.manufacturer.as_deref());

    print_devices(args, &filtered)?;

    if let Some(path) = &args.output {
        DeviceLog::new(path).append(&filtered)?;
        info!("results saved to {}", path.display());
    }

    Ok(Some(filtered))
}

#[doc(hidden)]
fn live_poller(
    args: &Args,
    discovery: Discovery,
    targets: Vec<ScanTarget>,
    sink: Box<dyn DisplaySink>,
) -> Result<LivePoller> {
    let poller = LivePoller::builder()
        .discovery(discovery)
        .targets(targets)
        .sink(sink)
        .output(args.output.clone().map(DeviceLog::new))
        .vendor_filter(args.manufacturer.clone())
        .interval(Duration::from_secs(args.interval))
        .build()?;
    Ok(poller)
}

#[doc(hidden)]
#[cfg(unix)]
fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

#[doc(hidden)]
#[cfg(windows)]
fn is_root() -> bool {
    // raw socket operations require an Administrator session
    use std::process::Command;
    Command::new("net")
        .args(["session"])
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[doc(hidden)]
fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    initialize_logger(&args)?;

    if !is_root() {
        return Err(eyre!(
            "permission denied: this tool requires root privileges, please run with sudo"
        ));
    }

    print_args(&args);

    let cancel = Cancellation::new();
    let handler_cancel = cancel.clone();

    ctrlc::set_handler(move || handler_cancel.cancel())
        .map_err(|err| eyre!("failed to set ctrl-c handler: {}", err))?;

    let targets = ScanTarget::expand(&args.ip_range, &args.interfaces);
    let discovery = build_discovery(&args)?;

    let completed = scan_once(&args, &discovery, &targets, &cancel)?;

    if completed.is_none() || cancel.is_cancelled() {
        println!("\n{}", CANCELLED_MESSAGE);
        return Ok(());
    }

    if !args.live {
        return Ok(());
    }

    let poller =
        live_poller(&args, discovery, targets, Box::new(TableDisplay))?;

    // the poller only returns Ok once cancelled
    poller
        .spawn(cancel)
        .join()
        .map_err(|_| eyre!("live polling thread panicked"))??;

    println!("\n{}", CANCELLED_MESSAGE);

    Ok(())
}

#[cfg(test)]
#[path = "./main_tests.rs"]
mod tests;
