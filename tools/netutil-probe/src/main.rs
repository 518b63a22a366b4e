use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use netutil_c_api::exports::{
    FreeCPUResponse, FreeEnvResponse, FreeNetworkInterfaceResponse, FreeNetworkStatusResponse,
    GetCPUInfo, GetEnv, GetNetworkInterface, GetNetworkStatus, NetutilInit,
};
use netutil_c_api::strings::read_c_string;
use netutil_c_api::{
    CPUResponse, EnvData, EnvResponse, NetworkInterfaceResponse, NetworkStatusResponse, Status,
};
use std::ffi::CString;

#[derive(Debug, Parser)]
#[command(name = "netutil-probe")]
#[command(about = "Call the netutil C API the way a dataplane application would")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the allotted CPU set
    Cpu,
    /// Print environment variables
    Env {
        /// Slots to allocate for the response
        #[arg(long, default_value_t = 64)]
        max_envs: i32,
    },
    /// Print pod network status
    Status,
    /// Print network interfaces
    Interfaces {
        /// Interface type filter: pci, vhost, or empty for both
        #[arg(long = "type", default_value = "")]
        kind: String,
    },
}

fn check(entry: &str, rc: i64) -> Result<()> {
    match rc {
        rc if rc == Status::Success.code() => Ok(()),
        rc if rc == Status::SizeError.code() => {
            bail!("{entry}: response buffer too small (partial results shown above)")
        }
        rc => bail!("{entry} failed with status {rc}"),
    }
}

fn show(ptr: *const std::os::raw::c_char) -> String {
    unsafe { read_c_string(ptr) }.unwrap_or_else(|| "<unset>".to_string())
}

fn cpu() -> Result<()> {
    let mut resp = CPUResponse::default();
    let rc = unsafe { GetCPUInfo(&mut resp) };
    if rc == Status::Success.code() {
        println!("cpuset: {}", show(resp.cpu_set));
    }
    unsafe { FreeCPUResponse(&mut resp) };
    check("GetCPUInfo", rc)
}

fn env(max_envs: i32) -> Result<()> {
    let mut slots = vec![EnvData::default(); usize::try_from(max_envs).unwrap_or(0)];
    let mut resp = EnvResponse {
        netutil_num_envs: max_envs,
        p_envs: slots.as_mut_ptr(),
    };
    let rc = unsafe { GetEnv(&mut resp) };
    for slot in &slots {
        if let Some((name, value)) = unsafe { slot.pair() } {
            println!("{name}={value}");
        }
    }
    unsafe { FreeEnvResponse(&mut resp) };
    check("GetEnv", rc)
}

fn status() -> Result<()> {
    let mut resp = Box::<NetworkStatusResponse>::default();
    let rc = unsafe { GetNetworkStatus(resp.as_mut()) };
    for entry in resp.status.iter().filter(|s| !s.name.is_null()) {
        println!(
            "{} ({}) mac={} ips=[{}]",
            show(entry.name),
            show(entry.interface),
            show(entry.mac),
            unsafe { entry.ips() }.join(", ")
        );
    }
    unsafe { FreeNetworkStatusResponse(resp.as_mut()) };
    check("GetNetworkStatus", rc)
}

fn interfaces(kind: &str) -> Result<()> {
    let filter = CString::new(kind)?;
    let mut resp = Box::<NetworkInterfaceResponse>::default();
    let rc = unsafe { GetNetworkInterface(filter.as_ptr(), resp.as_mut()) };
    for iface in resp.interface.iter().filter(|i| !i.name.is_null()) {
        println!(
            "{} type={} pci={} socket={} master={}",
            show(iface.name),
            show(iface.kind),
            show(iface.sriov.pci_address),
            show(iface.vhost.socket_file),
            iface.vhost.master
        );
    }
    unsafe { FreeNetworkInterfaceResponse(resp.as_mut()) };
    check("GetNetworkInterface", rc)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    check("NetutilInit", NetutilInit())?;
    log::debug!("running {:?}", cli.command);

    match cli.command {
        Command::Cpu => cpu(),
        Command::Env { max_envs } => env(max_envs),
        Command::Status => status(),
        Command::Interfaces { kind } => interfaces(&kind),
    }
}
