use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use log::{LevelFilter, error, info, warn};
use secrecy::SecretString;

use lldp_describe::config::{
    Credentials, DEFAULT_INPUT, DEFAULT_MAX_CONCURRENCY, DEFAULT_VLAN, RunConfig, SessionSettings,
};
use lldp_describe::error::InputError;
use lldp_describe::{
    DeviceReport, Dispatcher, HostKeyVerification, RunSummary, SshConnector, UpdateSettings,
};

/// Set access port descriptions from LLDP neighbor names.
#[derive(Parser, Debug)]
#[command(name = "lldp-describe", version)]
#[command(about = "Label switch ports in a VLAN with their LLDP neighbor's name.")]
struct Args {
    /// Device list: one address per row, first column
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Fail when the device list does not exist
    #[arg(long)]
    strict_input: bool,

    /// Login username
    #[arg(short, long, env = "LLDP_DESCRIBE_USERNAME")]
    username: Option<String>,

    /// Login password
    #[arg(long, env = "LLDP_DESCRIBE_PASSWORD", hide_env_values = true, hide = true)]
    password: Option<String>,

    /// Secret for `enable` (defaults to the login password)
    #[arg(long, env = "LLDP_DESCRIBE_ENABLE_SECRET", hide_env_values = true, hide = true)]
    enable_secret: Option<String>,

    /// VLAN whose interfaces are updated
    #[arg(long, default_value_t = DEFAULT_VLAN)]
    vlan: u16,

    /// Devices updated at the same time
    #[arg(short = 'j', long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    max_concurrency: usize,

    /// SSH port
    #[arg(short, long, default_value_t = 22)]
    port: u16,

    /// Connect and per-prompt timeout in seconds
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,

    /// Host key checking: strict, accept-new or off
    #[arg(long, default_value_t = HostKeyVerification::AcceptNew)]
    host_key_checking: HostKeyVerification,

    /// known_hosts file (default: ~/.ssh/known_hosts)
    #[arg(long)]
    known_hosts: Option<PathBuf>,

    /// Write a JSON report of the run to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            input: self.input.clone(),
            strict_input: self.strict_input,
            vlan: self.vlan,
            max_concurrency: self.max_concurrency,
            session: SessionSettings {
                port: self.port,
                timeout: Duration::from_secs(self.timeout),
                host_key_verification: self.host_key_checking,
                known_hosts_path: self.known_hosts.clone(),
            },
            report: self.report.clone(),
        }
    }

    fn credentials(&mut self) -> anyhow::Result<Credentials> {
        let username = match self.username.take() {
            Some(username) => username,
            None => prompt("Username: ")?,
        };
        let password = match self.password.take() {
            Some(password) => password,
            None => prompt("Password: ")?,
        };

        let mut credentials = Credentials::new(username.trim(), SecretString::from(password));
        if let Some(secret) = self.enable_secret.take().filter(|s| !s.is_empty()) {
            credentials = credentials.with_enable_secret(SecretString::from(secret));
        }
        credentials.validate()?;
        Ok(credentials)
    }
}

/// Ask on stderr and read one line from stdin.
fn prompt(label: &str) -> anyhow::Result<String> {
    let mut stderr = io::stderr();
    stderr.write_all(label.as_bytes())?;
    stderr.flush()?;

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    if read == 0 {
        bail!("no input for '{}'", label.trim_end_matches([':', ' ']));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn init_logging(verbose: u8) {
    let crate_level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module("lldp_describe", crate_level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = Args::parse();
    init_logging(args.verbose);

    let config = args.run_config();
    config.validate()?;

    let addresses = match lldp_describe::input::load_addresses(&config.input) {
        Ok(addresses) => addresses,
        Err(e @ InputError::NotFound { .. }) if !config.strict_input => {
            warn!("{e}; no devices to update");
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };
    info!(
        "Loaded {} addresses from {}",
        addresses.len(),
        config.input.display()
    );

    let reports = run(&config, &addresses, || args.credentials()).await?;

    for report in reports.iter().filter(|r| !r.is_reachable()) {
        error!("{}: not updated", report.address);
    }

    Ok(())
}

/// Update every address, asking for credentials only when there is a device
/// to log in to.
async fn run(
    config: &RunConfig,
    addresses: &[String],
    login: impl FnOnce() -> anyhow::Result<Credentials>,
) -> anyhow::Result<Vec<DeviceReport>> {
    let reports = if addresses.is_empty() {
        info!("No devices to update");
        Vec::new()
    } else {
        let dispatcher = Dispatcher::new(
            SshConnector::new(config.session.clone()),
            login()?,
            UpdateSettings { vlan: config.vlan },
        )
        .with_max_concurrency(config.max_concurrency);

        let reports = dispatcher.run(addresses).await;
        info!("Done: {}", RunSummary::from_reports(&reports));
        reports
    };

    if let Some(path) = &config.report {
        lldp_describe::report::write_json(path, &reports)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    Ok(reports)
}
