// crates/grid-manager-cli/src/main.rs
// ============================================================================
// Module: Grid Manager CLI Entry Point
// Description: Command dispatcher for Grid Manager authority and node tasks.
// Purpose: Provide a safe CLI for certificate issuance and placement checks.
// Dependencies: clap, grid-manager-config, grid-manager-core, rand, time.
// ============================================================================

//! ## Overview
//! The `grid-manager` binary operates an offline Grid Manager: it creates
//! the authority, maintains its roster of storage servers, and signs
//! certificates. Node operators install certificates with
//! `install-certificate`, and `check-placement` runs the client trust and
//! placement pipeline over a server snapshot.
//!
//! The authority config is read from and written to a directory, or to
//! stdin and stdout when `--config -` is given. Security posture: inputs are
//! untrusted and size-limited; the config holds the signing key.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use grid_manager_cli::t;
use grid_manager_config::AuthorityStore;
use grid_manager_config::BoundedRead;
use grid_manager_config::ClientConfig;
use grid_manager_config::ConfigLocation;
use grid_manager_config::DEFAULT_CERTIFICATE_DAYS;
use grid_manager_config::STDIO_LOCATION;
use grid_manager_config::ServerCertificateStore;
use grid_manager_config::SigningSettings;
use grid_manager_config::certificate_bytes;
use grid_manager_config::read_bounded;
use grid_manager_core::GridManagerConfig;
use grid_manager_core::InMemoryServerDirectory;
use grid_manager_core::MAX_CERTIFICATE_BYTES;
use grid_manager_core::ServerDescriptor;
use grid_manager_core::ServerName;
use grid_manager_core::Timestamp;
use grid_manager_core::UploadContext;
use grid_manager_core::UploadGate;
use rand::rngs::OsRng;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a certificate input.
const MAX_CERTIFICATE_INPUT_BYTES: usize = MAX_CERTIFICATE_BYTES;
/// Maximum size of a server snapshot input.
const MAX_SERVER_SNAPSHOT_BYTES: usize = 4 * 1024 * 1024;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "grid-manager", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Grid Manager directory, or `-` for stdin and stdout.
    #[arg(long, value_name = "PATH", default_value = STDIO_LOCATION, global = true)]
    config: String,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new Grid Manager with a fresh signing key.
    Create,
    /// Print the Grid Manager public key.
    PublicIdentity,
    /// List authorized storage servers.
    List,
    /// Authorize a storage server.
    Add(AddCommand),
    /// Remove a storage server from the roster.
    Remove(RemoveCommand),
    /// Sign a certificate for an authorized storage server.
    Sign(SignCommand),
    /// Install a certificate on a storage node.
    InstallCertificate(InstallCertificateCommand),
    /// Run trust filtering and peer selection over a server snapshot.
    CheckPlacement(CheckPlacementCommand),
}

/// Arguments for `add`.
#[derive(Args, Debug)]
struct AddCommand {
    /// Storage server name.
    name: String,
    /// Storage server public key (`pub-v0-...`).
    public_key: String,
}

/// Arguments for `remove`.
#[derive(Args, Debug)]
struct RemoveCommand {
    /// Storage server name.
    name: String,
}

/// Arguments for `sign`.
#[derive(Args, Debug)]
struct SignCommand {
    /// Storage server name.
    name: String,
    /// Operator-chosen certificate serial.
    version: u64,
    /// Certificate lifetime in days.
    #[arg(long, value_name = "DAYS", default_value_t = DEFAULT_CERTIFICATE_DAYS)]
    expiry_days: u32,
}

/// Arguments for `install-certificate`.
#[derive(Args, Debug)]
struct InstallCertificateCommand {
    /// Storage node directory.
    #[arg(long, value_name = "DIR")]
    node_dir: PathBuf,
    /// Local label for the certificate.
    #[arg(long, value_name = "LABEL")]
    name: String,
    /// Certificate file, or `-` for stdin.
    #[arg(long, value_name = "PATH")]
    filename: String,
}

/// Arguments for `check-placement`.
#[derive(Args, Debug)]
struct CheckPlacementCommand {
    /// Client configuration file.
    #[arg(long, value_name = "PATH")]
    client_config: PathBuf,
    /// JSON array of server descriptors, or `-` for stdin.
    #[arg(long, value_name = "PATH")]
    servers: String,
    /// Decision time in Unix seconds; defaults to the current time.
    #[arg(long, value_name = "SECONDS")]
    now: Option<i64>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let store = AuthorityStore::new(ConfigLocation::parse(&cli.config));
    match command {
        Commands::Create => command_create(&store),
        Commands::PublicIdentity => command_public_identity(&store),
        Commands::List => command_list(&store),
        Commands::Add(command) => command_add(&store, &command),
        Commands::Remove(command) => command_remove(&store, &command),
        Commands::Sign(command) => command_sign(&store, &command),
        Commands::InstallCertificate(command) => command_install_certificate(&command),
        Commands::CheckPlacement(command) => command_check_placement(&command),
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Authority Commands
// ============================================================================

/// Executes `create`.
fn command_create(store: &AuthorityStore) -> CliResult<ExitCode> {
    let config = GridManagerConfig::create(&mut OsRng)
        .map_err(|err| CliError::new(t!("create.failed", error = err)))?;
    store
        .create(&config, std::io::stdout().lock())
        .map_err(|err| CliError::new(t!("create.failed", error = err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `public-identity`.
fn command_public_identity(store: &AuthorityStore) -> CliResult<ExitCode> {
    let config = load_authority(store)?;
    write_stdout_line(&config.public_identity().encode())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `list`.
fn command_list(store: &AuthorityStore) -> CliResult<ExitCode> {
    let config = load_authority(store)?;
    let mut output = String::new();
    for (name, key) in config.servers() {
        output.push_str(&t!("list.entry", name = name, key = key.encode()));
        output.push('\n');
    }
    write_stdout_bytes(output.as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `add`.
fn command_add(store: &AuthorityStore, command: &AddCommand) -> CliResult<ExitCode> {
    let config = load_authority(store)?
        .add(&command.name, &command.public_key)
        .map_err(|err| CliError::new(t!("add.failed", error = err)))?;
    save_authority(store, &config)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `remove`.
fn command_remove(store: &AuthorityStore, command: &RemoveCommand) -> CliResult<ExitCode> {
    let config = load_authority(store)?.remove(&command.name);
    save_authority(store, &config)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `sign`.
///
/// The certificate always goes to stdout; directory-backed authorities also
/// keep a copy next to the config.
fn command_sign(store: &AuthorityStore, command: &SignCommand) -> CliResult<ExitCode> {
    let settings = SigningSettings::new(command.expiry_days)
        .map_err(|err| CliError::new(t!("sign.expiry_invalid", error = err)))?;
    let config = load_authority(store)?;
    let certificate = config
        .sign(&command.name, command.version, settings.policy(), current_time())
        .map_err(|err| CliError::new(t!("sign.failed", error = err)))?;
    let name = ServerName::parse(&command.name)
        .map_err(|err| CliError::new(t!("sign.failed", error = err)))?;
    if let Some(path) = store
        .write_certificate(&name, &certificate)
        .map_err(|err| CliError::new(t!("sign.write_failed", error = err)))?
    {
        write_stderr_line(&t!("sign.written", path = path.display()))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }
    let bytes = certificate_bytes(&certificate)
        .map_err(|err| CliError::new(t!("sign.serialize_failed", error = err)))?;
    write_stdout_bytes(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Loads the authority config from the selected location.
fn load_authority(store: &AuthorityStore) -> CliResult<GridManagerConfig> {
    store
        .load(std::io::stdin().lock())
        .map_err(|err| CliError::new(t!("store.load_failed", error = err)))
}

/// Saves the authority config to the selected location.
fn save_authority(store: &AuthorityStore, config: &GridManagerConfig) -> CliResult<()> {
    store
        .save(config, std::io::stdout().lock())
        .map_err(|err| CliError::new(t!("store.save_failed", error = err)))
}

// ============================================================================
// SECTION: Node Commands
// ============================================================================

/// Executes `install-certificate`.
fn command_install_certificate(command: &InstallCertificateCommand) -> CliResult<ExitCode> {
    let bytes = read_input(
        &command.filename,
        MAX_CERTIFICATE_INPUT_BYTES,
        &t!("input.kind.certificate"),
    )?;
    let store = ServerCertificateStore::for_node(&command.node_dir);
    let path = store
        .install(&command.name, &bytes)
        .map_err(|err| CliError::new(t!("install.failed", error = err)))?;
    write_stdout_line(&t!("install.done", name = command.name, path = path.display()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Placement Commands
// ============================================================================

/// Executes `check-placement`.
fn command_check_placement(command: &CheckPlacementCommand) -> CliResult<ExitCode> {
    let config = ClientConfig::load(Some(&command.client_config))
        .map_err(|err| CliError::new(t!("placement.config_failed", error = err)))?;
    let policy = config
        .trust_policy()
        .map_err(|err| CliError::new(t!("placement.config_failed", error = err)))?;
    let request = config
        .placement_request()
        .map_err(|err| CliError::new(t!("placement.config_failed", error = err)))?;
    let audit = config
        .audit_sink()
        .map_err(|err| CliError::new(t!("placement.audit_failed", error = err)))?;
    let bytes =
        read_input(&command.servers, MAX_SERVER_SNAPSHOT_BYTES, &t!("input.kind.servers"))?;
    let servers: Vec<ServerDescriptor> = serde_json::from_slice(&bytes)
        .map_err(|err| CliError::new(t!("placement.servers_invalid", error = err)))?;
    let now = command.now.map_or_else(current_time, Timestamp::from_unix_seconds);

    let directory = InMemoryServerDirectory::with_servers(servers);
    let gate = UploadGate::new(directory, audit, policy, request);
    let plan = gate
        .decide(&UploadContext::default(), now)
        .map_err(|err| CliError::new(t!("placement.rejected", error = err)))?;
    let mut output = serde_json::to_vec_pretty(&plan)
        .map_err(|err| CliError::new(t!("placement.serialize_failed", error = err)))?;
    output.push(b'\n');
    write_stdout_bytes(&output).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Reads a file, or stdin for `-`, enforcing a size limit.
fn read_input(source: &str, max_bytes: usize, kind: &str) -> CliResult<Vec<u8>> {
    let outcome = if source == STDIO_LOCATION {
        read_bounded(std::io::stdin().lock(), max_bytes)
    } else {
        File::open(source).and_then(|file| read_bounded(file, max_bytes))
    };
    match outcome {
        Ok(BoundedRead::Complete(bytes)) => Ok(bytes),
        Ok(BoundedRead::TooLarge(_)) => Err(CliError::new(t!(
            "input.read_too_large",
            kind = kind,
            path = source,
            limit = max_bytes
        ))),
        Err(err) => {
            Err(CliError::new(t!("input.read_failed", kind = kind, path = source, error = err)))
        }
    }
}

/// Returns the current wall-clock time.
fn current_time() -> Timestamp {
    Timestamp::from_unix_seconds(time::OffsetDateTime::now_utc().unix_timestamp())
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)?;
    stdout.flush()
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
