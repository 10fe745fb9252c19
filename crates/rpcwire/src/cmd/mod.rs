use clap::{Args, Subcommand};

use crate::exit::CliResult;

pub mod call;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a diagnostic responder on a TCP address.
    Serve(ServeArgs),
    /// Issue a single call against a responder.
    Call(CallArgs),
    /// Show version information.
    Version,
}

pub fn run(command: Command) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args),
        Command::Call(args) => call::run(args),
        Command::Version => version::run(),
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (e.g. 127.0.0.1:7700).
    pub addr: String,
    /// Maximum frame payload size in bytes.
    #[arg(long, default_value_t = rpcwire_frame::DEFAULT_MAX_PAYLOAD)]
    pub max_frame_size: usize,
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Address to connect to (e.g. 127.0.0.1:7700).
    pub addr: String,
    /// Method name (e.g. Concat.Concat).
    pub method: String,
    /// JSON argument payload.
    #[arg(long, default_value = "{}")]
    pub json: String,
    /// Read timeout in seconds for the response.
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,
    /// Maximum frame payload size in bytes.
    #[arg(long, default_value_t = rpcwire_frame::DEFAULT_MAX_PAYLOAD)]
    pub max_frame_size: usize,
}
