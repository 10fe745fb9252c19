use crate::exit::{self, CliResult};

pub fn run() -> CliResult<i32> {
    println!("rpcwire {}", env!("CARGO_PKG_VERSION"));
    Ok(exit::SUCCESS)
}
