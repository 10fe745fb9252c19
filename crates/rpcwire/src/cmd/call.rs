use std::net::TcpStream;
use std::time::Duration;

use rpcwire_codec::{InitiatorCodec, JsonFormat, Request};
use rpcwire_frame::FrameConfig;
use tracing::debug;

use crate::cmd::CallArgs;
use crate::exit::{self, CliResult};

pub fn run(args: CallArgs) -> CliResult<i32> {
    let payload: serde_json::Value = serde_json::from_str(&args.json)
        .map_err(|err| exit::CliError::new(exit::USAGE, format!("invalid --json: {err}")))?;

    let stream =
        TcpStream::connect(&args.addr).map_err(|err| exit::io_error("connect", err))?;
    stream
        .set_read_timeout(Some(Duration::from_secs(args.timeout)))
        .map_err(|err| exit::io_error("set timeout", err))?;
    let reader = stream
        .try_clone()
        .map_err(|err| exit::io_error("clone stream", err))?;

    let config = FrameConfig {
        max_payload_size: args.max_frame_size,
    };
    let mut codec = InitiatorCodec::with_config(reader, stream, JsonFormat, config);

    let req = Request::new(&args.method, 1);
    debug!(method = %req.method, "sending call");
    codec
        .write_request(&req, &payload)
        .map_err(|err| exit::codec_error("write request", err))?;

    let resp = codec
        .read_response_header()
        .map_err(|err| exit::codec_error("read response header", err))?;
    let body: Option<serde_json::Value> = codec
        .read_response_body()
        .map_err(|err| exit::codec_error("read response body", err))?;

    if let Some(error) = resp.error {
        eprintln!("remote error: {error}");
        return Ok(exit::REMOTE_ERROR);
    }

    match body {
        Some(value) => println!("{value}"),
        None => println!("null"),
    }
    Ok(exit::SUCCESS)
}
