use std::net::{TcpListener, TcpStream};
use std::thread;

use rpcwire_codec::{CodecError, JsonFormat, ResponderCodec, Response};
use rpcwire_frame::{FrameConfig, FrameError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cmd::ServeArgs;
use crate::exit::{self, CliResult};

#[derive(Debug, Serialize, Deserialize)]
struct ConcatArgs {
    a: String,
    b: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ConcatReply {
    c: String,
}

pub fn run(args: ServeArgs) -> CliResult<i32> {
    let listener =
        TcpListener::bind(&args.addr).map_err(|err| exit::io_error("bind", err))?;
    info!(addr = %args.addr, "listening");

    for stream in listener.incoming() {
        let stream = match stream {
            Ok(stream) => stream,
            Err(err) => {
                warn!(error = %err, "accept failed");
                continue;
            }
        };
        let config = FrameConfig {
            max_payload_size: args.max_frame_size,
        };
        thread::spawn(move || {
            if let Err(err) = serve_connection(stream, config) {
                warn!(error = %err, "connection ended with error");
            }
        });
    }

    Ok(exit::SUCCESS)
}

fn serve_connection(stream: TcpStream, config: FrameConfig) -> rpcwire_codec::Result<()> {
    if let Ok(peer) = stream.peer_addr() {
        debug!(%peer, "connection accepted");
    }
    let reader = stream
        .try_clone()
        .map_err(|err| CodecError::Frame(FrameError::Io(err)))?;
    let mut codec = ResponderCodec::with_config(reader, stream, JsonFormat, config);

    loop {
        let req = match codec.read_request_header() {
            Ok(req) => req,
            Err(CodecError::Frame(FrameError::ConnectionClosed)) => {
                debug!("peer closed connection");
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        match req.method.as_str() {
            "Concat.Concat" => match codec.read_request_body::<ConcatArgs>() {
                Ok(Some(args)) => {
                    let reply = ConcatReply {
                        c: format!("{}{}", args.a, args.b),
                    };
                    codec.write_response(&Response::success(&req), Some(&reply))?;
                }
                Ok(None) => {
                    let resp = Response::failure(&req, "missing request body");
                    codec.write_response::<ConcatReply>(&resp, None)?;
                }
                // Body frame is consumed before decoding, so the stream
                // stays aligned and the error can go back in-band.
                Err(CodecError::Format(err)) => {
                    let resp = Response::failure(&req, format!("bad request body: {err}"));
                    codec.write_response::<ConcatReply>(&resp, None)?;
                }
                Err(err) => return Err(err),
            },
            "Echo.Echo" => match codec.read_request_body::<serde_json::Value>() {
                Ok(body) => {
                    let body = body.unwrap_or(serde_json::Value::Null);
                    codec.write_response(&Response::success(&req), Some(&body))?;
                }
                Err(CodecError::Format(err)) => {
                    let resp = Response::failure(&req, format!("bad request body: {err}"));
                    codec.write_response::<serde_json::Value>(&resp, None)?;
                }
                Err(err) => return Err(err),
            },
            unknown => {
                codec.discard_request_body()?;
                let resp = Response::failure(&req, format!("unknown method: {unknown}"));
                codec.write_response::<ConcatReply>(&resp, None)?;
            }
        }
    }
}
