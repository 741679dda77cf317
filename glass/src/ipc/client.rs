use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;

use anyhow::{Context, Result};

use glass_ipc::{Command, HostFilter, HostRequest, Response, SubscribeRequest};

use super::{HOST_SOCKET_PATH, SOCKET_PATH};

/// Send one command to the running daemon and wait for its answer.
pub fn send_command(cmd: &Command) -> Result<Response> {
    send_command_at(Path::new(SOCKET_PATH), cmd)
}

fn send_command_at(path: &Path, cmd: &Command) -> Result<Response> {
    let mut stream = UnixStream::connect(path).context("Failed to connect to glass daemon")?;
    write_line(&mut stream, cmd)?;

    let mut line = String::new();
    BufReader::new(&stream).read_line(&mut line)?;
    if line.is_empty() {
        anyhow::bail!("glass daemon closed the connection without answering");
    }
    Ok(serde_json::from_str(&line)?)
}

/// Attach as a host and print every request to stdout until the daemon quits.
pub fn subscribe_and_print(snapshot: bool, filter: Option<HostFilter>) -> Result<()> {
    let request = SubscribeRequest {
        snapshot,
        filter: filter.unwrap_or_default(),
    };
    listen_at(
        Path::new(HOST_SOCKET_PATH),
        &request,
        &mut std::io::stdout().lock(),
    )
}

fn listen_at(path: &Path, request: &SubscribeRequest, out: &mut impl Write) -> Result<()> {
    let mut stream =
        UnixStream::connect(path).context("Failed to connect to glass host server")?;
    write_line(&mut stream, request)?;

    for line in BufReader::new(stream).lines() {
        let request: HostRequest = serde_json::from_str(&line?)?;
        writeln!(out, "{}", serde_json::to_string(&request)?)?;
        if request == HostRequest::Quit {
            break;
        }
    }
    Ok(())
}

fn write_line<T: serde::Serialize>(stream: &mut UnixStream, value: &T) -> Result<()> {
    writeln!(stream, "{}", serde_json::to_string(value)?)?;
    stream.flush()?;
    Ok(())
}
