//! Ground Control Station — interactive operator console.
//!
//! Sends one command byte per request to the flight software and prints the
//! decoded telemetry reply.  Type a command number to send it, `help` to
//! list commands, `quit` to exit.
#![deny(unused_must_use)]

use std::io::{self, BufRead, Write};
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, warn};

use fsw::app::commands::Command;
use fsw::comms::codec::{Reply, ReplyBody};

/// Where the flight software listens unless the operator says otherwise.
const DEFAULT_TARGET: &str = "127.0.0.1:8080";

/// Reply wait per request.
const REPLY_TIMEOUT: Duration = Duration::from_millis(100);

/// Byte sent for the deliberate "invalid" entry.
const INVALID_BYTE: u8 = 0xFF;

/// One entry of the console menu.
#[derive(Debug, Clone, Copy)]
enum Selection {
    Known(Command),
    Invalid,
}

impl Selection {
    fn byte(self) -> u8 {
        match self {
            Self::Known(cmd) => cmd.wire_byte(),
            Self::Invalid => INVALID_BYTE,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Known(cmd) => cmd.name(),
            Self::Invalid => "INVALID",
        }
    }
}

fn menu() -> Vec<Selection> {
    Command::ALL
        .into_iter()
        .map(Selection::Known)
        .chain(std::iter::once(Selection::Invalid))
        .collect()
}

fn print_commands(menu: &[Selection]) {
    println!("This is a full list of sendable commands:");
    for (idx, sel) in menu.iter().enumerate() {
        println!("\t{idx} - {}", sel.name());
    }
}

fn prompt(stdin: &mut impl BufRead, text: &str) -> Result<Option<String>> {
    print!("{text}");
    io::stdout().flush()?;
    let mut line = String::new();
    if stdin.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

fn send_command(socket: &UdpSocket, target: SocketAddr, sel: Selection) -> Result<()> {
    println!("Sending {}", sel.name());
    socket
        .send_to(&[sel.byte()], target)
        .with_context(|| format!("sending to {target}"))?;

    let mut buf = [0u8; 64];
    let len = match socket.recv_from(&mut buf) {
        Ok((len, _)) => len,
        Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
            println!("Request Timed Out");
            return Ok(());
        }
        Err(e) => return Err(e).context("receiving reply"),
    };
    debug!("Received {:02X?}", &buf[..len]);

    let sent = match sel {
        Selection::Known(cmd) => Some(cmd),
        Selection::Invalid => None,
    };
    let parsed = match Reply::parse(sent, &buf[..len]) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Malformed reply {:02X?}: {e}", &buf[..len]);
            return Ok(());
        }
    };

    match parsed.accepted() {
        Some(true) => println!("Command Accepted"),
        Some(false) => println!("Command Rejected"),
        None => {}
    }

    match (parsed.body, sent.and_then(Command::payload_description)) {
        (ReplyBody::ShuttingDown, _) => {
            println!("FSW Shutting Down, Last State: {}", parsed.mode);
            return Ok(());
        }
        (ReplyBody::Count(v), Some(desc)) => println!("{desc}: {v}"),
        (ReplyBody::UptimeSecs(v), Some(desc)) => println!("{desc}: {v}"),
        _ => {}
    }
    println!("Current State: {}", parsed.mode);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    println!("Hello! Welcome to the GCS application.");
    println!(r#"Type "quit" to exit, or "help" to receive a list of commands to send"#);

    let socket = UdpSocket::bind("0.0.0.0:0").context("opening GCS socket")?;
    socket.set_read_timeout(Some(REPLY_TIMEOUT))?;

    let mut stdin = io::stdin().lock();
    let Some(answer) = prompt(
        &mut stdin,
        "Input FSW IP address and port (xxx.xxx.xxx.xxx:yyy, defaults to localhost): ",
    )?
    else {
        return Ok(());
    };
    let target: SocketAddr = match answer.parse() {
        Ok(addr) => {
            println!("Using {addr}");
            addr
        }
        Err(_) => {
            println!("Using {DEFAULT_TARGET}");
            DEFAULT_TARGET.parse()?
        }
    };

    let menu = menu();
    print_commands(&menu);

    while let Some(input) = prompt(&mut stdin, "Input a command to send (by number): ")? {
        match input.to_lowercase().as_str() {
            "quit" => break,
            "help" => print_commands(&menu),
            other => match other.parse::<usize>().ok().and_then(|i| menu.get(i)) {
                Some(&sel) => send_command(&socket, target, sel)?,
                None => println!("Invalid Input"),
            },
        }
    }
    Ok(())
}
