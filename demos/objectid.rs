//! Simple command that prints one or '-n count' ObjectId strings, or the fields of '-p hex'

use std::{env, io, io::Write, process::ExitCode};

use objectid::ObjectId;

#[derive(Debug, PartialEq)]
enum Command {
    Generate(usize),
    Inspect(String),
}

fn main() -> io::Result<ExitCode> {
    env_logger::init();

    let command = {
        let mut args = env::args();
        let program = args.next();
        match parse_args(args) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("Error: {}", message);
                eprintln!(
                    "Usage: {} [-n count | -p hex]",
                    program.as_deref().unwrap_or("objectid")
                );
                return Ok(ExitCode::FAILURE);
            }
        }
    };

    let mut buf = io::BufWriter::new(io::stdout());
    match command {
        Command::Generate(count) => {
            for _ in 0..count {
                writeln!(buf, "{}", objectid::object_id())?;
            }
        }
        Command::Inspect(text) => match ObjectId::parse(&text) {
            Ok(id) => write_fields(&mut buf, &id)?,
            Err(err) => {
                eprintln!("Error: {}", err);
                return Ok(ExitCode::FAILURE);
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

fn write_fields(mut w: impl Write, id: &ObjectId) -> io::Result<()> {
    writeln!(w, "timestamp: {}", id.timestamp())?;
    writeln!(w, "machine:   {:06x}", id.machine())?;
    writeln!(w, "pid:       {}", id.pid())?;
    writeln!(w, "increment: {:06x}", id.increment())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command, String> {
    let mut command = None;
    while let Some(arg) = args.next() {
        if arg != "-n" && arg != "-p" {
            return Err(format!("unrecognized argument '{}'", arg));
        }
        if command.is_some() {
            return Err("options 'n' and 'p' given more than once".to_owned());
        }
        let Some(value) = args.next() else {
            return Err(format!("argument to option '{}' missing", &arg[1..]));
        };
        if arg == "-p" {
            command.replace(Command::Inspect(value));
        } else {
            let Ok(c) = value.parse() else {
                return Err(format!("invalid argument to option 'n': '{}'", value));
            };
            command.replace(Command::Generate(c));
        }
    }
    Ok(command.unwrap_or(Command::Generate(1)))
}
