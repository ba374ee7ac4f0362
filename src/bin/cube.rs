use std::env;
use std::process;

use cube_rs::{BlinkMode, Cube, CubeConfig, Error, Result};

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const USAGE: &str = "usage: cube [-p PORT] [-c off|red|green|blink[-fast|-slow][-red|-green|-both]]";

enum Action {
    Off,
    Red,
    Green,
    Blink(BlinkMode),
}

fn parse_action(cmd: &str) -> Result<Action> {
    let lower = cmd.to_ascii_lowercase();
    match lower.as_str() {
        "off" => Ok(Action::Off),
        "red" => Ok(Action::Red),
        "green" => Ok(Action::Green),
        "blink" => Ok(Action::Blink(BlinkMode::FAST | BlinkMode::RED)),
        other => match other.strip_prefix("blink-") {
            Some(flags) => flags.parse().map(Action::Blink),
            None => Err(Error::InvalidData(format!("unknown command {:?}", cmd).into())),
        },
    }
}

fn run(args: &[String]) -> Result<()> {
    let mut cfg = CubeConfig::from_env()?;
    let mut action = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-p" => {
                let port = iter
                    .next()
                    .ok_or_else(|| Error::InvalidData("-p needs a value".into()))?;
                cfg = cfg.with_port(port.parse()?);
            }

            "-c" => {
                let cmd = iter
                    .next()
                    .ok_or_else(|| Error::InvalidData("-c needs a value".into()))?;
                action = Some(parse_action(cmd)?);
            }

            other => {
                return Err(Error::InvalidData(
                    format!("unexpected argument {:?}", other).into(),
                ))
            }
        }
    }

    let mut cube = Cube::connect(&cfg)?;
    let res = match action {
        Some(Action::Off) => cube.off(),
        Some(Action::Red) => cube.red(),
        Some(Action::Green) => cube.green(),
        Some(Action::Blink(mode)) => cube.blink(mode),
        None => {
            info!("no command given");
            Ok(())
        }
    };

    match action {
        // leave the requested color lit
        Some(Action::Red) | Some(Action::Green) => res,
        _ => res.and(cube.close()),
    }
}

pub fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{}", USAGE);
        return;
    }

    if let Err(e) = run(&args) {
        error!("{}", e);
        eprintln!("{}", USAGE);
        process::exit(1);
    }
}
