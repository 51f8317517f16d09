use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use log::debug;
use nix::unistd::Pid;
use slow::throttle;
use slow::throttle::config::{parse_duty_cycle, parse_time_slice};
use slow::throttle::process::parse_pid;
use slow::throttle::{DutyCycleConfig, TargetSource};
use std::io::{self, Write};
use std::process;
use std::time::Duration;

/// Exit status of help and version output.
const INFO_EXIT_CODE: i32 = 1;

#[derive(Parser, Debug)]
#[command(
    name = "slow",
    about,
    override_usage = "slow [-p pid] [-d dutyCycle] [-t timeSlice] [program [args]]",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Args {
    /// Pid of the process to slow; if not present, a program to run must be given
    #[arg(short = 'p', value_name = "pid", allow_negative_numbers = true, value_parser = parse_pid)]
    pid: Option<Pid>,

    /// 0 < dutyCycle <= 1 - portion of time to allow process to run
    #[arg(
        short = 'd',
        value_name = "dutyCycle",
        env = "SLOW_DUTY_CYCLE",
        default_value = "0.5",
        allow_negative_numbers = true,
        value_parser = parse_duty_cycle
    )]
    duty_cycle: f64,

    /// The length of one stop/run cycle in seconds
    #[arg(
        short = 't',
        value_name = "timeSlice",
        env = "SLOW_TIME_SLICE",
        default_value = "1",
        allow_negative_numbers = true,
        value_parser = parse_time_slice
    )]
    time_slice: Duration,

    /// Version info
    #[arg(short = 'v', action = ArgAction::SetTrue)]
    version: bool,

    /// Help
    #[arg(short = 'h', short_alias = '?', action = ArgAction::SetTrue)]
    help: bool,

    /// Program to run and slow, with its arguments
    #[arg(trailing_var_arg = true, value_name = "program")]
    command: Vec<String>,
}

fn version_text() -> String {
    format!(
        "slow v{}\nCopyright {}\n{}",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_AUTHORS").replace(':', ", "),
        env!("CARGO_PKG_REPOSITORY")
    )
}

/// Print usage and exit with [`INFO_EXIT_CODE`].
fn show_help() -> anyhow::Result<()> {
    Args::command().print_help()?;
    io::stdout().flush()?;
    process::exit(INFO_EXIT_CODE);
}

fn main() -> anyhow::Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        // unknown options show usage, like -h does
        Err(e) if e.kind() == ErrorKind::UnknownArgument => return show_help(),
        Err(e) => e.exit(),
    };
    env_logger::init();

    if args.help {
        return show_help();
    }
    if args.version {
        println!("{}", version_text());
        io::stdout().flush()?;
        process::exit(INFO_EXIT_CODE);
    }

    let config = DutyCycleConfig::new(args.duty_cycle, args.time_slice)?;

    let source = match TargetSource::from_args(args.pid, &args.command) {
        Ok(source) => source,
        Err(e) => {
            println!("slow: {e}");
            return Ok(());
        }
    };
    let target = source.acquire()?;

    let outcome = throttle::slow(target, config)?;
    debug!(target: "slow", "session end: {outcome}");

    Ok(())
}
