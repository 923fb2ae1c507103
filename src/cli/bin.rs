#[macro_use]
extern crate log;

use anyhow::{Context, Result as AnyResult};
use clap::{value_parser, Arg, ArgMatches, Command};
use dsstore::{build_info, tools, Store};
use log::LevelFilter;

fn main() {
    let matches = prepare_matches();
    init_logger(matches.get_one::<bool>("verbose").copied().unwrap_or(false));
    debug!("{}", build_info::build_info());
    if let Err(e) = run(&matches) {
        error!("{:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_module("dsstore", level)
        .parse_default_env()
        .init();
}

fn run(matches: &ArgMatches) -> AnyResult<()> {
    match matches.subcommand() {
        Some(("dump", sub)) => dump(path_arg(sub, "path")?),
        Some(("check", sub)) => {
            let path = path_arg(sub, "path")?;
            let count = tools::validate_store(path)?;
            println!("{}: ok, {} records", path, count);
            Ok(())
        }
        Some(("rewrite", sub)) => {
            let mode = sub
                .get_one::<u32>("mode")
                .copied()
                .unwrap_or(tools::DEFAULT_MODE);
            let count =
                tools::rewrite_store(path_arg(sub, "input")?, path_arg(sub, "output")?, mode)?;
            println!("{} records written", count);
            Ok(())
        }
        _ => Err(anyhow::anyhow!("no subcommand given")),
    }
}

fn path_arg<'a>(matches: &'a ArgMatches, name: &str) -> AnyResult<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing argument {}", name))
}

fn dump(path: &str) -> AnyResult<()> {
    let store = Store::read_file(path).with_context(|| format!("read {}", path))?;
    for record in store.records() {
        let value = match record.value.to_string_lossy() {
            Some(text) => format!("{:?}", text),
            None => format!("{:?}", record.value),
        };
        println!("{:<32} {} {}", record.owner, record.record_type(), value);
    }
    Ok(())
}

fn parse_mode(s: &str) -> Result<u32, String> {
    u32::from_str_radix(s.trim_start_matches("0o"), 8).map_err(|e| e.to_string())
}

fn prepare_matches() -> ArgMatches {
    let path = || Arg::new("path").required(true).value_parser(value_parser!(String));
    Command::new("dsstore")
        .version(build_info::version())
        .about("Inspect and rebuild .DS_Store containers")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .help("debug logging"),
        )
        .subcommand(
            Command::new("dump")
                .about("print every record")
                .arg(path()),
        )
        .subcommand(
            Command::new("check")
                .about("validate a container and count its records")
                .arg(path()),
        )
        .subcommand(
            Command::new("rewrite")
                .about("read a container and write it rebuilt from scratch")
                .arg(Arg::new("input").required(true).value_parser(value_parser!(String)))
                .arg(Arg::new("output").required(true).value_parser(value_parser!(String)))
                .arg(
                    Arg::new("mode")
                        .short('m')
                        .long("mode")
                        .takes_value(true)
                        .value_parser(parse_mode)
                        .help("octal permission bits of the new file, 644 by default"),
                ),
        )
        .get_matches()
}
