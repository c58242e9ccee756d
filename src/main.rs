use clap::{Arg, ArgMatches, Command};
use colored::*;
use log::{error, info};
use std::path::Path;

mod assign;
mod cli;
mod emit;
mod error;
mod network;
mod parser;
mod pipeline;
mod resolve;

use crate::cli::CliArgs;
use crate::pipeline::{Converter, ConverterConfig};

fn main() {
    env_logger::init();

    let matches = create_cli().get_matches();

    if let Err(e) = run_application(&matches) {
        error!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

fn create_cli() -> Command {
    Command::new("lpngen")
        .version("0.1.0")
        .about("Converts lumped parameter network descriptions into 0D solver input files")
        .author("lpngen developers")
        .arg(
            Arg::new("input")
                .help("Input LPN description file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("out-dir")
                .short('o')
                .long("out-dir")
                .value_name("DIR")
                .default_value(".")
                .help("Directory receiving the three solver input files"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .value_name("FILE")
                .help("Also dump the resolved tables as JSON"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::Count)
                .help("Increase verbosity level"),
        )
}

fn run_application(matches: &ArgMatches) -> anyhow::Result<()> {
    let args = CliArgs::from_matches(matches)?;

    info!("{}", "Starting lpngen".green().bold());
    info!("Input file: {}", args.input_file.bright_blue());

    // Validate input file exists
    if !Path::new(&args.input_file).exists() {
        return Err(anyhow::anyhow!("Input file '{}' not found", args.input_file));
    }

    let mut converter = Converter::with_config(ConverterConfig {
        out_dir: args.out_dir.clone(),
    });
    converter.load_description(&args.input_file)?;
    converter.assign_ids()?;
    converter.write_outputs()?;

    if let Some(json_file) = &args.json_file {
        converter.export_json(json_file)?;
        info!("Tables exported to: {}", json_file.display().to_string().bright_green());
    }

    converter.print_summary();

    info!("{}", "Conversion completed successfully!".green().bold());
    Ok(())
}
