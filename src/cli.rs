use anyhow::{anyhow, Result};
use clap::ArgMatches;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub input_file: String,
    pub out_dir: PathBuf,
    pub json_file: Option<PathBuf>,
    pub verbose_level: u8,
}

impl CliArgs {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let input_file = matches
            .get_one::<String>("input")
            .ok_or_else(|| anyhow!("Input file is required"))?
            .clone();

        let out_dir = PathBuf::from(matches.get_one::<String>("out-dir").unwrap());

        let json_file = matches.get_one::<String>("json").map(PathBuf::from);

        let verbose_level = matches.get_count("verbose");

        Ok(CliArgs {
            input_file,
            out_dir,
            json_file,
            verbose_level,
        })
    }
}
