use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use midly::Smf;

use gm1tosn::dtype::SnError;
use gm1tosn::fileutils::{self, VERSION};
use gm1tosn::rewrite::convert_smf;
use gm1tosn::sysex::SysexBank;
use gm1tosn::tones::validate_tables;

#[derive(Parser)]
#[command(version = VERSION, about = "Convert GM1 MIDI files to use Integra-7 SuperNATURAL tones", long_about = None)]
struct Cli {
    /// Input MIDI file(s) or glob pattern(s)
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<String>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    // A broken mapping table is a programming error; refuse to run rather
    // than mis-select tones mid-file.
    if let Err(e) = validate_tables() {
        eprintln!("{}{}", "Error: ".red(), e);
        std::process::exit(1);
    }

    let input_files = match fileutils::expand_input_patterns(&cli.inputs) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("{}{}", "Error: ".red(), e);
            std::process::exit(1);
        }
    };
    if input_files.is_empty() {
        eprintln!("{}", "No input files specified".red());
        std::process::exit(1);
    }
    println!("Found {} file(s) to process", input_files.len());

    let sysex = SysexBank::new();
    for (i, input_file) in input_files.iter().enumerate() {
        print!(
            "Converting {} ({}/{})... ",
            input_file.display(),
            i + 1,
            input_files.len()
        );
        // Failures stay local to one file; the rest of the batch continues.
        match convert_file(input_file, &sysex) {
            Ok(output_file) => println!("{} -> {}", "done!".green(), output_file.display()),
            Err(e) => println!("{}{}", "Error: ".red(), e),
        }
    }
}

fn convert_file(input_file: &Path, sysex: &SysexBank) -> Result<PathBuf, SnError> {
    let output_file = fileutils::output_path_for(input_file)?;

    let source = std::fs::read(input_file)?;
    let smf = Smf::parse(&source).map_err(|e| SnError::SmfParseError(e.to_string()))?;
    log::debug!(
        "parsed {} with {} track(s)",
        input_file.display(),
        smf.tracks.len()
    );

    let converted = convert_smf(&smf, sysex)?;

    let mut bytes = Vec::new();
    converted
        .write_std(&mut bytes)
        .map_err(|e| SnError::SmfWriteFailed(output_file.clone(), e.to_string()))?;
    fileutils::write_replacing(&bytes, &output_file)?;
    Ok(output_file)
}
