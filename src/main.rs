use std::env;
use std::fs;
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::process;

use zx0x7::{zx0, zx7};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn usage(program_name: String) -> ! {
    eprintln!("Usage: {} [OPTIONS] INPUT [OUTPUT]", program_name.rsplit('/').next().unwrap());
    eprintln!();
    eprintln!("Options:");
    eprintln!("    -h, --help          Display this message");
    eprintln!("    -V, --version       Print version info and exit");
    eprintln!("    -f, --force         Force overwrite of output file");
    eprintln!("    -F, --format FMT    Output format: zx0 (default) or zx7");
    eprintln!("    -c, --classic       ZX0 classic file format (v1.*)");
    eprintln!("    -b, --backwards     Compress backwards");
    eprintln!("    -q, --quick         ZX0 quick non-optimal compression");
    eprintln!("    -Q, --quiet         Do not show any progress or summary information");
    eprintln!("    -s, --skip AMOUNT   Skip AMOUNT bytes of input data");

    process::exit(1);
}

fn version() -> ! {
    eprintln!("zx0x7 {VERSION}\nBased on ZX0 and ZX7 by Einar Saukas");
    process::exit(1);
}

enum Format {
    Zx0,
    Zx7,
}

fn main() {
    env_logger::init();

    let mut format = Format::Zx0;
    let mut zx0_compressor = zx0::Compressor::new();
    let mut zx7_compressor = zx7::Zx7Compressor::new();

    let mut input_filename = None;
    let mut output_filename = None;

    let mut backwards_mode = false;
    let mut forced_mode = false;
    let mut quiet_mode = false;

    let mut skip = 0;

    let mut iter = env::args();
    let program_name = iter.next().unwrap_or_else(|| {
        eprintln!("error: expected at least one argument containing the program name");
        process::exit(1);
    });

    while let Some(argument) = iter.next() {
        match argument.as_str() {
            "-c" | "--classic" => { zx0_compressor.classic_mode(true); },
            "-b" | "--backwards" => {
                backwards_mode = true;
                zx0_compressor.backwards_mode(true);
            },
            "-q" | "--quick" => { zx0_compressor.quick_mode(true); },
            "-f" | "--force" => { forced_mode = true; },
            "-Q" | "--quiet" => { quiet_mode = true; },
            "-h" | "--help" => usage(program_name),
            "-V" | "--version" => version(),
            "-F" | "--format" => {
                match iter.next().as_deref() {
                    Some("zx0") => format = Format::Zx0,
                    Some("zx7") => format = Format::Zx7,
                    Some(other) => {
                        eprintln!("error: unrecognized format: {other}");
                        process::exit(1);
                    }
                    None => {
                        eprintln!("error: expected value for format argument");
                        process::exit(1);
                    }
                }
            }
            "-s" | "--skip" => {
                if let Some(argument) = iter.next() {
                    if let Ok(value) = argument.parse() {
                        skip = value;
                        zx0_compressor.skip(value);
                        zx7_compressor.skip(value);
                    } else {
                        eprintln!("error: expected integer value for skip argument");
                        process::exit(1);
                    }
                } else {
                    eprintln!("error: expected value for skip argument");
                    process::exit(1);
                }
            }
            _ => {
                if argument.starts_with('-') {
                    eprintln!("error: unrecognized argument: {argument}");
                    process::exit(1);
                } else if input_filename.is_none() {
                    input_filename = Some(argument);
                } else if output_filename.is_none() {
                    output_filename = Some(argument);
                } else {
                    eprintln!("error: too many filename arguments provided");
                    process::exit(1);
                }
            }
        }
    }

    let input_filename = input_filename.unwrap_or_else(|| usage(program_name));
    let extension = match format {
        Format::Zx0 => "zx0",
        Format::Zx7 => "zx7",
    };
    let output_filename = output_filename.unwrap_or_else(|| format!("{input_filename}.{extension}"));

    let mut input = fs::read(&input_filename).unwrap_or_else(|err| {
        eprintln!("error: could not read input file: {err}");
        process::exit(1);
    });

    if input.is_empty() {
        eprintln!("error: input file is empty");
        process::exit(1);
    }

    if skip >= input.len() {
        eprintln!("error: skipping entire input file");
        process::exit(1);
    }

    if matches!(format, Format::Zx7) && backwards_mode {
        eprintln!("error: backwards mode is not supported for ZX7");
        process::exit(1);
    }

    if !forced_mode {
        match File::open(&output_filename) {
            Ok(_) => {
                eprintln!("error: output file already exists and --force was not specified");
                process::exit(1);
            },
            Err(err) if err.kind() == ErrorKind::NotFound => (),
            Err(err) => {
                eprintln!("error: could not open output file: {err}");
                process::exit(1);
            }
        };
    }

    if backwards_mode {
        input.reverse();
    }

    let print_progress = |progress: f32| {
        print!("\rProgress: {:.1} %", progress * 100.0);

        if let Err(err) = std::io::stdout().flush() {
            eprintln!("error: could not flush stdout: {err}");
            process::exit(1);
        }
    };

    if !quiet_mode {
        match format {
            Format::Zx0 => {
                zx0_compressor.progress_callback(print_progress);
            }
            Format::Zx7 => {
                zx7_compressor.progress_callback(print_progress);
            }
        }
    }

    let mut result = match format {
        Format::Zx0 => zx0_compressor.compress(&input),
        Format::Zx7 => zx7_compressor.compress(&input),
    }
    .unwrap_or_else(|err| {
        eprintln!("error: compression failed: {err}");
        process::exit(1);
    });

    if backwards_mode {
        result.output.reverse();
    }

    if let Err(err) = fs::write(&output_filename, &result.output) {
        eprintln!("error: could not write to output file: {err}");
        process::exit(1);
    }

    let ratio = input.len() as f32 / result.output.len() as f32;

    log::info!(
        "{} ({} bytes) -> {} ({} bytes), ratio = {ratio:.3}, delta = {}",
        input_filename,
        input.len(),
        output_filename,
        result.output.len(),
        result.delta
    );

    if !quiet_mode {
        println!(
            "\r{} ({} bytes) -> {} ({} bytes), ratio = {:.3}, delta = {}",
            input_filename,
            input.len(),
            output_filename,
            result.output.len(),
            ratio,
            result.delta
        );
    }
}
