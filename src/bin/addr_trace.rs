use std::path::PathBuf;
use std::process::ExitCode;

use addrtrace::{
    address::AddressRecord,
    config::{JobFile, TraceJob},
    error::Result,
    pattern::{
        PatternSpec, DEFAULT_ADDRESS_RANGE, DEFAULT_LOOPING_COUNT, DEFAULT_RANDOM_COUNT,
        DEFAULT_REPEATED_COUNT, DEFAULT_SEQUENTIAL_COUNT, DEFAULT_SEQUENTIAL_START,
        DEFAULT_LOOP_SET, DEFAULT_SEQUENTIAL_STEP, DEFAULT_WORKING_SET,
    },
};
use clap::{Args, Parser, Subcommand};

/// Generates synthetic memory address traces as single-column CSV files.
/// Address flags take `0x`-prefixed hex or decimal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct TraceGenConfig {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Addresses increasing by a fixed stride.
    Sequential(SequentialArgs),
    /// A fixed set of addresses replayed cyclically.
    Looping(LoopingArgs),
    /// Uniform random addresses in [0, range].
    Random(RandomArgs),
    /// A random working set replayed cyclically.
    Repeated(RepeatedArgs),
    /// Run every job in a JSON job file.
    Batch {
        /// Path to the job file.
        job_file: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct SequentialArgs {
    /// First address.
    #[arg(short, long, default_value_t = AddressRecord::new(DEFAULT_SEQUENTIAL_START))]
    pub start: AddressRecord,
    /// Number of addresses.
    #[arg(short = 'n', long, default_value_t = DEFAULT_SEQUENTIAL_COUNT)]
    pub count: usize,
    /// Stride in bytes.
    #[arg(long, default_value_t = DEFAULT_SEQUENTIAL_STEP)]
    pub step: u64,
    /// Output file. Defaults to sequential_access.csv.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct LoopingArgs {
    /// Comma-separated loop set.
    #[arg(
        short,
        long,
        value_delimiter = ',',
        default_values_t = DEFAULT_LOOP_SET.map(AddressRecord::new)
    )]
    pub addresses: Vec<AddressRecord>,
    /// Number of addresses.
    #[arg(short = 'n', long, default_value_t = DEFAULT_LOOPING_COUNT)]
    pub count: usize,
    /// Output file. Defaults to looping_access.csv.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RandomArgs {
    /// Number of addresses.
    #[arg(short = 'n', long, default_value_t = DEFAULT_RANDOM_COUNT)]
    pub count: usize,
    /// Inclusive upper bound of the address range.
    #[arg(short, long, default_value_t = AddressRecord::new(DEFAULT_ADDRESS_RANGE))]
    pub range: AddressRecord,
    /// Seed for a reproducible trace. Unseeded runs differ every time.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Output file. Defaults to random_access.csv.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RepeatedArgs {
    /// Size of the random working set.
    #[arg(short, long, default_value_t = DEFAULT_WORKING_SET)]
    pub working_set: usize,
    /// Number of addresses.
    #[arg(short = 'n', long, default_value_t = DEFAULT_REPEATED_COUNT)]
    pub count: usize,
    /// Inclusive upper bound of the address range.
    #[arg(short, long, default_value_t = AddressRecord::new(DEFAULT_ADDRESS_RANGE))]
    pub range: AddressRecord,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Output file. Defaults to repeated_access.csv.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Command {
    fn into_jobs(self) -> Result<Vec<TraceJob>> {
        let single = match self {
            Command::Sequential(args) => TraceJob::with_output(
                PatternSpec::Sequential {
                    start: args.start,
                    count: args.count,
                    step: args.step,
                },
                args.output,
            ),
            Command::Looping(args) => TraceJob::with_output(
                PatternSpec::Looping {
                    addresses: args.addresses,
                    count: args.count,
                },
                args.output,
            ),
            Command::Random(args) => TraceJob::with_output(
                PatternSpec::Random {
                    count: args.count,
                    range: args.range,
                    seed: args.seed,
                },
                args.output,
            ),
            Command::Repeated(args) => TraceJob::with_output(
                PatternSpec::Repeated {
                    working_set: args.working_set,
                    count: args.count,
                    range: args.range,
                    seed: args.seed,
                },
                args.output,
            ),
            Command::Batch { job_file } => return Ok(JobFile::load(&job_file)?.jobs),
        };
        Ok(vec![single])
    }
}

fn run(config: TraceGenConfig) -> Result<()> {
    for job in config.command.into_jobs()? {
        let count = job.run()?;
        println!(
            "{} access CSV created: {} addresses -> {}",
            job.pattern.name(),
            count,
            job.output.display()
        );
    }
    Ok(())
}

pub fn main() -> ExitCode {
    env_logger::init();
    let config = TraceGenConfig::parse();

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        TraceGenConfig::command().debug_assert();
    }

    #[test]
    fn test_defaults_match_library() {
        let config = TraceGenConfig::parse_from(["addr_trace", "looping"]);
        let jobs = config.command.into_jobs().unwrap();
        assert_eq!(jobs, vec![TraceJob::with_default_output(PatternSpec::looping())]);

        let config = TraceGenConfig::parse_from(["addr_trace", "sequential"]);
        let jobs = config.command.into_jobs().unwrap();
        assert_eq!(jobs, vec![TraceJob::with_default_output(PatternSpec::sequential())]);
    }

    #[test]
    fn test_hex_and_decimal_flags() {
        let config = TraceGenConfig::parse_from([
            "addr_trace",
            "random",
            "-n",
            "10",
            "--range",
            "0xFF",
            "--seed",
            "3",
            "-o",
            "r.csv",
        ]);
        let jobs = config.command.into_jobs().unwrap();
        assert_eq!(
            jobs[0].pattern,
            PatternSpec::Random {
                count: 10,
                range: AddressRecord::new(0xFF),
                seed: Some(3)
            }
        );
        assert_eq!(jobs[0].output, PathBuf::from("r.csv"));

        let config = TraceGenConfig::parse_from([
            "addr_trace",
            "sequential",
            "--start",
            "4096",
            "--step",
            "8",
        ]);
        let jobs = config.command.into_jobs().unwrap();
        assert_eq!(
            jobs[0].pattern,
            PatternSpec::Sequential {
                start: AddressRecord::new(0x1000),
                count: DEFAULT_SEQUENTIAL_COUNT,
                step: 8
            }
        );
    }

    #[test]
    fn test_bad_address_flag_is_rejected() {
        let result = TraceGenConfig::try_parse_from(["addr_trace", "random", "--range", "0xZZ"]);
        assert!(result.is_err());
    }
}
