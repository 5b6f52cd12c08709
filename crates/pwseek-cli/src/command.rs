use std::{fs, path::PathBuf};

use clap::Subcommand;
use pwseek_bestcrypt::{kernel, record, BestCryptVe4};
use pwseek_common::{
    format::HashFormat,
    resource::{DeviceDescriptor, TuneOverrides},
};
use tracing::{error, info};

use crate::error::Error;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a hash file and print the digest pre-filter of each record
    Decode {
        /// Hash file, one record per line
        #[arg(long)]
        hashes: PathBuf,
    },
    /// Round-trip every record in a hash file through decode and encode
    Encode {
        /// Hash file, one record per line
        #[arg(long)]
        hashes: PathBuf,
    },
    /// Compute the tuning decision for a device
    Tune {
        /// DeviceDescriptor JSON file
        #[arg(long)]
        device: PathBuf,

        /// Force the acceleration factor
        #[arg(long)]
        accel: Option<u32>,

        /// Force the time-memory trade-off exponent
        #[arg(long)]
        tmto: Option<u32>,

        /// Force the dispatch thread count
        #[arg(long)]
        threads: Option<u32>,
    },
}

impl Commands {
    pub fn run(self) -> Result<(), Error> {
        let format = BestCryptVe4::default();

        match self {
            Self::Decode { hashes } => {
                let records = load_records(&format, &hashes)?;

                for record in &records {
                    let [d0, d1, d2, d3] = record.digest();
                    println!("{d0:08x}{d1:08x}{d2:08x}{d3:08x}");
                }

                info!(count = records.len(), "decoded records");
            }
            Self::Encode { hashes } => {
                let contents = fs::read_to_string(&hashes)?;

                for (number, line) in numbered_lines(&contents) {
                    let record = format.decode(line)?;
                    let encoded = format.encode(&record);

                    if encoded != line {
                        error!(line = number, "record does not round-trip");
                    } else {
                        println!("{encoded}");
                    }
                }
            }
            Self::Tune {
                device,
                accel,
                tmto,
                threads,
            } => {
                let device: DeviceDescriptor = serde_json::from_slice(&fs::read(device)?)?;

                let overrides = TuneOverrides {
                    concurrency: accel,
                    tmto,
                    threads,
                };

                let decision = format.tune(&device, &overrides);
                let buffer_size = kernel::extra_buffer_size(format.params(), &decision);

                print!("{}", format.tuningdb_line(&device, &decision));
                println!("extra_buffer_size={buffer_size}");
                println!(
                    "{}",
                    kernel::jit_build_options(format.params(), &decision, buffer_size)?
                );
            }
        }

        Ok(())
    }
}

/// Decode every record in the file, skipping malformed lines with a
/// line-level diagnostic. Fails only when nothing decodes.
fn load_records(
    format: &BestCryptVe4,
    hashes: &PathBuf,
) -> Result<Vec<record::HashRecord>, Error> {
    let contents = fs::read_to_string(hashes)?;
    let mut records = Vec::new();

    for (number, line) in numbered_lines(&contents) {
        match format.decode(line) {
            Ok(record) => records.push(record),
            Err(err) => error!(line = number, %err, "skipping record"),
        }
    }

    if records.is_empty() {
        return Err(Error::EmptyHashFile(hashes.clone()));
    }

    Ok(records)
}

fn numbered_lines(contents: &str) -> impl Iterator<Item = (usize, &str)> {
    contents
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end()))
        .filter(|(_, line)| !line.is_empty())
}
