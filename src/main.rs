//Enable more cargo lint tests
#![warn(rust_2018_idioms)]

use log::{info, warn, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};

use bzip2_enc::compression::compress::compress;
use bzip2_enc::tools::cli::bzopts_init;

fn main() -> Result<(), std::io::Error> {
    // Available log levels are Error, Warn, Info, Debug, Trace; the CLI
    // lowers the max level from the verbosity flags.
    TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stdout,
        simplelog::ColorChoice::AlwaysAnsi,
    )
    .unwrap();

    let options = bzopts_init();
    if options.files.is_empty() {
        warn!("No input files given. Try --help.");
        return Ok(());
    }

    let result = compress(&options);
    info!("Done.\n");
    result
}
