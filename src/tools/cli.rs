use std::process::exit;

/// Verbosity of user information
#[derive(Debug)]
pub enum Verbosity {
    Quiet,
    Errors,
    Warnings,
    Info,
    Debug,
    Trace,
}

#[derive(Debug)]
pub struct BzOpts {
    /// Block size in 100k units (1-9) used for each compression block
    pub block_size: usize,
    /// Names of files to read for input
    pub files: Vec<String>,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Don't remove input files after processing
    pub keep_input_files: bool,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl BzOpts {
    pub fn new() -> Self {
        Self {
            block_size: 9,
            files: vec![],
            force_overwrite: false,
            keep_input_files: false,
            verbose: Verbosity::Errors,
        }
    }
}

impl Default for BzOpts {
    fn default() -> Self {
        Self::new()
    }
}

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse the command line into a BzOpts and set the log level.
pub fn bzopts_init() -> BzOpts {
    let mut cli = BzOpts::new();

    let args = std::env::args().skip(1);
    for mut arg in args {
        if arg.starts_with("--") {
            match arg.as_str() {
                "--help" => help(),
                "--keep" => cli.keep_input_files = true,
                "--force" => cli.force_overwrite = true,
                "--quiet" => cli.verbose = Verbosity::Quiet,
                "--verbose" => cli.verbose = Verbosity::Info,
                "--version" => version(),
                "--fast" => cli.block_size = 1,
                "--best" => cli.block_size = 9,

                other => eprintln!("Unexpected command line argument: {}", other),
            }
        } else if arg.starts_with('-') {
            arg.remove(0);
            while !arg.is_empty() {
                // A run of v's sets the verbosity level; count them first so
                // -vvv parses as one flag.
                if arg.starts_with('v') {
                    let verbosity = arg.chars().take_while(|&c| c == 'v').count();
                    cli.verbose = match verbosity {
                        1 => Verbosity::Warnings,
                        2 => Verbosity::Info,
                        3 => Verbosity::Debug,
                        _ => Verbosity::Trace,
                    };
                    arg.drain(..verbosity);
                    continue;
                }
                match arg.remove(0) {
                    'h' => help(),
                    'k' => cli.keep_input_files = true,
                    'f' => cli.force_overwrite = true,
                    'q' => cli.verbose = Verbosity::Quiet,
                    'V' => version(),
                    digit @ '1'..='9' => cli.block_size = digit as usize - '0' as usize,
                    other => {
                        eprintln!("Unexpected command line argument: {}", other);
                        help()
                    }
                }
            }
        } else {
            cli.files.push(arg);
        };
    }

    // Set the log level
    match cli.verbose {
        Verbosity::Quiet => log::set_max_level(log::LevelFilter::Off),
        Verbosity::Errors => log::set_max_level(log::LevelFilter::Error),
        Verbosity::Warnings => log::set_max_level(log::LevelFilter::Warn),
        Verbosity::Info => log::set_max_level(log::LevelFilter::Info),
        Verbosity::Debug => log::set_max_level(log::LevelFilter::Debug),
        Verbosity::Trace => log::set_max_level(log::LevelFilter::Trace),
    };
    cli
}

/// Prints help information
fn help() {
    println!(
        "
   usage: bzip2-enc [flags and input files in any order]

   -h --help           print this message
   -k --keep           keep (don't delete) input files
   -f --force          overwrite existing output files
   -q --quiet          suppress noncritical error messages
   -v --verbose        be verbose (a 2nd -v gives more)
   -V --version        display software version
   -1 .. -9            set block size to 100k .. 900k
   --fast              alias for -1
   --best              alias for -9

   Each named file is compressed to <file>.bz2. You can combine
   short flags, so `-v -4' means the same as -v4 or -4v, &c.
   "
    );
    exit(0);
}

fn version() {
    println!("Version: {}, written in Rust", VERSION);
    exit(0);
}
