use std::io::{self, BufWriter};
use std::process;

use structopt::StructOpt;

use bline::cliopt::CliOpt;
use bline::error::Result;
use bline::runner::Runner;

fn main() {
    let opt = CliOpt::from_args();

    let level = if opt.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(err) = run(&opt) {
        eprintln!("bline: {}", err);
        process::exit(1);
    }
}

fn run(opt: &CliOpt) -> Result<()> {
    let stdout = io::stdout();
    let mut runner = Runner::new(opt, BufWriter::new(stdout.lock()))?;
    runner.run(&opt.files)
}
