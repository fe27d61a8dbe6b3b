use common::{init_logger, load_app, AppContext, Counters, Result};
use log::info;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
struct Opt {
    #[structopt(short, long)]
    app_name: PathBuf,
    #[structopt(short, long)]
    input_files: Vec<PathBuf>,
    /// Side files for the app, in the order it expects them.
    #[structopt(short, long)]
    cache_files: Vec<PathBuf>,
    #[structopt(short, long, default_value = "mr-out-0")]
    output: PathBuf,
}

fn main() -> Result<()> {
    init_logger();

    let opt = Opt::from_args();
    let app = load_app(&opt.app_name, &AppContext::new(opt.cache_files.clone()))?;

    let counters = Counters::new();
    sequential::run(app.as_ref(), &opt.input_files, &opt.output, &counters)?;

    for (name, count) in counters.snapshot() {
        info!("counter {}: {}", name, count);
    }
    Ok(())
}
