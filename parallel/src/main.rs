use common::{init_logger, load_app, AppContext, Result};
use log::info;
use parallel::{Job, JobConfig};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
struct Opt {
    #[structopt(short, long)]
    app_name: PathBuf,
    /// Side files for the app, in the order it expects them.
    #[structopt(short, long)]
    cache_files: Vec<PathBuf>,
    #[structopt(flatten)]
    job: JobConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();

    let Opt {
        app_name,
        cache_files,
        job,
    } = Opt::from_args();
    let app = load_app(&app_name, &AppContext::new(cache_files))?;

    let report = Job::new(app.app(), job).run().await?;
    for output in &report.outputs {
        info!("output: {}", output.display());
    }
    for (name, count) in &report.counters {
        info!("counter {}: {}", name, count);
    }
    Ok(())
}
