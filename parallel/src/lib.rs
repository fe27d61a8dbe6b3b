use std::path::{Path, PathBuf};
use structopt::StructOpt;
use uuid::Uuid;

mod job;
mod pool;

pub use job::{Job, JobReport};

#[derive(StructOpt, Debug, Clone)]
pub struct JobConfig {
    #[structopt(short, long)]
    pub input_files: Vec<PathBuf>,
    #[structopt(short = "r", long, default_value = "10")]
    pub n_reduce: u64,
    /// Defaults to the number of logical cores.
    #[structopt(short, long)]
    pub workers: Option<usize>,
    /// Lines per map task.
    #[structopt(long, default_value = "10000")]
    pub split_lines: usize,
    #[structopt(short, long, default_value = "out")]
    pub output_dir: PathBuf,
}

impl JobConfig {
    pub fn workers(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).max(1)
    }
}

pub fn temp_file(dir: &Path) -> PathBuf {
    dir.join(format!("mr-tmp-{}", Uuid::new_v4()))
}
