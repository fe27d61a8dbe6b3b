use crate::{
    pool::{queue, run_pool},
    temp_file, JobConfig,
};
use common::{combine, format_kv, partition, reduce_groups, App, Counters, KeyValue, Result};
use dashmap::DashMap;
use eyre::{ensure, eyre, WrapErr};
use itertools::Itertools;
use log::{debug, info};
use std::{
    collections::BTreeMap,
    mem,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{
    fs::{self, File},
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    sync::mpsc,
};

const OUTPUT_PREFIX: &str = "mr-out-";

#[derive(Debug)]
struct MapTask {
    index: u64,
    source: String,
    contents: String,
}

#[derive(Debug)]
pub struct JobReport {
    /// One file per non-empty reduce partition.
    pub outputs: Vec<PathBuf>,
    pub counters: BTreeMap<String, u64>,
}

/// A map/reduce run inside one process. Input splits stream to the map
/// workers, which pre-aggregate them with the app's combiner and hand the
/// partial results to their key's partition in memory. Reduce tasks merge one
/// partition each and write it out.
pub struct Job {
    app: Arc<dyn App>,
    config: JobConfig,
    counters: Arc<Counters>,
    partitions: DashMap<u64, Vec<KeyValue>>,
}

impl Job {
    pub fn new(app: Arc<dyn App>, config: JobConfig) -> Self {
        Self {
            app,
            config,
            counters: Arc::new(Counters::new()),
            partitions: DashMap::new(),
        }
    }

    pub async fn run(self) -> Result<JobReport> {
        ensure!(self.config.n_reduce > 0, "n_reduce must be positive");
        ensure!(self.config.split_lines > 0, "split_lines must be positive");
        fs::create_dir_all(&self.config.output_dir)
            .await
            .wrap_err_with(|| format!("failed to create {}", self.config.output_dir.display()))?;

        let workers = self.config.workers();
        info!("map phase on {} workers", workers);

        let (tx, rx) = mpsc::channel(workers * 2);
        let producer = tokio::spawn(split_inputs(
            self.config.input_files.clone(),
            self.config.split_lines,
            tx,
        ));

        let job = Arc::new(self);
        let map_job = Arc::clone(&job);
        let mapped = run_pool(workers, rx, move |task| {
            let job = Arc::clone(&map_job);
            async move { job.run_map(task).await }
        })
        .await;
        if mapped.is_err() {
            producer.abort();
        }
        mapped?;
        let n_splits = producer.await??;

        let reduce_tasks = job
            .partitions
            .iter()
            .map(|entry| *entry.key())
            .sorted()
            .collect_vec();
        let outputs = reduce_tasks
            .iter()
            .map(|&index| job.output_path(index))
            .collect_vec();
        info!(
            "map done: {} splits, reduce phase: {} tasks",
            n_splits,
            reduce_tasks.len()
        );

        remove_outputs(&job.config.output_dir).await?;

        let reduce_job = Arc::clone(&job);
        run_pool(workers, queue(reduce_tasks), move |index| {
            let job = Arc::clone(&reduce_job);
            async move { job.run_reduce(index).await }
        })
        .await?;
        info!("all done");

        Ok(JobReport {
            outputs,
            counters: job.counters.snapshot(),
        })
    }

    fn output_path(&self, index: u64) -> PathBuf {
        self.config
            .output_dir
            .join(format!("{}{}", OUTPUT_PREFIX, index))
    }

    async fn run_map(&self, task: MapTask) -> Result<()> {
        let MapTask {
            index,
            source,
            contents,
        } = task;
        debug!("map task {} from {}", index, source);

        let app = Arc::clone(&self.app);
        let counters = Arc::clone(&self.counters);
        let n_reduce = self.config.n_reduce;
        let partitions = tokio::task::spawn_blocking(move || -> Result<Vec<Vec<KeyValue>>> {
            let kvs = app.map(source, contents, &counters);
            let kvs = combine(app.as_ref(), kvs)?;

            let mut partitions = vec![Vec::new(); n_reduce as usize];
            for kv in kvs {
                partitions[partition(&kv.0, n_reduce) as usize].push(kv);
            }
            Ok(partitions)
        })
        .await??;

        for (reducer, kvs) in partitions.into_iter().enumerate() {
            if !kvs.is_empty() {
                self.partitions
                    .entry(reducer as u64)
                    .or_default()
                    .extend(kvs);
            }
        }
        Ok(())
    }

    async fn run_reduce(&self, index: u64) -> Result<()> {
        let kvs = self
            .partitions
            .remove(&index)
            .map(|(_, kvs)| kvs)
            .unwrap_or_default();

        let app = Arc::clone(&self.app);
        let reduced =
            tokio::task::spawn_blocking(move || reduce_groups(app.as_ref(), kvs)).await??;

        let (temp_path, output_path) = (
            temp_file(&self.config.output_dir),
            self.output_path(index),
        );
        write_kvs(&temp_path, &reduced).await?;
        fs::rename(&temp_path, &output_path)
            .await
            .wrap_err_with(|| format!("failed to write {}", output_path.display()))?;

        debug!("reduce task {} wrote {} keys", index, reduced.len());
        Ok(())
    }
}

/// Cuts every input into splits of `split_lines` lines and sends them as map
/// tasks. Lines are decoded one by one, invalid UTF-8 is replaced rather than
/// failing the split. Returns the number of splits sent.
async fn split_inputs(
    files: Vec<PathBuf>,
    split_lines: usize,
    tx: mpsc::Sender<MapTask>,
) -> Result<u64> {
    let mut index = 0;
    for file in files {
        let source = file.to_string_lossy().into_owned();
        let mut reader = BufReader::new(
            File::open(&file)
                .await
                .wrap_err_with(|| format!("failed to open input {}", file.display()))?,
        );

        let mut line = Vec::new();
        let mut contents = String::new();
        let mut lines = 0;
        loop {
            line.clear();
            let n = reader
                .read_until(b'\n', &mut line)
                .await
                .wrap_err_with(|| format!("failed to read input {}", file.display()))?;
            if n > 0 {
                contents.push_str(&String::from_utf8_lossy(&line));
                lines += 1;
            }

            if lines == split_lines || (n == 0 && lines > 0) {
                let task = MapTask {
                    index,
                    source: source.clone(),
                    contents: mem::take(&mut contents),
                };
                tx.send(task)
                    .await
                    .map_err(|_| eyre!("map workers stopped before {} was read", source))?;
                index += 1;
                lines = 0;
            }
            if n == 0 {
                break;
            }
        }
    }
    Ok(index)
}

/// Removes results of earlier runs so the directory holds one line per key.
async fn remove_outputs(dir: &Path) -> Result<()> {
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry
            .file_name()
            .to_string_lossy()
            .starts_with(OUTPUT_PREFIX)
        {
            fs::remove_file(entry.path())
                .await
                .wrap_err_with(|| format!("failed to remove {}", entry.path().display()))?;
        }
    }
    Ok(())
}

async fn write_kvs(path: &Path, kvs: &[KeyValue]) -> Result<()> {
    let mut buf = String::new();
    for (k, v) in kvs {
        buf.push_str(&format_kv(k, v));
    }

    let write = async {
        let mut file = File::create(path).await?;
        file.write_all(buf.as_bytes()).await?;
        file.sync_all().await
    };
    write
        .await
        .wrap_err_with(|| format!("failed to write {}", path.display()))
}
