use common::{format_kv, reduce_groups, App, Counters, Result};
use eyre::WrapErr;
use log::info;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Maps every input file, groups all pairs by key and reduces them in a single
/// pass, writing one `key\tvalue` line per key to `output`.
pub fn run(
    app: &dyn App,
    input_files: &[PathBuf],
    output: &Path,
    counters: &Counters,
) -> Result<()> {
    let mut intermediate = Vec::new();
    for file in input_files {
        let bytes =
            fs::read(file).wrap_err_with(|| format!("failed to read input {}", file.display()))?;
        // Invalid UTF-8 only damages the line it occurs in.
        let content = String::from_utf8_lossy(&bytes).into_owned();
        intermediate.extend(app.map(file.to_string_lossy().into_owned(), content, counters));
    }
    info!("mapped {} pairs", intermediate.len());

    let reduced = reduce_groups(app, intermediate)?;

    let write = || -> Result<()> {
        let mut output_file = BufWriter::new(File::create(output)?);
        for (k, v) in &reduced {
            output_file.write_all(format_kv(k, v).as_bytes())?;
        }
        output_file.flush()?;
        Ok(())
    };
    write().wrap_err_with(|| format!("failed to write {}", output.display()))?;

    info!("wrote {} keys to {}", reduced.len(), output.display());
    Ok(())
}
