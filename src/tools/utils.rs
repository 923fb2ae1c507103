use super::prelude::*;

/// Default permission bits for rewritten containers.
pub const DEFAULT_MODE: u32 = 0o644;

/// Validate container file, returns number of records in it
pub fn validate_store(path: impl AsRef<Path>) -> AnyResult<usize> {
    let path = path.as_ref();
    let store = Store::read_file(path).with_context(|| format!("validate {:?}", path))?;
    debug!("{:?} is valid, {} records", path, store.len());
    Ok(store.len())
}

/// Read container from `input` and write it rebuilt from scratch to `output`.
/// Returns number of records written.
pub fn rewrite_store<P, Q>(input: P, output: Q, mode: u32) -> AnyResult<usize>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let (input, output) = (input.as_ref(), output.as_ref());
    if same_file(input, output) {
        return Err(anyhow::anyhow!(
            "input and output are the same file: {:?}",
            input
        ));
    }
    let store = Store::read_file(input).with_context(|| format!("read {:?}", input))?;
    store
        .write_file(output, mode)
        .with_context(|| format!("write {:?}", output))?;
    info!("container from '{:?}' rewritten to '{:?}'", input, output);
    info!("{} records written", store.len());
    Ok(store.len())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
