use std::{
    fs::{File, create_dir_all, remove_file, rename},
    io::{BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use cj_path_util::unix::polyfill::add_extension;

use crate::warn;

pub fn xrename(from: &Path, to: &Path) -> Result<()> {
    rename(from, to).with_context(|| anyhow!("renaming {from:?} to {to:?}"))?;
    Ok(())
}

pub fn xcreate_dir_all(path: &Path) -> Result<()> {
    create_dir_all(path).with_context(|| anyhow!("creating directory {path:?}"))
}

/// The path `file` with ".tmp" appended, for writing before renaming
/// into place.
pub fn tmp_path_for(file: &Path) -> Result<PathBuf> {
    add_extension(file, "tmp").ok_or_else(|| anyhow!("path misses a filename: {file:?}"))
}

/// `file` with ".tmp" inserted before its extension ("a.png" ->
/// "a.tmp.png"), for writers that choose the format by extension.
pub fn tmp_path_before_extension(file: &Path) -> Result<PathBuf> {
    let stem = file
        .file_stem()
        .ok_or_else(|| anyhow!("path misses a filename: {file:?}"))?;
    let mut name = stem.to_os_string();
    name.push(".tmp");
    if let Some(extension) = file.extension() {
        name.push(".");
        name.push(extension);
    }
    Ok(file.with_file_name(name))
}

pub fn xremove_file_if_exists(path: &Path) -> Result<()> {
    match remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| anyhow!("removing file {path:?}")),
    }
}

/// Let `produce` create `tmp`, then rename it to `file`. If `produce`
/// fails, whatever it left at `tmp` is removed and `file` is not
/// touched.
pub fn produce_file_atomically(
    file: &Path,
    tmp: &Path,
    produce: impl FnOnce(&Path) -> Result<()>,
) -> Result<()> {
    match produce(tmp) {
        Ok(()) => xrename(tmp, file),
        Err(e) => {
            if let Err(e2) = xremove_file_if_exists(tmp) {
                warn!("{e2:#}");
            }
            Err(e)
        }
    }
}

/// Write to a temporary file next to `file` via `write`, then rename
/// it to `file`. Readers of `file` never see partial contents.
pub fn write_file_atomically(
    file: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> Result<()>,
) -> Result<()> {
    let file_tmp = tmp_path_for(file)?;
    {
        let mut out = BufWriter::new(
            File::create(&file_tmp).with_context(|| anyhow!("creating file {file_tmp:?}"))?,
        );
        write(&mut out)?;
        out.flush()
            .with_context(|| anyhow!("writing to file {file_tmp:?}"))?;
    }
    xrename(&file_tmp, file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_write_file_atomically() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.txt");
        write_file_atomically(&path, |out| {
            out.write_all(b"hello\n")?;
            Ok(())
        })?;
        assert_eq!(std::fs::read_to_string(&path)?, "hello\n");
        assert!(!tmp_path_for(&path)?.exists());
        Ok(())
    }

    #[test]
    fn t_produce_file_atomically() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("chart.png");
        let tmp = tmp_path_before_extension(&path)?;
        assert_eq!(tmp, dir.path().join("chart.tmp.png"));

        let res = produce_file_atomically(&path, &tmp, |tmp| {
            std::fs::write(tmp, "partial")?;
            anyhow::bail!("drawing failed")
        });
        assert!(res.is_err());
        assert!(!path.exists());
        assert!(!tmp.exists());

        produce_file_atomically(&path, &tmp, |tmp| Ok(std::fs::write(tmp, "image")?))?;
        assert_eq!(std::fs::read_to_string(&path)?, "image");
        assert!(!tmp.exists());

        // Nothing written at all
        assert!(produce_file_atomically(&path, &tmp, |_| anyhow::bail!("no fonts")).is_err());
        assert_eq!(std::fs::read_to_string(&path)?, "image");
        Ok(())
    }
}
