use {
    anyhow::{
        anyhow,
        Result,
    },
    serde::Serialize,
    std::{
        fs::{
            create_dir_all,
            File,
        },
        io::Write,
        path::Path,
    },
};


/// Pretty-print any configuration as RON.
pub fn to_ron<T: Serialize>(config: &T) -> Result<String> {
    Ok(ron::ser::to_string_pretty(
        config,
        ron::ser::PrettyConfig::default(),
    )?)
}

/// Write `config` as RON to `path`, creating parent directories as needed.
///
/// Refuses to replace an existing file.
pub fn write_config<T: Serialize>(
    config: &T,
    path: &dyn AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    if path.try_exists()? {
        Err(anyhow!(
            "{} already exists, refusing to overwrite it",
            path.display(),
        ))?
    }
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    File::create(path)?.write_all(to_ron(config)?.as_bytes())?;
    Ok(())
}
