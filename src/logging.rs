use {
    anyhow::Result,
    std::{
        fs::File,
        path::Path,
        sync::Arc,
    },
    tracing::Level,
    tracing_subscriber::{
        fmt::{
            layer,
            writer::MakeWriterExt,
        },
        layer::SubscriberExt,
        util::SubscriberInitExt,
    },
};

/// Log to `path` and to stderr, each with its own maximum level.
///
/// Stdout is left alone: the CLI prints catalogs and resolved
/// configurations there.
pub fn setup_logging(
    path: &dyn AsRef<Path>,
    max_level_file: Level,
    max_level_stderr: Level,
) -> Result<()> {
    let log_file = Arc::new(File::create(path)?);

    tracing_subscriber::registry()
        // File writer
        .with(
            layer()
                .with_writer(log_file.with_max_level(max_level_file))
                .with_ansi(false),
        )
        // Stderr writer
        .with(
            layer()
                .with_writer(std::io::stderr.with_max_level(max_level_stderr))
                .compact()
                .with_line_number(true)
                .with_thread_ids(false)
                .with_target(false),
        )
        .try_init()?;

    Ok(())
}
