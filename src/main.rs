use {
    anyhow::Result,
    clap::Parser,
    rl_studio::{
        cli::{
            run,
            Args,
        },
        logging::setup_logging,
    },
};

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(level) = args.log.level() {
        setup_logging(&args.log_file, level, level)?;
    }

    run(args, &mut std::io::stdout().lock())
}
