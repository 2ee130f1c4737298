use anyhow::{bail, Context};
use clap::Parser;
use kurbo::Size;
use pencmd::{Config, Executor};
use pencmd_host::SvgCanvas;
use std::path::PathBuf;

#[derive(Parser)]
struct Args {
    /// The script to run.
    input: PathBuf,

    /// Where to write the picture. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, default_value_t = 640)]
    width: u32,

    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Give up on a while loop after this many iterations (0 for no limit).
    #[arg(long, default_value_t = 100_000)]
    max_iterations: u64,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to open input file {}", args.input.display()))?;

    let config = Config {
        max_iterations: (args.max_iterations > 0).then_some(args.max_iterations),
        ..Config::default()
    };
    let size = Size::new(args.width.into(), args.height.into());
    let canvas = SvgCanvas::new(size, config.background);
    let mut ex = Executor::with_config(canvas, config);

    let batch = ex
        .run(&pencmd::normalize(&text))
        .context("evaluation error")?;
    for notice in ex.notices() {
        eprintln!("warning: {notice}");
    }
    if !batch.is_valid() {
        for (line, text) in &batch.rejected {
            eprintln!("{}:{line}: invalid command: {text}", args.input.display());
        }
        bail!("{} invalid line(s), queued commands were not run", batch.rejected.len());
    }

    let canvas = ex.into_canvas();
    log::info!("drew {} shapes", canvas.shapes().len());
    match &args.output {
        Some(path) => canvas
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", canvas.document()),
    }
    Ok(())
}
