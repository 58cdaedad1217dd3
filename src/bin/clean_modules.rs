use anyhow::Result;
use clap::Parser;
use coursegraph::records::{
    clean_course_records, read_records, split_list, write_records, CourseRecord, SourceWarning,
};
use coursegraph::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clean-modules")]
#[command(about = "Normalize extracted module lists in the courses CSV")]
struct Args {
    /// Raw courses and modules CSV (defaults to the configured source)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Cleaned output CSV
    #[arg(short, long, default_value = "data/output/courses_and_modules_cleaned.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();
    let input = match args.input {
        Some(path) => path,
        None => Config::load()?.sources.courses,
    };

    let (raw, warnings) = read_records::<CourseRecord>(&input)?;
    for warning in &warnings {
        if let SourceWarning::MissingSource { .. } = warning {
            anyhow::bail!("Cannot clean {}", warning);
        }
        log::warn!("{}", warning);
    }

    let cleaned = clean_course_records(&raw);
    let before: usize = raw.iter().map(|r| split_list(&r.modules).len()).sum();
    let after: usize = cleaned.iter().map(|r| split_list(&r.modules).len()).sum();
    log::info!("Modules: {} raw entries -> {} cleaned", before, after);

    write_records(&args.output, &cleaned)?;
    println!("Cleaned {} courses -> {}", cleaned.len(), args.output.display());

    Ok(())
}
