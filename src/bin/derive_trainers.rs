use anyhow::Result;
use clap::Parser;
use coursegraph::graph::{derive_trainer_records, matcher_from_config};
use coursegraph::records::{read_records, write_records, CourseRecord, TrainerSkillRecord};
use coursegraph::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "derive-trainers")]
#[command(about = "Derive the trainer -> taught courses CSV from course modules and trainer skills")]
struct Args {
    /// Courses and modules CSV (defaults to the configured source)
    #[arg(long)]
    courses: Option<PathBuf>,

    /// Trainer skills CSV (defaults to the configured source)
    #[arg(long)]
    skills: Option<PathBuf>,

    /// Output CSV (trainer_name, teaches)
    #[arg(short, long, default_value = "data/trainers.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();
    let config = Config::load()?;

    let courses_path = args.courses.unwrap_or(config.sources.courses);
    let skills_path = args.skills.unwrap_or(config.sources.trainer_skills);

    let (courses, _) = read_records::<CourseRecord>(&courses_path)?;
    let (skills, _) = read_records::<TrainerSkillRecord>(&skills_path)?;
    log::info!(
        "Matching {} trainer rows against {} courses",
        skills.len(),
        courses.len()
    );

    let matcher = matcher_from_config(&config.inference);
    let rows = derive_trainer_records(&courses, &skills, matcher.as_ref());
    let teaching = rows.iter().filter(|r| !r.teaches.is_empty()).count();

    write_records(&args.output, &rows)?;
    println!(
        "Wrote {} trainers ({} with at least one course) to {}",
        rows.len(),
        teaching,
        args.output.display()
    );

    Ok(())
}
