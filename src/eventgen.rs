use anyhow::Result;
use rhere::generator::{self, ScheduleGenerator};
use rhere::{Schedule, ScheduleWriter};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

struct Config {
    lanes: u32,
    events_per_lane: usize,
    timeline_duration: u64,
    seed: u64,
    output_file: Option<String>,
    use_brotli: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            lanes: generator::DEFAULT_LANES,
            events_per_lane: generator::DEFAULT_EVENTS_PER_LANE,
            timeline_duration: generator::DEFAULT_TIMELINE_DURATION,
            seed: generator::DEFAULT_SEED,
            output_file: None,
            use_brotli: false,
        }
    }
}

impl Config {
    fn output_path(&self) -> String {
        match &self.output_file {
            Some(path) if self.use_brotli && !path.ends_with(".br") => format!("{}.br", path),
            Some(path) => path.clone(),
            None if self.use_brotli => "day.schedule.br".to_string(),
            None => "day.schedule".to_string(),
        }
    }
}

fn parse_args(args: &[String]) -> Result<Config> {
    let mut config = Config::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-lanes" => {
                config.lanes = next_value(args, &mut i, "-lanes")?.parse()?;
            }
            "-events" => {
                config.events_per_lane = next_value(args, &mut i, "-events")?.parse()?;
            }
            "-duration" => {
                config.timeline_duration = next_value(args, &mut i, "-duration")?.parse()?;
                if config.timeline_duration == 0 {
                    anyhow::bail!("-duration must be positive");
                }
            }
            "-seed" => {
                config.seed = next_value(args, &mut i, "-seed")?.parse()?;
            }
            "-out" => {
                config.output_file = Some(next_value(args, &mut i, "-out")?.to_string());
            }
            "-brotli" => {
                config.use_brotli = true;
            }
            "-h" | "-help" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                eprintln!("Warning: Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    Ok(config)
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    match args.get(*i) {
        Some(value) => Ok(value.as_str()),
        None => anyhow::bail!("{} requires an argument", flag),
    }
}

fn print_help() {
    println!("Random Schedule Generator");
    println!("Usage: here-eventgen [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -lanes <N>             Number of lanes/channels (default: {})", generator::DEFAULT_LANES);
    println!("  -events <N>            Programmes per lane (default: {})", generator::DEFAULT_EVENTS_PER_LANE);
    println!("  -duration <SECONDS>    Timeline length (default: {})", generator::DEFAULT_TIMELINE_DURATION);
    println!("  -seed <N>              Random seed (default: {})", generator::DEFAULT_SEED);
    println!("  -out <FILE>            Output file (default: day.schedule)");
    println!("  -brotli                Write compressed schedule using Brotli (output: *.br)");
    println!("  -h, -help, --help      Show this help message");
}

fn write_schedule(writer: &mut ScheduleWriter, schedule: &Schedule) -> Result<()> {
    writer.write_header(schedule.timeline_duration)?;
    for lane in &schedule.lanes {
        writer.write_lane(lane.id, &lane.name)?;
    }
    for event in &schedule.events {
        writer.write_event(event)?;
    }
    writer.write_footer()
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();
    let config = parse_args(&args)?;

    let schedule = ScheduleGenerator::with_config(
        config.lanes,
        config.events_per_lane,
        config.timeline_duration,
        config.seed,
    )
    .generate();

    let output_path = config.output_path();
    let mut writer = ScheduleWriter::new(&output_path)?;
    write_schedule(&mut writer, &schedule)?;

    info!(
        path = %output_path,
        lanes = schedule.lanes.len(),
        events = schedule.events.len(),
        "schedule written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("here-eventgen")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_args() {
        let config = parse_args(&args(&["-lanes", "6", "-events", "10", "-seed", "3", "-brotli"])).unwrap();
        assert_eq!(config.lanes, 6);
        assert_eq!(config.events_per_lane, 10);
        assert_eq!(config.seed, 3);
        assert_eq!(config.timeline_duration, generator::DEFAULT_TIMELINE_DURATION);
        assert_eq!(config.output_path(), "day.schedule.br");
    }

    #[test]
    fn test_missing_value_and_bad_duration() {
        assert!(parse_args(&args(&["-lanes"])).is_err());
        assert!(parse_args(&args(&["-duration", "0"])).is_err());
        assert!(parse_args(&args(&["-events", "many"])).is_err());
    }

    #[test]
    fn test_output_path() {
        let config = parse_args(&args(&["-out", "week.schedule", "-brotli"])).unwrap();
        assert_eq!(config.output_path(), "week.schedule.br");
        let config = parse_args(&args(&["-out", "week.schedule"])).unwrap();
        assert_eq!(config.output_path(), "week.schedule");
    }
}
