use std::error::Error;
use std::fs;
use std::sync::atomic::AtomicBool;

use copydetect::{Comparator, DetectionConfig, SourceFile};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: copydetect [--config FILE] FILE FILE [FILE...]";

fn main() -> Result<(), Box<dyn Error>> {
    let mut config_path = None;
    let mut paths = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_path = Some(args.next().ok_or(USAGE)?),
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ => paths.push(arg),
        }
    }
    if paths.len() < 2 {
        return Err(USAGE.into());
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if std::env::var("COPYDETECT_LOG_FORMAT").is_ok_and(|f| f == "json") {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = match config_path {
        Some(path) => DetectionConfig::from_file(path)?,
        None => DetectionConfig::default(),
    };
    let comparator = Comparator::new(config)?;

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let text = fs::read_to_string(&path)?;
        files.push(SourceFile::new(path, text));
    }

    if files.len() == 2 {
        let right = files.pop().ok_or(USAGE)?;
        let left = files.pop().ok_or(USAGE)?;
        let verdict = comparator.compare_files(left, right)?;
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        let report = comparator.compare_batch(files, &AtomicBool::new(false))?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
