//! aulas: run the promptchain lessons against a live chat-completions API
//!
//! Usage:
//!   aulas <1-6|all> [--debug]     Run one lesson, or all of them in order
//!   aulas list                    List the lessons

use anyhow::Context;
use promptchain::lessons::Lesson;
use promptchain::{ChatModel, ClientConfig};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let debug = args.iter().any(|a| a == "--debug");
    let positional: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|a| !a.starts_with("--"))
        .collect();

    if positional == ["help"] || args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let lessons = match positional.as_slice() {
        ["list"] => {
            for lesson in Lesson::ALL {
                println!("{}  {}", lesson.number(), lesson);
            }
            return ExitCode::SUCCESS;
        }
        ["all"] => Lesson::ALL.to_vec(),
        [one] => match one.parse::<Lesson>() {
            Ok(lesson) => vec![lesson],
            Err(e) => {
                eprintln!("Error: {e}\n\n{USAGE}");
                return ExitCode::from(2);
            }
        },
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    init_tracing(debug);

    match run(&lessons).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(lessons: &[Lesson]) -> anyhow::Result<()> {
    let config = ClientConfig::from_env().context("loading configuration")?;
    let model = ChatModel::from_config(config).context("building chat model")?;

    for (i, lesson) in lessons.iter().enumerate() {
        if lessons.len() > 1 {
            if i > 0 {
                println!();
            }
            println!("=== {} ===", lesson);
        }
        let output = lesson
            .run(&model)
            .await
            .with_context(|| format!("{} failed", lesson))?;
        print!("{output}");
    }
    Ok(())
}

/// Logs go to stderr so lesson output on stdout stays clean.
/// `RUST_LOG` wins; otherwise `--debug` shows chain steps.
fn init_tracing(debug: bool) {
    let default = if debug { "promptchain=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

const USAGE: &str = r#"aulas - promptchain lesson runner

USAGE:
    aulas <LESSON> [--debug]

LESSONS:
    1..6                        Run a single lesson
    all                         Run every lesson in order
    list                        List the lessons
    help                        Show this help message

OPTIONS:
    --debug                     Log chain steps and HTTP calls to stderr

ENVIRONMENT:
    OPENAI_API_KEY              Provider credential (required, .env supported)
    OPENAI_BASE_URL             Chat-completions base URL
    PROMPTCHAIN_MODEL           Model name (default gpt-3.5-turbo)
    RUST_LOG                    Log filter, overrides --debug"#;
