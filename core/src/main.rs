use clap::Parser;
use log::{error, info};
use osteocat_core::cli::{Cli, OutputFormat};
use osteocat_core::{
    AnalysisMode, BoneMetabolismAnalyzer, EvaluationRequest, EvaluationResponse, Result,
    TextReport,
};
use std::io::{self, Read};
use std::path::Path;
use std::process;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    let input = match read_input(&cli.file) {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read request: {}", e);
            eprintln!("Error: Failed to read {}: {}", cli.file.display(), e);
            process::exit(1);
        }
    };

    info!("Processing request: {}", cli.file.display());

    let request = match EvaluationRequest::from_json_str(&input) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: Invalid request JSON: {}", e);
            process::exit(1);
        }
    };

    if cli.prompt {
        match BoneMetabolismAnalyzer::summary_prompt(&request) {
            Ok(prompt) => println!("{}", prompt),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    let response = BoneMetabolismAnalyzer::respond(&request, AnalysisMode::Fast, None);
    output_response(&response, cli.format);

    if !response.is_success() {
        process::exit(1);
    }
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

/// Reads the request body from a file, or from stdin for "-"
fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn output_response(response: &EvaluationResponse, format: OutputFormat) {
    match format {
        OutputFormat::Text => match response.result() {
            Some(result) => println!("{}", TextReport::new(result)),
            None => eprintln!("Error: {}", response.message()),
        },
        OutputFormat::Json => match serde_json::to_string_pretty(response) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize to JSON: {}", e);
                eprintln!("Error: Failed to serialize to JSON: {}", e);
                process::exit(1);
            }
        },
    }
}
