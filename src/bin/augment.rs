//! Offline utility that augments a copy of the dataset CSV with the static
//! per-state pollution reason and per-parameter solution text, for
//! inspection. Not part of the served API.

use hydroscope::catalog;
use hydroscope::dataset::Dataset;
use hydroscope::error::HydroscopeError;
use hydroscope::models::Parameter;

use clap::Parser;

/// Dataset augmentation utility
#[derive(Debug, Parser)]
struct Args {
    /// Path to the source dataset CSV
    #[arg(long, default_value = "data/cleaned_waterquality.csv")]
    input: String,
    /// Path to write the augmented CSV to
    #[arg(long, default_value = "data/updated_waterquality.csv")]
    output: String,
}

fn format_cell(value: Option<f64>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}

fn run(args: &Args) -> Result<(), HydroscopeError> {
    let dataset = Dataset::from_path(&args.input)?;

    let mut writer = csv::Writer::from_path(&args.output)?;
    let mut headers = vec![
        "STATION_CODE".to_string(),
        "LOCATIONS".to_string(),
        "STATE".to_string(),
    ];
    for parameter in Parameter::ALL {
        headers.push(parameter.column_name().to_string());
    }
    headers.push("Pollution_Reasons".to_string());
    for parameter in Parameter::ALL {
        headers.push(format!("{}_Solutions", parameter.column_name()));
    }
    writer.write_record(&headers)?;

    for record in dataset.records() {
        let mut row = vec![
            record.station_code.clone().unwrap_or_default(),
            record.location.clone().unwrap_or_default(),
            record.state.clone().unwrap_or_default(),
        ];
        for parameter in Parameter::ALL {
            row.push(format_cell(record.value(parameter)));
        }
        let reasons = record
            .state
            .as_deref()
            .map(catalog::reasons_for_state)
            .unwrap_or(catalog::DEFAULT_REASONS);
        row.push(reasons.join("; "));
        for parameter in Parameter::ALL {
            row.push(catalog::solution_for(parameter).to_string());
        }
        writer.write_record(&row)?;
    }
    writer.flush().map_err(HydroscopeError::DatasetIo)?;
    println!("Augmented CSV saved to {}", args.output);
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("augmentation failed: {}", err);
        std::process::exit(1);
    }
}
