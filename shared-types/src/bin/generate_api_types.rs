use clap::Parser;
use shared_types::*;
use std::fs;
use std::path::PathBuf;
use ts_rs::TS;

#[derive(Parser, Debug)]
#[command(author, version, about = "Export API types as TypeScript definitions")]
struct Args {
    #[arg(long, default_value = "../frontend/src/api-types")]
    out_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut types = Vec::new();

    // Ledger types
    types.push(clean_type(CalculationTarget::export_to_string()?));
    types.push(clean_type(ExpenseRecord::export_to_string()?));
    types.push(clean_type(UploadResponse::export_to_string()?));

    // Settlement types
    types.push(clean_type(Settings::export_to_string()?));
    types.push(clean_type(SettlementDirection::export_to_string()?));
    types.push(clean_type(CalculateRequest::export_to_string()?));
    types.push(clean_type(CalculationResult::export_to_string()?));

    types.push(clean_type(ErrorResponse::export_to_string()?));
    types.push(clean_type(HealthResponse::export_to_string()?));

    fs::create_dir_all(&args.out_dir)?;

    let output_path = args.out_dir.join("types.ts");
    fs::write(&output_path, types.join("\n\n"))?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    // All types land in one file, so cross-type imports are dropped
    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
