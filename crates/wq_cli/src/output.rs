use anyhow::Result;
use colored::*;
use serde_json::Value;
use wq_core::ValidationResult;
use wq_ingest::ReportFormat;

/// True when the run should exit successfully.
pub fn passed(result: &ValidationResult, strict: bool) -> bool {
    result.is_valid() && !(strict && !result.warnings().is_empty())
}

pub fn print_validation_report(
    title: &str,
    result: &ValidationResult,
    format: ReportFormat,
) -> Result<()> {
    match format {
        ReportFormat::Json => print_json(&serde_json::to_value(result)?),
        ReportFormat::Text => {
            print_text_report(title, result);
            Ok(())
        }
    }
}

fn print_text_report(title: &str, result: &ValidationResult) {
    println!("\n{}", "═".repeat(60));
    println!("  {}", title.to_uppercase().bold());
    println!("{}", "═".repeat(60));

    if result.is_valid() {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }

    if !result.errors().is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for (i, error) in result.errors().iter().enumerate() {
            println!("  {}. {}", i + 1, error.red());
        }
    }

    if !result.warnings().is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for (i, warning) in result.warnings().iter().enumerate() {
            println!("  {}. {}", i + 1, warning.yellow());
        }
    }

    if !result.info().is_empty() {
        println!("\n{}", "Info:".bold());
        for (key, value) in result.info() {
            println!("  {}: {}", key, value);
        }
    }

    println!("\n{}", "Summary:".bold());
    println!("  Total errors:   {}", result.errors().len());
    println!("  Total warnings: {}", result.warnings().len());
    println!("{}", "═".repeat(60));
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
