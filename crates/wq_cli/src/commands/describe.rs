use anyhow::Result;
use serde_json::json;
use wq_core::{SchemaVariant, column_description, schema_info};
use wq_ingest::ReportFormat;

use crate::output;

pub fn execute(column: Option<&str>, schema: SchemaVariant, format: ReportFormat) -> Result<()> {
    match column {
        Some(column) => describe_column(column, schema, format),
        None => describe_schema(schema, format),
    }
}

fn describe_column(column: &str, schema: SchemaVariant, format: ReportFormat) -> Result<()> {
    let description = column_description(column, schema);
    let spec = schema.definition().column(column);

    match format {
        ReportFormat::Json => output::print_json(&json!({
            "column": column,
            "schema": schema,
            "description": description,
            "type": spec.map(|s| s.semantic_type.label()),
            "required": spec.map(|s| s.required),
        })),
        ReportFormat::Text => {
            println!("{}: {}", column, description);
            match spec {
                Some(spec) => {
                    let presence = if spec.required { "required" } else { "optional" };
                    println!(
                        "  {} {} column, type {}",
                        presence,
                        schema,
                        spec.semantic_type.label()
                    );
                }
                None => println!("  not declared by the {} schema", schema),
            }
            Ok(())
        }
    }
}

fn describe_schema(schema: SchemaVariant, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Json => output::print_json(&serde_json::to_value(schema_info(schema))?),
        ReportFormat::Text => {
            println!("Schema: {}", schema);
            for (heading, required) in [("Required columns:", true), ("Optional columns:", false)] {
                println!("\n{}", heading);
                for spec in schema.definition().columns.iter().filter(|c| c.required == required) {
                    println!("  {:<18} {}", spec.name, spec.semantic_type.label());
                }
            }
            Ok(())
        }
    }
}
