//! Schema command - print the expected journal and regime formats

use crate::core::{EntryRecord, FiscalRegime, JournalFile};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// What to describe
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for a journal file
    JsonSchema,
    /// JSON Schema for a fiscal regime file
    RegimeSchema,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(JournalFile);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::RegimeSchema => {
                let schema = schema_for!(FiscalRegime);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => println!("{}", EntryRecord::csv_header().join(",")),
            SchemaFormat::CsvFields => print_csv_fields(),
        }
        Ok(())
    }
}

fn print_csv_fields() {
    println!("CSV Journal Format");
    println!("==================");
    println!();
    for field in EntryRecord::csv_schema() {
        let req = if field.required { "required" } else { "optional" };
        println!("{:10} ({:8})  {}", field.name, req, field.description);
    }
    println!();
    println!("Exactly one of debit/credit must be non-zero on each row.");
    println!("Account classes: 1 equity, 2 fixed assets, 3 current assets, 4 liabilities,");
    println!("5 treasury, 6 expenses, 7 revenues; 4455 TVA facturée, 3455/3456 TVA récupérable.");
}
