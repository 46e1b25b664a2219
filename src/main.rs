mod cmd;
mod core;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "goldenfarm")]
#[command(version, about = "GoldenFarm Finance Hub: PCM journal, balance sheet and IS/TVA simulation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a journal file, seeded with the demo season
    Init(cmd::init::InitCommand),
    /// Validate and append an entry to the journal
    Post(cmd::edit::PostCommand),
    /// Remove an entry by id
    Remove(cmd::edit::RemoveCommand),
    /// Show the Journal Général
    Journal(cmd::journal::JournalCommand),
    /// Show the trial balance per account
    Balance(cmd::balance::BalanceCommand),
    /// Show dashboard figures and the balance sheet
    Vitals(cmd::vitals::VitalsCommand),
    /// Simulate IS and TVA for actual or hypothetical figures
    Simulate(cmd::simulate::SimulateCommand),
    /// Report unclassified accounts and balance problems
    Validate(cmd::validate::ValidateCommand),
    /// Print the journal input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Init(init) => init.exec(),
        Command::Post(post) => post.exec(),
        Command::Remove(remove) => remove.exec(),
        Command::Journal(journal) => journal.exec(),
        Command::Balance(balance) => balance.exec(),
        Command::Vitals(vitals) => vitals.exec(),
        Command::Simulate(simulate) => simulate.exec(),
        Command::Validate(validate) => validate.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
