use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Dog Meal Planner: daily energy targets, nutrient totals and meal splits for dogs.
#[derive(Parser, Debug)]
#[command(name = "dog-meal-planner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Database URL (overrides DATABASE_URL).
    #[arg(short, long, global = true)]
    pub database: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API.
    Serve {
        /// Port to listen on (overrides PLANNER_PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Compute a meal plan from a JSON request file, or interactively.
    Plan {
        /// Request file with the /compute-plan body.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Also write the nutrient breakdown to this CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Resting energy requirement for a body weight.
    Rer {
        weight_kg: f64,

        /// MER factor key; also prints the maintenance requirement.
        #[arg(short, long)]
        factor: Option<String>,
    },

    /// Grams of food supplying the given energy.
    KcalToGrams { kcal: f64, kcal_per_100g: f64 },

    /// List the MER factor table.
    Factors,

    /// Manage the stored ingredient library.
    Ingredients {
        #[command(subcommand)]
        command: IngredientsCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum IngredientsCommand {
    /// Import ingredients from a JSON or CSV file, replacing same-named ones.
    Import { file: PathBuf },

    /// List stored ingredients.
    List,

    /// Export stored ingredients to a JSON or CSV file.
    Export { file: PathBuf },
}

impl Default for Command {
    fn default() -> Self {
        Command::Plan {
            input: None,
            csv: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rer_with_factor() {
        let cli = Cli::parse_from(["dog-meal-planner", "rer", "10", "--factor", "puppy_low"]);
        match cli.command {
            Some(Command::Rer { weight_kg, factor }) => {
                assert_eq!(weight_kg, 10.0);
                assert_eq!(factor.as_deref(), Some("puppy_low"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_database_flag() {
        let cli = Cli::parse_from([
            "dog-meal-planner",
            "ingredients",
            "list",
            "--database",
            "sqlite::memory:",
        ]);
        assert_eq!(cli.database.as_deref(), Some("sqlite::memory:"));
        assert!(matches!(
            cli.command,
            Some(Command::Ingredients {
                command: IngredientsCommand::List
            })
        ));
    }
}
