use clap::Parser;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt};

use dog_meal_planner_rs::cli::{Cli, Command, IngredientsCommand};
use dog_meal_planner_rs::config::Config;
use dog_meal_planner_rs::error::{PlannerError, Result};
use dog_meal_planner_rs::interface::{
    collect_plan_request, display_ingredient_list, display_meal_plan, display_mer_factors,
    write_plan_csv,
};
use dog_meal_planner_rs::planner::{
    calories_to_grams, compute_meal_plan, compute_mer, compute_rer, mer_factor, mer_factor_name,
};
use dog_meal_planner_rs::server::{payloads::ComputePlanRequest, start_server};
use dog_meal_planner_rs::standards::StandardsTable;
use dog_meal_planner_rs::storage::{Database, load_ingredients, save_ingredients};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load()?;
    if let Some(database) = cli.database {
        config.database_url = database;
    }

    match cli.command.unwrap_or_default() {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            start_server(config).await
        }
        Command::Plan { input, csv } => cmd_plan(&config, input.as_deref(), csv.as_deref()).await,
        Command::Rer { weight_kg, factor } => cmd_rer(weight_kg, factor.as_deref()),
        Command::KcalToGrams {
            kcal,
            kcal_per_100g,
        } => {
            let grams = calories_to_grams(kcal, kcal_per_100g)?;
            println!("{:.1} g supplies {:.1} kcal at {} kcal/100g", grams, kcal, kcal_per_100g);
            Ok(())
        }
        Command::Factors => {
            display_mer_factors();
            Ok(())
        }
        Command::Ingredients { command } => cmd_ingredients(&config, command).await,
    }
}

/// Compute a plan from a request file, or by prompting.
async fn cmd_plan(config: &Config, input: Option<&Path>, csv: Option<&Path>) -> Result<()> {
    let db = Database::connect(&config.database_url).await?;
    let standards = StandardsTable::with_overrides(config.standards_path.as_ref())?;

    let request: ComputePlanRequest = match input {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        }
        None => {
            let library = db.list_ingredients().await?;
            collect_plan_request(&library)?
        }
    };

    let inputs = request.resolve(&db).await?;
    let plan = compute_meal_plan(&inputs, &standards)?;
    display_meal_plan(&plan);

    if request.save {
        let id = db
            .save_plan(&request.dog, &request.mer_factor_key, &plan)
            .await?;
        println!("Plan saved with id {}.", id);
    }

    if let Some(path) = csv {
        write_plan_csv(path, &plan)?;
        println!("Nutrient breakdown written to {}.", path.display());
    }

    Ok(())
}

fn cmd_rer(weight_kg: f64, factor: Option<&str>) -> Result<()> {
    let rer = compute_rer(weight_kg)?;
    println!("RER: {:.1} kcal/day", rer);

    if let Some(key) = factor {
        let mer = compute_mer(rer, mer_factor(key)?);
        println!("MER ({}): {:.1} kcal/day", mer_factor_name(key), mer);
    }
    Ok(())
}

async fn cmd_ingredients(config: &Config, command: IngredientsCommand) -> Result<()> {
    let db = Database::connect(&config.database_url).await?;

    match command {
        IngredientsCommand::Import { file } => {
            if !file.exists() {
                return Err(PlannerError::NotFound(format!(
                    "ingredient file {}",
                    file.display()
                )));
            }
            let ingredients = load_ingredients(&file)?;
            for ingredient in &ingredients {
                db.upsert_ingredient(ingredient).await?;
            }
            println!("Imported {} ingredients.", ingredients.len());
        }
        IngredientsCommand::List => {
            display_ingredient_list(&db.list_ingredients().await?);
        }
        IngredientsCommand::Export { file } => {
            let ingredients: Vec<_> = db
                .list_ingredients()
                .await?
                .into_iter()
                .map(|s| s.ingredient)
                .collect();
            save_ingredients(&file, &ingredients)?;
            println!("Exported {} ingredients to {}.", ingredients.len(), file.display());
        }
    }

    Ok(())
}
