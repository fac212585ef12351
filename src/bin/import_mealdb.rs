// ABOUTME: Bulk-import binary pulling TheMealDB recipes into a JSON-lines store
// ABOUTME: Supports dry runs and polite API pacing via CLI flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

//! Bulk-import recipes from TheMealDB.
//!
//! Usage:
//! ```bash
//! # full import into recipes.jsonl
//! cargo run --bin import-mealdb
//!
//! # fetch + transform, no writes
//! cargo run --bin import-mealdb -- --dry-run
//!
//! # slower API polling, custom output
//! cargo run --bin import-mealdb -- --delay 1.0 --out imported.jsonl
//! ```

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::warn;

use souschef::mealdb::{self, MEALDB_SOURCE_TAG};
use souschef::search::RecipeStore;
use souschef::storage::JsonlRecipeStore;

#[derive(Parser)]
#[command(
    name = "import-mealdb",
    about = "Import recipes from TheMealDB",
    long_about = "Fetch all meals from TheMealDB (a-z), transform them into the \
                  internal recipe schema and append them to a JSON-lines file"
)]
struct ImportArgs {
    /// Fetch and transform without writing the output file
    #[arg(long)]
    dry_run: bool,

    /// Delay between API requests in seconds
    #[arg(long, default_value_t = 0.5)]
    delay: f64,

    /// Output file for imported recipes
    #[arg(long, default_value = "recipes.jsonl")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    souschef::logging::init_logging()?;
    let args = ImportArgs::parse();

    println!("Output: {}", args.out.display());
    println!("Dry run: {}", args.dry_run);
    println!("API delay: {}s", args.delay);
    println!();

    println!("Fetching meals from TheMealDB (a-z)...");
    let client = reqwest::Client::new();
    let raw_meals = mealdb::fetch_all_meals(&client, Duration::from_secs_f64(args.delay)).await?;
    println!("Fetched {} unique meals", raw_meals.len());
    println!();

    if raw_meals.is_empty() {
        println!("No meals fetched. Exiting.");
        return Ok(());
    }

    let store = JsonlRecipeStore::new(&args.out);
    let total = raw_meals.len();
    let mut seen_titles: HashSet<String> = HashSet::new();
    let mut saved = 0_usize;
    let mut skipped = 0_usize;
    let mut errors = 0_usize;

    for (i, meal) in raw_meals.iter().enumerate() {
        let index = i + 1;
        let recipe = mealdb::transform_meal(meal);
        let title = recipe.candidate.title.clone();

        if !seen_titles.insert(title.clone()) {
            println!("  [{index}/{total}] SKIP (duplicate): {title}");
            skipped += 1;
            continue;
        }

        if args.dry_run {
            let ingredient_count = recipe.candidate.ingredients.len();
            println!("  [{index}/{total}] DRY-RUN OK: {title} ({ingredient_count} ingredients)");
            saved += 1;
            continue;
        }

        match store
            .save(
                &recipe.candidate,
                MEALDB_SOURCE_TAG,
                recipe.image_url.as_deref(),
            )
            .await
        {
            Ok(_) => {
                println!("  [{index}/{total}] OK: {title}");
                saved += 1;
            }
            Err(err) => {
                warn!(title = %title, error = %err, "Failed to save imported recipe");
                println!("  [{index}/{total}] ERROR: {title} ({err})");
                errors += 1;
            }
        }
    }

    println!();
    println!("{}", "=".repeat(50));
    println!("  Total fetched:  {total}");
    println!("  Saved:          {saved}");
    println!("  Skipped (dup):  {skipped}");
    println!("  Errors:         {errors}");
    println!("{}", "=".repeat(50));

    Ok(())
}
