// ABOUTME: Concrete RecipeStore implementations: in-memory and JSON-lines file
// ABOUTME: The JSONL store backs the bulk importer; the memory store backs tests and demos
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

//! # Recipe Stores
//!
//! Two [`RecipeStore`] implementations ship with the engine. Relational
//! persistence lives outside this crate; these stores cover the importer
//! binary (append-only JSON lines) and tests/demos (in-memory).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::models::{CandidateRecipe, PersistedRecipe};
use crate::search::RecipeStore;

/// In-memory recipe store
#[derive(Debug, Default)]
pub struct MemoryRecipeStore {
    recipes: Mutex<Vec<PersistedRecipe>>,
}

impl MemoryRecipeStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything saved so far, insertion order
    pub async fn saved(&self) -> Vec<PersistedRecipe> {
        self.recipes.lock().await.clone()
    }

    /// Number of recipes saved so far
    pub async fn len(&self) -> usize {
        self.recipes.lock().await.len()
    }

    /// Whether nothing has been saved yet
    pub async fn is_empty(&self) -> bool {
        self.recipes.lock().await.is_empty()
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn save(
        &self,
        candidate: &CandidateRecipe,
        source: &str,
        image_url: Option<&str>,
    ) -> AppResult<PersistedRecipe> {
        let recipe = PersistedRecipe::from_candidate(candidate, source, image_url);
        self.recipes.lock().await.push(recipe.clone());
        Ok(recipe)
    }
}

/// Append-only JSON-lines recipe store
///
/// Each save appends one JSON object per line to the target file, creating
/// it on first use.
#[derive(Debug, Clone)]
pub struct JsonlRecipeStore {
    path: PathBuf,
}

impl JsonlRecipeStore {
    /// Create a store writing to the given path
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store appends to
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecipeStore for JsonlRecipeStore {
    async fn save(
        &self,
        candidate: &CandidateRecipe,
        source: &str,
        image_url: Option<&str>,
    ) -> AppResult<PersistedRecipe> {
        let recipe = PersistedRecipe::from_candidate(candidate, source, image_url);

        let mut line = serde_json::to_string(&recipe)
            .map_err(|e| AppError::storage(format!("Failed to serialize recipe: {e}")))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                AppError::storage(format!("Failed to open {}: {e}", self.path.display()))
            })?;

        file.write_all(line.as_bytes()).await.map_err(|e| {
            AppError::storage(format!("Failed to write {}: {e}", self.path.display()))
        })?;

        debug!(title = %recipe.title, path = %self.path.display(), "Appended recipe");

        Ok(recipe)
    }
}
