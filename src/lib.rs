// ABOUTME: Main library entry point for the SousChef AI recipe engine
// ABOUTME: Turns free-text cooking requests plus household context into validated recipe records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

#![deny(unsafe_code)]

//! # SousChef AI
//!
//! AI-assisted recipe search for households: turns a free-text cooking
//! request plus household context (available ingredients, dietary
//! restrictions, health goals, family notes) into structured, validated
//! recipe records, classifying each recipe's ingredients as available,
//! missing or substitutable against the household's inventory.
//!
//! ## Features
//!
//! - **Multi-provider support**: Ollama, OpenAI, Anthropic or a local
//!   Claude CLI behind one gateway interface
//! - **Tolerant normalization**: enveloped or bare JSON, JSON embedded in
//!   prose, lists-vs-strings, numeric strings and free-form quantities all
//!   collapse into one strict internal schema
//! - **Availability matching**: per-ingredient available / missing /
//!   substitutable classification, computed fresh each search
//! - **Bulk import**: TheMealDB feed transformed through the same schema
//!   and measurement parser
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use souschef::ai::AiGateway;
//! use souschef::config::ServerConfig;
//! use souschef::errors::AppResult;
//! use souschef::search::{SearchOrchestrator, SearchParams};
//!
//! # async fn example() -> AppResult<()> {
//! let config = ServerConfig::from_env()?;
//! let gateway = AiGateway::from_config(&config.ai)?;
//! let orchestrator = SearchOrchestrator::new(&gateway);
//! let params = SearchParams::new("a quick weeknight pasta", "user-1", "household-1");
//! // orchestrator.search(&params, &context, &store).await?;
//! # Ok(())
//! # }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by the importer binary (src/bin/) and integration
// tests (tests/). They must remain `pub` so external consumers can access
// them.

/// AI provider gateway: the `AiProvider` contract, the four variants and
/// the shared prompt templates
pub mod ai;

/// Explicit configuration value objects built once from the environment
pub mod config;

/// Unified error handling system
pub mod errors;

/// Camera-scan convenience over the gateway's image identification
pub mod ingredient_scan;

/// Structured logging configuration
pub mod logging;

/// Ingredient availability classification against household inventory
pub mod matcher;

/// TheMealDB bulk-import fetch and transformation
pub mod mealdb;

/// Free-text measurement parsing into quantity/unit pairs
pub mod measurement;

/// Core data model for candidate and persisted recipes
pub mod models;

/// Normalization of loosely-structured provider output
pub mod normalize;

/// The top-level recipe search use case and its collaborator traits
pub mod search;

/// Concrete `RecipeStore` implementations (in-memory, JSON lines)
pub mod storage;
