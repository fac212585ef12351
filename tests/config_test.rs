// ABOUTME: Unit tests for configuration parsing and gateway construction
// ABOUTME: Validates fatal unknown-provider handling and per-variant requirements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serial_test::serial;

use souschef::ai::{AiGateway, AiProvider};
use souschef::config::{AiConfig, AiProviderKind, ServerConfig, AI_PROVIDER_ENV};
use souschef::errors::ErrorCode;

#[test]
fn test_provider_selector_parsing() {
    assert_eq!(
        AiProviderKind::parse("ollama").unwrap(),
        AiProviderKind::Ollama
    );
    assert_eq!(
        AiProviderKind::parse("OpenAI").unwrap(),
        AiProviderKind::OpenAi
    );
    assert_eq!(
        AiProviderKind::parse("anthropic").unwrap(),
        AiProviderKind::Anthropic
    );
    assert_eq!(
        AiProviderKind::parse("claude_local").unwrap(),
        AiProviderKind::ClaudeCli
    );
}

#[test]
fn test_unknown_selector_is_fatal_not_a_fallback() {
    let err = AiProviderKind::parse("bard").unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigInvalid);
    assert!(err.message.contains("bard"));
}

#[test]
#[serial]
fn test_config_from_env_rejects_unknown_provider() {
    std::env::set_var(AI_PROVIDER_ENV, "some-new-vendor");
    let result = ServerConfig::from_env();
    std::env::remove_var(AI_PROVIDER_ENV);

    let err = result.unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigInvalid);
}

#[test]
#[serial]
fn test_config_from_env_defaults_to_ollama() {
    std::env::remove_var(AI_PROVIDER_ENV);
    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.ai.provider, AiProviderKind::Ollama);
    assert_eq!(config.ai.ollama_base_url, "http://localhost:11434");
}

#[test]
fn test_gateway_selects_configured_variant() {
    let config = AiConfig {
        provider: AiProviderKind::Ollama,
        ..AiConfig::default()
    };
    let gateway = AiGateway::from_config(&config).unwrap();
    assert_eq!(gateway.provider_kind(), AiProviderKind::Ollama);
    assert_eq!(gateway.name(), "ollama");

    let config = AiConfig {
        provider: AiProviderKind::ClaudeCli,
        ..AiConfig::default()
    };
    let gateway = AiGateway::from_config(&config).unwrap();
    assert_eq!(gateway.provider_kind(), AiProviderKind::ClaudeCli);
    assert_eq!(gateway.name(), "claude_local");
}

#[test]
fn test_hosted_variants_require_api_keys() {
    let config = AiConfig {
        provider: AiProviderKind::OpenAi,
        openai_api_key: None,
        ..AiConfig::default()
    };
    let err = AiGateway::from_config(&config).unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigMissing);

    let config = AiConfig {
        provider: AiProviderKind::Anthropic,
        anthropic_api_key: None,
        ..AiConfig::default()
    };
    let err = AiGateway::from_config(&config).unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigMissing);
}

#[test]
fn test_hosted_variants_construct_with_keys() {
    let config = AiConfig {
        provider: AiProviderKind::OpenAi,
        openai_api_key: Some("sk-test".to_owned()),
        ..AiConfig::default()
    };
    let gateway = AiGateway::from_config(&config).unwrap();
    assert_eq!(gateway.name(), "openai");

    let config = AiConfig {
        provider: AiProviderKind::Anthropic,
        anthropic_api_key: Some("sk-ant-test".to_owned()),
        ..AiConfig::default()
    };
    let gateway = AiGateway::from_config(&config).unwrap();
    assert_eq!(gateway.name(), "anthropic");
}

#[test]
fn test_available_providers_lists_all_four() {
    let kinds = AiGateway::available_providers();
    assert_eq!(kinds.len(), 4);
    let names: Vec<&str> = kinds.iter().map(AiProviderKind::as_str).collect();
    assert_eq!(names, vec!["ollama", "openai", "anthropic", "claude_local"]);
}
