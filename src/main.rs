//! clinirag - Main CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;

use clinirag::cli::{Args, Commands};
use clinirag::config::{Config, RemoteServiceConfig};
use clinirag::embedding::HttpEmbedder;
use clinirag::index::IndexBuilder;
use clinirag::remote::{AnswerService, GeminiClient, GroqClient};
use clinirag::retrieval::{Audience, RagContext, RetrievalOrchestrator, SearchParams};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path.clone())?,
        None => Config::load()?,
    };

    match args.command {
        Commands::Build {
            docs_dir,
            chunk_size,
            chunk_overlap,
        } => {
            let size = chunk_size.unwrap_or(config.chunking.size);
            let overlap = chunk_overlap.unwrap_or(config.chunking.overlap);

            let embedder = Arc::new(HttpEmbedder::new(
                &config.embedding.url,
                &config.embedding.model,
            )?);

            let builder = IndexBuilder::new(embedder, size, overlap).with_progress(true);
            let stats = builder
                .build_to(&docs_dir, &config.index_path(), &config.chunks_path())
                .await
                .context("Index build failed")?;

            println!(
                "{} Indexed {} chunks from {} documents (dimension {})",
                "✓".green(),
                stats.chunks,
                stats.documents,
                stats
                    .dimension
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "n/a".to_string())
            );
            println!("  Index:  {}", config.index_path().display());
            println!("  Chunks: {}", config.chunks_path().display());
        }

        Commands::Query {
            question,
            top_k,
            professional,
        } => {
            let embedder = Arc::new(HttpEmbedder::new(
                &config.embedding.url,
                &config.embedding.model,
            )?);

            let context = RagContext::load(
                &config.index_path(),
                &config.chunks_path(),
                embedder,
            )
            .context("Failed to load vector store; run `clinirag build` first")?;

            let params = SearchParams {
                top_k: top_k.unwrap_or(config.retrieval.top_k),
                distance_threshold: config.retrieval.distance_threshold,
            };

            let mut orchestrator =
                RetrievalOrchestrator::new(Arc::new(context)).with_params(params);
            if let Some(service) = primary_service(&config.remote.primary)? {
                orchestrator = orchestrator.with_primary(service);
            }
            if let Some(service) = secondary_service(&config.remote.secondary)? {
                orchestrator = orchestrator.with_secondary(service);
            }

            let audience = if professional {
                Audience::Professional
            } else {
                Audience::Patient
            };

            let outcome = orchestrator.answer(&question, audience).await?;

            println!("{}", outcome.answer_text());
            println!();
            println!("{} {}", "source:".dimmed(), outcome.source().dimmed());
        }

        Commands::Config => {
            println!("Config file: {}", Config::config_path()?.display());
            println!();
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

/// Construct the primary tier when both its URL and API key are present
fn primary_service(
    config: &Option<RemoteServiceConfig>,
) -> Result<Option<Box<dyn AnswerService>>> {
    match configured(config) {
        Some((url, key)) => Ok(Some(Box::new(GeminiClient::new(&url, &key)?))),
        None => Ok(None),
    }
}

/// Construct the secondary tier when both its URL and API key are present
fn secondary_service(
    config: &Option<RemoteServiceConfig>,
) -> Result<Option<Box<dyn AnswerService>>> {
    match configured(config) {
        Some((url, key)) => Ok(Some(Box::new(GroqClient::new(&url, &key)?))),
        None => Ok(None),
    }
}

fn configured(config: &Option<RemoteServiceConfig>) -> Option<(String, String)> {
    let service = config.as_ref()?;
    let key = service.api_key()?;
    Some((service.url.clone(), key))
}
