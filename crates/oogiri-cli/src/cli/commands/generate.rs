use crate::cli::args::GenerateArgs;
use crate::exit_codes::{EXIT_FAILURE, EXIT_SUCCESS};
use oogiri_core::{
    build_llm_client, source_context_for, GenerationOrchestrator, GenerationResult, Headline,
    NewsApiSource, OogiriConfig, OrchestratorConfig, ThemeGeneration,
};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

pub async fn run(config_path: &Path, args: GenerateArgs) -> anyhow::Result<i32> {
    let cfg = super::load_config(config_path)?;
    let store = super::open_store(&cfg)?;
    let llm = build_llm_client(&cfg.llm)?;

    let mut orch = GenerationOrchestrator::new(
        llm,
        Arc::new(store.clone()),
        OrchestratorConfig::from(&cfg),
    );

    let outcome = if args.headlines.is_empty() {
        if let Some(source) = news_source(&cfg)? {
            orch = orch.with_headline_source(Arc::new(source));
        }
        orch.generate_for_theme(&args.theme).await
    } else {
        let headlines: Vec<Headline> = args
            .headlines
            .iter()
            .map(|h| Headline::from(h.as_str()))
            .collect();
        let result = orch.generate_prompts(&args.theme, headlines.clone()).await;
        ThemeGeneration {
            headlines,
            placeholder: false,
            result,
        }
    };

    let mut saved_ids = Vec::new();
    if let (true, GenerationResult::Success { questions }) = (args.save, &outcome.result) {
        let source = source_context_for(&outcome.headlines);
        for q in questions {
            saved_ids.push(store.insert_question(&args.theme, q, Some(source.as_str()), false)?);
        }
    }

    if args.json {
        let doc = json!({
            "theme": args.theme,
            "headlines": outcome.headlines,
            "placeholder_headlines": outcome.placeholder,
            "result": outcome.result,
            "saved_ids": saved_ids,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        print_text(&outcome, &saved_ids);
    }

    Ok(match outcome.result {
        GenerationResult::Success { .. } => EXIT_SUCCESS,
        GenerationResult::Failure { .. } => EXIT_FAILURE,
    })
}

/// `None` when the news key is missing but placeholders may stand in.
fn news_source(cfg: &OogiriConfig) -> anyhow::Result<Option<NewsApiSource>> {
    match NewsApiSource::from_config(&cfg.news) {
        Ok(source) => Ok(Some(source)),
        Err(e) if cfg.allow_placeholder_headlines => {
            tracing::warn!(error = %e, "news feed not configured");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_text(outcome: &ThemeGeneration, saved_ids: &[i64]) {
    if outcome.placeholder {
        eprintln!("warning: news feed unavailable, using placeholder headlines");
    }
    match &outcome.result {
        GenerationResult::Success { questions } => {
            for (i, q) in questions.iter().enumerate() {
                match saved_ids.get(i) {
                    Some(id) => println!("{}. {} (id {})", i + 1, q, id),
                    None => println!("{}. {}", i + 1, q),
                }
            }
        }
        GenerationResult::Failure { reason } => {
            eprintln!("generation failed: {}", reason);
        }
    }
}
