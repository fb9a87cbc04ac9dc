use crate::cli::args::EvaluateArgs;
use crate::exit_codes::{EXIT_FAILURE, EXIT_SUCCESS};
use anyhow::Context;
use oogiri_core::model::MAX_SCORE;
use oogiri_core::{
    build_llm_client, Evaluation, EvaluationResult, GenerationOrchestrator, OrchestratorConfig,
};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

pub async fn run(config_path: &Path, args: EvaluateArgs) -> anyhow::Result<i32> {
    let cfg = super::load_config(config_path)?;
    let store = super::open_store(&cfg)?;

    let (question_id, prompt_text, source_context) = match (args.question_id, &args.prompt) {
        (Some(id), _) => {
            let row = store
                .get_question(id)?
                .with_context(|| format!("question {} not found", id))?;
            (Some(id), row.question_text, row.source_title)
        }
        (None, Some(prompt)) => (None, prompt.clone(), args.source.clone()),
        (None, None) => anyhow::bail!("either --question-id or --prompt is required"),
    };

    let llm = build_llm_client(&cfg.llm)?;
    let orch = GenerationOrchestrator::new(
        llm,
        Arc::new(store.clone()),
        OrchestratorConfig::from(&cfg),
    );
    let result = orch
        .evaluate_answer(&prompt_text, source_context.as_deref(), &args.answer)
        .await;

    let mut answer_id = None;
    if let (true, Some(qid), EvaluationResult::Success { score, comment }) =
        (args.save, question_id, &result)
    {
        let eval = Evaluation {
            score: *score,
            comment: comment.clone(),
        };
        answer_id = Some(store.insert_answer(qid, &args.answer, Some(&eval))?);
    }

    if args.json {
        let doc = json!({
            "prompt": prompt_text,
            "answer": args.answer,
            "result": result,
            "question_id": question_id,
            "answer_id": answer_id,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        match &result {
            EvaluationResult::Success { score, comment } => {
                println!("score: {}/{}", score, MAX_SCORE);
                println!("comment: {}", comment);
                if let Some(id) = answer_id {
                    println!("saved answer id {}", id);
                }
            }
            EvaluationResult::Failure { reason } => eprintln!("evaluation failed: {}", reason),
        }
    }

    Ok(match result {
        EvaluationResult::Success { .. } => EXIT_SUCCESS,
        EvaluationResult::Failure { .. } => EXIT_FAILURE,
    })
}
