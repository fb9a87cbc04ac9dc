use super::{GenerationOrchestrator, ThemeGeneration};
use crate::errors::{HeadlineError, ProviderError};
use crate::headlines::placeholder_headlines;
use crate::model::{
    EvaluationRequest, EvaluationResult, GenerationRequest, GenerationResult, Headline,
    LlmResponse,
};
use crate::parse::{parse_evaluation, parse_generation};
use crate::prompt::{build_evaluation_prompt, build_generation_prompt, PromptPair};
use tracing::{debug, info, warn};

pub(crate) async fn generate_prompts_impl(
    svc: &GenerationOrchestrator,
    theme: &str,
    headlines: Vec<Headline>,
) -> GenerationResult {
    let exemplars = svc
        .exemplars
        .top_prompt_exemplars(theme, svc.config.prompt_limit);
    debug!(theme, exemplars = exemplars.len(), "prompt exemplars loaded");

    match GenerationRequest::new(theme, headlines, exemplars) {
        Ok(req) => generate_impl(svc, &req).await,
        Err(e) => GenerationResult::failure(e.to_string()),
    }
}

pub(crate) async fn generate_impl(
    svc: &GenerationOrchestrator,
    req: &GenerationRequest,
) -> GenerationResult {
    let prompt = build_generation_prompt(req.headlines(), req.theme(), req.exemplars());

    let resp = match call_model(svc, &prompt).await {
        Ok(resp) => resp,
        Err(e) => {
            warn!(theme = req.theme(), kind = e.kind(), error = %e, "generation call failed");
            return GenerationResult::failure(e.to_string());
        }
    };

    match parse_generation(&resp.text) {
        Ok(questions) => {
            info!(theme = req.theme(), model = %resp.model, "generated prompts");
            GenerationResult::Success { questions }
        }
        Err(e) => {
            warn!(theme = req.theme(), kind = e.kind(), error = %e, "generation output rejected");
            GenerationResult::failure(e.to_string())
        }
    }
}

pub(crate) async fn generate_for_theme_impl(
    svc: &GenerationOrchestrator,
    theme: &str,
) -> ThemeGeneration {
    let fetched = fetch_headlines(svc, theme).await;

    let (headlines, placeholder) = match fetched {
        Ok(h) => (h, false),
        Err(e) if svc.config.allow_placeholder_headlines => {
            warn!(theme, kind = e.kind(), error = %e, "headline fetch failed; using placeholder headlines");
            (placeholder_headlines(theme), true)
        }
        Err(e) => {
            warn!(theme, kind = e.kind(), error = %e, "headline fetch failed");
            return ThemeGeneration {
                headlines: Vec::new(),
                placeholder: false,
                result: GenerationResult::failure(e.to_string()),
            };
        }
    };

    let result = generate_prompts_impl(svc, theme, headlines.clone()).await;
    ThemeGeneration {
        headlines,
        placeholder,
        result,
    }
}

async fn fetch_headlines(
    svc: &GenerationOrchestrator,
    theme: &str,
) -> Result<Vec<Headline>, HeadlineError> {
    let Some(source) = svc.headlines.as_ref() else {
        return Err(HeadlineError::Transport {
            message: "no headline source configured".into(),
        });
    };

    let limit = svc.config.max_headlines;
    let timeout = svc.config.headline_timeout;
    let headlines = match tokio::time::timeout(timeout, source.fetch(theme, limit)).await {
        Ok(res) => res?,
        Err(_) => return Err(HeadlineError::Timeout { after: timeout }),
    };

    // Sources are not trusted to honour the contract.
    if headlines.is_empty() {
        return Err(HeadlineError::EmptyResult {
            theme: theme.to_string(),
        });
    }
    Ok(headlines.into_iter().take(limit).collect())
}

pub(crate) async fn evaluate_answer_impl(
    svc: &GenerationOrchestrator,
    prompt_text: &str,
    source_context: Option<&str>,
    answer_text: &str,
) -> EvaluationResult {
    let exemplars = svc
        .exemplars
        .sample_evaluation_exemplars(svc.config.evaluation_limit);
    debug!(exemplars = exemplars.len(), "evaluation exemplars loaded");

    let req = EvaluationRequest::new(
        prompt_text,
        source_context.map(str::to_string),
        answer_text,
        exemplars,
    );
    evaluate_impl(svc, &req).await
}

pub(crate) async fn evaluate_impl(
    svc: &GenerationOrchestrator,
    req: &EvaluationRequest,
) -> EvaluationResult {
    let prompt = build_evaluation_prompt(
        req.prompt_text(),
        req.source_context(),
        req.answer_text(),
        req.exemplars(),
    );

    let resp = match call_model(svc, &prompt).await {
        Ok(resp) => resp,
        Err(e) => {
            warn!(kind = e.kind(), error = %e, "evaluation call failed");
            return EvaluationResult::failure(e.to_string());
        }
    };

    match parse_evaluation(&resp.text) {
        Ok(eval) => {
            info!(score = eval.score, model = %resp.model, "evaluated answer");
            eval.into()
        }
        Err(e) => {
            warn!(kind = e.kind(), error = %e, "evaluation output rejected");
            EvaluationResult::failure(e.to_string())
        }
    }
}

/// One model call, bounded by the configured timeout.
async fn call_model(
    svc: &GenerationOrchestrator,
    prompt: &PromptPair,
) -> Result<LlmResponse, ProviderError> {
    let timeout = svc.config.model_timeout;
    match tokio::time::timeout(timeout, svc.llm.complete(&prompt.system, &prompt.user)).await {
        Ok(res) => res,
        Err(_) => Err(ProviderError::Timeout { after: timeout }),
    }
}
