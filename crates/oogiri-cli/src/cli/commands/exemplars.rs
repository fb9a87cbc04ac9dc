use crate::cli::args::{ExemplarsArgs, ExemplarsSub};
use crate::exit_codes::EXIT_SUCCESS;
use oogiri_core::Evaluation;
use std::path::Path;

pub fn run(config_path: &Path, args: ExemplarsArgs) -> anyhow::Result<i32> {
    let cfg = super::load_config(config_path)?;
    let store = super::open_store(&cfg)?;

    match args.cmd {
        ExemplarsSub::Init => {
            println!("Initialized {}", cfg.exemplars.database.display());
        }
        ExemplarsSub::AddQuestion {
            theme,
            text,
            source,
            excellent,
        } => {
            if theme.trim().is_empty() || text.trim().is_empty() {
                anyhow::bail!("--theme and --text must not be empty");
            }
            let id = store.insert_question(&theme, &text, source.as_deref(), true)?;
            if excellent {
                store.set_question_excellent(id, true)?;
            }
            println!("{}", id);
        }
        ExemplarsSub::AddAnswer {
            question_id,
            text,
            score,
            comment,
            excellent,
        } => {
            if store.get_question(question_id)?.is_none() {
                anyhow::bail!("question {} not found", question_id);
            }
            let eval = score.map(|score| Evaluation {
                score,
                comment: comment.unwrap_or_default(),
            });
            let id = store.insert_answer(question_id, &text, eval.as_ref())?;
            if excellent {
                store.set_answer_excellent(id, true)?;
            }
            println!("{}", id);
        }
        ExemplarsSub::FlagQuestion { id, unset } => {
            if !store.set_question_excellent(id, !unset)? {
                anyhow::bail!("question {} not found", id);
            }
        }
        ExemplarsSub::FlagAnswer { id, unset } => {
            if !store.set_answer_excellent(id, !unset)? {
                anyhow::bail!("answer {} not found", id);
            }
        }
    }
    Ok(EXIT_SUCCESS)
}
