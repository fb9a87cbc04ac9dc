//! Prompt construction for both tasks.
//!
//! Builders are pure: they never fail, never validate lengths, and degrade to
//! a zero-shot prompt when no exemplars are supplied.

use crate::model::{EvaluationExemplar, Headline};
use serde::Serialize;

/// System instruction plus user message for one model call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

pub(crate) const GENERATION_SYSTEM: &str = "あなたは優秀な大喜利AIです。ユーザーから与えられたニュースタイトルに基づき、\
面白くてユニークな大喜利のお題を**3つだけ**考案し、**必ずJSON形式**で出力してください。\
JSONはキーを`questions`の1つだけとし、その値は3つの文字列（お題）を持つ配列とすること。\
**JSON以外のテキストは一切含めないでください。**\
中国語など日本語以外のニュースと考えられる内容は考慮せず、日本語のニュースだけを使ってください。\
死、暴力あるいは戦争など悲惨なことを思い起こさせるニュースは参照せずに、大喜利のお題を考えてください。";

pub(crate) const EVALUATION_SYSTEM: &str = "あなたは厳しくも愛のある大喜利のプロ審査員です。\
提供される【評価の参考にすべき事例】があれば、それを参考に評価基準と講評のトーンを学習し、今回の回答を評価してください。\
ユーザーの回答を5段階で評価し、短い講評コメントを行ってください。\
出力は必ずJSON形式で、整数型の`score`（1〜5）と文字列型の`comment`の2つのキーだけを含むオブジェクトにしてください。\
JSON以外のテキストは出力しないでください。";

const EXEMPLAR_SEPARATOR: &str = "\n\n---\n\n";

pub fn build_generation_prompt(headlines: &[Headline], theme: &str, exemplars: &[String]) -> PromptPair {
    let mut user = format!(
        "テーマ「{}」に関する以下のニュースタイトルを見て、3つのお題をJSON形式で提案してください。\n\n",
        theme
    );

    user.push_str("--- ニュースタイトル ---\n");
    for h in headlines {
        user.push_str("- ");
        user.push_str(h.as_str());
        user.push('\n');
    }

    if !exemplars.is_empty() {
        user.push_str("\n--- 面白いお題の例 ---\n");
        user.push_str(
            "参考として、過去に面白かったお題の例を挙げます。そのまま使うのではなく、このスタイルを参考に新しいお題を生成してください:\n",
        );
        for ex in exemplars {
            user.push_str("  - ");
            user.push_str(ex);
            user.push('\n');
        }
    }

    PromptPair {
        system: GENERATION_SYSTEM.to_string(),
        user,
    }
}

pub fn build_evaluation_prompt(
    prompt_text: &str,
    source_context: Option<&str>,
    answer_text: &str,
    exemplars: &[EvaluationExemplar],
) -> PromptPair {
    let mut user = String::from("以下の大喜利のお題に対する回答を評価してください。\n\n");

    let block = render_exemplars(exemplars);
    if !block.is_empty() {
        user.push_str("---【評価の参考にすべき事例】---\n");
        user.push_str("以下の過去の模範解答と評価結果のパターンを参考に、今回の回答を評価してください。\n");
        user.push_str(&block);
        user.push_str("\n---------------------------------\n\n");
    }

    user.push_str("【今回の評価対象】\n");
    if let Some(ctx) = source_context.filter(|c| !c.trim().is_empty()) {
        user.push_str("元ネタのニュース: ");
        user.push_str(ctx);
        user.push('\n');
    }
    user.push_str("お題: ");
    user.push_str(prompt_text);
    user.push('\n');
    user.push_str("回答: ");
    user.push_str(answer_text);
    user.push('\n');

    PromptPair {
        system: EVALUATION_SYSTEM.to_string(),
        user,
    }
}

#[derive(Serialize)]
struct ExemplarRecord<'a> {
    #[serde(rename = "お題")]
    prompt: &'a str,
    #[serde(rename = "回答")]
    answer: &'a str,
    #[serde(rename = "評価結果")]
    evaluation: ExemplarScore<'a>,
}

#[derive(Serialize)]
struct ExemplarScore<'a> {
    score: i64,
    comment: &'a str,
}

fn render_exemplars(exemplars: &[EvaluationExemplar]) -> String {
    exemplars
        .iter()
        .filter_map(|ex| {
            let record = ExemplarRecord {
                prompt: &ex.prompt,
                answer: &ex.answer,
                evaluation: ExemplarScore {
                    score: ex.score,
                    comment: &ex.commentary,
                },
            };
            // Serializing borrowed strings into a String cannot fail.
            serde_json::to_string_pretty(&record)
                .ok()
                .map(|json| format!("事例:\n{}", json))
        })
        .collect::<Vec<_>>()
        .join(EXEMPLAR_SEPARATOR)
}
