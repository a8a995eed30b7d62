use anyhow::Result;
use console::Style;
use docret_agent::{Answer, Responder};
use docret_context::DocContext;
use std::path::Path;

use super::ui;
use super::utils::{render_markdown_answer, spinner};

pub async fn handle_ask(
    question: String,
    top_k: Option<usize>,
    max_distance: Option<f32>,
    show_sources: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let ctx = DocContext::from_env(config_path).await?;
    let responder = Responder::from_context(&ctx).with_overrides(top_k, max_distance)?;

    let progress = spinner("Thinking...");
    let answer = responder.ask(&question).await;
    progress.finish_and_clear();

    match answer? {
        Answer::Grounded { text, sources } => {
            ui::print_header("Answer");
            println!("{}", render_markdown_answer(&text));
            if show_sources {
                ui::print_header("Sources");
                for source in sources {
                    println!(
                        " - {} {}",
                        source.id,
                        Style::new()
                            .dim()
                            .apply_to(format!("(distance {:.4})", source.distance))
                    );
                }
            }
        }
        Answer::NoConfidentMatch { closest } => {
            let detail = match closest {
                Some(d) => format!(
                    "closest record at distance {:.4}, threshold {:.4}",
                    d,
                    responder.max_distance()
                ),
                None => "the index is empty".to_string(),
            };
            ui::print_warning(&format!(
                "No confident match in the indexed documents ({}).",
                detail
            ));
        }
        Answer::Unavailable { reason } => {
            ui::print_error(&format!("No answer could be produced: {}", reason));
        }
    }

    Ok(())
}
