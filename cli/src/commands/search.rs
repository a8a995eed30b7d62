use anyhow::Result;
use docret_agent::Responder;
use docret_context::DocContext;
use std::path::Path;

use super::ui;

pub async fn handle_search(query: String, top_k: Option<usize>, config_path: Option<&Path>) -> Result<()> {
    let ctx = DocContext::from_env(config_path).await?;
    let responder = Responder::from_context(&ctx).with_overrides(top_k, None)?;

    let hits = responder.candidates(&query).await?;
    if hits.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let threshold = responder.max_distance();
    for (i, hit) in hits.iter().enumerate() {
        ui::print_match(i + 1, &hit.id, hit.distance, hit.distance <= threshold, &hit.context_text);
    }
    let admitted = hits.iter().filter(|h| h.distance <= threshold).count();
    ui::print_key_value(
        "Admitted",
        &format!("{}/{} (max_distance {})", admitted, hits.len(), threshold),
    );
    Ok(())
}
