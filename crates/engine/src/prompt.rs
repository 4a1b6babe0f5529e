//! Rendering quotas for the generation step.

use topicwise_core::quota::{total_quota, QuotaEntry};

/// Sentence used when there is no distribution to enforce.
pub const BALANCED_FALLBACK: &str =
    "Distribute the items evenly across the topics identified in the content.";

/// The quota block handed to the generation collaborator.
///
/// One bullet per topic followed by the rules the generator must follow.
/// An empty distribution yields [`BALANCED_FALLBACK`].
pub fn format_distribution(quotas: &[QuotaEntry]) -> String {
    if quotas.is_empty() {
        return BALANCED_FALLBACK.to_string();
    }

    let mut out = String::from("REQUIRED DISTRIBUTION (DO NOT CHANGE):\n");
    for entry in quotas {
        let unit = if entry.quota == 1 { "item" } else { "items" };
        out.push_str(&format!("• {}: {} {unit}\n", entry.topic, entry.quota));
    }
    out.push_str(&format!(
        "\nGenerate EXACTLY the number of items listed for each topic ({} in total).\n\
         Tag every item with its topic in the \"topic\" field.",
        total_quota(quotas)
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_distribution_asks_for_balance() {
        assert_eq!(format_distribution(&[]), BALANCED_FALLBACK);
    }

    #[test]
    fn one_bullet_per_topic_in_order() {
        let block = format_distribution(&[
            QuotaEntry::new("Tireoidite", 3),
            QuotaEntry::new("Hepatite B", 1),
        ]);
        let bullets: Vec<&str> = block.lines().filter(|l| l.starts_with('•')).collect();
        assert_eq!(bullets, vec!["• Tireoidite: 3 items", "• Hepatite B: 1 item"]);
        assert!(block.contains("4 in total"));
        assert!(block.contains("\"topic\""));
    }
}
