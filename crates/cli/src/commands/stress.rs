use clap::Args;
use wellora_core::config::{AppConfig, LoadOptions};
use wellora_core::{SatisfactionLevel, ScalpFeedback, StressTips, StressType};

use crate::commands::{CommandContext, CommandResult};

#[derive(Debug, Clone, Args)]
pub struct ScalpArgs {
    #[arg(long)]
    pub user: String,
    #[arg(long, help = "hairfall|dandruff")]
    pub topic: String,
    #[arg(long)]
    pub satisfaction: String,
    #[arg(long)]
    pub followed_routine: bool,
    #[arg(long)]
    pub product_helpful: bool,
    #[arg(long)]
    pub remedies_helpful: bool,
    #[arg(long, default_value = "")]
    pub comments: String,
}

pub fn run(stress_type: &str) -> CommandResult {
    let stress_type = match stress_type.parse::<StressType>() {
        Ok(stress_type) => stress_type,
        Err(error) => return CommandResult::failure("stress", "invalid_input", error.to_string(), 8),
    };

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "stress",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    match StressTips::load(&config.catalog.stress_tips_path) {
        Ok(tips) => {
            let advice = tips.select(stress_type);
            CommandResult::success_with_data("stress", format!("{stress_type} stress tips"), &advice)
        }
        Err(error) => CommandResult::failure("stress", "catalog_load", error.to_string(), 6),
    }
}

/// Records a scalp check-in and prints the improvement history for its
/// table.
pub fn run_scalp(args: ScalpArgs) -> CommandResult {
    let (context, account) = match CommandContext::open_for_user("scalp", &args.user) {
        Ok(opened) => opened,
        Err(result) => return result,
    };

    let feedback =
        ScalpFeedback::new(account.id, args.topic, SatisfactionLevel::parse(&args.satisfaction))
            .with_flags(args.followed_routine, args.product_helpful, args.remedies_helpful)
            .with_comments(args.comments);

    let result = match context.runtime.block_on(context.service.submit_scalp_feedback(feedback)) {
        Ok(history) => {
            let topic =
                history.entries.first().map(|entry| entry.record.topic.clone()).unwrap_or_default();
            let latest =
                history.entries.first().map(|entry| entry.progress.to_string()).unwrap_or_default();
            CommandResult::success_with_data(
                "scalp",
                format!("{topic} improvement {latest}; average {} over {}", history.average, history.len()),
                &history,
            )
        }
        Err(error) => CommandResult::from_application_error("scalp", error),
    };

    context.close();
    result
}
