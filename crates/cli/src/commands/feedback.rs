use clap::Args;
use wellora_core::{EngagementFeedback, FeedbackRecord, RoutineAdherence, SatisfactionLevel};

use crate::commands::{CommandContext, CommandResult};

#[derive(Debug, Clone, Args)]
pub struct FeedbackArgs {
    #[arg(long)]
    pub user: String,
    #[arg(long, help = "Issue display name or slug")]
    pub issue: String,
    #[arg(long, help = "Very Satisfied|Satisfied|Neutral|Dissatisfied|Very Dissatisfied")]
    pub satisfaction: String,
    #[arg(long, help = "Effectiveness rating, usually 1-10")]
    pub rating: Option<i32>,
    #[arg(long, help = "The issue is resolved")]
    pub solved: bool,
    #[arg(long)]
    pub followed_morning: bool,
    #[arg(long)]
    pub followed_night: bool,
    #[arg(long)]
    pub products_helped: bool,
    #[arg(long)]
    pub remedies_helped: bool,
    #[arg(long, default_value = "")]
    pub suggestions: String,
}

#[derive(Debug, Clone, Args)]
pub struct EngageArgs {
    #[arg(long)]
    pub user: String,
    #[arg(long, help = "Hair or stress topic, e.g. `hairfall` or `work`")]
    pub topic: String,
    #[arg(long, help = "Rating, usually 1-5")]
    pub rating: Option<i32>,
    #[arg(long = "tip", help = "A tip that was used; repeat for several")]
    pub tips: Vec<String>,
    #[arg(long, default_value = "")]
    pub comments: String,
}

pub fn run(args: FeedbackArgs) -> CommandResult {
    let (context, account) = match CommandContext::open_for_user("feedback", &args.user) {
        Ok(opened) => opened,
        Err(result) => return result,
    };

    let record = FeedbackRecord::new(
        account.id,
        args.issue,
        SatisfactionLevel::parse(&args.satisfaction),
        args.rating,
        args.solved,
    )
    .with_adherence(RoutineAdherence {
        followed_morning_routine: args.followed_morning,
        followed_night_routine: args.followed_night,
        products_made_change: args.products_helped,
        remedies_helpful: args.remedies_helped,
    })
    .with_suggestions(args.suggestions);

    let result = match context.runtime.block_on(context.service.submit_feedback(record)) {
        Ok(history) => {
            let latest = history
                .entries
                .first()
                .map(|entry| entry.progress.to_string())
                .unwrap_or_default();
            CommandResult::success_with_data(
                "feedback",
                format!("recorded {latest}; average {} over {}", history.average, history.len()),
                &history,
            )
        }
        Err(error) => CommandResult::from_application_error("feedback", error),
    };

    context.close();
    result
}

pub fn run_engagement(args: EngageArgs) -> CommandResult {
    let (context, account) = match CommandContext::open_for_user("engage", &args.user) {
        Ok(opened) => opened,
        Err(result) => return result,
    };

    let feedback = EngagementFeedback::new(account.id, args.topic, args.rating)
        .with_tips_used(args.tips)
        .with_comments(args.comments);

    let result = match context.runtime.block_on(context.service.submit_engagement(feedback)) {
        Ok(history) => CommandResult::success_with_data(
            "engage",
            format!("average {} over {}", history.average, history.len()),
            &history,
        ),
        Err(error) => CommandResult::from_application_error("engage", error),
    };

    context.close();
    result
}
