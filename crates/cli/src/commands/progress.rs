use clap::Args;

use crate::commands::{CommandContext, CommandResult};

#[derive(Debug, Clone, Args)]
pub struct ProgressArgs {
    #[arg(long)]
    pub user: String,
    #[arg(long, help = "Issue display name or slug")]
    pub issue: Option<String>,
    #[arg(long, help = "Engagement topic; reads the hundred-point history instead")]
    pub topic: Option<String>,
}

pub fn run(args: ProgressArgs) -> CommandResult {
    if args.issue.is_some() == args.topic.is_some() {
        return CommandResult::failure(
            "progress",
            "invalid_input",
            "pass exactly one of --issue or --topic",
            8,
        );
    }

    let (context, account) = match CommandContext::open_for_user("progress", &args.user) {
        Ok(opened) => opened,
        Err(result) => return result,
    };
    let user_id = account.id;

    let result = match (&args.issue, &args.topic) {
        (Some(issue), _) => {
            match context.runtime.block_on(context.service.progress(&user_id, issue)) {
                Ok(history) => CommandResult::success_with_data(
                    "progress",
                    format!("average {} over {}", history.average, history.len()),
                    &history,
                ),
                Err(error) => CommandResult::from_application_error("progress", error),
            }
        }
        (None, Some(topic)) => {
            match context.runtime.block_on(context.service.engagement_progress(&user_id, topic)) {
                Ok(history) => CommandResult::success_with_data(
                    "progress",
                    format!("average {} over {}", history.average, history.len()),
                    &history,
                ),
                Err(error) => CommandResult::from_application_error("progress", error),
            }
        }
        (None, None) => CommandResult::failure("progress", "invalid_input", "nothing to read", 8),
    };

    context.close();
    result
}

pub fn run_overview(user: &str) -> CommandResult {
    let (context, account) = match CommandContext::open_for_user("overview", user) {
        Ok(opened) => opened,
        Err(result) => return result,
    };

    let result = match context.runtime.block_on(context.service.overview(&account.id)) {
        Ok(overview) => {
            let tracked = overview.iter().filter(|issue| issue.submissions > 0).count();
            CommandResult::success_with_data(
                "overview",
                format!("{tracked} of {} issues have feedback", overview.len()),
                &overview,
            )
        }
        Err(error) => CommandResult::from_application_error("overview", error),
    };

    context.close();
    result
}
