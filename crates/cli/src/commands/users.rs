use clap::Args;

use crate::commands::{CommandContext, CommandResult};

#[derive(Debug, Clone, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
}

pub fn run_register(args: RegisterArgs) -> CommandResult {
    let context = match CommandContext::open("register") {
        Ok(context) => context,
        Err(result) => return result,
    };

    let result = match context
        .runtime
        .block_on(context.service.register_user(&args.username, &args.email))
    {
        Ok(account) => CommandResult::success_with_data(
            "register",
            format!("registered {} as {}", account.username, account.id),
            &account,
        ),
        Err(error) => CommandResult::from_application_error("register", error),
    };

    context.close();
    result
}
