use clap::Args;
use wellora_core::{AdviceDomain, LifestyleFactors, UserQuery};

use crate::commands::{CommandContext, CommandResult};

#[derive(Debug, Clone, Args)]
pub struct AdviseArgs {
    #[arg(long, default_value = "skincare", help = "Advice domain (skincare|hair)")]
    pub domain: String,
    #[arg(long, help = "User the analysis is recorded for")]
    pub user: String,
    #[arg(long, help = "Issue display name or slug, e.g. `Pimples` or `whiteheads`")]
    pub issue: String,
    #[arg(long)]
    pub gender: String,
    #[arg(long = "type", help = "Skin type for skincare, scalp type for hair")]
    pub kind: String,
    #[arg(long)]
    pub age: Option<u32>,
    #[arg(long)]
    pub sleep_hours: Option<u32>,
    #[arg(long, help = "Low|Medium|High")]
    pub water_intake: Option<String>,
    #[arg(long, help = "Yes|No")]
    pub oily_scalp: Option<String>,
    #[arg(long, help = "Yes|No")]
    pub chemical_treatment: Option<String>,
    #[arg(long, help = "Yes|No")]
    pub makeup: Option<String>,
}

pub fn run(args: AdviseArgs) -> CommandResult {
    let domain = match args.domain.parse::<AdviceDomain>() {
        Ok(domain) => domain,
        Err(error) => return CommandResult::failure("advise", "invalid_input", error.to_string(), 8),
    };

    let mut query = UserQuery::new(args.issue, args.gender, args.kind).with_factors(
        LifestyleFactors {
            water_intake: args.water_intake,
            oily_scalp: args.oily_scalp,
            chemical_treatment: args.chemical_treatment,
            makeup: args.makeup,
        },
    );
    query.age = args.age;
    query.sleep_hours = args.sleep_hours;

    let (context, account) = match CommandContext::open_for_user("advise", &args.user) {
        Ok(opened) => opened,
        Err(result) => return result,
    };

    let recommendation =
        context.runtime.block_on(context.service.recommend(&account.id, domain, &query));
    let message = format!(
        "{} routine for {} ({} match)",
        domain,
        recommendation.query.issue,
        recommendation.tier.as_str()
    );
    let result = CommandResult::success_with_data("advise", message, &recommendation);

    context.close();
    result
}
