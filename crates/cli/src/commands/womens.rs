use clap::Args;
use wellora_core::{
    CycleCheckIn, ExerciseFrequency, MenstrualGuide, MenstrualProfile, PainLevel, PregnancyGuide,
    PregnancyProfile,
};

use crate::commands::{load_config, CommandContext, CommandResult};

#[derive(Debug, Clone, Args)]
pub struct MenstrualArgs {
    #[arg(long)]
    pub age: Option<u32>,
    #[arg(long, default_value = "")]
    pub cycle_length: String,
    #[arg(long, help = "low|moderate|severe")]
    pub pain: String,
    #[arg(long = "symptom", help = "A symptom, e.g. `Cramps`; repeat for several")]
    pub symptoms: Vec<String>,
    #[arg(long, help = "never|rarely|occasionally|often|regularly")]
    pub exercise: String,
    #[arg(long)]
    pub sleep_hours: u32,
}

#[derive(Debug, Clone, Args)]
pub struct PregnancyArgs {
    #[arg(long, help = "Month of pregnancy, 1-9")]
    pub month: u8,
    #[arg(long = "condition", help = "A health condition; repeat for several")]
    pub conditions: Vec<String>,
    #[arg(long, default_value = "average", help = "good|average|poor")]
    pub sleep_quality: String,
}

#[derive(Debug, Clone, Args)]
pub struct CheckInArgs {
    #[arg(long)]
    pub user: String,
    #[arg(long, help = "low|moderate|severe")]
    pub pain: String,
    #[arg(long, help = "never|rarely|occasionally|often|regularly")]
    pub exercise: String,
    #[arg(long)]
    pub sleep_hours: u32,
    #[arg(long, help = "Self-rated overall score, 0-10")]
    pub score: u8,
    #[arg(long, default_value = "")]
    pub cycle_length: String,
    #[arg(long, default_value = "")]
    pub products_used: String,
}

fn parse_pain_and_exercise(
    command: &str,
    pain: &str,
    exercise: &str,
) -> Result<(PainLevel, ExerciseFrequency), CommandResult> {
    let invalid = |error: wellora_core::DomainError| {
        CommandResult::failure(command, "invalid_input", error.to_string(), 8)
    };
    Ok((pain.parse().map_err(invalid)?, exercise.parse().map_err(invalid)?))
}

pub fn run_menstrual(args: MenstrualArgs) -> CommandResult {
    let (pain_level, exercise_frequency) =
        match parse_pain_and_exercise("menstrual", &args.pain, &args.exercise) {
            Ok(parsed) => parsed,
            Err(result) => return result,
        };
    let config = match load_config("menstrual") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let profile = MenstrualProfile {
        age: args.age,
        cycle_length: args.cycle_length,
        pain_level,
        symptoms: args.symptoms,
        exercise_frequency,
        sleep_hours: args.sleep_hours,
    };

    match MenstrualGuide::load(&config.catalog.menstrual_guide_path) {
        Ok(guide) => {
            let advice = guide.advise(&profile);
            CommandResult::success_with_data(
                "menstrual",
                format!("menstrual guidance for {pain_level} pain"),
                &advice,
            )
        }
        Err(error) => CommandResult::failure("menstrual", "catalog_load", error.to_string(), 6),
    }
}

pub fn run_pregnancy(args: PregnancyArgs) -> CommandResult {
    let config = match load_config("pregnancy") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let guide = match PregnancyGuide::load(&config.catalog.pregnancy_guide_path) {
        Ok(guide) => guide,
        Err(error) => {
            return CommandResult::failure("pregnancy", "catalog_load", error.to_string(), 6);
        }
    };

    let profile = PregnancyProfile {
        month: args.month,
        conditions: args.conditions,
        sleep_quality: args.sleep_quality,
    };
    match guide.advise(&profile) {
        Ok(advice) => CommandResult::success_with_data(
            "pregnancy",
            format!("pregnancy guidance for month {}", advice.month),
            &advice,
        ),
        Err(error) => CommandResult::failure("pregnancy", "invalid_input", error.to_string(), 8),
    }
}

pub fn run_check_in(args: CheckInArgs) -> CommandResult {
    let (pain_level, exercise_frequency) =
        match parse_pain_and_exercise("checkin", &args.pain, &args.exercise) {
            Ok(parsed) => parsed,
            Err(result) => return result,
        };
    let (context, account) = match CommandContext::open_for_user("checkin", &args.user) {
        Ok(opened) => opened,
        Err(result) => return result,
    };

    let check_in =
        CycleCheckIn::new(account.id, pain_level, exercise_frequency, args.sleep_hours, args.score)
            .with_cycle_length(args.cycle_length)
            .with_products_used(args.products_used);

    let result = match context.runtime.block_on(context.service.submit_check_in(check_in)) {
        Ok(progress) => CommandResult::success_with_data(
            "checkin",
            format!(
                "average {} over {} check-ins",
                progress.history.average,
                progress.history.len()
            ),
            &progress,
        ),
        Err(error) => CommandResult::from_application_error("checkin", error),
    };

    context.close();
    result
}

pub fn run_cycle_progress(user: &str) -> CommandResult {
    let (context, account) = match CommandContext::open_for_user("cycle-progress", user) {
        Ok(opened) => opened,
        Err(result) => return result,
    };

    let result = match context.runtime.block_on(context.service.cycle_progress(&account.id)) {
        Ok(progress) => CommandResult::success_with_data(
            "cycle-progress",
            format!(
                "average {} over {} check-ins",
                progress.history.average,
                progress.history.len()
            ),
            &progress,
        ),
        Err(error) => CommandResult::from_application_error("cycle-progress", error),
    };

    context.close();
    result
}
