use crate::commands::{load_config, open_migrated_pool, CommandResult};
use wellora_db::migrations;

pub fn run() -> CommandResult {
    let outcome = load_config("migrate")
        .and_then(|config| open_migrated_pool("migrate", &config))
        .map(|(runtime, pool)| runtime.block_on(pool.close()));

    match outcome {
        Ok(()) => CommandResult::success(
            "migrate",
            format!(
                "history schema is current ({} migrations known)",
                migrations::MIGRATOR.iter().count()
            ),
        ),
        Err(result) => result,
    }
}
