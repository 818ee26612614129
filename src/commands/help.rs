use anyhow::Result;
use async_trait::async_trait;

use super::{Command, CommandContext};

pub const HELP_COMMAND: &str = "/도움말";

pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        HELP_COMMAND
    }

    fn description(&self) -> &str {
        "사용 가능한 명령어 목록을 표시합니다."
    }

    // The registry answers help itself since it knows every registered command.
    async fn execute(&self, _args: &[&str], _ctx: &CommandContext<'_>) -> Result<()> {
        Ok(())
    }
}
