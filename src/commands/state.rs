use anyhow::Result;
use async_trait::async_trait;

use super::{Command, CommandContext};
use crate::consts::tagged;

pub struct StateCommand;

#[async_trait]
impl Command for StateCommand {
    fn name(&self) -> &str {
        "/state"
    }

    fn usage(&self) -> &str {
        "/state [서버번호]"
    }

    fn description(&self) -> &str {
        "특정 서버의 상태를 확인합니다. (예: /state 1)"
    }

    async fn execute(&self, args: &[&str], ctx: &CommandContext<'_>) -> Result<()> {
        let Some(instance) = ctx.single_target(self.name(), args).await? else {
            return Ok(());
        };
        let message = ctx.manager.state(instance).await;
        ctx.reply(&tagged(instance, &message)).await
    }
}
