use anyhow::Result;
use async_trait::async_trait;

use super::{Command, CommandContext};
use crate::consts::tagged;
use crate::ncp::PowerAction;

pub struct StartCommand;
pub struct StopCommand;

async fn power_one(
    name: &str,
    action: PowerAction,
    args: &[&str],
    ctx: &CommandContext<'_>,
) -> Result<()> {
    let Some(instance) = ctx.single_target(name, args).await? else {
        return Ok(());
    };
    let message = ctx.manager.power(instance, action).await;
    ctx.reply(&tagged(instance, &message)).await
}

#[async_trait]
impl Command for StartCommand {
    fn name(&self) -> &str {
        "/start"
    }

    fn usage(&self) -> &str {
        "/start [서버번호]"
    }

    fn description(&self) -> &str {
        "특정 서버를 시작합니다. (예: /start 1)"
    }

    async fn execute(&self, args: &[&str], ctx: &CommandContext<'_>) -> Result<()> {
        power_one(self.name(), PowerAction::Start, args, ctx).await
    }
}

#[async_trait]
impl Command for StopCommand {
    fn name(&self) -> &str {
        "/stop"
    }

    fn usage(&self) -> &str {
        "/stop [서버번호]"
    }

    fn description(&self) -> &str {
        "특정 서버를 종료합니다. (예: /stop 1)"
    }

    async fn execute(&self, args: &[&str], ctx: &CommandContext<'_>) -> Result<()> {
        power_one(self.name(), PowerAction::Stop, args, ctx).await
    }
}
