use anyhow::Result;
use async_trait::async_trait;

use super::{Command, CommandContext};
use crate::consts::tagged;
use crate::ncp::PowerAction;

pub struct AllStartCommand;
pub struct AllStopCommand;

/// Apply `action` to every configured server in order, one reply each.
async fn apply_to_all(action: PowerAction, ctx: &CommandContext<'_>) -> Result<()> {
    for instance in ctx.servers.instances() {
        let message = ctx.manager.power(instance, action).await;
        ctx.reply(&tagged(instance, &message)).await?;
    }
    Ok(())
}

#[async_trait]
impl Command for AllStartCommand {
    fn name(&self) -> &str {
        "/allstart"
    }

    fn description(&self) -> &str {
        "모든 서버를 시작합니다."
    }

    async fn execute(&self, _args: &[&str], ctx: &CommandContext<'_>) -> Result<()> {
        apply_to_all(PowerAction::Start, ctx).await
    }
}

#[async_trait]
impl Command for AllStopCommand {
    fn name(&self) -> &str {
        "/allstop"
    }

    fn description(&self) -> &str {
        "실행 중인 모든 서버를 종료합니다."
    }

    async fn execute(&self, _args: &[&str], ctx: &CommandContext<'_>) -> Result<()> {
        apply_to_all(PowerAction::Stop, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::Fixture;
    use crate::ncp::mock::MockServerApi;
    use serde_json::json;

    #[tokio::test]
    async fn allstart_one_message_per_server_in_order() {
        let fx = Fixture::new(MockServerApi::new());
        AllStartCommand.execute(&[], &fx.ctx()).await.unwrap();
        assert_eq!(
            fx.messenger.texts(),
            vec![
                "[25741251][성공]\nmethod: startServerInstancesResponse".to_string(),
                "[26055342][성공]\nmethod: startServerInstancesResponse".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn allstop_continues_after_a_failure() {
        let api = MockServerApi::new().on_power(
            "25741251",
            PowerAction::Stop,
            json!({"responseError": {"returnMessage": "denied"}}),
        );
        let fx = Fixture::new(api);
        AllStopCommand.execute(&[], &fx.ctx()).await.unwrap();

        let texts = fx.messenger.texts();
        assert_eq!(texts.len(), 2);
        assert!(texts[0].starts_with("[25741251][서버 오류 발생1]"));
        assert!(texts[1].starts_with("[26055342][성공]"));
    }

    #[test]
    fn metadata() {
        assert_eq!(AllStartCommand.name(), "/allstart");
        assert_eq!(AllStopCommand.name(), "/allstop");
    }
}
