use serde_json::json;

use ncpbot::config::ServerMap;
use ncpbot::ncp::mock::MockServerApi;
use ncpbot::ncp::{PowerAction, ServerStatus};
use ncpbot::servers::ServerManager;
use ncpbot::sweep::{self, Notifier, Sweep};
use ncpbot::telegram::mock::RecordingMessenger;

const CHAT: &str = "-1001";

fn servers() -> ServerMap {
    "1=25741251,2=26055342".parse().unwrap()
}

#[tokio::test]
async fn power_on_reports_every_server() {
    let manager = ServerManager::new(Box::new(MockServerApi::new()));
    let out = RecordingMessenger::new();
    let notifier = Notifier {
        messenger: &out,
        chat_id: CHAT,
    };

    let sweep = Sweep::Power(PowerAction::Start);
    let lines = sweep::run(&manager, &servers(), &notifier, &sweep).await;

    let expected = vec![
        "[25741251][성공]\nmethod: startServerInstancesResponse".to_string(),
        "[26055342][성공]\nmethod: startServerInstancesResponse".to_string(),
    ];
    assert_eq!(lines, expected);
    assert_eq!(out.texts(), expected);
    assert!(out.sent().iter().all(|(chat, _)| chat == CHAT));
}

#[tokio::test]
async fn verify_only_notifies_mismatches() {
    let api = MockServerApi::new()
        .with_status("25741251", "stopped")
        .with_status("26055342", "running");
    let manager = ServerManager::new(Box::new(api));
    let out = RecordingMessenger::new();
    let notifier = Notifier {
        messenger: &out,
        chat_id: CHAT,
    };

    let lines = sweep::run(
        &manager,
        &servers(),
        &notifier,
        &Sweep::Verify(ServerStatus::Stopped),
    )
    .await;

    assert_eq!(
        lines,
        vec![
            "[25741251]ok".to_string(),
            "[26055342][서버 상태 체크 필요]\n상태 : stopped\n현재상태 : running".to_string(),
        ]
    );
    assert_eq!(
        out.texts(),
        vec!["[26055342][서버 상태 체크 필요]\n상태 : stopped\n현재상태 : running"]
    );
}

#[tokio::test]
async fn verify_reports_api_errors() {
    let api = MockServerApi::new().on_detail(
        "25741251",
        json!({"error": {
            "errorCode": "200",
            "message": "Authentication Failed",
            "details": "Invalid key"
        }}),
    );
    let manager = ServerManager::new(Box::new(api));
    let out = RecordingMessenger::new();
    let notifier = Notifier {
        messenger: &out,
        chat_id: CHAT,
    };

    let lines = sweep::run(
        &manager,
        &servers(),
        &notifier,
        &Sweep::Verify(ServerStatus::Running),
    )
    .await;

    assert_eq!(
        lines[0],
        "[25741251][서버 오류 발생2]\nmessage : Authentication Failed Invalid key"
    );
    assert_eq!(lines[1], "[26055342]ok");
    assert_eq!(out.texts().len(), 1);
}

#[tokio::test]
async fn chat_failure_does_not_stop_the_sweep() {
    let api = MockServerApi::new().unreachable("25741251", "timed out");
    let manager = ServerManager::new(Box::new(api));
    let out = RecordingMessenger::failing();
    let notifier = Notifier {
        messenger: &out,
        chat_id: CHAT,
    };

    let sweep = Sweep::Power(PowerAction::Stop);
    let lines = sweep::run(&manager, &servers(), &notifier, &sweep).await;

    assert_eq!(
        lines,
        vec![
            "[25741251][네트워크 오류]\ntimed out".to_string(),
            "[26055342][성공]\nmethod: stopServerInstancesResponse".to_string(),
        ]
    );
    assert!(out.sent().is_empty());
}
