mod common;

use std::time::Duration;

use common::{DeviceScript, Event, MockConnector, SAVE_COMMAND};
use lldp_describe::config::Credentials;
use lldp_describe::dispatch::Dispatcher;
use lldp_describe::input::load_addresses;
use lldp_describe::report::{InterfaceResult, RunSummary};
use lldp_describe::updater::UpdateSettings;
use secrecy::SecretString;

fn credentials() -> Credentials {
    Credentials::new("netops", SecretString::from("pw".to_string()))
}

fn dispatcher(connector: MockConnector) -> Dispatcher<MockConnector> {
    Dispatcher::new(connector, credentials(), UpdateSettings::default())
}

fn access_switch(neighbor: &str) -> DeviceScript {
    DeviceScript::new()
        .status(&[("Gi1/0/1", "connected"), ("Gi1/0/2", "disabled")])
        .neighbor("Gi1/0/1", neighbor)
}

#[tokio::test]
async fn two_switches_are_updated_and_saved() {
    let connector = MockConnector::new([
        ("10.20.0.11", access_switch("AP-Floor3-12")),
        ("10.20.0.12", access_switch("AP-Floor4-01")),
    ]);

    let reports = dispatcher(connector.clone())
        .run(&["10.20.0.11", "10.20.0.12"])
        .await;

    assert_eq!(reports.len(), 2);
    for (address, neighbor) in [("10.20.0.11", "AP-Floor3-12"), ("10.20.0.12", "AP-Floor4-01")] {
        assert_eq!(
            connector.configs(address),
            vec![vec![
                "interface Gi1/0/1".to_string(),
                format!("description {neighbor}")
            ]]
        );
        assert_eq!(connector.count_command(address, SAVE_COMMAND), 1);
        assert_eq!(connector.events(address).last(), Some(&Event::Close));
    }

    let summary = RunSummary::from_reports(&reports);
    assert_eq!(summary.updated, 2);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.saved, 2);
}

#[tokio::test]
async fn unreachable_switch_does_not_affect_others() {
    let connector = MockConnector::new([
        ("10.20.0.11", access_switch("AP-Floor3-12")),
        ("10.20.0.12", DeviceScript::unreachable()),
        ("10.20.0.13", access_switch("AP-Floor5-07")),
    ]);

    let reports = dispatcher(connector.clone())
        .run(&["10.20.0.11", "10.20.0.12", "10.20.0.13"])
        .await;

    assert!(reports[0].saved());
    assert!(!reports[1].is_reachable());
    assert!(reports[2].saved());
    assert!(matches!(
        reports[2].interfaces()[0].result,
        InterfaceResult::Updated { .. }
    ));
}

#[tokio::test]
async fn reports_follow_input_order() {
    let addresses: Vec<String> = (1..=8).map(|i| format!("10.20.1.{i}")).collect();
    let connector = MockConnector::default().with_connect_delay(Duration::from_millis(5));

    let reports = dispatcher(connector).with_max_concurrency(3).run(&addresses).await;

    let order: Vec<&str> = reports.iter().map(|r| r.address.as_str()).collect();
    assert_eq!(order, addresses.iter().map(String::as_str).collect::<Vec<_>>());
}

#[tokio::test]
async fn concurrency_cap_is_respected() {
    let addresses: Vec<String> = (1..=12).map(|i| format!("10.20.2.{i}")).collect();
    let connector = MockConnector::default().with_connect_delay(Duration::from_millis(20));
    let gauge = connector.gauge();

    let reports = dispatcher(connector).with_max_concurrency(4).run(&addresses).await;

    assert_eq!(reports.len(), 12);
    assert!(gauge.peak() <= 4, "peak was {}", gauge.peak());
    assert!(gauge.peak() >= 2, "devices did not overlap");
    assert_eq!(gauge.current(), 0);
}

#[tokio::test]
async fn blank_rows_are_skipped() {
    let connector = MockConnector::default();
    let dispatcher = dispatcher(connector.clone());

    let addresses = ["10.20.0.11", "", "   ", " 10.20.0.12 "];
    let targets = dispatcher.targets(&addresses);
    let target_addresses: Vec<&str> = targets.iter().map(|t| t.address.as_str()).collect();
    assert_eq!(target_addresses, vec!["10.20.0.11", "10.20.0.12"]);

    let reports = dispatcher.run(&addresses).await;
    assert_eq!(reports.len(), 2);
    assert_eq!(connector.connected(), vec!["10.20.0.11", "10.20.0.12"]);
}

#[tokio::test]
async fn missing_input_file_means_no_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let addresses = load_addresses(dir.path().join("input.csv")).unwrap_or_default();
    let connector = MockConnector::default();

    let reports = dispatcher(connector.clone()).run(&addresses).await;

    assert!(reports.is_empty());
    assert!(connector.connected().is_empty());
}

#[tokio::test]
async fn targets_share_credentials() {
    let dispatcher = dispatcher(MockConnector::default());
    let targets = dispatcher.targets(&["10.20.0.11", "10.20.0.12"]);

    assert!(std::sync::Arc::ptr_eq(
        &targets[0].credentials,
        &targets[1].credentials
    ));
}

#[test]
fn zero_concurrency_is_raised_to_one() {
    let dispatcher = dispatcher(MockConnector::default()).with_max_concurrency(0);
    assert_eq!(dispatcher.max_concurrency(), 1);
}

#[test]
fn run_blocks_to_completion() {
    let connector = MockConnector::new([("10.20.0.11", access_switch("AP-Floor3-12"))]);
    let dispatcher = dispatcher(connector.clone());

    let reports = tokio_test::block_on(dispatcher.run(&["10.20.0.11"]));

    assert_eq!(reports.len(), 1);
    assert!(reports[0].saved());
}
