//! Unit tests for the `aws` CLI fleet adapter with canned CLI output.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use drode::application::ports::CloudFleet;
use drode::domain::{ApiError, AwsSettings, ErrorKind, FleetError};
use drode::infra::aws::AwsCliFleet;

use crate::fakes::{ScriptedRunner, err_output, ok_output};

const GROUP_WITH_LAUNCH_TEMPLATE: &str = r#"{
  "AutoScalingGroups": [
    {
      "AutoScalingGroupName": "web-production",
      "LaunchTemplate": {
        "LaunchTemplateId": "lt-0abc",
        "LaunchTemplateName": "web-production-template-with-a-very-long-name",
        "Version": "12"
      },
      "Instances": [
        {
          "InstanceId": "i-0aaa",
          "HealthStatus": "Healthy",
          "LifecycleState": "InService",
          "LaunchTemplate": {
            "LaunchTemplateName": "web-production-template-with-a-very-long-name",
            "Version": "12"
          }
        },
        {
          "InstanceId": "i-0bbb",
          "HealthStatus": "Unhealthy",
          "LifecycleState": "Terminating",
          "LaunchConfigurationName": "web-production-old"
        }
      ]
    }
  ]
}"#;

const INSTANCES: &str = r#"{
  "Reservations": [
    {
      "Instances": [
        {
          "InstanceId": "i-0bbb",
          "PrivateIpAddress": "10.0.1.20",
          "LaunchTime": "2021-02-01T08:30:45+00:00"
        },
        {
          "InstanceId": "i-0aaa",
          "PrivateIpAddress": "10.0.1.10",
          "LaunchTime": "2021-03-04T10:11:12.000Z"
        }
      ]
    }
  ]
}"#;

#[tokio::test]
async fn test_autoscaling_group_joins_instance_details() {
    let runner = ScriptedRunner::default()
        .on(
            "describe-auto-scaling-groups",
            ok_output(GROUP_WITH_LAUNCH_TEMPLATE.as_bytes()),
        )
        .on("describe-instances", ok_output(INSTANCES.as_bytes()));
    let fleet = AwsCliFleet::new(runner);

    let info = fleet.autoscaling_group("web-production").await.unwrap();

    assert_eq!(info.template, "web-production-template-with-a-very:12");
    assert_eq!(info.instances.len(), 2);
    let first = &info.instances[0];
    assert_eq!(first.id, "i-0aaa");
    assert_eq!(first.ip, "10.0.1.10");
    assert_eq!(first.status, "Healthy/InService");
    assert_eq!(first.created, "2021-03-04T10:11");
    assert_eq!(first.template, "web-production-template-with-a-very:12");
    let second = &info.instances[1];
    assert_eq!(second.ip, "10.0.1.20");
    assert_eq!(second.status, "Unhealthy/Terminating");
    assert_eq!(second.template, "web-production-old");
}

#[tokio::test]
async fn test_autoscaling_group_batches_instance_lookup() {
    let runner = ScriptedRunner::default()
        .on(
            "describe-auto-scaling-groups",
            ok_output(GROUP_WITH_LAUNCH_TEMPLATE.as_bytes()),
        )
        .on("describe-instances", ok_output(INSTANCES.as_bytes()));
    let settings = AwsSettings {
        profile: Some("prod".into()),
        region: Some("eu-west-1".into()),
        ..AwsSettings::default()
    };
    let fleet = AwsCliFleet::with_settings(&runner, &settings);

    fleet.autoscaling_group("web-production").await.unwrap();

    let calls = runner.calls_to("describe-instances");
    assert_eq!(calls.len(), 1);
    let args = calls[0].join(" ");
    assert!(args.contains("--instance-ids i-0aaa i-0bbb"), "got: {args}");
    assert!(args.contains("--profile prod"), "got: {args}");
    assert!(args.contains("--region eu-west-1"), "got: {args}");
    assert!(args.ends_with("--output json"), "got: {args}");
}

#[tokio::test]
async fn test_autoscaling_group_without_instances_skips_ec2() {
    let group = r#"{"AutoScalingGroups": [{"LaunchConfigurationName": "web-lc-20210301", "Instances": []}]}"#;
    let runner = ScriptedRunner::default().on("describe-auto-scaling-groups", ok_output(group.as_bytes()));
    let fleet = AwsCliFleet::new(&runner);

    let info = fleet.autoscaling_group("web-staging").await.unwrap();

    assert_eq!(info.template, "web-lc-20210301");
    assert!(info.instances.is_empty());
    assert!(runner.calls_to("describe-instances").is_empty());
}

#[tokio::test]
async fn test_unknown_group_is_not_found() {
    let runner = ScriptedRunner::default().on(
        "describe-auto-scaling-groups",
        ok_output(br#"{"AutoScalingGroups": []}"#),
    );
    let err = AwsCliFleet::new(runner)
        .autoscaling_group("ghost")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "There are no autoscaling groups named ghost");
    assert!(matches!(
        err.downcast_ref::<FleetError>(),
        Some(FleetError::GroupNotFound(_))
    ));
}

#[tokio::test]
async fn test_missing_credentials_is_authentication_error() {
    let runner = ScriptedRunner::default().on(
        "describe-regions",
        err_output(b"Unable to locate credentials. You can configure credentials by running \"aws configure\"."),
    );
    let err = AwsCliFleet::new(runner).check_configuration().await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ApiError>(),
        Some(ApiError::Authentication { service: "AWS", .. })
    ));
    assert_eq!(ErrorKind::of(&err), ErrorKind::Authentication);
}

#[tokio::test]
async fn test_other_failures_are_network_errors() {
    let runner = ScriptedRunner::default().on(
        "describe-regions",
        err_output(b"Could not connect to the endpoint URL"),
    );
    let err = AwsCliFleet::new(runner).check_configuration().await.unwrap_err();
    assert_eq!(ErrorKind::of(&err), ErrorKind::Network);
}

#[tokio::test]
async fn test_unparseable_output_is_reported() {
    let runner = ScriptedRunner::default()
        .on("describe-auto-scaling-groups", ok_output(b"not json"));
    let err = AwsCliFleet::new(runner)
        .autoscaling_group("web")
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FleetError>(),
        Some(FleetError::UnexpectedOutput { .. })
    ));
}

#[tokio::test]
async fn test_check_configuration_ok() {
    let runner = ScriptedRunner::default()
        .on("describe-regions", ok_output(br#"{"Regions": []}"#));
    AwsCliFleet::new(runner).check_configuration().await.unwrap();
}
