use admission_scaffold::{
    cli::{parse_selector, Args},
    error::Error,
    webhook::{AdmissionType, Operation},
};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("admission-scaffold")];
    res.extend(args.iter().map(OsString::from));
    res
}

const REQUIRED: [&str; 10] = [
    "--group", "crew", "--version", "v1", "--kind", "FirstMate", "--type", "mutating",
    "--operations", "create,update",
];

#[test]
fn test_basic_args() {
    let parsed = Args::try_parse_from(make_args(&REQUIRED)).unwrap();

    assert_eq!(parsed.group, "crew");
    assert_eq!(parsed.operations, ["create", "update"]);
    assert_eq!(parsed.server, "default");
    assert_eq!(parsed.output_dir, PathBuf::from("."));
    assert!(!parsed.force);
    assert!(!parsed.verbose);
    assert!(!parsed.dry_run);

    let resource = parsed.resource().unwrap();
    assert!(resource.namespaced());
    assert!(resource.create_example_body());

    let webhook = parsed.webhook().unwrap();
    assert_eq!(webhook.admission_type(), AdmissionType::Mutating);
    assert_eq!(webhook.operations().as_slice(), [Operation::Create, Operation::Update]);
}

#[test]
fn test_all_flags() {
    let mut args = REQUIRED.to_vec();
    args.extend([
        "--cluster-scoped",
        "--no-example-body",
        "--server",
        "edge",
        "--namespace-selector",
        "env=prod",
        "--domain",
        "testproject.org",
        "--repo",
        "project",
        "--output-dir",
        "./out",
        "--force",
        "--dry-run",
        "-v",
    ]);
    let parsed = Args::try_parse_from(make_args(&args)).unwrap();

    assert!(parsed.force && parsed.dry_run && parsed.verbose);
    assert!(!parsed.resource().unwrap().namespaced());
    assert_eq!(parsed.webhook().unwrap().server(), "edge");
    assert_eq!(parsed.project().unwrap().domain, "testproject.org");
}

#[test]
fn test_missing_args() {
    let args = make_args(&["--group", "crew", "--version", "v1", "--kind", "FirstMate"]);
    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn test_domain_requires_repo() {
    let mut args = REQUIRED.to_vec();
    args.extend(["--domain", "testproject.org"]);
    assert!(Args::try_parse_from(make_args(&args)).is_err());
}

#[test]
fn test_duplicate_operations_rejected() {
    let mut args = REQUIRED.to_vec();
    args[9] = "create,create";
    let parsed = Args::try_parse_from(make_args(&args)).unwrap();
    assert!(matches!(parsed.webhook(), Err(Error::InvalidWebhook(_))));
}

#[test]
fn test_parse_selector() {
    let labels = parse_selector(&["zone=b".to_string(), "team=a".to_string()]).unwrap();
    assert_eq!(labels.keys().collect::<Vec<_>>(), ["zone", "team"]);

    assert!(parse_selector(&["novalue".to_string()]).is_err());
    assert!(parse_selector(&["a=1".to_string(), "a=2".to_string()]).is_err());
}
