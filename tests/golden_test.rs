use std::path::PathBuf;

use admission_scaffold::{
    config::ProjectContext,
    processor::Scaffold,
    renderer::MiniJinjaRenderer,
    resource::Resource,
    sink::{FileSystemSink, VerificationSink},
    template::TemplateUnit,
    webhook::{AdmissionType, Operations, WebhookConfig},
};
use tempfile::TempDir;

struct Case {
    name: &'static str,
    resource: Resource,
    webhook: WebhookConfig,
}

fn case(
    name: &'static str,
    (group, version, kind, namespaced, example): (&str, &str, &str, bool, bool),
    ty: AdmissionType,
    ops: &str,
) -> Case {
    Case {
        name,
        resource: Resource::new(group, version, kind, namespaced, example).unwrap(),
        webhook: WebhookConfig::new(ty, Operations::parse_list(ops).unwrap(), "default").unwrap(),
    }
}

fn cases() -> Vec<Case> {
    vec![
        case(
            "firstmate_create_update",
            ("crew", "v1", "FirstMate", true, true),
            AdmissionType::Mutating,
            "create,update",
        ),
        case(
            "firstmate_delete",
            ("crew", "v1", "FirstMate", true, true),
            AdmissionType::Mutating,
            "delete",
        ),
        case(
            "frigate_update",
            ("ship", "v1beta1", "Frigate", true, false),
            AdmissionType::Validating,
            "update",
        ),
        case(
            "kraken_create",
            ("creatures", "v2alpha1", "Kraken", false, false),
            AdmissionType::Validating,
            "create",
        ),
        case(
            "namespace_update",
            ("core", "v1", "Namespace", false, false),
            AdmissionType::Mutating,
            "update",
        ),
    ]
}

fn golden_dir(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/testdata/golden").join(name)
}

fn project() -> ProjectContext {
    ProjectContext::new("1", "testproject.org", "project").unwrap()
}

#[test_log::test]
fn test_scaffold_matches_golden_files() {
    let renderer = MiniJinjaRenderer::new();
    let scaffold = Scaffold::new(&renderer);

    for case in cases() {
        let sink = VerificationSink::new(golden_dir(case.name));
        let units = TemplateUnit::for_webhook(&case.webhook);
        scaffold.run_into(&case.resource, &case.webhook, &project(), &units, &sink).unwrap();

        assert!(sink.all_match(), "{}: mismatched {:?}", case.name, sink.mismatches());
        assert!(sink.unvisited().unwrap().is_empty(), "{}: golden files not generated", case.name);
    }
}

#[test]
fn test_written_tree_matches_golden_tree() {
    let renderer = MiniJinjaRenderer::new();
    let scaffold = Scaffold::new(&renderer);

    for case in cases() {
        let temp_dir = TempDir::new().unwrap();
        let sink = FileSystemSink::new(temp_dir.path(), false);
        let units = TemplateUnit::for_webhook(&case.webhook);
        scaffold.run_into(&case.resource, &case.webhook, &project(), &units, &sink).unwrap();

        assert!(
            !dir_diff::is_different(temp_dir.path(), golden_dir(case.name)).unwrap(),
            "{}: generated tree differs from golden tree",
            case.name
        );
    }
}

#[test]
fn test_changed_domain_fails_verification() {
    let renderer = MiniJinjaRenderer::new();
    let case = cases().remove(0);
    let sink = VerificationSink::new(golden_dir(case.name));
    let project = ProjectContext::new("1", "example.com", "project").unwrap();
    let units = [TemplateUnit::AddServer, TemplateUnit::AdmissionWebhooks];

    Scaffold::new(&renderer)
        .run_into(&case.resource, &case.webhook, &project, &units, &sink)
        .unwrap();

    assert_eq!(sink.mismatches(), ["pkg/webhook/add_default_server.go"]);
}
