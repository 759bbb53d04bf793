// Solution snapshot lookups and priority partitioning

use crate::search::{PriorityPartition, PriorityTier, SearchScope};
use crate::workspace::{DocumentId, Project, Solution, folders_from_path};

#[test]
fn project_names_split_into_flavors() {
    assert_eq!(Project::new("Core(net8.0)").name_and_flavor(), ("Core", Some("net8.0")));
    assert_eq!(Project::new("Core (net48)").name_and_flavor(), ("Core", Some("net48")));
    assert_eq!(Project::new("Core").name_and_flavor(), ("Core", None));
    assert_eq!(Project::new("(net48)").name_and_flavor(), ("(net48)", None));
}

#[test]
fn folders_exclude_the_file_name() {
    assert_eq!(folders_from_path("src/ui/View.cs"), vec!["src", "ui"]);
    assert_eq!(folders_from_path("./src\\View.cs"), vec!["src"]);
    assert!(folders_from_path("View.cs").is_empty());
}

#[test]
fn linked_documents_come_from_other_projects() {
    let mut net8 = Project::new("Core(net8.0)");
    let mut net48 = Project::new("Core(net48)");
    let shared8 = net8.add_document("src/Shared.cs");
    let only8 = net8.add_document("src/Only.cs");
    let shared48 = net48.add_document("src/Shared.cs");
    let solution = Solution::new(vec![net8, net48]);

    let linked = solution.linked_documents(solution.document(shared8).unwrap());
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].id, shared48);
    assert!(solution.linked_documents(solution.document(only8).unwrap()).is_empty());

    let found = solution.find_document(linked[0].project_id, "src/Shared.cs").unwrap();
    assert_eq!(found.id, shared48);
}

#[test]
fn partition_orders_active_then_visible_then_rest() {
    let mut app = Project::new("App");
    let main = app.add_document("app/Main.cs");
    let view = app.add_document("app/View.cs");
    let mut lib = Project::new("Lib");
    let lib_doc = lib.add_document("lib/Lib.cs");
    let tests = Project::new("Tests");
    let (app_id, lib_id, tests_id) = (app.id, lib.id, tests.id);
    let solution = Solution::new(vec![tests, lib, app]);

    let scope = SearchScope::new(Some(main), vec![view, lib_doc, main, DocumentId::new()]);
    let partition = PriorityPartition::compute(&solution, &scope);

    let active = partition.active.as_ref().unwrap();
    assert_eq!(active.project_id, app_id);
    assert_eq!(active.tier, PriorityTier::ActiveProject);
    assert_eq!(active.priority_documents, vec![main, view]);

    assert_eq!(partition.visible.len(), 1);
    assert_eq!(partition.visible[0].project_id, lib_id);
    assert_eq!(partition.visible[0].priority_documents, vec![lib_doc]);

    assert_eq!(partition.remaining.len(), 1);
    assert_eq!(partition.remaining[0].project_id, tests_id);
    assert_eq!(partition.total_units(), 3);
    let background: Vec<_> = partition.background_units().map(|unit| unit.project_id).collect();
    assert_eq!(background, vec![lib_id, tests_id]);
}

#[test]
fn unknown_active_document_is_ignored() {
    let mut core = Project::new("Core");
    core.add_document("src/Foo.cs");
    let solution = Solution::new(vec![core]);

    let partition = PriorityPartition::compute(&solution, &SearchScope::new(Some(DocumentId::new()), vec![]));
    assert!(partition.active.is_none());
    assert_eq!(partition.remaining.len(), 1);
}
