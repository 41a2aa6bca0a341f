use quire_common::telemetry::{self, TelemetryConfig};
use quire_drafts::{Committer, Document, DocumentBody, DocumentId, LoadSource, Loader, MemoryStore};

#[tokio::test]
async fn load_and_commit_are_counted() {
    telemetry::init(TelemetryConfig::from_env("quire-drafts-test"));

    let store = MemoryStore::new();
    let id = DocumentId::new("counted");
    let outcome = Loader::new(store.clone()).load(&id).await.unwrap();
    assert_eq!(outcome.source, LoadSource::New);

    let document = Document {
        body: DocumentBody {
            title: "Counted".into(),
            ..Default::default()
        },
        ..Document::new(id)
    };
    Committer::new(store).commit(&document, None).await.unwrap();

    let rendered = telemetry::render();
    assert!(rendered.contains("quire_loads_total"), "{rendered}");
    assert!(rendered.contains("quire_commits_total"), "{rendered}");
}
