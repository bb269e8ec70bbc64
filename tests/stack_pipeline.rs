use blockstack_assets::{build_catalog, manifest_from_str, BlockCatalog, ManifestProvider, MeshNode};
use blockstack_client::{Session, SessionConfig};
use blockstack_core::Millis;
use blockstack_render::{RenderSurface, TextSurface};
use blockstack_testkit::{assert_json_snapshot, assert_text_snapshot};
use blockstack_world::{FileStore, KvStore, MemoryStore};

const PACK: &str = r#"
{
  "sources": [
    { "name": "Tall", "path": "/assets/tall.glb", "parts": [ { "size": [1.0, 0.2, 1.0] } ] },
    {
      "name": "Flat",
      "path": "/assets/flat.glb",
      "parts": [
        { "size": [1.0, 0.1, 1.0] },
        { "size": [0.5, 0.1, 0.5], "offset": [0.25, 0.0, 0.25] }
      ]
    }
  ]
}
"#;

fn catalog() -> BlockCatalog<MeshNode> {
    let manifest = manifest_from_str(PACK).expect("valid pack");
    let provider = ManifestProvider::new(&manifest).expect("valid parts");
    build_catalog(&provider, &manifest.asset_sources())
}

fn build_stack<S: KvStore>(session: &mut Session<MeshNode, S>) {
    session.select("Tall - Part 1", Millis(100));
    session.add_block(Millis(200));
    session.tap("Flat - Part 1", Millis(1_000));
    session.tap("Flat - Part 1", Millis(1_100));
    session.add_block(Millis(1_500));
}

#[test]
fn manifest_to_rendered_stack_matches_snapshot() {
    let catalog = catalog();
    assert_eq!(
        catalog.names().collect::<Vec<_>>(),
        vec!["Tall - Part 1", "Flat - Part 1", "Flat - Part 2"]
    );

    let mut session = Session::new(SessionConfig::default(), MemoryStore::default());
    session.start(catalog, Millis::ZERO);
    build_stack(&mut session);

    let mut surface = TextSurface::default();
    surface.draw(session.blocks());
    assert_text_snapshot("tests/snapshots/stack_pipeline.txt", surface.frame())
        .expect("snapshot matches");
    assert_json_snapshot(
        "tests/snapshots/stack_placements.json",
        &session.stack().snapshot(),
    )
    .expect("placements match snapshot");
}

#[test]
fn reloaded_stack_renders_identically() {
    let dir = tempfile::tempdir().expect("temp dir");

    let mut first = Session::new(
        SessionConfig::default(),
        FileStore::new(dir.path()).expect("store"),
    );
    first.start(catalog(), Millis::ZERO);
    build_stack(&mut first);
    let top_before = first.stack().top_height();
    assert!(first.shutdown(Millis(1_600)));

    let mut second = Session::new(
        SessionConfig::default(),
        FileStore::new(dir.path()).expect("store"),
    );
    let report = second.start(catalog(), Millis::ZERO).expect("restored");
    assert_eq!(report.restored, 3);
    assert_eq!(second.stack().top_height(), top_before);

    let mut surface = TextSurface::default();
    surface.draw(second.blocks());
    assert_text_snapshot("tests/snapshots/stack_pipeline.txt", surface.frame())
        .expect("reloaded stack matches snapshot");
}
