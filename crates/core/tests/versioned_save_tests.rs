use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use scene_versioning::{
    versions_in, HostSaveError, HostSession, IncrementError, LocalFs, PersistenceError, SceneFile,
};

fn unique_root(prefix: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}_{unique}"))
}

/// A host that keeps its document as text and writes it like an editor would.
struct TextDocumentHost {
    body: String,
    path: Option<PathBuf>,
    dirty: bool,
}

impl TextDocumentHost {
    fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            path: None,
            dirty: true,
        }
    }

    fn edit(&mut self, body: &str) {
        self.body = body.to_string();
        self.dirty = true;
    }
}

impl HostSession for TextDocumentHost {
    fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    fn current_session_path(&self) -> Option<PathBuf> {
        self.path.clone()
    }

    fn persist_current_session(&mut self, path: &Path) -> Result<(), HostSaveError> {
        match fs::write(path, &self.body) {
            Ok(()) => {
                self.path = Some(path.to_path_buf());
                self.dirty = false;
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Err(HostSaveError::MissingDirectory(
                path.parent().map(Path::to_path_buf).unwrap_or_default(),
            )),
            Err(err) => Err(HostSaveError::Other(err.to_string())),
        }
    }
}

#[test]
fn session_workflow_save_then_increment() {
    let root = unique_root("scene_workflow");
    let directory = root.join("assets").join("char");
    let mut host = TextDocumentHost::new("first draft");

    let fallback = SceneFile::from_fields(&directory, "char_model", 1, "ma").expect("fields");
    let scene = SceneFile::resolve(&host, fallback).expect("dirty host keeps fallback");
    let first = scene.save(&mut host, &LocalFs).expect("first save creates tree");
    assert_eq!(first, directory.join("char_model_v001.ma"));

    // The host is now clean, so a new scene file adopts its identity.
    let mut scene = SceneFile::from_host_session(&host).expect("adopt");
    assert_eq!(scene.version(), 1);
    assert_eq!(scene.directory(), directory.as_path());

    host.edit("second draft");
    assert!(SceneFile::from_host_session(&host).is_err());

    let second = scene
        .increment_and_save(&mut host, &LocalFs)
        .expect("increment");
    assert_eq!(second, directory.join("char_model_v002.ma"));
    assert_eq!(fs::read_to_string(&second).expect("read"), "second draft");
    assert_eq!(fs::read_to_string(&first).expect("read"), "first draft");

    assert_eq!(
        versions_in(&LocalFs, &directory, "char_model").expect("discover"),
        vec![1, 2]
    );

    let _ = fs::remove_dir_all(root);
}

#[test]
fn increment_skips_gaps_and_foreign_descriptors() {
    let root = unique_root("scene_gaps");
    fs::create_dir_all(&root).expect("root");
    for name in ["foo_v001.ma", "foo_v003.ma", "bar_v009.ma", "readme.txt"] {
        fs::write(root.join(name), "").expect("fixture");
    }

    let mut scene = SceneFile::from_fields(&root, "foo", 1, "ma").expect("fields");
    let mut host = TextDocumentHost::new("body");
    let path = scene
        .increment_and_save(&mut host, &LocalFs)
        .expect("increment");
    assert_eq!(path, root.join("foo_v004.ma"));
    assert!(!root.join("foo_v002.ma").exists());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn increment_requires_an_existing_directory() {
    let root = unique_root("scene_missing_dir");
    let mut scene = SceneFile::from_fields(&root, "foo", 1, "ma").expect("fields");
    let mut host = TextDocumentHost::new("body");

    let err = scene
        .increment_and_save(&mut host, &LocalFs)
        .expect_err("discovery must fail on a missing directory");
    assert!(matches!(err, IncrementError::Discovery(_)), "{err:?}");
    assert!(!root.exists());
}

#[cfg(unix)]
#[test]
fn save_into_a_file_path_is_a_terminal_failure() {
    let root = unique_root("scene_blocked");
    fs::create_dir_all(&root).expect("root");
    // A plain file where the directory should be: creation fails, no loop.
    let blocker = root.join("shots");
    fs::write(&blocker, "not a directory").expect("blocker");

    let scene = SceneFile::from_fields(blocker.join("sh010"), "main", 1, "ma").expect("fields");
    let mut host = TextDocumentHost::new("body");
    let err = scene
        .save(&mut host, &LocalFs)
        .expect_err("blocked directory must fail");
    assert!(
        matches!(
            err,
            PersistenceError::CreateDirectory { .. } | PersistenceError::HostRejected { .. }
        ),
        "{err:?}"
    );
    assert!(host.has_unsaved_changes());

    let _ = fs::remove_dir_all(root);
}
