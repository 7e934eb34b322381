use forge_core::{locate, ForgeError, ShaderKind, SourceFilter};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_single_shader_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("tri.vert");
    fs::write(&file, "#version 450\nvoid main() {}").unwrap();

    let units = locate(&file, &SourceFilter::default()).unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].kind(), ShaderKind::Vertex);
    assert_eq!(units[0].source_path(), fs::canonicalize(&file).unwrap());
    assert!(units[0].source_path().is_absolute());
}

#[test]
fn test_single_non_shader_file_is_empty() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("tri.glsl");
    fs::write(&file, "").unwrap();

    let units = locate(&file, &SourceFilter::default()).unwrap();
    assert!(units.is_empty());
}

#[test]
fn test_recursive_directory_sorted() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("post/blur")).unwrap();
    fs::write(dir.path().join("z.frag"), "").unwrap();
    fs::write(dir.path().join("post/blur/h.frag"), "").unwrap();
    fs::write(dir.path().join("post/quad.vert"), "").unwrap();
    fs::write(dir.path().join("post/notes.md"), "").unwrap();
    fs::write(dir.path().join("mesh.comp"), "").unwrap();

    let units = locate(dir.path(), &SourceFilter::default()).unwrap();
    let names: Vec<_> = units
        .iter()
        .map(|u| {
            u.source_path()
                .strip_prefix(fs::canonicalize(dir.path()).unwrap())
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    assert_eq!(names, vec!["post/blur/h.frag", "post/quad.vert", "z.frag"]);
}

#[test]
fn test_only_non_shader_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "").unwrap();
    fs::write(dir.path().join("b.spv"), "").unwrap();
    fs::create_dir(dir.path().join("empty")).unwrap();

    assert!(locate(dir.path(), &SourceFilter::default())
        .unwrap()
        .is_empty());
}

#[test]
fn test_missing_input_is_not_found() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    match locate(&missing, &SourceFilter::default()) {
        Err(ForgeError::NotFound(path)) => assert_eq!(path, missing),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_other_extensions_are_picked_up() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("cull.comp"), "").unwrap();
    fs::write(dir.path().join("a.vert"), "").unwrap();

    let filter = SourceFilter::new(&["vert"], &["frag"], &["comp"]);
    let units = locate(dir.path(), &filter).unwrap();
    let kinds: Vec<_> = units.iter().map(|u| u.kind()).collect();
    assert_eq!(kinds, vec![ShaderKind::Vertex, ShaderKind::Other]);
}

#[cfg(unix)]
#[test]
fn test_symlinked_directory_is_deduplicated() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("real")).unwrap();
    fs::write(dir.path().join("real/a.vert"), "").unwrap();
    std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();

    let units = locate(dir.path(), &SourceFilter::default()).unwrap();
    assert_eq!(units.len(), 1);
    assert!(units[0].source_path().ends_with("real/a.vert"));
}
