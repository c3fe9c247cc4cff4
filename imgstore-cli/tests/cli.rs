use assert_cmd::Command;
use image::{DynamicImage, ImageFormat};
use predicates::prelude::*;
use std::io::Cursor;
use tempfile::TempDir;

fn imgstore_cmd() -> Command {
    Command::cargo_bin("imgstore").unwrap()
}

fn write_jpeg(dir: &TempDir, name: &str, width: u32, height: u32) -> std::path::PathBuf {
    let img = DynamicImage::new_rgb8(width, height);
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Jpeg).unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, buf.into_inner()).unwrap();
    path
}

#[test]
fn create_then_list_shows_header_and_empty_sentinel() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("s.imgstore");

    imgstore_cmd().arg(&store).args(["create", "--max_files", "5"]).assert().success();

    imgstore_cmd()
        .arg(&store)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("MAX IMAGES: 5"))
        .stdout(predicate::str::contains("<< empty imgStore >>"));
}

#[test]
fn read_thumb_writes_bounded_aspect_preserving_file() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("s.imgstore");
    let pic = write_jpeg(&dir, "a.jpg", 640, 480);

    imgstore_cmd().arg(&store).arg("create").assert().success();
    imgstore_cmd().arg(&store).args(["insert", "pic1"]).arg(&pic).assert().success();

    let cwd = TempDir::new().unwrap();
    imgstore_cmd()
        .current_dir(cwd.path())
        .arg(store.canonicalize().unwrap())
        .args(["read", "pic1", "thumb"])
        .assert()
        .success();

    let out_path = cwd.path().join("pic1_thumb.jpg");
    assert!(out_path.exists());
    let thumb = image::open(&out_path).unwrap();
    assert!(thumb.width() <= 64 && thumb.height() <= 64);
    let expected_height = (64.0 * 480.0 / 640.0).round() as i64;
    assert!((thumb.height() as i64 - expected_height).abs() <= 1);
}

#[test]
fn duplicate_content_both_ids_appear_in_listing() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("s.imgstore");
    let pic = write_jpeg(&dir, "a.jpg", 8, 8);

    imgstore_cmd().arg(&store).arg("create").assert().success();
    imgstore_cmd().arg(&store).args(["insert", "a"]).arg(&pic).assert().success();
    imgstore_cmd().arg(&store).args(["insert", "b"]).arg(&pic).assert().success();

    imgstore_cmd()
        .arg(&store)
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"a\""))
        .stdout(predicate::str::contains("\"b\""));
}

#[test]
fn duplicate_id_different_content_fails() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("s.imgstore");
    let pic_a = write_jpeg(&dir, "a.jpg", 8, 8);
    let pic_b = write_jpeg(&dir, "b.jpg", 9, 9);

    imgstore_cmd().arg(&store).arg("create").assert().success();
    imgstore_cmd().arg(&store).args(["insert", "a"]).arg(&pic_a).assert().success();
    imgstore_cmd()
        .arg(&store)
        .args(["insert", "a"])
        .arg(&pic_b)
        .assert()
        .failure()
        .code(13)
        .stderr(predicate::str::contains("duplicate image id"));
}

#[test]
fn delete_then_read_fails_not_found() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("s.imgstore");
    let pic = write_jpeg(&dir, "a.jpg", 8, 8);

    imgstore_cmd().arg(&store).arg("create").assert().success();
    imgstore_cmd().arg(&store).args(["insert", "a"]).arg(&pic).assert().success();
    imgstore_cmd().arg(&store).args(["delete", "a"]).assert().success();

    imgstore_cmd()
        .current_dir(&dir)
        .arg(&store)
        .args(["read", "a"])
        .assert()
        .failure()
        .code(11)
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn gc_compacts_and_preserves_surviving_image() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("s.imgstore");
    let tmp = dir.path().join("s.imgstore.tmp");
    let pic_a = write_jpeg(&dir, "a.jpg", 8, 8);
    let pic_b = write_jpeg(&dir, "b.jpg", 9, 9);

    imgstore_cmd().arg(&store).arg("create").assert().success();
    imgstore_cmd().arg(&store).args(["insert", "a"]).arg(&pic_a).assert().success();
    imgstore_cmd().arg(&store).args(["insert", "b"]).arg(&pic_b).assert().success();
    imgstore_cmd().arg(&store).args(["delete", "a"]).assert().success();
    imgstore_cmd().arg(&store).arg("gc").arg(&tmp).assert().success();

    assert!(!tmp.exists());

    imgstore_cmd()
        .arg(&store)
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"b\""))
        .stdout(predicate::str::contains("\"a\"").not());

    imgstore_cmd().current_dir(&dir).arg(&store).args(["read", "b"]).assert().success();
}
