use std::path::PathBuf;

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_spiral")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) { "spiral.exe" } else { "spiral" });
            p
        })
}

#[test]
fn cli_texture_writes_png_and_digest() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();
    let out_path = dir.join("texture.png");
    let _ = std::fs::remove_file(&out_path);
    let out_arg = out_path.to_string_lossy().to_string();

    let run = |extra: &[&str]| {
        std::process::Command::new(exe())
            .args(["texture", "--radius", "50", "--out", out_arg.as_str()])
            .args(extra)
            .output()
            .unwrap()
    };

    let par = run(&["--threads", "3", "--rows-per-task", "5"]);
    assert!(par.status.success(), "{}", String::from_utf8_lossy(&par.stderr));
    assert!(out_path.exists());

    let img = image::open(&out_path).unwrap().to_luma8();
    assert_eq!(img.dimensions(), (128, 128));
    assert_eq!(img.get_pixel(64, 64).0, [255]);
    assert_eq!(img.get_pixel(0, 0).0, [0]);

    let seq = run(&["--sequential"]);
    assert!(seq.status.success());
    let par_out = String::from_utf8_lossy(&par.stdout).to_string();
    assert!(par_out.starts_with("128x128 sha256:"), "{par_out}");
    assert_eq!(par_out, String::from_utf8_lossy(&seq.stdout));
}

#[test]
fn cli_frame_writes_png() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let cfg_path = dir.join("spiral.json");
    std::fs::write(&cfg_path, r#"{ "curves": 6, "background": [0, 0, 64] }"#).unwrap();
    let out_path = dir.join("frame.png");
    let _ = std::fs::remove_file(&out_path);

    let status = std::process::Command::new(exe())
        .args(["frame", "--width", "64", "--height", "48", "--frame", "3"])
        .arg("--config")
        .arg(&cfg_path)
        .arg("--out")
        .arg(&out_path)
        .status()
        .unwrap();

    assert!(status.success());
    let img = image::open(&out_path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (64, 48));
    assert_eq!(img.get_pixel(32, 24).0, [255, 255, 255, 255]);
}

#[test]
fn cli_render_png_sequence() {
    let dir = PathBuf::from("target").join("cli_smoke").join("frames");
    let _ = std::fs::remove_dir_all(&dir);

    let status = std::process::Command::new(exe())
        .args([
            "render", "--png-dir", "--width", "32", "--height", "32", "--fps", "10", "--seconds",
            "0.5",
        ])
        .arg("--out")
        .arg(&dir)
        .status()
        .unwrap();

    assert!(status.success());
    for i in 0..5 {
        assert!(dir.join(format!("frame_{i:05}.png")).exists());
    }
    assert!(!dir.join("frame_00005.png").exists());
}

#[test]
fn cli_rejects_invalid_shape() {
    let out = std::process::Command::new(exe())
        .args(["texture", "--out", "target/cli_smoke/never.png", "--curves", "0"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("curves"));
}
