use assert_cmd::Command;

#[test]
fn routes_lists_every_book_endpoint() {
    let output = Command::cargo_bin("bookshelf")
        .unwrap()
        .arg("routes")
        .env_remove("BOOKSHELF_ENV")
        .env_remove("BOOKSHELF_SERVER__API_PREFIX")
        .env("BOOKSHELF_CONFIG_DIR", std::env::temp_dir())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    for (method, path) in [
        ("POST", "/books"),
        ("GET", "/books"),
        ("GET", "/books/{bookId}"),
        ("PUT", "/books/{bookId}"),
        ("DELETE", "/books/{bookId}"),
    ] {
        assert!(
            stdout
                .lines()
                .any(|line| line.split_whitespace().take(2).eq([method, path])),
            "missing {method} {path} in:\n{stdout}"
        );
    }
}

#[test]
fn unknown_environment_fails_fast() {
    Command::cargo_bin("bookshelf")
        .unwrap()
        .arg("routes")
        .env("BOOKSHELF_ENV", "qa")
        .env("BOOKSHELF_CONFIG_DIR", std::env::temp_dir())
        .assert()
        .failure();
}

#[test]
fn serve_rejects_non_numeric_port() {
    Command::cargo_bin("bookshelf")
        .unwrap()
        .args(["serve", "--port", "http"])
        .assert()
        .failure();
}
