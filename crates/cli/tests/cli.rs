use assert_cmd::Command;
use predicates::prelude::*;

fn estate_admin() -> Command {
    let mut cmd = Command::cargo_bin("estate-admin").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("ESTATE_CONFIG")
        .env_remove("ESTATE_API_BASE_URL")
        .env_remove("ESTATE_TOKEN_FILE");
    cmd
}

#[test]
fn test_resources_lists_catalog() {
    estate_admin()
        .arg("resources")
        .assert()
        .success()
        .stdout(predicate::str::contains("hero-carousel"))
        .stdout(predicate::str::contains("/home/company-values"))
        .stdout(predicate::str::contains("name*, description*, logo (image)"))
        .stdout(predicate::str::contains("hpr-project-brochures"));
}

#[test]
fn test_declined_delete_sends_nothing() {
    // Port 9 (discard) is never contacted when the user answers no
    estate_admin()
        .args(["delete", "testimonials", "7"])
        .env("ESTATE_API_BASE_URL", "http://127.0.0.1:9/api")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled."))
        .stderr(predicate::str::contains("Delete testimonial 7?"));
}

#[test]
fn test_missing_base_url_fails() {
    estate_admin()
        .args(["list", "partners"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ESTATE_API_BASE_URL"));
}

#[test]
fn test_unknown_resource_fails() {
    estate_admin()
        .args(["list", "agents"])
        .env("ESTATE_API_BASE_URL", "http://127.0.0.1:9/api")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown resource: agents"));
}

#[test]
fn test_scoped_resource_requires_parent() {
    estate_admin()
        .args(["list", "hpr-project-gallery"])
        .env("ESTATE_API_BASE_URL", "http://127.0.0.1:9/api")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--parent"));
}

#[test]
fn test_login_without_token_file_fails() {
    estate_admin()
        .args(["login", "--token", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No token file configured"));
}
