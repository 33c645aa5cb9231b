//! Integration tests for basar

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Isolated cache/config/home directories with local sources
    struct Sandbox {
        dir: TempDir,
    }

    impl Sandbox {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
            }
        }

        fn cache_dir(&self) -> PathBuf {
            self.dir.path().join("cache")
        }

        fn config_dir(&self) -> PathBuf {
            self.dir.path().join("config")
        }

        fn home(&self) -> PathBuf {
            self.dir.path().join("home")
        }

        fn cache_file(&self) -> PathBuf {
            self.cache_dir().join("banners.json")
        }

        /// Write a local source and list the given sources in sources.conf
        fn with_sources(self, sources: &[&str]) -> Self {
            fs::create_dir_all(self.config_dir()).unwrap();
            let mut conf = String::from("# test sources\n");
            for source in sources {
                conf.push_str(source);
                conf.push('\n');
            }
            fs::write(self.config_dir().join("sources.conf"), conf).unwrap();
            self
        }

        fn write_source(&self, name: &str, json: &str) -> String {
            let path = self.dir.path().join(name);
            fs::write(&path, json).unwrap();
            path.to_string_lossy().into_owned()
        }

        fn basar(&self) -> Command {
            fs::create_dir_all(self.home()).unwrap();
            let mut cmd = cargo_bin_cmd!("basar");
            cmd.arg("--cache-dir")
                .arg(self.cache_dir())
                .arg("--config-dir")
                .arg(self.config_dir())
                .env("HOME", self.home())
                .env_remove("BASAR_TTL")
                .env_remove("BASAR_VERBOSE")
                .env_remove("BASAR_CACHE_DIR")
                .env_remove("BASAR_CONFIG_DIR");
            cmd
        }
    }

    fn sandbox_with_one_source() -> Sandbox {
        let sandbox = Sandbox::new();
        let source = sandbox.write_source(
            "a.json",
            r#"{"version":1,"linux":{"Linux version 6.1.0":["https://a/6.1.0.json.xz"]}}"#,
        );
        sandbox.with_sources(&[&source])
    }

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("basar")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("ISF symbol cache manager"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("basar")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("basar"));
    }

    #[test]
    fn default_prints_uri() {
        let sandbox = sandbox_with_one_source();
        let expected = format!("file://{}\n", sandbox.cache_file().display());

        sandbox.basar().assert().success().stdout(expected.clone());
        sandbox.basar().arg("uri").assert().success().stdout(expected);
    }

    #[test]
    fn path_prints_cache_file() {
        let sandbox = sandbox_with_one_source();

        sandbox
            .basar()
            .arg("path")
            .assert()
            .success()
            .stdout(format!("{}\n", sandbox.cache_file().display()));
    }

    #[test]
    fn update_merges_sources() {
        let sandbox = Sandbox::new();
        let a = sandbox.write_source("a.json", r#"{"version":1,"linux":{"K":["u1","u2"]}}"#);
        let b = sandbox.write_source("b.json", r#"{"version":1,"linux":{"K":["u2","u3"]}}"#);
        let sandbox = sandbox.with_sources(&[&a, &b]);

        sandbox.basar().arg("update").assert().success();

        assert_eq!(
            read(&sandbox.cache_file()),
            "{\"version\":1,\"linux\":{\"K\":[\"u1\",\"u2\",\"u3\"]}}\n"
        );
        assert!(sandbox.cache_dir().join("meta.json").exists());
        assert!(!sandbox.cache_dir().join(".lock").exists());
    }

    #[test]
    fn update_verbose_reports_sources() {
        let sandbox = sandbox_with_one_source();

        sandbox
            .basar()
            .args(["update", "-v"])
            .assert()
            .success()
            .stderr(predicate::str::contains("updated").and(predicate::str::contains("cached 1 banners")));
    }

    #[test]
    fn verbose_from_environment() {
        let sandbox = sandbox_with_one_source();

        sandbox
            .basar()
            .env("BASAR_VERBOSE", "1")
            .arg("update")
            .assert()
            .success()
            .stderr(predicate::str::contains("cached 1 banners"));
    }

    #[test]
    fn update_all_failed() {
        let sandbox = Sandbox::new().with_sources(&["/nonexistent/a.json", "/nonexistent/b.json"]);

        sandbox
            .basar()
            .arg("update")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("all sources failed"))
            .stderr(predicate::str::contains("Hint:"));

        assert!(!sandbox.cache_file().exists());
    }

    #[test]
    fn uri_fails_without_any_source() {
        let sandbox = Sandbox::new().with_sources(&["/nonexistent/a.json"]);

        sandbox
            .basar()
            .assert()
            .code(1)
            .stdout(predicate::str::is_empty());
    }

    #[test]
    fn fresh_lock_blocks_update() {
        let sandbox = sandbox_with_one_source();
        fs::create_dir_all(sandbox.cache_dir()).unwrap();
        fs::write(sandbox.cache_dir().join(".lock"), "1").unwrap();

        sandbox
            .basar()
            .arg("update")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("locked"));
    }

    #[test]
    fn check_reflects_cache() {
        let sandbox = sandbox_with_one_source();

        sandbox.basar().arg("check").assert().code(2);
        sandbox.basar().arg("update").assert().success();
        sandbox.basar().arg("check").assert().success();
    }

    #[test]
    fn check_honours_ttl() {
        let sandbox = sandbox_with_one_source();
        sandbox.basar().arg("update").assert().success();

        let file = fs::OpenOptions::new()
            .write(true)
            .open(sandbox.cache_file())
            .unwrap();
        file.set_modified(std::time::SystemTime::now() - std::time::Duration::from_secs(120))
            .unwrap();

        sandbox.basar().env("BASAR_TTL", "60").arg("check").assert().code(2);
        sandbox.basar().env("BASAR_TTL", "3600").arg("check").assert().success();
    }

    #[test]
    fn stats_json() {
        let sandbox = sandbox_with_one_source();

        sandbox
            .basar()
            .arg("stats")
            .assert()
            .success()
            .stdout("{\n  \"valid\": false\n}\n");

        sandbox.basar().arg("update").assert().success();

        let output = sandbox.basar().arg("stats").output().unwrap();
        assert!(output.status.success());
        let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(stats["valid"], true);
        assert_eq!(stats["entries"], 1);
        assert!(stats["size"].as_u64().unwrap() > 0);
        assert!(stats["updated_at"].is_string());
    }

    #[test]
    fn stats_malformed_cache() {
        let sandbox = sandbox_with_one_source();
        fs::create_dir_all(sandbox.cache_dir()).unwrap();
        fs::write(sandbox.cache_file(), "not json").unwrap();

        sandbox
            .basar()
            .arg("stats")
            .assert()
            .success()
            .stdout(predicate::str::contains("\"valid\": false"));
        sandbox.basar().arg("check").assert().code(2);
    }

    #[test]
    fn smart_update_local_sources_always_update() {
        let sandbox = sandbox_with_one_source();

        sandbox
            .basar()
            .args(["smart-update", "-v"])
            .assert()
            .success()
            .stderr(predicate::str::contains("updated: 1 banners cached"));

        let meta = read(&sandbox.cache_dir().join("meta.json"));
        assert!(meta.contains("\"updated_at\""));
    }

    #[test]
    fn clear_twice() {
        let sandbox = sandbox_with_one_source();
        sandbox.basar().arg("update").assert().success();

        sandbox.basar().arg("clear").assert().success();
        sandbox.basar().arg("clear").assert().success();

        assert!(!sandbox.cache_file().exists());
    }

    #[test]
    fn init_creates_config_once() {
        let sandbox = Sandbox::new();
        let conf = sandbox.config_dir().join("sources.conf");

        sandbox
            .basar()
            .arg("init")
            .assert()
            .success()
            .stdout(format!("{}\n", conf.display()));
        assert!(read(&conf).contains("Abyss-W4tcher"));

        sandbox
            .basar()
            .arg("init")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn configure_vol3_writes_home_config() {
        let sandbox = sandbox_with_one_source();

        sandbox.basar().arg("configure-vol3").assert().success();

        let vol3 = read(&sandbox.home().join(".volatility3.yaml"));
        assert_eq!(
            vol3,
            format!(
                "# Added by basar\nremote_isf_url: file://{}\n",
                sandbox.cache_file().display()
            )
        );

        sandbox
            .basar()
            .arg("configure-vol3")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("remote_isf_url"));
    }

    #[test]
    fn completions_bash() {
        cargo_bin_cmd!("basar")
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("basar"));
    }

    #[test]
    fn unknown_command_fails() {
        cargo_bin_cmd!("basar").arg("frobnicate").assert().failure();
    }
}
