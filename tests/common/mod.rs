//! Runs tests using actual binary, apapted from 'fd' method: https://github.com/sharkdp/fd/blob/master/tests/testenv/mod.rs
#![allow(dead_code)]
use std::env;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::process;

// if changing the dump format, update the tests data with `--from-json TEST_DUMP --json > file.json`
/// Dump of a two bus system with a hub, one device that failed to probe and sidecar data
pub const SYSTEM_DUMP: &str = "./tests/data/system_dump.json";
/// Dump without any driver or maxchild data
pub const NO_SIDECAR_DUMP: &str = "./tests/data/no_sidecar_dump.json";
/// Expected tree of [`SYSTEM_DUMP`]
pub const LSUSB_TREE_OUTPUT: &str = "./tests/data/lsusb_tree.txt";
/// Config overriding the name of class 8
pub const CONFIG_CLASS_NAMES: &str = "./tests/data/config_class_names.json";

pub fn read_dump(file_name: &str) -> BufReader<File> {
    let f = File::open(file_name).expect("Unable to open json dump file");
    BufReader::new(f)
}

pub fn read_dump_to_string(file_name: &str) -> String {
    let mut ret = String::new();
    let mut br = read_dump(file_name);
    br.read_to_string(&mut ret)
        .unwrap_or_else(|_| panic!("Failed to read {}", file_name));
    ret
}

pub fn system_dump() -> usbtree::profiler::SystemDump {
    usbtree::profiler::read_json_dump(SYSTEM_DUMP).unwrap()
}

/// Environment for the integration tests.
pub struct TestEnv {
    /// Path to the *usbtree* executable.
    usbtree_exe: PathBuf,
    /// Strip whitespace at start
    strip_start: bool,
}

/// Find the *usbtree* executable.
fn find_usbtree_exe() -> PathBuf {
    // Tests exe is in target/debug/deps, the *usbtree* exe is in target/debug
    let root = env::current_exe()
        .expect("tests executable")
        .parent()
        .expect("tests executable directory")
        .parent()
        .expect("usbtree executable directory")
        .to_path_buf();

    let exe_name = if cfg!(windows) {
        "usbtree.exe"
    } else {
        "usbtree"
    };

    root.join(exe_name)
}

/// Format an error message for when *usbtree* did not exit successfully.
fn format_exit_error(args: &[&str], output: &process::Output) -> String {
    format!(
        "`usbtree {}` did not exit successfully.\nstdout:\n---\n{}---\nstderr:\n---\n{}---",
        args.join(" "),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

/// Format an error message for when the output of *usbtree* did not match the expected output.
fn format_output_error(args: &[&str], expected: &str, actual: &str) -> String {
    // Generate diff text.
    let diff_text = diff::lines(expected, actual)
        .into_iter()
        .map(|diff| match diff {
            diff::Result::Left(l) => format!("-{}", l),
            diff::Result::Both(l, _) => format!(" {}", l),
            diff::Result::Right(r) => format!("+{}", r),
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        concat!(
            "`usbtree {}` did not produce the expected output.\n",
            "Showing diff between expected and actual:\n{}\n"
        ),
        args.join(" "),
        diff_text
    )
}

/// Normalize the output for comparison; line order is kept since it is the tree order
fn normalize_output(s: &str, trim_start: bool) -> String {
    s.lines()
        .map(|line| if trim_start { line.trim_start() } else { line })
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Trim whitespace from the beginning of each line.
fn trim_lines(s: &str) -> String {
    s.lines()
        .map(|line| line.trim_start())
        .fold(String::new(), |mut str, line| {
            str.push_str(line);
            str.push('\n');
            str
        })
}

impl TestEnv {
    pub fn new() -> TestEnv {
        let usbtree_exe = find_usbtree_exe();

        TestEnv {
            usbtree_exe,
            strip_start: false,
        }
    }

    pub fn strip_start(self, strip_start: bool) -> TestEnv {
        TestEnv {
            usbtree_exe: self.usbtree_exe,
            strip_start,
        }
    }

    /// Get the path of the usbtree executable.
    #[cfg_attr(windows, allow(unused))]
    pub fn test_exe(&self) -> &PathBuf {
        &self.usbtree_exe
    }

    /// Command reading `dump_file`, isolated from any user config
    fn command(&self, dump_file: Option<&str>, args: &[&str]) -> process::Command {
        let mut cmd = process::Command::new(&self.usbtree_exe);
        cmd.env(
            "XDG_CONFIG_HOME",
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/no-config"),
        );
        if let Some(dump) = dump_file {
            cmd.arg("--from-json").arg(dump);
        }
        cmd.args(args);
        cmd
    }

    /// Assert that calling *usbtree* with the specified arguments succeeds and return the output
    pub fn assert_success_and_get_output(
        &self,
        dump_file: Option<&str>,
        args: &[&str],
    ) -> process::Output {
        let output = self
            .command(dump_file, args)
            .output()
            .expect("usbtree output");

        // Check for exit status.
        if !output.status.success() {
            panic!("{}", format_exit_error(args, &output));
        }

        output
    }

    pub fn assert_success_and_get_normalized_output(
        &self,
        dump_file: Option<&str>,
        args: &[&str],
    ) -> String {
        let output = self.assert_success_and_get_output(dump_file, args);
        normalize_output(&String::from_utf8_lossy(&output.stdout), self.strip_start)
    }

    /// Assert that calling *usbtree* with the specified arguments produces the expected output.
    pub fn assert_output(
        &self,
        dump_file: Option<&str>,
        args: &[&str],
        expected: &str,
        contains: bool,
    ) {
        // Don't touch if doing contains
        let (expected, actual) = if contains {
            let output = self.assert_success_and_get_output(dump_file, args);
            (
                expected.to_string(),
                String::from_utf8_lossy(&output.stdout).to_string(),
            )
        // Normalize both expected and actual output.
        } else {
            (
                normalize_output(expected, self.strip_start),
                self.assert_success_and_get_normalized_output(dump_file, args),
            )
        };

        // Compare actual output to expected output.
        if contains {
            if !actual.contains(&expected) {
                panic!("{}", format_output_error(args, &expected, &actual));
            }
        } else if expected != actual {
            panic!("{}", format_output_error(args, &expected, &actual));
        }
    }

    /// Assert stdout parses as json and includes `expected`
    pub fn assert_output_json(&self, dump_file: Option<&str>, args: &[&str], expected: &str) {
        let output = self.assert_success_and_get_output(dump_file, args);
        let actual: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("usbtree json output");
        let expected: serde_json::Value = serde_json::from_str(expected).expect("expected json");

        assert_json_diff::assert_json_include!(actual: actual, expected: expected);
    }

    /// Assert that stderr of a successful run contains `expected`
    pub fn assert_stderr_contains(&self, dump_file: Option<&str>, args: &[&str], expected: &str) {
        let output = self.assert_success_and_get_output(dump_file, args);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.contains(expected) {
            panic!("{}", format_output_error(args, expected, &stderr));
        }
    }

    /// Assert that calling *usbtree* with the specified arguments produces the expected error,
    /// and does not succeed.
    pub fn assert_failure_with_error(
        &self,
        dump_file: Option<&str>,
        args: &[&str],
        expected: &str,
    ) {
        let status = self.assert_error(dump_file, args, Some(expected));
        if status.success() {
            panic!("error '{}' did not occur.", expected);
        }
    }

    /// Assert that calling *usbtree* with the specified arguments does not succeed.
    pub fn assert_failure(&self, dump_file: Option<&str>, args: &[&str]) {
        let status = self.assert_error(dump_file, args, None);
        if status.success() {
            panic!("Failure did not occur as expected.");
        }
    }

    fn assert_error(
        &self,
        dump_file: Option<&str>,
        args: &[&str],
        expected: Option<&str>,
    ) -> process::ExitStatus {
        let output = self
            .command(dump_file, args)
            .output()
            .expect("usbtree output");

        if let Some(expected) = expected {
            // Normalize both expected and actual output.
            let expected_error = trim_lines(expected);
            let actual_err = trim_lines(&String::from_utf8_lossy(&output.stderr));

            // Compare actual output to expected output.
            if !actual_err.trim_start().starts_with(&expected_error) {
                panic!(
                    "{}",
                    format_output_error(args, &expected_error, &actual_err)
                );
            }
        }

        output.status
    }
}
