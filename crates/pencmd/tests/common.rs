use std::path::Path;

use pencmd::{Executor, Recorder};

#[derive(Default, Clone)]
pub struct TestCase {
    input: String,
    expected: String,
}

/// Runs a script and describes everything it did, one line per thing.
fn exec_one(s: &str) -> Result<Vec<String>, pencmd::Error> {
    let mut ex = Executor::new(Recorder::new());
    let batch = ex.run(&pencmd::normalize(s))?;
    let mut out: Vec<String> = ex.canvas().ops.iter().map(|op| op.to_string()).collect();
    out.extend(ex.notices().iter().map(|n| format!("notice: {n}")));
    out.extend(
        batch
            .rejected
            .iter()
            .map(|(line, text)| format!("rejected {line}: {text}")),
    );
    Ok(out)
}

fn expected_lines(s: &str) -> Vec<String> {
    s.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect()
}

impl TestCase {
    fn exec(&self) {
        let out = exec_one(&self.input)
            .unwrap_or_else(|e| panic!("{} failed: {e}", self.input));
        assert_eq!(out, expected_lines(&self.expected), "{}", self.input);
    }

    fn exec_failure(&self) {
        let Err(e) = exec_one(&self.input) else {
            panic!("{} should have failed", self.input);
        };
        assert_eq!(e.to_string(), self.expected.trim(), "{}", self.input);
    }
}

pub fn read_tests(path: impl AsRef<Path>) -> Vec<TestCase> {
    let text = std::fs::read_to_string(path).unwrap();
    let mut ret = Vec::new();
    let mut in_input = true;
    let mut cur = TestCase::default();

    fn separator_line(line: &str, ch: u8) -> bool {
        line.trim().len() >= 2 && line.trim().bytes().all(|c| c == ch)
    }

    for line in text.split_inclusive('\n') {
        if in_input {
            if separator_line(line, b'-') {
                in_input = false;
            } else {
                cur.input += line;
            }
        } else if separator_line(line, b'=') {
            in_input = true;
            ret.push(std::mem::take(&mut cur));
        } else {
            cur.expected += line;
        }
    }
    ret
}

#[test]
fn text_tests() {
    let tests = read_tests("tests/basic.txt");
    assert!(!tests.is_empty());
    for test in tests {
        test.exec();
    }
}

#[test]
fn exec_failures() {
    let tests = read_tests("tests/exec-failures.txt");
    assert!(!tests.is_empty());
    for test in tests {
        test.exec_failure();
    }
}
