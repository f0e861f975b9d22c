//! End-to-end chunking scenarios driven through the binary.

use assert_cmd::Command;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
fn twenty_kib_file_spans_two_chunks() {
    let fixture = TestTree::new();
    let content = pattern_text(20 * 1024);
    fixture.write("big.txt", content.as_bytes());
    let out = TempDir::new().expect("temp out");

    run_chunker(fixture.root(), out.path(), &["--chunksize", "13"]);

    let chunks = read_chunks(out.path());
    assert_eq!(chunks.len(), 2);
    assert!(chunks[0].starts_with("\n----BEGIN FILE: big.txt----\n"));
    assert!(chunks[0].ends_with("\n----END PART OF FILE: big.txt----\n"));
    assert!(chunks[1].starts_with("\n----CONTINUED FILE: big.txt----\n"));
    assert!(chunks[1].ends_with("\n----END FILE: big.txt----\n"));

    let payloads: Vec<usize> =
        chunks.iter().map(|c| parse_segments(c).iter().map(|s| s.payload.len()).sum()).collect();
    assert_eq!(payloads, vec![13312, 20480 - 13312]);
    similar_asserts::assert_eq!(reassemble(&chunks)["big.txt"], content);
}

#[test]
fn two_small_files_share_chunk_zero() {
    let fixture = TestTree::new();
    fixture.write("one.txt", pattern_text(1024).as_bytes());
    fixture.write("two.txt", pattern_text(1024).as_bytes());
    let out = TempDir::new().expect("temp out");

    run_chunker(fixture.root(), out.path(), &[]);

    let chunks = read_chunks(out.path());
    assert_eq!(chunks.len(), 1);
    let segments = parse_segments(&chunks[0]);
    assert_eq!(segments.len(), 2);
    assert!(segments.iter().all(|s| s.begin == "BEGIN FILE" && s.end == "END FILE"));
    assert!(!chunks[0].contains("CONTINUED FILE"));
    assert!(!chunks[0].contains("END PART OF FILE"));
}

#[test]
fn excluded_git_dir_and_png_never_appear() {
    let fixture = TestTree::new();
    fixture.write(".git/config", b"[core]\n\tbare = false\n");
    fixture.write("docs/readme.md", b"# docs\n");
    fixture.write("assets/logo.png", b"not really a png but text\n");
    let out = TempDir::new().expect("temp out");

    run_chunker(fixture.root(), out.path(), &["--exclude", "**/.git/**,**/*.png"]);

    let all = read_chunks(out.path()).concat();
    assert!(all.contains("----BEGIN FILE: docs/readme.md----"));
    assert!(!all.contains(".git"));
    assert!(!all.contains("logo.png"));
}

#[test]
fn exclude_wins_over_include() {
    let fixture = TestTree::new();
    fixture.write("src/lib.rs", b"pub fn lib() {}\n");
    fixture.write("src/gen/out.rs", b"pub fn generated() {}\n");
    fixture.write("README.md", b"# readme\n");
    let out = TempDir::new().expect("temp out");

    run_chunker(
        fixture.root(),
        out.path(),
        &["--include", "**/*.rs", "--exclude", "**/gen/**"],
    );

    let files = reassemble(&read_chunks(out.path()));
    let paths: Vec<&str> = files.keys().map(String::as_str).collect();
    assert_eq!(paths, vec!["src/lib.rs"]);
}

#[test]
fn binary_files_contribute_nothing() {
    let fixture = TestTree::new();
    fixture.write("a.txt", b"alpha\n");
    fixture.write("b.bin", b"\0\0\0\x01\x02\x03\x04");
    fixture.write("c.txt", b"gamma\n");
    let out = TempDir::new().expect("temp out");

    run_chunker(fixture.root(), out.path(), &[]);

    let chunks = read_chunks(out.path());
    let all = chunks.concat();
    assert!(!all.contains("b.bin"));
    let files = reassemble(&chunks);
    assert_eq!(files.len(), 2);
    assert_eq!(files["a.txt"], "alpha\n");
    assert_eq!(files["c.txt"], "gamma\n");
}

#[test]
fn many_files_reassemble_losslessly_within_capacity() {
    let fixture = TestTree::new();
    let mut expected = BTreeMap::new();
    for (i, len) in [10usize, 3000, 1024, 5000, 1, 2047, 4096].iter().enumerate() {
        let rel = format!("dir{}/file{i}.txt", i % 3);
        let content = pattern_text(*len);
        fixture.write(&rel, content.as_bytes());
        expected.insert(rel, content);
    }
    let out = TempDir::new().expect("temp out");

    run_chunker(fixture.root(), out.path(), &["--chunksize", "2"]);

    let chunks = read_chunks(out.path());
    for chunk in &chunks {
        let payload: usize = parse_segments(chunk).iter().map(|s| s.payload.len()).sum();
        assert!(payload <= 2048, "chunk payload {payload} exceeds capacity");
    }
    similar_asserts::assert_eq!(reassemble(&chunks), expected);

    let total: usize = expected.values().map(String::len).sum();
    assert_eq!(chunks.len(), total.div_ceil(2048));
}

#[test]
fn chunk_indices_are_contiguous_and_report_matches() {
    let fixture = TestTree::new();
    fixture.write("long.txt", pattern_text(5 * 1024 + 7).as_bytes());
    let out = TempDir::new().expect("temp out");

    run_chunker(fixture.root(), out.path(), &["--chunksize", "1", "--no-timestamp"]);

    let mut names: Vec<String> = fs::read_dir(out.path())
        .expect("read out")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".txt"))
        .collect();
    names.sort_by_key(|n| {
        n.trim_start_matches("chunk").trim_end_matches(".txt").parse::<usize>().ok()
    });
    let expected: Vec<String> = (0..6).map(|i| format!("chunk{i}.txt")).collect();
    assert_eq!(names, expected);

    let raw = fs::read_to_string(out.path().join("chunk_report.json")).expect("report");
    let report: serde_json::Value = serde_json::from_str(&raw).expect("report json");
    assert!(report.get("generated_at").is_none());
    assert_eq!(report["stats"]["chunks_created"], serde_json::json!(6));
    assert_eq!(report["stats"]["bytes_written"], serde_json::json!(5 * 1024 + 7));
    let indices: Vec<u64> = report["chunks"]
        .as_array()
        .expect("chunks array")
        .iter()
        .map(|c| c["index"].as_u64().expect("index"))
        .collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn output_dir_inside_source_is_not_reingested() {
    let fixture = TestTree::new();
    fixture.write("notes.txt", b"notes\n");
    let out = fixture.root().join("out");

    run_chunker(fixture.root(), &out, &[]);
    run_chunker(fixture.root(), &out, &[]);

    let files = reassemble(&read_chunks(&out));
    let paths: Vec<&str> = files.keys().map(String::as_str).collect();
    assert_eq!(paths, vec!["notes.txt"]);
}

// --- helpers ---

struct TestTree {
    dir: TempDir,
}

impl TestTree {
    fn new() -> Self {
        Self { dir: TempDir::new().expect("temp tree") }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn write(&self, rel: &str, content: &[u8]) {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, content).expect("write fixture");
    }
}

fn run_chunker(source: &Path, out: &Path, extra: &[&str]) {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-to-chunks"));
    cmd.env_remove("RUST_LOG").arg(source).arg(out).args(extra);
    cmd.assert().success();
}

fn pattern_text(len: usize) -> String {
    "The quick brown fox jumps over the lazy dog.\n".chars().cycle().take(len).collect()
}

fn read_chunks(out: &Path) -> Vec<String> {
    let mut chunks = Vec::new();
    for index in 0.. {
        let path: PathBuf = out.join(format!("chunk{index}.txt"));
        if !path.exists() {
            break;
        }
        chunks.push(fs::read_to_string(path).expect("read chunk"));
    }
    chunks
}

struct ParsedSegment {
    begin: String,
    path: String,
    payload: String,
    end: String,
}

fn parse_segments(text: &str) -> Vec<ParsedSegment> {
    let mut segments = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("\n----") {
        let after = &rest[start + 5..];
        let header_end = after.find("----\n").expect("header terminator");
        let (begin, path) = after[..header_end].split_once(": ").expect("header");
        let body = &after[header_end + 5..];

        let end_full = format!("\n----END FILE: {path}----\n");
        let end_part = format!("\n----END PART OF FILE: {path}----\n");
        let (pos, end, len) = [
            body.find(&end_full).map(|p| (p, "END FILE", end_full.len())),
            body.find(&end_part).map(|p| (p, "END PART OF FILE", end_part.len())),
        ]
        .into_iter()
        .flatten()
        .min_by_key(|(p, _, _)| *p)
        .expect("segment trailer");

        segments.push(ParsedSegment {
            begin: begin.to_string(),
            path: path.to_string(),
            payload: body[..pos].to_string(),
            end: end.to_string(),
        });
        rest = &body[pos + len..];
    }
    segments
}

/// Join segments per path in chunk order, checking the marker sequence as we go.
fn reassemble(chunks: &[String]) -> BTreeMap<String, String> {
    let mut files: BTreeMap<String, String> = BTreeMap::new();
    let mut pending: Option<String> = None;
    for chunk in chunks {
        for segment in parse_segments(chunk) {
            match pending.take() {
                Some(path) => {
                    assert_eq!(segment.begin, "CONTINUED FILE");
                    assert_eq!(segment.path, path);
                }
                None => assert_eq!(segment.begin, "BEGIN FILE"),
            }
            if segment.end == "END PART OF FILE" {
                pending = Some(segment.path.clone());
            }
            files.entry(segment.path).or_default().push_str(&segment.payload);
        }
    }
    assert!(pending.is_none(), "last segment left a file unfinished");
    files
}
